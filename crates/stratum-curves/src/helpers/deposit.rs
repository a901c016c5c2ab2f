//! Money market deposit helper.

use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::QuoteHandle;
use stratum_core::types::{Date, Period};

use super::{check_dates, BootstrapHelper, RateHelper};
use crate::error::CurveResult;
use crate::traits::YieldCurve;

/// A deposit quoted as a simple rate.
///
/// Pins the discount factor at the deposit maturity:
///
/// ```text
/// rate = (DF(start) / DF(end) - 1) / τ
/// ```
///
/// where τ is the year fraction under the deposit's day count (ACT/360 by
/// default).
///
/// # Example
///
/// ```rust
/// use stratum_core::prelude::*;
/// use stratum_curves::helpers::{BootstrapHelper, DepositRateHelper};
///
/// let spot = Date::from_ymd(2025, 1, 15).unwrap();
/// let helper = DepositRateHelper::from_tenor(SimpleQuote::new(0.0525), spot, Period::months(3)).unwrap();
/// assert_eq!(helper.pillar_date(), Date::from_ymd(2025, 4, 15).unwrap());
/// ```
pub struct DepositRateHelper {
    quote: QuoteHandle,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
}

impl DepositRateHelper {
    /// Creates a deposit helper from explicit dates.
    pub fn new(quote: QuoteHandle, start: Date, end: Date) -> CurveResult<Self> {
        check_dates(start, end, "deposit")?;
        Ok(Self {
            quote,
            start,
            end,
            day_count: DayCountConvention::Act360,
        })
    }

    /// Creates a deposit helper running `tenor` from `spot`.
    pub fn from_tenor(quote: QuoteHandle, spot: Date, tenor: Period) -> CurveResult<Self> {
        let end = spot.advance(tenor)?;
        Self::new(quote, spot, end)
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Accrual year fraction of the deposit.
    #[must_use]
    pub fn accrual(&self) -> f64 {
        self.day_count.year_fraction(self.start, self.end)
    }
}

impl BootstrapHelper for DepositRateHelper {
    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn pillar_date(&self) -> Date {
        self.end
    }

    fn earliest_date(&self) -> Date {
        self.start
    }

    fn description(&self) -> String {
        format!("Deposit {} to {}", self.start, self.end)
    }
}

impl RateHelper for DepositRateHelper {
    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let df_start = curve.discount_factor_at(self.start)?;
        let df_end = curve.discount_factor_at(self.end)?;
        Ok((df_start / df_end - 1.0) / self.accrual())
    }
}

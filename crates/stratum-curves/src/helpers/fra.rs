//! Forward rate agreement helper.

use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::QuoteHandle;
use stratum_core::types::Date;

use super::{check_dates, BootstrapHelper, RateHelper};
use crate::error::CurveResult;
use crate::traits::YieldCurve;

/// A FRA quoted as the simple forward rate over `[start, end]`.
///
/// Same pricing as a deposit, but the accrual period starts in the future,
/// so the pinned node at `end` depends on the curve already built up to
/// `start`.
pub struct FraRateHelper {
    quote: QuoteHandle,
    start: Date,
    end: Date,
    day_count: DayCountConvention,
}

impl FraRateHelper {
    /// Creates a FRA helper from explicit accrual dates.
    pub fn new(quote: QuoteHandle, start: Date, end: Date) -> CurveResult<Self> {
        check_dates(start, end, "FRA")?;
        Ok(Self {
            quote,
            start,
            end,
            day_count: DayCountConvention::Act360,
        })
    }

    /// Creates a `start x end` FRA in months from `spot`, e.g. `3 x 6`.
    pub fn from_months(
        quote: QuoteHandle,
        spot: Date,
        months_to_start: i32,
        months_to_end: i32,
    ) -> CurveResult<Self> {
        let start = spot.add_months(months_to_start)?;
        let end = spot.add_months(months_to_end)?;
        Self::new(quote, start, end)
    }

    /// Sets the accrual day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }
}

impl BootstrapHelper for FraRateHelper {
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
        format!("FRA {} to {}", self.start, self.end)
    }
}

impl RateHelper for FraRateHelper {
    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let tau = self.day_count.year_fraction(self.start, self.end);
        let df_start = curve.discount_factor_at(self.start)?;
        let df_end = curve.discount_factor_at(self.end)?;
        Ok((df_start / df_end - 1.0) / tau)
    }
}

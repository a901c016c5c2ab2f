//! Swap helpers.
//!
//! Both helpers price a fixed-for-floating swap at par:
//!
//! ```text
//! par = Σ_j D(T_j) · (P(T_{j-1}) / P(T_j) - 1)  /  Σ_i τ_i · D(T_i)
//! ```
//!
//! where `P` is the curve being bootstrapped (it projects the floating
//! leg) and `D` the discounting curve. Without an exogenous discount curve
//! `D = P` and the floating leg telescopes to `P(T_0) - P(T_n)`.

use std::sync::Arc;

use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::QuoteHandle;
use stratum_core::types::{Date, Frequency, Period};

use super::{check_dates, schedule, BootstrapHelper, RateHelper};
use crate::error::{CurveError, CurveResult};
use crate::traits::YieldCurve;

/// Leg layout shared by the swap helpers.
struct SwapLegs {
    start: Date,
    end: Date,
    fixed_dates: Vec<Date>,
    fixed_day_count: DayCountConvention,
    float_dates: Vec<Date>,
}

impl SwapLegs {
    fn new(
        start: Date,
        end: Date,
        fixed_frequency: Frequency,
        fixed_day_count: DayCountConvention,
        float_frequency: Frequency,
    ) -> CurveResult<Self> {
        check_dates(start, end, "swap")?;
        Ok(Self {
            start,
            end,
            fixed_dates: schedule(start, end, fixed_frequency)?,
            fixed_day_count,
            float_dates: schedule(start, end, float_frequency)?,
        })
    }

    fn annuity(&self, discount: &dyn YieldCurve) -> CurveResult<f64> {
        let mut annuity = 0.0;
        let mut prev = self.start;
        for &date in &self.fixed_dates {
            let tau = self.fixed_day_count.year_fraction(prev, date);
            annuity += tau * discount.discount_factor_at(date)?;
            prev = date;
        }
        Ok(annuity)
    }

    fn floating_leg(&self, projection: &dyn YieldCurve, discount: &dyn YieldCurve) -> CurveResult<f64> {
        let mut pv = 0.0;
        let mut p_prev = projection.discount_factor_at(self.start)?;
        for &date in &self.float_dates {
            let p = projection.discount_factor_at(date)?;
            pv += discount.discount_factor_at(date)? * (p_prev / p - 1.0);
            p_prev = p;
        }
        Ok(pv)
    }

    fn par_rate(&self, projection: &dyn YieldCurve, discount: &dyn YieldCurve) -> CurveResult<f64> {
        let annuity = self.annuity(discount)?;
        if annuity <= 0.0 || !annuity.is_finite() {
            return Err(CurveError::precondition(format!(
                "swap {} to {} has a non-positive annuity {annuity}",
                self.start, self.end
            )));
        }
        Ok(self.floating_leg(projection, discount)? / annuity)
    }
}

/// A vanilla fixed-for-floating swap quoted at its par rate.
///
/// Fixed leg annual 30/360 and floating leg quarterly by default. The
/// curve under construction projects the floating leg; it also discounts
/// unless an exogenous discount curve is attached, as for a forwarding
/// curve discounted off an OIS curve.
pub struct SwapRateHelper {
    quote: QuoteHandle,
    tenor: Option<Period>,
    legs: SwapLegs,
    discount: Option<Arc<dyn YieldCurve>>,
}

impl SwapRateHelper {
    /// Creates a swap helper with default conventions.
    pub fn new(quote: QuoteHandle, start: Date, end: Date) -> CurveResult<Self> {
        Self::with_conventions(
            quote,
            start,
            end,
            Frequency::Annual,
            DayCountConvention::Thirty360US,
            Frequency::Quarterly,
        )
    }

    /// Creates a swap helper running `tenor` from `spot`.
    pub fn from_tenor(quote: QuoteHandle, spot: Date, tenor: Period) -> CurveResult<Self> {
        let end = spot.advance(tenor)?;
        let mut helper = Self::new(quote, spot, end)?;
        helper.tenor = Some(tenor);
        Ok(helper)
    }

    /// Creates a swap helper with explicit leg conventions.
    pub fn with_conventions(
        quote: QuoteHandle,
        start: Date,
        end: Date,
        fixed_frequency: Frequency,
        fixed_day_count: DayCountConvention,
        float_frequency: Frequency,
    ) -> CurveResult<Self> {
        Ok(Self {
            quote,
            tenor: None,
            legs: SwapLegs::new(start, end, fixed_frequency, fixed_day_count, float_frequency)?,
            discount: None,
        })
    }

    /// Discounts both legs on `curve` instead of the curve being built.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: Arc<dyn YieldCurve>) -> Self {
        self.discount = Some(curve);
        self
    }

    /// Fixed leg payment dates.
    #[must_use]
    pub fn fixed_dates(&self) -> &[Date] {
        &self.legs.fixed_dates
    }
}

impl BootstrapHelper for SwapRateHelper {
    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn pillar_date(&self) -> Date {
        self.legs.end
    }

    fn earliest_date(&self) -> Date {
        self.legs.start
    }

    fn description(&self) -> String {
        match self.tenor {
            Some(tenor) => format!("Swap {tenor} from {}", self.legs.start),
            None => format!("Swap {} to {}", self.legs.start, self.legs.end),
        }
    }

    fn revision(&self) -> u64 {
        let curve = self.discount.as_ref().map_or(0, |c| c.revision());
        self.quote.revision().max(curve)
    }
}

impl RateHelper for SwapRateHelper {
    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let discount = self.discount.as_deref().unwrap_or(curve);
        self.legs.par_rate(curve, discount)
    }
}

/// An overnight index swap quoted at its par rate.
///
/// Annual ACT/360 fixed leg against daily-compounded overnight fixings,
/// which compound to the simple forward over each fixed period, so both
/// legs share one schedule.
pub struct OisRateHelper {
    quote: QuoteHandle,
    tenor: Option<Period>,
    legs: SwapLegs,
    discount: Option<Arc<dyn YieldCurve>>,
}

impl OisRateHelper {
    /// Creates an OIS helper from explicit dates.
    pub fn new(quote: QuoteHandle, start: Date, end: Date) -> CurveResult<Self> {
        Ok(Self {
            quote,
            tenor: None,
            legs: SwapLegs::new(
                start,
                end,
                Frequency::Annual,
                DayCountConvention::Act360,
                Frequency::Annual,
            )?,
            discount: None,
        })
    }

    /// Creates an OIS helper running `tenor` from `spot`.
    pub fn from_tenor(quote: QuoteHandle, spot: Date, tenor: Period) -> CurveResult<Self> {
        let end = spot.advance(tenor)?;
        let mut helper = Self::new(quote, spot, end)?;
        helper.tenor = Some(tenor);
        Ok(helper)
    }

    /// Discounts on `curve`, e.g. a swap collateralized in another currency.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: Arc<dyn YieldCurve>) -> Self {
        self.discount = Some(curve);
        self
    }
}

impl BootstrapHelper for OisRateHelper {
    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn pillar_date(&self) -> Date {
        self.legs.end
    }

    fn earliest_date(&self) -> Date {
        self.legs.start
    }

    fn description(&self) -> String {
        match self.tenor {
            Some(tenor) => format!("OIS {tenor} from {}", self.legs.start),
            None => format!("OIS {} to {}", self.legs.start, self.legs.end),
        }
    }

    fn revision(&self) -> u64 {
        let curve = self.discount.as_ref().map_or(0, |c| c.revision());
        self.quote.revision().max(curve)
    }
}

impl RateHelper for OisRateHelper {
    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        let discount = self.discount.as_deref().unwrap_or(curve);
        self.legs.par_rate(curve, discount)
    }
}

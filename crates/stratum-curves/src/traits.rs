//! Core traits for term structures.
//!
//! [`YieldCurve`] is what rate helpers price against and what consumers
//! discount with; [`CreditCurve`] plays the same role for default helpers.
//! Both are implemented by bootstrapped [`PiecewiseCurve`]s and by the
//! transient node curves a bootstrap works on, so helpers never know
//! whether they are looking at a finished curve or a trial one.
//!
//! [`PiecewiseCurve`]: crate::piecewise::PiecewiseCurve

use stratum_core::daycounts::DayCountConvention;
use stratum_core::types::{Compounding, Date};

use crate::error::CurveResult;

/// The core trait for yield curves.
///
/// # Required Methods
///
/// - [`discount_factor`](YieldCurve::discount_factor)
/// - [`reference_date`](YieldCurve::reference_date)
/// - [`max_date`](YieldCurve::max_date)
/// - [`day_count`](YieldCurve::day_count)
///
/// Rates and date-based accessors derive from these.
///
/// # Example
///
/// ```rust,ignore
/// fn price_zero_coupon(curve: &dyn YieldCurve, maturity: Date, face: f64) -> CurveResult<f64> {
///     Ok(face * curve.discount_factor_at(maturity)?)
/// }
/// ```
pub trait YieldCurve: Send + Sync {
    /// Returns the discount factor from the reference date to time `t`.
    ///
    /// Returns 1.0 for `t <= 0`.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Returns the zero rate at time `t` with the specified compounding.
    fn zero_rate(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        let df = self.discount_factor(t)?;
        Ok(compounding.zero_rate(df, t))
    }

    /// Returns the simply-compounded forward rate between times `t1` and `t2`.
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / (t2 - t1)`
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Ok(0.0);
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        if df2 <= 0.0 {
            return Ok(0.0);
        }
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }

    /// Returns the instantaneous forward rate at time `t`.
    ///
    /// Uses a one-day finite difference of `ln DF`.
    fn instantaneous_forward(&self, t: f64) -> CurveResult<f64> {
        let h = 1.0 / 365.0;
        let df = self.discount_factor(t)?;
        let df_plus = self.discount_factor(t + h)?;
        if df <= 0.0 || df_plus <= 0.0 {
            return Ok(0.0);
        }
        Ok(-(df_plus.ln() - df.ln()) / h)
    }

    /// Returns the curve's reference (valuation) date.
    fn reference_date(&self) -> Date;

    /// Returns the date of the last node.
    fn max_date(&self) -> Date;

    /// Day count mapping dates to curve times.
    fn day_count(&self) -> DayCountConvention;

    /// Returns the curve time of `date`.
    fn year_fraction(&self, date: Date) -> f64 {
        self.day_count().year_fraction(self.reference_date(), date)
    }

    /// Returns the discount factor for a specific date.
    fn discount_factor_at(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor(self.year_fraction(date))
    }

    /// Returns the zero rate for a specific date.
    fn zero_rate_at(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        self.zero_rate(self.year_fraction(date), compounding)
    }

    /// Returns the forward rate between two dates.
    fn forward_rate_between(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.forward_rate(self.year_fraction(start), self.year_fraction(end))
    }

    /// Revision of the market data the curve depends on.
    ///
    /// Helpers referencing this curve fold it into their own revision so a
    /// quote change propagates to every dependent curve. Curves without
    /// observable inputs return 0.
    fn revision(&self) -> u64 {
        0
    }
}

/// The core trait for default-probability term structures.
pub trait CreditCurve: Send + Sync {
    /// Probability of no default before time `t`.
    fn survival_probability(&self, t: f64) -> CurveResult<f64>;

    /// Instantaneous hazard rate at time `t`.
    fn hazard_rate(&self, t: f64) -> CurveResult<f64>;

    /// Unconditional default density at time `t`.
    fn default_density(&self, t: f64) -> CurveResult<f64> {
        Ok(self.hazard_rate(t)? * self.survival_probability(t)?)
    }

    /// Probability of default before time `t`.
    fn default_probability(&self, t: f64) -> CurveResult<f64> {
        Ok(1.0 - self.survival_probability(t)?)
    }

    /// Returns the curve's reference date.
    fn reference_date(&self) -> Date;

    /// Returns the date of the last node.
    fn max_date(&self) -> Date;

    /// Day count mapping dates to curve times.
    fn day_count(&self) -> DayCountConvention;

    /// Returns the curve time of `date`.
    fn year_fraction(&self, date: Date) -> f64 {
        self.day_count().year_fraction(self.reference_date(), date)
    }

    /// Survival probability to a specific date.
    fn survival_probability_at(&self, date: Date) -> CurveResult<f64> {
        self.survival_probability(self.year_fraction(date))
    }

    /// Revision of the market data the curve depends on.
    fn revision(&self) -> u64 {
        0
    }
}

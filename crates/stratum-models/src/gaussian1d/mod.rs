//! Gaussian one-factor short rate models.
//!
//! A [`Gaussian1dModel`] prices zero bonds conditional on a standardized
//! state variable `y`: at time `t` the model state is `x = y · σ_x(t)`,
//! so `y = 0` is the mean scenario and `y = ±1` a one standard deviation
//! move whatever the horizon. Basket generation bumps `y` to measure how
//! an exotic's underlying reacts to the model factor.
//!
//! - **Hull-White**: mean-reverting Gaussian short rate fitted to a curve

mod hull_white;

pub use hull_white::HullWhite;

use std::sync::Arc;

use stratum_core::types::Date;
use stratum_curves::YieldCurve;

use crate::error::ModelResult;

/// A one-factor Gaussian model with a standardized state.
pub trait Gaussian1dModel: Send + Sync {
    /// Returns the model name.
    fn name(&self) -> &'static str;

    /// Curve the model is fitted to.
    fn term_structure(&self) -> &Arc<dyn YieldCurve>;

    /// Time origin of the model.
    fn reference_date(&self) -> Date {
        self.term_structure().reference_date()
    }

    /// Model time of `date`.
    fn time(&self, date: Date) -> f64 {
        self.term_structure().year_fraction(date)
    }

    /// Standard deviation of the model state at time `t`.
    fn state_std_dev(&self, t: f64) -> f64;

    /// Price at `reference` of a zero bond paying one at `maturity`, in
    /// standardized state `y`.
    ///
    /// `discount` replaces the model curve for the deterministic part of
    /// the price.
    fn zerobond(
        &self,
        maturity: Date,
        reference: Date,
        y: f64,
        discount: Option<&dyn YieldCurve>,
    ) -> ModelResult<f64>;
}

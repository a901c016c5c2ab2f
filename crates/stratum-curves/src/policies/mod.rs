//! Node update policies.
//!
//! One bootstrap loop serves every curve family. What differs between a
//! discount-factor curve and a hazard-rate curve is captured here: what a
//! node value means, where the search for it starts, how far it may move,
//! and how interpolated node values turn back into discount factors or
//! survival probabilities.
//!
//! # Yield curves
//!
//! | Policy | Node value | Search interval |
//! |--------|------------|-----------------|
//! | [`Discount`] | discount factor | `[ε, DF(previous)]` |
//! | [`ZeroYield`] | continuously compounded zero rate | `[-1, 3]` |
//! | [`ForwardRate`] | instantaneous forward | `[-1, 3]` |
//!
//! # Credit curves
//!
//! | Policy | Node value | Search interval |
//! |--------|------------|-----------------|
//! | [`HazardRate`] | hazard rate | `[ε, 3]` |
//! | [`SurvivalProbability`] | survival probability | `[ε, S(previous)]` |
//! | [`DefaultDensity`] | default density | `[ε, 3]` |
//!
//! `ε` scales with the bootstrap accuracy so that tight accuracies do not
//! produce degenerate brackets.

mod credit;
mod rates;

pub use credit::{DefaultDensity, HazardRate, SurvivalProbability};
pub use rates::{Discount, ForwardRate, ZeroYield};

use stratum_math::interpolation::{InterpolationScheme, Interpolator};

use crate::error::CurveResult;
use crate::helpers::{BootstrapHelper, DefaultHelper, RateHelper};
use crate::node_curve::NodeCurve;

/// Lower bound of the search interval for strictly positive node values.
pub(crate) fn positive_floor(accuracy: f64) -> f64 {
    accuracy * 1e-3
}

/// How a curve family stores, guesses and bounds its node values.
pub trait NodeUpdatePolicy: Sized + Send + Sync + 'static {
    /// The helpers this curve family is calibrated to.
    type Helper: ?Sized + BootstrapHelper;

    /// Short name used in diagnostics.
    const NAME: &'static str;

    /// Leading nodes fixed by convention rather than solved for.
    const FIXED_NODES: usize = 1;

    /// Value every node holds before it is solved, including the reference
    /// node.
    fn initial_value() -> f64;

    /// Starting point when neither the helper nor extrapolation offers one.
    fn initial_guess() -> f64 {
        Self::initial_value()
    }

    /// Extrapolated starting point for node `i` from the nodes before it.
    fn guess(i: usize, times: &[f64], data: &[f64]) -> Option<f64>;

    /// Smallest admissible value of node `i`.
    fn min_value_after(i: usize, data: &[f64], accuracy: f64) -> f64;

    /// Largest admissible value of node `i`.
    fn max_value_after(i: usize, data: &[f64]) -> f64;

    /// Stores a trial or solved value for node `i`.
    fn update_guess(data: &mut [f64], value: f64, i: usize) {
        data[i] = value;
    }

    /// Checks a freshly pinned node.
    fn validate_node(
        _i: usize,
        _times: &[f64],
        _data: &[f64],
        _interpolation: &dyn Interpolator,
    ) -> Result<(), String> {
        Ok(())
    }

    /// Signed quote error of `helper` against the trial `curve`.
    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64>;
}

/// A policy whose nodes describe a yield curve.
pub trait YieldNodePolicy: NodeUpdatePolicy<Helper = dyn RateHelper> {
    /// Discount factor at `t > 0` from the interpolated node values.
    fn discount(interpolation: &dyn Interpolator, t: f64) -> f64;
}

/// A policy whose nodes describe a default-probability curve.
pub trait DefaultNodePolicy: NodeUpdatePolicy<Helper = dyn DefaultHelper> {
    /// Survival probability at `t > 0`.
    fn survival_probability(interpolation: &dyn Interpolator, t: f64) -> f64;

    /// Hazard rate at `t >= 0`.
    fn hazard_rate(interpolation: &dyn Interpolator, t: f64) -> f64;

    /// Default density at `t >= 0`.
    fn default_density(interpolation: &dyn Interpolator, t: f64) -> f64 {
        Self::hazard_rate(interpolation, t) * Self::survival_probability(interpolation, t)
    }
}

/// Extends a positive, decreasing interpolated quantity beyond its last
/// node at the constant log-slope of the last segment.
///
/// Discount factors extend at a flat instantaneous forward and survival
/// probabilities at a flat hazard rate.
pub(crate) fn log_slope_extension(interpolation: &dyn Interpolator, t: f64) -> f64 {
    let t_last = interpolation.max_x();
    if t <= t_last {
        return interpolation.interpolate(t);
    }
    let last = interpolation.interpolate(t_last);
    let rate = -interpolation.derivative(t_last) / last;
    last * (-rate * (t - t_last)).exp()
}

/// Constant rate reproducing `value` at `t`, i.e. `-ln(value) / t`.
pub(crate) fn flat_rate(value: f64, t: f64) -> Option<f64> {
    (value > 0.0 && t > 0.0).then(|| -value.ln() / t)
}

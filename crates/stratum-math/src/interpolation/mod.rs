//! Interpolation over curve nodes.
//!
//! An [`Interpolator`] is a continuous view over `(x, y)` node pairs; an
//! [`InterpolationScheme`] is the factory a curve holds to rebuild that
//! view whenever its nodes move.
//!
//! | Scheme | Interpolator | Required points | Global |
//! |--------|--------------|-----------------|--------|
//! | [`Linear`] | [`LinearInterpolator`] | 2 | no |
//! | [`LogLinear`] | [`LogLinearInterpolator`] | 2 | no |
//! | [`BackwardFlat`] | [`BackwardFlatInterpolator`] | 1 | no |
//! | [`Cubic`] | [`CubicSpline`] (natural) | 2 | yes |
//!
//! A global scheme lets every node influence every segment, so a node
//! solved early moves again when later nodes are added. Bootstraps use
//! [`InterpolationScheme::GLOBAL`] to decide whether a refinement loop is
//! needed.
//!
//! Outside `[min_x, max_x]` all interpolators extrapolate flat: the value
//! of the nearest end node, zero derivative, and a primitive that keeps
//! accumulating at the end value.

mod backward_flat;
mod cubic_spline;
mod linear;
mod log_linear;

pub use backward_flat::BackwardFlatInterpolator;
pub use cubic_spline::CubicSpline;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use std::fmt::Debug;
use std::sync::Arc;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync + Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> f64;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> f64;

    /// Returns the integral of the interpolant from `min_x` to `x`.
    fn primitive(&self, x: f64) -> f64;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Factory for interpolators over a node set.
pub trait InterpolationScheme: Send + Sync + Clone + Default + Debug + 'static {
    /// Minimum number of nodes the scheme can interpolate.
    const REQUIRED_POINTS: usize;

    /// True when every node influences every segment.
    const GLOBAL: bool;

    /// Builds an interpolator over `xs` (strictly increasing) and `ys`.
    fn interpolate(&self, xs: &[f64], ys: &[f64]) -> MathResult<Arc<dyn Interpolator>>;
}

/// Piecewise linear interpolation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl InterpolationScheme for Linear {
    const REQUIRED_POINTS: usize = 2;
    const GLOBAL: bool = false;

    fn interpolate(&self, xs: &[f64], ys: &[f64]) -> MathResult<Arc<dyn Interpolator>> {
        Ok(Arc::new(LinearInterpolator::new(xs.to_vec(), ys.to_vec())?))
    }
}

/// Linear interpolation on the logarithm of the values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogLinear;

impl InterpolationScheme for LogLinear {
    const REQUIRED_POINTS: usize = 2;
    const GLOBAL: bool = false;

    fn interpolate(&self, xs: &[f64], ys: &[f64]) -> MathResult<Arc<dyn Interpolator>> {
        Ok(Arc::new(LogLinearInterpolator::new(xs.to_vec(), ys.to_vec())?))
    }
}

/// Piecewise constant, each segment taking its right node's value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackwardFlat;

impl InterpolationScheme for BackwardFlat {
    const REQUIRED_POINTS: usize = 1;
    const GLOBAL: bool = false;

    fn interpolate(&self, xs: &[f64], ys: &[f64]) -> MathResult<Arc<dyn Interpolator>> {
        Ok(Arc::new(BackwardFlatInterpolator::new(xs.to_vec(), ys.to_vec())?))
    }
}

/// Natural cubic spline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cubic;

impl InterpolationScheme for Cubic {
    const REQUIRED_POINTS: usize = 2;
    const GLOBAL: bool = true;

    fn interpolate(&self, xs: &[f64], ys: &[f64]) -> MathResult<Arc<dyn Interpolator>> {
        Ok(Arc::new(CubicSpline::new(xs.to_vec(), ys.to_vec())?))
    }
}

/// Checks lengths, minimum size and strict ordering of node abscissas.
pub(crate) fn validate_nodes(xs: &[f64], ys: &[f64], required: usize) -> MathResult<()> {
    if xs.len() < required {
        return Err(MathError::insufficient_data(required, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input("x values must be strictly increasing"));
    }
    if xs.iter().chain(ys).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("node values must be finite"));
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i + 1]]` containing `x`, clamped to
/// the first and last segments.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len().saturating_sub(2);
    xs.partition_point(|&probe| probe <= x).saturating_sub(1).min(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_schemes_pass_through_nodes() {
        let xs = [0.0, 0.5, 1.0, 2.0, 5.0];
        let ys = [1.0, 0.98, 0.96, 0.92, 0.80];

        let interpolators: Vec<Arc<dyn Interpolator>> = vec![
            Linear.interpolate(&xs, &ys).unwrap(),
            LogLinear.interpolate(&xs, &ys).unwrap(),
            BackwardFlat.interpolate(&xs, &ys).unwrap(),
            Cubic.interpolate(&xs, &ys).unwrap(),
        ];
        for interp in &interpolators {
            for (x, y) in xs.iter().zip(ys.iter()) {
                assert_relative_eq!(interp.interpolate(*x), *y, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_flat_extrapolation() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.01, 0.02, 0.03];
        for interp in [
            Linear.interpolate(&xs, &ys).unwrap(),
            Cubic.interpolate(&xs, &ys).unwrap(),
        ] {
            assert_relative_eq!(interp.interpolate(10.0), 0.03, epsilon = 1e-14);
            assert_relative_eq!(interp.derivative(10.0), 0.0);
            let tail = interp.primitive(3.0) - interp.primitive(2.0);
            assert_relative_eq!(tail, 0.03, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_scheme_constants() {
        assert_eq!(Linear::REQUIRED_POINTS, 2);
        assert_eq!(BackwardFlat::REQUIRED_POINTS, 1);
        assert!(Cubic::GLOBAL);
        assert!(!LogLinear::GLOBAL);
    }

    #[test]
    fn test_validation() {
        assert!(Linear.interpolate(&[0.0], &[1.0]).is_err());
        assert!(Linear.interpolate(&[0.0, 0.0], &[1.0, 2.0]).is_err());
        assert!(Linear.interpolate(&[0.0, 1.0], &[1.0]).is_err());
        assert!(Linear.interpolate(&[0.0, 1.0], &[1.0, f64::NAN]).is_err());
        assert!(BackwardFlat.interpolate(&[0.0], &[1.0]).is_ok());
    }

    #[test]
    fn test_find_segment() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(find_segment(&xs, -1.0), 0);
        assert_eq!(find_segment(&xs, 0.0), 0);
        assert_eq!(find_segment(&xs, 1.0), 1);
        assert_eq!(find_segment(&xs, 2.5), 2);
        assert_eq!(find_segment(&xs, 3.0), 2);
        assert_eq!(find_segment(&xs, 9.0), 2);
    }
}

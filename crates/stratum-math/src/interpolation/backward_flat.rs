//! Backward-flat interpolation.

use crate::error::MathResult;
use crate::interpolation::{validate_nodes, Interpolator};

/// Piecewise constant interpolation where `(x[i-1], x[i]]` takes `y[i]`.
///
/// Over forward-rate nodes this yields a piecewise flat forward curve.
#[derive(Debug, Clone)]
pub struct BackwardFlatInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    primitives: Vec<f64>,
}

impl BackwardFlatInterpolator {
    /// Creates a new backward-flat interpolator from at least one node.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 1)?;

        let mut primitives = Vec::with_capacity(xs.len());
        primitives.push(0.0);
        for i in 1..xs.len() {
            primitives.push(primitives[i - 1] + ys[i] * (xs[i] - xs[i - 1]));
        }

        Ok(Self { xs, ys, primitives })
    }

    /// Index of the node whose value applies at `x`.
    fn node_for(&self, x: f64) -> usize {
        self.xs
            .partition_point(|&probe| probe < x)
            .min(self.xs.len() - 1)
    }
}

impl Interpolator for BackwardFlatInterpolator {
    fn interpolate(&self, x: f64) -> f64 {
        self.ys[self.node_for(x)]
    }

    fn derivative(&self, _x: f64) -> f64 {
        0.0
    }

    fn primitive(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0] * (x - self.xs[0]);
        }
        if x >= self.xs[n - 1] {
            return self.primitives[n - 1] + self.ys[n - 1] * (x - self.xs[n - 1]);
        }
        let i = self.node_for(x);
        self.primitives[i - 1] + self.ys[i] * (x - self.xs[i - 1])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_takes_right_node_value() {
        let interp =
            BackwardFlatInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.01, 0.02, 0.03]).unwrap();
        assert_eq!(interp.interpolate(0.0), 0.01);
        assert_eq!(interp.interpolate(0.5), 0.02);
        assert_eq!(interp.interpolate(1.0), 0.02);
        assert_eq!(interp.interpolate(1.0001), 0.03);
        assert_eq!(interp.interpolate(7.0), 0.03);
    }

    #[test]
    fn test_primitive_is_forward_integral() {
        let interp =
            BackwardFlatInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.01, 0.02, 0.03]).unwrap();
        assert_relative_eq!(interp.primitive(1.0), 0.02, epsilon = 1e-15);
        assert_relative_eq!(interp.primitive(1.5), 0.02 + 0.015, epsilon = 1e-15);
        assert_relative_eq!(interp.primitive(3.0), 0.05 + 0.03, epsilon = 1e-15);
    }

    #[test]
    fn test_single_node() {
        let interp = BackwardFlatInterpolator::new(vec![0.0], vec![0.04]).unwrap();
        assert_eq!(interp.interpolate(5.0), 0.04);
        assert_relative_eq!(interp.primitive(2.0), 0.08, epsilon = 1e-15);
    }
}

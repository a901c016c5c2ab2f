//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{find_segment, validate_nodes, Interpolator};

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use stratum_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 4.0]).unwrap();
/// assert!((interp.interpolate(1.5) - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
    primitives: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if `xs` is not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;

        let slopes: Vec<f64> = xs
            .windows(2)
            .zip(ys.windows(2))
            .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
            .collect();

        let mut primitives = Vec::with_capacity(xs.len());
        primitives.push(0.0);
        for i in 1..xs.len() {
            let dx = xs[i] - xs[i - 1];
            primitives.push(primitives[i - 1] + 0.5 * dx * (ys[i] + ys[i - 1]));
        }

        Ok(Self {
            xs,
            ys,
            slopes,
            primitives,
        })
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        let i = find_segment(&self.xs, x);
        self.ys[i] + self.slopes[i] * (x - self.xs[i])
    }

    fn derivative(&self, x: f64) -> f64 {
        if !self.in_range(x) {
            return 0.0;
        }
        self.slopes[find_segment(&self.xs, x)]
    }

    fn primitive(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0] * (x - self.xs[0]);
        }
        if x >= self.xs[n - 1] {
            return self.primitives[n - 1] + self.ys[n - 1] * (x - self.xs[n - 1]);
        }
        let i = find_segment(&self.xs, x);
        let dx = x - self.xs[i];
        self.primitives[i] + dx * (self.ys[i] + 0.5 * self.slopes[i] * dx)
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

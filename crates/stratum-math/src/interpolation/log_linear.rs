//! Log-linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{find_segment, validate_nodes, Interpolator};

/// Linear interpolation of `ln(y)`.
///
/// On discount factors this gives piecewise constant instantaneous
/// forwards. All values must be strictly positive.
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    log_ys: Vec<f64>,
    slopes: Vec<f64>,
    primitives: Vec<f64>,
}

/// Integral of `y0 * exp(slope * t)` for `t` in `[0, dx]`.
fn segment_integral(y0: f64, slope: f64, dx: f64) -> f64 {
    let z = slope * dx;
    if z.abs() < 1e-10 {
        y0 * dx * (1.0 + 0.5 * z)
    } else {
        y0 * z.exp_m1() / slope
    }
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is not strictly positive, in addition
    /// to the usual node validation.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        if let Some(bad) = ys.iter().find(|&&y| y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation requires positive values, got {bad}"
            )));
        }

        let log_ys: Vec<f64> = ys.iter().map(|y| y.ln()).collect();
        let slopes: Vec<f64> = xs
            .windows(2)
            .zip(log_ys.windows(2))
            .map(|(x, l)| (l[1] - l[0]) / (x[1] - x[0]))
            .collect();

        let mut primitives = Vec::with_capacity(xs.len());
        primitives.push(0.0);
        for i in 1..xs.len() {
            let dx = xs[i] - xs[i - 1];
            primitives.push(primitives[i - 1] + segment_integral(ys[i - 1], slopes[i - 1], dx));
        }

        Ok(Self {
            xs,
            ys,
            log_ys,
            slopes,
            primitives,
        })
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        let i = find_segment(&self.xs, x);
        (self.log_ys[i] + self.slopes[i] * (x - self.xs[i])).exp()
    }

    fn derivative(&self, x: f64) -> f64 {
        if !self.in_range(x) {
            return 0.0;
        }
        self.interpolate(x) * self.slopes[find_segment(&self.xs, x)]
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
        self.primitives[i] + segment_integral(self.ys[i], self.slopes[i], x - self.xs[i])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

//! Natural cubic spline interpolation.

use crate::error::MathResult;
use crate::interpolation::{find_segment, validate_nodes, Interpolator};
use crate::linear_algebra::solve_tridiagonal;

/// Natural cubic spline (zero second derivative at both ends).
///
/// C2 continuous; every node influences every segment.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at the nodes
    m: Vec<f64>,
    primitives: Vec<f64>,
}

impl CubicSpline {
    /// Creates a natural cubic spline through at least two nodes.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        let n = xs.len();

        let mut m = vec![0.0; n];
        if n > 2 {
            let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
            let interior = n - 2;
            let mut lower = Vec::with_capacity(interior.saturating_sub(1));
            let mut diag = Vec::with_capacity(interior);
            let mut upper = Vec::with_capacity(interior.saturating_sub(1));
            let mut rhs = Vec::with_capacity(interior);
            for i in 1..n - 1 {
                diag.push(2.0 * (h[i - 1] + h[i]));
                rhs.push(6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]));
                if i > 1 {
                    lower.push(h[i - 1]);
                }
                if i < n - 2 {
                    upper.push(h[i]);
                }
            }
            let inner = solve_tridiagonal(&lower, &diag, &upper, &rhs)?;
            m[1..n - 1].copy_from_slice(&inner);
        }

        let mut spline = Self {
            xs,
            ys,
            m,
            primitives: Vec::new(),
        };
        let mut primitives = Vec::with_capacity(n);
        primitives.push(0.0);
        for i in 1..n {
            let h = spline.xs[i] - spline.xs[i - 1];
            primitives.push(primitives[i - 1] + spline.segment_integral(i - 1, h));
        }
        spline.primitives = primitives;
        Ok(spline)
    }

    /// Linear coefficient of segment `i`.
    fn slope(&self, i: usize) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        (self.ys[i + 1] - self.ys[i]) / h - h * (2.0 * self.m[i] + self.m[i + 1]) / 6.0
    }

    fn segment_integral(&self, i: usize, t: f64) -> f64 {
        let h = self.xs[i + 1] - self.xs[i];
        let dm = self.m[i + 1] - self.m[i];
        t * (self.ys[i]
            + t * (0.5 * self.slope(i) + t * (self.m[i] / 6.0 + t * dm / (24.0 * h))))
    }
}

impl Interpolator for CubicSpline {
    fn interpolate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = x - self.xs[i];
        let dm = self.m[i + 1] - self.m[i];
        self.ys[i] + t * (self.slope(i) + t * (0.5 * self.m[i] + t * dm / (6.0 * h)))
    }

    fn derivative(&self, x: f64) -> f64 {
        if !self.in_range(x) {
            return 0.0;
        }
        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = x - self.xs[i];
        let dm = self.m[i + 1] - self.m[i];
        self.slope(i) + t * (self.m[i] + t * dm / (2.0 * h))
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
        self.primitives[i] + self.segment_integral(i, x - self.xs[i])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

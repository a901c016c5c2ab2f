//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Absolute floor on the bracket width, so a root at zero still terminates.
const X_FLOOR: f64 = 1e-15;

/// Evaluates `f` and rejects NaN or infinite values.
pub(crate) fn evaluate<F>(f: &mut F, x: f64) -> MathResult<f64>
where
    F: FnMut(f64) -> f64,
{
    let y = f(x);
    if y.is_finite() {
        Ok(y)
    } else {
        Err(MathError::NonFiniteValue { x })
    }
}

/// Brent's method on the bracket `[a, b]`.
///
/// Requires `f(a)` and `f(b)` of opposite sign (or one of them zero). The
/// search stops once `|f(b)| <= tolerance`, or once the bracket has shrunk
/// to machine precision around `b`.
///
/// # Example
///
/// ```rust
/// use stratum_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn brent<F>(mut f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: FnMut(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = evaluate(&mut f, a)?;
    let mut fb = evaluate(&mut f, b)?;
    let mut evaluations = 2;

    if fa.abs() <= config.tolerance {
        return Ok(SolverResult {
            root: a,
            iterations: evaluations,
            residual: fa,
        });
    }
    if fb.abs() <= config.tolerance {
        return Ok(SolverResult {
            root: b,
            iterations: evaluations,
            residual: fb,
        });
    }
    if fa.signum() == fb.signum() {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    while evaluations < config.max_iterations {
        if fb.signum() == fc.signum() {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * X_FLOOR;
        let xm = 0.5 * (c - b);
        if fb.abs() <= config.tolerance || xm.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: evaluations,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let mut p;
            let mut q;
            if a == c {
                // secant
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                // inverse quadratic interpolation
                let qa = fa / fc;
                let r = fb / fc;
                p = s * (2.0 * xm * qa * (qa - r) - (b - a) * (r - 1.0));
                q = (qa - 1.0) * (r - 1.0) * (s - 1.0);
            }
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = evaluate(&mut f, b)?;
        evaluations += 1;
    }

    Err(MathError::convergence_failed(evaluations, fb.abs()))
}

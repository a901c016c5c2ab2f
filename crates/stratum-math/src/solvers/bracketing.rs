//! Bracket search from an initial guess.

use tracing::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::brent::{brent, evaluate};
use crate::solvers::{SolverConfig, SolverResult};

/// Geometric growth applied to the bracket each expansion step.
const GROWTH_FACTOR: f64 = 1.6;

/// Finds a root starting from `guess`, searching only inside `[lower, upper]`.
///
/// A bracket `[guess - step, guess + step]` (clipped to the bounds) is grown
/// on the side with the smaller `|f|` until the objective changes sign,
/// then Brent's method refines it. A side that reached its bound stays
/// there and the other side grows instead. Evaluations spent on the expansion count
/// against `config.max_iterations`.
pub fn solve_bracketed<F>(
    mut f: F,
    guess: f64,
    step: f64,
    lower: f64,
    upper: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: FnMut(f64) -> f64,
{
    if lower >= upper {
        return Err(MathError::invalid_input(format!(
            "lower bound {lower} must be below upper bound {upper}"
        )));
    }
    if !(lower..=upper).contains(&guess) {
        return Err(MathError::invalid_input(format!(
            "guess {guess} outside [{lower}, {upper}]"
        )));
    }
    if step <= 0.0 {
        return Err(MathError::invalid_input("step must be positive"));
    }

    let clip = |x: f64| x.clamp(lower, upper);

    let f_guess = evaluate(&mut f, guess)?;
    let mut evaluations = 1;
    if f_guess.abs() <= config.tolerance {
        return Ok(SolverResult {
            root: guess,
            iterations: evaluations,
            residual: f_guess,
        });
    }

    let mut x_min = clip(guess - step);
    let mut f_min = evaluate(&mut f, x_min)?;
    let mut x_max = clip(guess + step);
    let mut f_max = evaluate(&mut f, x_max)?;
    evaluations += 2;

    while evaluations <= config.max_iterations {
        if f_min.signum() != f_max.signum() || f_min == 0.0 || f_max == 0.0 {
            trace!(x_min, x_max, evaluations, "bracket found");
            let remaining = SolverConfig::new(config.tolerance, config.max_iterations - evaluations + 2);
            let mut result = brent(&mut f, x_min, x_max, &remaining)?;
            result.iterations += evaluations;
            return Ok(result);
        }
        // A side clipped at its bound cannot grow further.
        let at_lower = x_min <= lower;
        let at_upper = x_max >= upper;
        if at_lower && at_upper {
            break;
        }
        if !at_lower && (at_upper || f_min.abs() < f_max.abs()) {
            x_min = clip(x_min + GROWTH_FACTOR * (x_min - x_max));
            f_min = evaluate(&mut f, x_min)?;
        } else {
            x_max = clip(x_max + GROWTH_FACTOR * (x_max - x_min));
            f_max = evaluate(&mut f, x_max)?;
        }
        evaluations += 1;
    }

    Err(MathError::BracketNotFound {
        guess,
        lower,
        upper,
        evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expands_toward_root() {
        let config = SolverConfig::new(1e-14, 100);
        let result = solve_bracketed(|x| x - 0.3, 0.9, 0.01, 0.0, 1.0, &config).unwrap();
        assert_relative_eq!(result.root, 0.3, epsilon = 1e-14);
    }

    #[test]
    fn test_guess_is_root() {
        let config = SolverConfig::default();
        let result = solve_bracketed(|x| x - 0.5, 0.5, 0.1, 0.0, 1.0, &config).unwrap();
        assert_eq!(result.root, 0.5);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_root_outside_bounds() {
        let config = SolverConfig::new(1e-12, 50);
        let result = solve_bracketed(|x| x - 2.0, 0.5, 0.1, 0.0, 1.0, &config);
        assert!(matches!(result, Err(MathError::BracketNotFound { .. })));
    }

    #[test]
    fn test_grows_away_from_a_clipped_side() {
        // |f| is smallest at the lower bound, the root is near the upper one.
        let f = |x: f64| if x < 0.2 { -0.001 } else { x - 0.9 };
        let config = SolverConfig::new(1e-12, 100);
        let result = solve_bracketed(f, 0.1, 0.15, 0.0, 1.0, &config).unwrap();
        assert_relative_eq!(result.root, 0.9, epsilon = 1e-10);
    }

    #[test]
    fn test_stops_once_both_bounds_are_reached() {
        let mut calls = 0;
        let config = SolverConfig::new(1e-12, 1000);
        let result = solve_bracketed(
            |x| {
                calls += 1;
                x + 1.0
            },
            0.5,
            0.1,
            0.0,
            1.0,
            &config,
        );
        match result {
            Err(MathError::BracketNotFound { evaluations, .. }) => assert!(evaluations < 20),
            other => panic!("expected BracketNotFound, got {other:?}"),
        }
        assert!(calls < 20);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let config = SolverConfig::default();
        assert!(solve_bracketed(|x| x, 0.5, 0.1, 1.0, 0.0, &config).is_err());
        assert!(solve_bracketed(|x| x, 1.5, 0.1, 0.0, 1.0, &config).is_err());
        assert!(solve_bracketed(|x| x, 0.5, 0.0, 0.0, 1.0, &config).is_err());
    }

    #[test]
    fn test_budget_covers_expansion() {
        let mut calls = 0;
        let config = SolverConfig::new(1e-14, 40);
        let _ = solve_bracketed(
            |x| {
                calls += 1;
                x - 0.001
            },
            0.9,
            1e-4,
            0.0,
            1.0,
            &config,
        );
        assert!(calls <= 42);
    }
}

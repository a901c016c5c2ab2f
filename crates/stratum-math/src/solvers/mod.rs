//! Root-finding algorithms.
//!
//! - [`brent`]: Brent's method on a known bracket
//! - [`solve_bracketed`]: expands a bracket around a guess inside hard
//!   bounds, then hands over to Brent
//!
//! Both accept `FnMut` objectives so callers can record trial values or
//! capture the first pricing failure while the solver runs.
//!
//! # Example
//!
//! ```rust
//! use stratum_math::solvers::{solve_bracketed, SolverConfig};
//!
//! // Discount factor reproducing a 5% simple rate over six months
//! let f = |df: f64| (1.0 / df - 1.0) / 0.5 - 0.05;
//! let config = SolverConfig::new(1e-14, 100);
//! let result = solve_bracketed(f, 0.99, 0.01, 1e-6, 1.0, &config).unwrap();
//! assert!((result.root - 1.0 / 1.025).abs() < 1e-12);
//! ```

mod bracketing;
mod brent;

pub use bracketing::solve_bracketed;
pub use brent::brent;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum function evaluations.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Configuration for root-finding algorithms.
///
/// `tolerance` applies to the objective value: a root is accepted once
/// `|f(x)| <= tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance on `|f(x)|`.
    pub tolerance: f64,
    /// Maximum number of function evaluations.
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of evaluations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Function evaluations used.
    pub iterations: usize,
    /// `f(root)`.
    pub residual: f64,
}

//! Optimization framework.
//!
//! A [`Problem`] bundles a [`CostFunction`], a [`Constraint`] and the
//! current parameter vector. An [`OptimizationMethod`] improves the problem
//! in place and reports why it stopped as an [`EndCriteriaType`]; callers
//! decide which stop reasons count as success.
//!
//! - [`LevenbergMarquardt`]: damped Gauss-Newton on the residual vector
//! - [`Simplex`]: Nelder-Mead on the scalar cost, for non-smooth objectives

mod end_criteria;
mod levenberg_marquardt;
mod simplex;

pub use end_criteria::{EndCriteria, EndCriteriaType};
pub use levenberg_marquardt::LevenbergMarquardt;
pub use simplex::Simplex;

use nalgebra::DVector;

use crate::error::MathResult;

/// Objective of an optimization, expressed as residuals.
pub trait CostFunction {
    /// Residual vector at `x`.
    fn values(&self, x: &DVector<f64>) -> MathResult<DVector<f64>>;

    /// Scalar cost at `x`; the sum of squared residuals unless overridden.
    fn value(&self, x: &DVector<f64>) -> MathResult<f64> {
        Ok(self.values(x)?.norm_squared())
    }
}

/// Admissible region for the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Constraint {
    /// Every vector is admissible.
    #[default]
    NoConstraint,
    /// Every component must be strictly positive.
    Positive,
}

impl Constraint {
    /// True if `x` satisfies the constraint.
    #[must_use]
    pub fn test(&self, x: &DVector<f64>) -> bool {
        match self {
            Constraint::NoConstraint => true,
            Constraint::Positive => x.iter().all(|&v| v > 0.0),
        }
    }
}

/// A constrained minimization problem and its current state.
pub struct Problem<'a> {
    cost: &'a dyn CostFunction,
    constraint: Constraint,
    current_value: DVector<f64>,
    function_value: f64,
    evaluations: usize,
}

impl<'a> Problem<'a> {
    /// Creates a problem starting from `initial`.
    pub fn new(cost: &'a dyn CostFunction, constraint: Constraint, initial: DVector<f64>) -> Self {
        Self {
            cost,
            constraint,
            current_value: initial,
            function_value: f64::INFINITY,
            evaluations: 0,
        }
    }

    /// Evaluates the scalar cost, counting the evaluation.
    pub fn value(&mut self, x: &DVector<f64>) -> MathResult<f64> {
        self.evaluations += 1;
        self.cost.value(x)
    }

    /// Evaluates the residuals, counting the evaluation.
    pub fn values(&mut self, x: &DVector<f64>) -> MathResult<DVector<f64>> {
        self.evaluations += 1;
        self.cost.values(x)
    }

    /// The constraint.
    pub fn constraint(&self) -> Constraint {
        self.constraint
    }

    /// Best parameters found so far.
    pub fn current_value(&self) -> &DVector<f64> {
        &self.current_value
    }

    /// Replaces the current parameters.
    pub fn set_current_value(&mut self, x: DVector<f64>) {
        self.current_value = x;
    }

    /// Cost at the current parameters.
    pub fn function_value(&self) -> f64 {
        self.function_value
    }

    /// Records the cost at the current parameters.
    pub fn set_function_value(&mut self, value: f64) {
        self.function_value = value;
    }

    /// Cost function evaluations so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }
}

/// A minimization algorithm.
pub trait OptimizationMethod {
    /// Minimizes `problem`, leaving the best point in it.
    ///
    /// Errors are reserved for failures of the cost function itself; running
    /// out of iterations is reported through the returned end criterion.
    fn minimize(
        &self,
        problem: &mut Problem<'_>,
        end_criteria: &EndCriteria,
    ) -> MathResult<EndCriteriaType>;
}

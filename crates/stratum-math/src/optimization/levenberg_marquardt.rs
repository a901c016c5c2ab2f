//! Levenberg-Marquardt least squares.

use nalgebra::{DMatrix, DVector};
use tracing::trace;

use crate::error::MathResult;
use crate::linear_algebra::solve_linear_system;
use crate::optimization::{EndCriteria, EndCriteriaType, OptimizationMethod, Problem};

/// Levenberg-Marquardt on the residual vector of a [`Problem`].
///
/// The Jacobian is taken by forward differences. Steps that leave the
/// constraint region or fail to reduce the cost are rejected and the
/// damping is raised; rejected steps count towards cost stationarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevenbergMarquardt {
    /// Relative finite-difference step.
    pub jacobian_step: f64,
    /// Initial damping.
    pub initial_lambda: f64,
    /// Damping multiplier after a rejected step.
    pub lambda_up: f64,
    /// Damping multiplier after an accepted step.
    pub lambda_down: f64,
}

impl Default for LevenbergMarquardt {
    fn default() -> Self {
        Self {
            jacobian_step: 1e-8,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
        }
    }
}

impl LevenbergMarquardt {
    /// Creates the optimizer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn jacobian(
        &self,
        problem: &mut Problem<'_>,
        x: &DVector<f64>,
        residuals: &DVector<f64>,
    ) -> MathResult<DMatrix<f64>> {
        let mut jacobian = DMatrix::zeros(residuals.len(), x.len());
        for j in 0..x.len() {
            let h = self.jacobian_step * x[j].abs().max(1.0);
            let mut bumped = x.clone();
            bumped[j] += h;
            let r = problem.values(&bumped)?;
            let column = (r - residuals) / h;
            jacobian.set_column(j, &column);
        }
        Ok(jacobian)
    }
}

impl OptimizationMethod for LevenbergMarquardt {
    fn minimize(
        &self,
        problem: &mut Problem<'_>,
        end_criteria: &EndCriteria,
    ) -> MathResult<EndCriteriaType> {
        let mut x = problem.current_value().clone();
        let mut residuals = problem.values(&x)?;
        let mut cost = residuals.norm_squared();
        problem.set_function_value(cost);

        if let Some(end) = end_criteria.check_function_accuracy(cost) {
            return Ok(end);
        }

        let mut lambda = self.initial_lambda;
        let mut stationary_value = 0;
        let mut stationary_point = 0;
        let mut iteration = 0;

        loop {
            if let Some(end) = end_criteria.check_max_iterations(iteration) {
                return Ok(end);
            }
            iteration += 1;

            let jacobian = self.jacobian(problem, &x, &residuals)?;
            let jt = jacobian.transpose();
            let gradient = &jt * &residuals;
            if let Some(end) = end_criteria.check_gradient_norm(gradient.norm()) {
                return Ok(end);
            }

            let mut normal = &jt * &jacobian;
            for i in 0..normal.nrows() {
                normal[(i, i)] += lambda * (normal[(i, i)].abs() + 1.0);
            }

            let step = match solve_linear_system(&normal, &(-gradient)) {
                Ok(step) => step,
                Err(_) => {
                    lambda *= self.lambda_up;
                    if let Some(end) =
                        end_criteria.check_stationary_function_value(cost, cost, &mut stationary_value)
                    {
                        return Ok(end);
                    }
                    continue;
                }
            };

            let candidate = &x + &step;
            let accepted = if problem.constraint().test(&candidate) {
                let candidate_residuals = problem.values(&candidate)?;
                let candidate_cost = candidate_residuals.norm_squared();
                if candidate_cost.is_finite() && candidate_cost < cost {
                    Some((candidate_residuals, candidate_cost))
                } else {
                    None
                }
            } else {
                None
            };

            let Some((candidate_residuals, candidate_cost)) = accepted else {
                trace!(iteration, lambda, cost, "step rejected");
                lambda *= self.lambda_up;
                if let Some(end) =
                    end_criteria.check_stationary_function_value(cost, cost, &mut stationary_value)
                {
                    return Ok(end);
                }
                continue;
            };

            let previous = cost;
            x = candidate;
            residuals = candidate_residuals;
            cost = candidate_cost;
            lambda = (lambda * self.lambda_down).max(1e-15);
            problem.set_current_value(x.clone());
            problem.set_function_value(cost);
            trace!(iteration, lambda, cost, "step accepted");

            if let Some(end) = end_criteria.check_function_accuracy(cost) {
                return Ok(end);
            }
            if let Some(end) =
                end_criteria.check_stationary_function_value(previous, cost, &mut stationary_value)
            {
                return Ok(end);
            }
            if let Some(end) = end_criteria.check_stationary_point(step.norm(), &mut stationary_point)
            {
                return Ok(end);
            }
        }
    }
}

//! Stopping rules shared by the optimizers.

use std::fmt;

/// Why an optimizer stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndCriteriaType {
    /// No criterion was met.
    None,
    /// Iteration budget exhausted.
    MaxIterations,
    /// Parameters stopped moving.
    StationaryPoint,
    /// Cost stopped improving.
    StationaryFunctionValue,
    /// Cost fell below the function epsilon.
    StationaryFunctionAccuracy,
    /// Gradient vanished.
    ZeroGradientNorm,
    /// Stopped for an unclassified reason.
    Unknown,
}

impl EndCriteriaType {
    /// True for the stop reasons that indicate convergence.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(
            self,
            EndCriteriaType::StationaryPoint
                | EndCriteriaType::StationaryFunctionValue
                | EndCriteriaType::StationaryFunctionAccuracy
                | EndCriteriaType::ZeroGradientNorm
        )
    }
}

impl fmt::Display for EndCriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndCriteriaType::None => "None",
            EndCriteriaType::MaxIterations => "MaxIterations",
            EndCriteriaType::StationaryPoint => "StationaryPoint",
            EndCriteriaType::StationaryFunctionValue => "StationaryFunctionValue",
            EndCriteriaType::StationaryFunctionAccuracy => "StationaryFunctionAccuracy",
            EndCriteriaType::ZeroGradientNorm => "ZeroGradientNorm",
            EndCriteriaType::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Stopping thresholds for an optimization.
///
/// An epsilon of zero disables the corresponding check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndCriteria {
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Consecutive non-improving iterations tolerated before stopping.
    pub max_stationary_state_iterations: usize,
    /// Step size below which the parameters count as stationary.
    pub root_epsilon: f64,
    /// Cost change below which the cost counts as stationary; also the
    /// absolute cost accepted as converged.
    pub function_epsilon: f64,
    /// Gradient norm below which the gradient counts as zero.
    pub gradient_norm_epsilon: f64,
}

impl Default for EndCriteria {
    fn default() -> Self {
        Self::new(1000, 100, 1e-8, 1e-8, 1e-8)
    }
}

impl EndCriteria {
    /// Creates end criteria.
    #[must_use]
    pub fn new(
        max_iterations: usize,
        max_stationary_state_iterations: usize,
        root_epsilon: f64,
        function_epsilon: f64,
        gradient_norm_epsilon: f64,
    ) -> Self {
        Self {
            max_iterations,
            max_stationary_state_iterations,
            root_epsilon,
            function_epsilon,
            gradient_norm_epsilon,
        }
    }

    /// `MaxIterations` once `iteration` reaches the budget.
    #[must_use]
    pub fn check_max_iterations(&self, iteration: usize) -> Option<EndCriteriaType> {
        (iteration >= self.max_iterations).then_some(EndCriteriaType::MaxIterations)
    }

    /// `StationaryFunctionAccuracy` once the cost is within `function_epsilon`.
    #[must_use]
    pub fn check_function_accuracy(&self, cost: f64) -> Option<EndCriteriaType> {
        (self.function_epsilon > 0.0 && cost <= self.function_epsilon)
            .then_some(EndCriteriaType::StationaryFunctionAccuracy)
    }

    /// `ZeroGradientNorm` once the gradient norm is within its epsilon.
    #[must_use]
    pub fn check_gradient_norm(&self, norm: f64) -> Option<EndCriteriaType> {
        (self.gradient_norm_epsilon > 0.0 && norm <= self.gradient_norm_epsilon)
            .then_some(EndCriteriaType::ZeroGradientNorm)
    }

    /// Tracks cost stationarity across iterations.
    ///
    /// `counter` is incremented when the change is below `function_epsilon`
    /// and reset otherwise.
    pub fn check_stationary_function_value(
        &self,
        previous: f64,
        current: f64,
        counter: &mut usize,
    ) -> Option<EndCriteriaType> {
        if (previous - current).abs() >= self.function_epsilon {
            *counter = 0;
            return None;
        }
        *counter += 1;
        (*counter > self.max_stationary_state_iterations)
            .then_some(EndCriteriaType::StationaryFunctionValue)
    }

    /// Tracks parameter stationarity across iterations.
    pub fn check_stationary_point(
        &self,
        step_norm: f64,
        counter: &mut usize,
    ) -> Option<EndCriteriaType> {
        if step_norm >= self.root_epsilon {
            *counter = 0;
            return None;
        }
        *counter += 1;
        (*counter > self.max_stationary_state_iterations)
            .then_some(EndCriteriaType::StationaryPoint)
    }
}

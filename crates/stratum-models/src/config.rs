//! Basket generation settings.

use stratum_curves::config::{Validate, ValidationError};
use stratum_math::optimization::EndCriteria;

/// Settings of the delta-gamma basket match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasketConfig {
    /// Finite-difference step in the standardized model state.
    pub bump: f64,

    /// Option-adjusted spread applied when discounting rebates.
    pub oas: Option<f64>,

    /// Stopping rule of the Levenberg-Marquardt match.
    pub end_criteria: EndCriteria,

    /// Longest calibration swap, in years.
    pub max_maturity: f64,
}

impl Default for BasketConfig {
    fn default() -> Self {
        Self {
            bump: 1e-4,
            oas: None,
            end_criteria: EndCriteria::new(1000, 200, 1e-8, 1e-8, 1e-8),
            max_maturity: 100.0,
        }
    }
}

impl BasketConfig {
    /// Sets the state bump.
    #[must_use]
    pub fn with_bump(mut self, bump: f64) -> Self {
        self.bump = bump;
        self
    }

    /// Sets the option-adjusted spread.
    #[must_use]
    pub fn with_oas(mut self, oas: f64) -> Self {
        self.oas = Some(oas);
        self
    }

    /// Sets the optimizer end criteria.
    #[must_use]
    pub fn with_end_criteria(mut self, end_criteria: EndCriteria) -> Self {
        self.end_criteria = end_criteria;
        self
    }

    /// Sets the maturity cap.
    #[must_use]
    pub fn with_max_maturity(mut self, years: f64) -> Self {
        self.max_maturity = years;
        self
    }
}

impl Validate for BasketConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.bump.is_finite() && self.bump > 0.0) {
            errors.push(ValidationError::new("bump", "State bump must be positive"));
        }
        if self.oas.is_some_and(|oas| !oas.is_finite()) {
            errors.push(ValidationError::new("oas", "OAS must be finite"));
        }
        if self.end_criteria.max_iterations == 0 {
            errors.push(ValidationError::new(
                "end_criteria.max_iterations",
                "Iteration budget must be positive",
            ));
        }
        if !(self.max_maturity.is_finite() && self.max_maturity > 0.0) {
            errors.push(ValidationError::new(
                "max_maturity",
                "Maturity cap must be positive",
            ));
        }

        errors
    }
}

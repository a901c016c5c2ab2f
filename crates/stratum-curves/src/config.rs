//! Bootstrap and joint calibration settings.
//!
//! Both configurations deserialize from TOML or JSON; missing fields take
//! their defaults.
//!
//! ```rust
//! use stratum_curves::config::{BootstrapConfig, Validate};
//!
//! let config = BootstrapConfig::from_toml_str("accuracy = 1e-10").unwrap();
//! assert_eq!(config.accuracy, 1e-10);
//! assert_eq!(config.max_evaluations, 100);
//! assert!(config.is_valid());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CurveError, CurveResult};

/// A single validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field that failed validation.
    pub field: String,
    /// Validation error message.
    pub message: String,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl From<ValidationError> for CurveError {
    fn from(err: ValidationError) -> Self {
        CurveError::config(err.field, err.message)
    }
}

/// Trait for validatable configurations.
pub trait Validate {
    /// Returns every violated rule, or an empty vector if valid.
    fn validate(&self) -> Vec<ValidationError>;

    /// Returns true if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Validates and reports the first violation as an error.
    fn validate_or_error(&self) -> CurveResult<()> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

// =============================================================================
// SINGLE-CURVE BOOTSTRAP
// =============================================================================

/// Settings of the node-by-node bootstrap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Target quote error of every helper.
    #[serde(default = "default_accuracy")]
    pub accuracy: f64,

    /// Objective evaluations allowed per segment, bracketing included.
    #[serde(default = "default_max_evaluations")]
    pub max_evaluations: usize,

    /// Refinement passes allowed for global interpolations.
    #[serde(default = "default_max_global_iterations")]
    pub max_global_iterations: usize,

    /// Initial bracket half-width relative to the guess.
    #[serde(default = "default_step_fraction")]
    pub step_fraction: f64,
}

fn default_accuracy() -> f64 {
    1e-12
}

fn default_max_evaluations() -> usize {
    100
}

fn default_max_global_iterations() -> usize {
    25
}

fn default_step_fraction() -> f64 {
    0.01
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            accuracy: default_accuracy(),
            max_evaluations: default_max_evaluations(),
            max_global_iterations: default_max_global_iterations(),
            step_fraction: default_step_fraction(),
        }
    }
}

impl BootstrapConfig {
    /// Sets the accuracy.
    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Sets the per-segment evaluation budget.
    #[must_use]
    pub fn with_max_evaluations(mut self, max_evaluations: usize) -> Self {
        self.max_evaluations = max_evaluations;
        self
    }

    /// Sets the number of refinement passes for global interpolations.
    #[must_use]
    pub fn with_max_global_iterations(mut self, iterations: usize) -> Self {
        self.max_global_iterations = iterations;
        self
    }

    /// Sets the relative bracket step.
    #[must_use]
    pub fn with_step_fraction(mut self, step_fraction: f64) -> Self {
        self.step_fraction = step_fraction;
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> CurveResult<Self> {
        toml::from_str(s).map_err(|e| CurveError::config("toml", e.to_string()))
    }

    /// Parses a JSON document.
    pub fn from_json_str(s: &str) -> CurveResult<Self> {
        serde_json::from_str(s).map_err(|e| CurveError::config("json", e.to_string()))
    }
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.accuracy > 0.0 && self.accuracy < 1e-2) {
            errors.push(ValidationError::new(
                "accuracy",
                "Accuracy must be positive and below 1e-2",
            ));
        }
        if self.max_evaluations < 3 {
            errors.push(ValidationError::new(
                "max_evaluations",
                "At least three evaluations are needed to bracket a root",
            ));
        }
        if self.max_global_iterations == 0 {
            errors.push(ValidationError::new(
                "max_global_iterations",
                "At least one refinement pass is required",
            ));
        }
        if !(self.step_fraction > 0.0 && self.step_fraction <= 1.0) {
            errors.push(ValidationError::new(
                "step_fraction",
                "Step fraction must be in (0, 1]",
            ));
        }

        errors
    }
}

// =============================================================================
// JOINT CALIBRATION
// =============================================================================

/// Aggregation of quote errors in the joint objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PenaltyKind {
    /// Sum of squared quote errors, minimized by Levenberg-Marquardt.
    #[default]
    LeastSquares,
    /// Sum of absolute quote errors, minimized by the simplex method.
    AbsoluteSum,
}

impl fmt::Display for PenaltyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyKind::LeastSquares => write!(f, "least squares"),
            PenaltyKind::AbsoluteSum => write!(f, "absolute sum"),
        }
    }
}

/// Settings of the joint multi-curve calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointCalibrationConfig {
    /// Objective aggregation.
    #[serde(default)]
    pub penalty: PenaltyKind,

    /// Restrict every node value to be strictly positive.
    #[serde(default = "default_force_positive")]
    pub force_positive: bool,

    /// Optimizer iterations granted per helper in the group.
    #[serde(default = "default_iterations_per_instrument")]
    pub iterations_per_instrument: usize,

    /// Consecutive non-improving iterations before the cost counts as stationary.
    #[serde(default = "default_max_stationary_iterations")]
    pub max_stationary_iterations: usize,
}

fn default_force_positive() -> bool {
    true
}

fn default_iterations_per_instrument() -> usize {
    20
}

fn default_max_stationary_iterations() -> usize {
    10
}

impl Default for JointCalibrationConfig {
    fn default() -> Self {
        Self {
            penalty: PenaltyKind::default(),
            force_positive: default_force_positive(),
            iterations_per_instrument: default_iterations_per_instrument(),
            max_stationary_iterations: default_max_stationary_iterations(),
        }
    }
}

impl JointCalibrationConfig {
    /// Sets the penalty aggregation.
    #[must_use]
    pub fn with_penalty(mut self, penalty: PenaltyKind) -> Self {
        self.penalty = penalty;
        self
    }

    /// Enables or disables the positivity constraint.
    #[must_use]
    pub fn with_force_positive(mut self, force_positive: bool) -> Self {
        self.force_positive = force_positive;
        self
    }

    /// Sets the iteration budget per helper.
    #[must_use]
    pub fn with_iterations_per_instrument(mut self, iterations: usize) -> Self {
        self.iterations_per_instrument = iterations;
        self
    }

    /// Sets the stationarity window.
    #[must_use]
    pub fn with_max_stationary_iterations(mut self, iterations: usize) -> Self {
        self.max_stationary_iterations = iterations;
        self
    }

    /// Parses a TOML document.
    pub fn from_toml_str(s: &str) -> CurveResult<Self> {
        toml::from_str(s).map_err(|e| CurveError::config("toml", e.to_string()))
    }

    /// Parses a JSON document.
    pub fn from_json_str(s: &str) -> CurveResult<Self> {
        serde_json::from_str(s).map_err(|e| CurveError::config("json", e.to_string()))
    }
}

impl Validate for JointCalibrationConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.iterations_per_instrument == 0 {
            errors.push(ValidationError::new(
                "iterations_per_instrument",
                "Iteration budget must be positive",
            ));
        }
        if self.max_stationary_iterations == 0 {
            errors.push(ValidationError::new(
                "max_stationary_iterations",
                "Stationarity window must be positive",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.accuracy, 1e-12);
        assert_eq!(config.max_evaluations, 100);
        assert_eq!(config.max_global_iterations, 25);
        assert_eq!(config.step_fraction, 0.01);
        assert!(config.is_valid());
    }

    #[test]
    fn test_bootstrap_builders() {
        let config = BootstrapConfig::default()
            .with_accuracy(1e-10)
            .with_max_evaluations(50)
            .with_max_global_iterations(5)
            .with_step_fraction(0.05);
        assert_eq!(config.accuracy, 1e-10);
        assert_eq!(config.max_evaluations, 50);
        assert_eq!(config.max_global_iterations, 5);
        assert_eq!(config.step_fraction, 0.05);
    }

    #[test]
    fn test_bootstrap_validation() {
        let config = BootstrapConfig::default()
            .with_accuracy(-1.0)
            .with_max_evaluations(1)
            .with_step_fraction(0.0);
        let errors = config.validate();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].field, "accuracy");
        assert!(matches!(
            config.validate_or_error(),
            Err(CurveError::Config { ref field, .. }) if field == "accuracy"
        ));
    }

    #[test]
    fn test_bootstrap_from_toml() {
        let config = BootstrapConfig::from_toml_str(
            r#"
            accuracy = 1e-10
            max_evaluations = 200
            "#,
        )
        .unwrap();
        assert_eq!(config.accuracy, 1e-10);
        assert_eq!(config.max_evaluations, 200);
        assert_eq!(config.max_global_iterations, 25);

        assert!(BootstrapConfig::from_toml_str("accuracy = \"tight\"").is_err());
    }

    #[test]
    fn test_joint_from_json() {
        let config =
            JointCalibrationConfig::from_json_str(r#"{"penalty": "AbsoluteSum", "force_positive": false}"#)
                .unwrap();
        assert_eq!(config.penalty, PenaltyKind::AbsoluteSum);
        assert!(!config.force_positive);
        assert_eq!(config.iterations_per_instrument, 20);
        assert_eq!(config.max_stationary_iterations, 10);
    }

    #[test]
    fn test_joint_defaults_roundtrip_json() {
        let config = JointCalibrationConfig::default();
        assert_eq!(config.penalty, PenaltyKind::LeastSquares);
        assert!(config.force_positive);
        let json = serde_json::to_string(&config).unwrap();
        let parsed = JointCalibrationConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_joint_validation() {
        let config = JointCalibrationConfig::default().with_iterations_per_instrument(0);
        assert!(!config.is_valid());
        assert_eq!(config.validate()[0].field, "iterations_per_instrument");
    }
}

//! Error types for curve construction.
//!
//! Every failure of a bootstrap or joint calibration surfaces as a single
//! [`CurveError`] at the entry point that triggered the computation. There
//! is no partial success: a curve is either fully valid or not computed.

use stratum_core::types::Date;
use stratum_core::StratumError;
use stratum_math::optimization::EndCriteriaType;
use stratum_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Inputs rejected before any iteration started.
    #[error("Precondition failed: {reason}")]
    Precondition {
        /// Description of the violated precondition.
        reason: String,
    },

    /// Two helpers pin the same node.
    #[error("Helpers {first} and {second} share the pillar date {date}")]
    DuplicatePillar {
        /// The shared pillar date.
        date: Date,
        /// Description of the first helper.
        first: String,
        /// Description of the second helper.
        second: String,
    },

    /// The root search for one segment failed.
    #[error(
        "Bootstrap failed at segment {segment} ({instrument}, pillar {pillar}): {reason}; \
         guess {guess:.6e} in [{min:.6e}, {max:.6e}], last trials {trials:?}, last nodes {nodes:?}"
    )]
    BootstrapFailed {
        /// Index of the node being solved (1-based, node 0 is the reference).
        segment: usize,
        /// Description of the responsible helper.
        instrument: String,
        /// Pillar date of the node.
        pillar: Date,
        /// Initial guess handed to the solver.
        guess: f64,
        /// Lower bound of the search.
        min: f64,
        /// Upper bound of the search.
        max: f64,
        /// Last (at most three) trial values tried by the solver.
        trials: Vec<f64>,
        /// Last (at most three) node values already pinned.
        nodes: Vec<f64>,
        /// Underlying solver or pricing failure.
        reason: String,
    },

    /// A pinned node violates the curve type's domain.
    #[error("Invalid node at segment {segment}: {reason}")]
    NumericalDomain {
        /// Index of the offending node.
        segment: usize,
        /// Description of the violation.
        reason: String,
    },

    /// The joint optimizer stopped for a reason that is not convergence.
    #[error(
        "Joint calibration of [{}] failed: penalty {penalty:.6e}, end criteria {end_criteria}",
        .curves.join(", ")
    )]
    JointCalibrationFailed {
        /// Penalty reached at the best point.
        penalty: f64,
        /// Why the optimizer stopped.
        end_criteria: EndCriteriaType,
        /// Names of the curves in the group.
        curves: Vec<String>,
    },

    /// Refinement passes for a global interpolation did not settle.
    #[error("Global bootstrap did not converge after {iterations} passes (last change {improvement:.6e})")]
    GlobalConvergence {
        /// Passes performed.
        iterations: usize,
        /// Sum of absolute node changes in the last pass.
        improvement: f64,
    },

    /// Numerical failure outside the bootstrap loop.
    #[error("Math error: {reason}")]
    MathError {
        /// Description of the mathematical error.
        reason: String,
    },

    /// Date arithmetic failed.
    #[error("Invalid date: {reason}")]
    InvalidDate {
        /// Description of the date error.
        reason: String,
    },

    /// A joint calibration group no longer has any live curve.
    #[error("No live curve left in the calibration group")]
    CurveDropped,

    /// Configuration value out of range.
    #[error("Invalid configuration {field}: {message}")]
    Config {
        /// Offending field.
        field: String,
        /// What is wrong with it.
        message: String,
    },
}

impl CurveError {
    /// Creates a precondition error.
    #[must_use]
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
        }
    }

    /// Creates a duplicate pillar error.
    #[must_use]
    pub fn duplicate_pillar(date: Date, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::DuplicatePillar {
            date,
            first: first.into(),
            second: second.into(),
        }
    }

    /// Creates a numerical domain error.
    #[must_use]
    pub fn numerical_domain(segment: usize, reason: impl Into<String>) -> Self {
        Self::NumericalDomain {
            segment,
            reason: reason.into(),
        }
    }

    /// Creates a math error.
    #[must_use]
    pub fn math_error(reason: impl Into<String>) -> Self {
        Self::MathError {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for failures raised before any solver call.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::Precondition { .. } | Self::DuplicatePillar { .. } | Self::Config { .. }
        )
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        Self::MathError {
            reason: err.to_string(),
        }
    }
}

impl From<StratumError> for CurveError {
    fn from(err: StratumError) -> Self {
        match err {
            StratumError::InvalidDate { message } => Self::InvalidDate { reason: message },
            other => Self::Precondition {
                reason: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_failure_display() {
        let err = CurveError::BootstrapFailed {
            segment: 3,
            instrument: "Deposit 6M".to_string(),
            pillar: Date::from_ymd(2025, 7, 15).unwrap(),
            guess: 0.9,
            min: 1e-15,
            max: 0.98,
            trials: vec![0.9, 0.95],
            nodes: vec![1.0, 0.99, 0.98],
            reason: "no bracket".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("segment 3"));
        assert!(msg.contains("Deposit 6M"));
        assert!(msg.contains("2025-07-15"));
        assert!(msg.contains("no bracket"));
    }

    #[test]
    fn test_joint_failure_display() {
        let err = CurveError::JointCalibrationFailed {
            penalty: 1e-3,
            end_criteria: EndCriteriaType::MaxIterations,
            curves: vec!["OIS".to_string(), "3M".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("OIS, 3M"));
        assert!(msg.contains("MaxIterations"));
    }

    #[test]
    fn test_precondition_classification() {
        let date = Date::from_ymd(2025, 1, 15).unwrap();
        assert!(CurveError::duplicate_pillar(date, "a", "b").is_precondition());
        assert!(CurveError::precondition("empty").is_precondition());
        assert!(!CurveError::numerical_domain(2, "negative").is_precondition());
    }

    #[test]
    fn test_from_math_error() {
        let err: CurveError = MathError::SingularMatrix.into();
        assert!(matches!(err, CurveError::MathError { .. }));
    }
}

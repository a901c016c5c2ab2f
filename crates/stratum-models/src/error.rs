//! Error types for models and calibration baskets.

use stratum_core::types::Date;
use stratum_core::StratumError;
use stratum_curves::CurveError;
use stratum_math::optimization::EndCriteriaType;
use stratum_math::MathError;
use thiserror::Error;

/// A specialized Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Error type for model operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Inputs rejected before any optimization started.
    #[error("Precondition failed: {reason}")]
    Precondition {
        /// Description of the violated precondition.
        reason: String,
    },

    /// The basket optimizer stopped without converging.
    #[error("Basket calibration for expiry {expiry} failed: optimizer returned {end_criteria} with residual {residual:.6e}")]
    OptimizerFailed {
        /// Exercise date being matched.
        expiry: Date,
        /// Why the optimizer stopped.
        end_criteria: EndCriteriaType,
        /// Cost at the best point.
        residual: f64,
    },

    /// A term structure failed to evaluate.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// A numerical routine failed.
    #[error(transparent)]
    Math(#[from] MathError),

    /// A date or period computation failed.
    #[error(transparent)]
    Core(#[from] StratumError),
}

impl ModelError {
    /// Creates a precondition error.
    #[must_use]
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::Precondition {
            reason: reason.into(),
        }
    }

    /// True if the inputs were rejected before any computation.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        match self {
            Self::Precondition { .. } => true,
            Self::Curve(err) => err.is_precondition(),
            _ => false,
        }
    }
}

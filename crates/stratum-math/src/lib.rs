//! # Stratum Math
//!
//! Numerical building blocks for the Stratum term structure library.
//!
//! This crate provides:
//!
//! - **Solvers**: Brent's method and a guess-driven bracketing driver
//! - **Interpolation**: Linear, log-linear, backward-flat and natural cubic
//!   schemes, each declaring its minimum node count
//! - **Optimization**: end criteria, constraints, cost functions and the
//!   Levenberg-Marquardt and Nelder-Mead simplex methods
//! - **Linear Algebra**: dense and tridiagonal linear solves

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::if_not_else)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        BackwardFlat, BackwardFlatInterpolator, Cubic, CubicSpline, InterpolationScheme,
        Interpolator, Linear, LinearInterpolator, LogLinear, LogLinearInterpolator,
    };
    pub use crate::optimization::{
        Constraint, CostFunction, EndCriteria, EndCriteriaType, LevenbergMarquardt,
        OptimizationMethod, Problem, Simplex,
    };
    pub use crate::solvers::{brent, solve_bracketed, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};

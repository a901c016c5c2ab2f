//! Curve calibration algorithms.
//!
//! - [`bootstrap`]: node-by-node scalar root search, one helper per node.
//! - [`MultiCurveOptimizer`]: simultaneous calibration of curves whose
//!   helpers price off each other.
//!
//! Both work on plain node storage; laziness and caching live in
//! [`PiecewiseCurve`](crate::piecewise::PiecewiseCurve).

mod iterative;
mod multi_curve;

pub use iterative::{bootstrap, sort_helpers};
pub use multi_curve::{JointCurve, MultiCurveOptimizer};

//! # Stratum Curves
//!
//! Bootstrapped yield and credit term structures.
//!
//! This crate provides:
//!
//! - **Helpers**: deposits, FRAs, swaps, OIS and CDS quotes that each pin
//!   one curve node
//! - **Policies**: what a node stores (discount factor, zero yield,
//!   forward, hazard rate, survival probability, default density) and how
//!   the bootstrap searches for it
//! - **Bootstrap**: node-by-node root search, with refinement passes for
//!   global interpolations
//! - **Joint calibration**: simultaneous least-squares or L1 fit of curves
//!   whose helpers reference each other
//! - **Lazy curves**: [`PiecewiseCurve`] recomputes itself on read when any
//!   input quote has changed
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stratum_curves::prelude::*;
//!
//! let today = Date::from_ymd(2025, 1, 15).unwrap();
//! let helpers: Vec<Arc<dyn RateHelper>> = vec![
//!     Arc::new(DepositRateHelper::from_tenor(SimpleQuote::new(0.040), today, Period::months(1))?),
//!     Arc::new(DepositRateHelper::from_tenor(SimpleQuote::new(0.042), today, Period::months(3))?),
//!     Arc::new(SwapRateHelper::from_tenor(SimpleQuote::new(0.045), today, Period::years(2))?),
//! ];
//!
//! let curve = DiscountCurve::<LogLinear>::builder(today)
//!     .add_helpers(helpers)
//!     .build()?;
//!
//! let df = curve.discount_factor(1.5)?;
//! assert!(curve.repricing_report()?.is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::type_complexity)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handle;
pub mod helpers;
pub mod node_curve;
pub mod piecewise;
pub mod policies;
pub mod repricing;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{bootstrap, sort_helpers, JointCurve, MultiCurveOptimizer};
    pub use crate::config::{BootstrapConfig, JointCalibrationConfig, PenaltyKind, Validate};
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::handle::RelinkableCurve;
    pub use crate::helpers::{
        BootstrapHelper, CdsHelper, DefaultHelper, DepositRateHelper, FraRateHelper,
        OisRateHelper, RateHelper, SwapRateHelper,
    };
    pub use crate::node_curve::NodeCurve;
    pub use crate::piecewise::{
        BootstrapState, DefaultDensityCurve, DiscountCurve, FlatForwardCurve, ForwardRateCurve,
        HazardRateCurve, PiecewiseCurve, PiecewiseCurveBuilder, SurvivalProbabilityCurve,
        ZeroYieldCurve,
    };
    pub use crate::policies::{
        DefaultDensity, DefaultNodePolicy, Discount, ForwardRate, HazardRate, NodeUpdatePolicy,
        SurvivalProbability, YieldNodePolicy, ZeroYield,
    };
    pub use crate::repricing::{RepricingCheck, RepricingReport};
    pub use crate::traits::{CreditCurve, YieldCurve};
}

pub use error::{CurveError, CurveResult};
pub use piecewise::PiecewiseCurve;
pub use traits::{CreditCurve, YieldCurve};

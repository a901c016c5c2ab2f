//! # Stratum Models
//!
//! Gaussian one-factor short rate models and calibration baskets for
//! Bermudan exotics.
//!
//! This crate provides:
//!
//! - **Models**: [`HullWhite`] zero bonds conditional on a standardized
//!   model state
//! - **Exotics**: nonstandard swaptions with amortizing nominals,
//!   step-up coupons and exercise rebates
//! - **Baskets**: one European swaption per exercise date, either ATM
//!   coterminal or matched to the exotic's NPV, delta and gamma
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stratum_models::prelude::*;
//!
//! let model = Arc::new(HullWhite::new(curve, 0.03, 0.01)?);
//! let exotic = NonstandardSwaption::new(
//!     SwapType::Payer,
//!     start,
//!     end,
//!     SwapConventions::default(),
//!     &[100.0, 90.0, 80.0, 70.0, 60.0],
//!     &[0.04],
//!     Exercise::bermudan(exercise_dates)?,
//! )?;
//! let volatility = ConstantSwaptionVolatility::new(0.0080, VolatilityType::Normal)?;
//!
//! let basket = BasketGenerator::new(model, BasketConfig::default())?.calibration_basket(
//!     &exotic,
//!     &SwapConventions::default(),
//!     &volatility,
//!     CalibrationBasketType::MaturityStrikeByDeltaGamma,
//! )?;
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

pub mod basket;
pub mod config;
pub mod error;
pub mod exotic;
pub mod gaussian1d;
pub mod volatility;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::basket::{
        BasketGenerator, CalibrationBasketType, CalibrationSwaption, SwaptionMaturity,
    };
    pub use crate::config::BasketConfig;
    pub use crate::error::{ModelError, ModelResult};
    pub use crate::exotic::{
        BasketExotic, Exercise, NonstandardSwaption, Rebate, SwapConventions, SwapType,
    };
    pub use crate::gaussian1d::{Gaussian1dModel, HullWhite};
    pub use crate::volatility::{ConstantSwaptionVolatility, SwaptionVolatility, VolatilityType};
}

pub use basket::{BasketGenerator, CalibrationBasketType};
pub use error::{ModelError, ModelResult};
pub use gaussian1d::{Gaussian1dModel, HullWhite};

//! # Stratum Core
//!
//! Core types and abstractions for the Stratum term structure library.
//!
//! This crate provides the building blocks consumed by the bootstrap and
//! calibration crates:
//!
//! - **Types**: `Date`, `Period`, `Frequency`, `Compounding`
//! - **Day Count Conventions**: year fractions between dates
//! - **Quotes**: observable market values with revision tracking, used to
//!   invalidate lazily computed curves
//!
//! ## Example
//!
//! ```rust
//! use stratum_core::prelude::*;
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = start.advance(Period::months(6)).unwrap();
//! let yf = DayCountConvention::Act360.year_fraction(start, end);
//! assert!(yf > 0.49 && yf < 0.51);
//!
//! let quote = SimpleQuote::new(0.0425);
//! let before = quote.revision();
//! quote.set_value(0.0430);
//! assert!(quote.revision() > before);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::cast_possible_truncation)]

pub mod daycounts;
pub mod error;
pub mod quotes;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{StratumError, StratumResult};
    pub use crate::quotes::{next_revision, Quote, QuoteHandle, SimpleQuote};
    pub use crate::types::{Compounding, Date, Frequency, Period, TimeUnit};
}

// Re-export commonly used types at crate root
pub use error::{StratumError, StratumResult};
pub use types::{Date, Period};

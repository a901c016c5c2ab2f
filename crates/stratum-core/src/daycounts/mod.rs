//! Day count conventions.
//!
//! A day count turns a pair of dates into an accrual year fraction. Curves
//! use one convention to map pillar dates onto their time axis, and rate
//! helpers use their own conventions for accrual periods.
//!
//! - [`Act360`]: Actual/360, money market legs
//! - [`Act365Fixed`]: Actual/365 Fixed, the usual curve time axis
//! - [`Thirty360US`]: 30/360 US bond basis, fixed swap legs
//! - [`Thirty360E`]: 30E/360 Eurobond basis
//!
//! ```rust
//! use stratum_core::daycounts::{DayCount, Thirty360US};
//! use stratum_core::types::Date;
//!
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//! assert_eq!(Thirty360US.day_count(start, end), 180);
//! ```

mod act360;
mod act365;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use thirty360::{Thirty360E, Thirty360US};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StratumError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`) since curves holding
/// them are shared across threads.
pub trait DayCount: Send + Sync {
    /// Returns the market name of the convention, e.g. "ACT/360".
    fn name(&self) -> &'static str;

    /// Year fraction between two dates. Negative when `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Number of days between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime-selectable day count convention.
///
/// This is the form stored on curves, helpers and configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DayCountConvention {
    /// Actual/360
    Act360,
    /// Actual/365 Fixed
    #[default]
    Act365Fixed,
    /// 30/360 US (Bond Basis)
    Thirty360US,
    /// 30E/360 (Eurobond Basis)
    Thirty360E,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
        }
    }

    /// Returns all available conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
        ]
    }

    /// Year fraction as `f64`, the form consumed by curve and model math.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        let yf = match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
            DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
        };
        yf.to_f64().unwrap_or(0.0)
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = StratumError;

    /// Accepts market names ("ACT/360", "30/360") and enum names ("Act360").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACT365FIXED" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "30/360" | "30/360 US" | "BOND" | "THIRTY360US" => Ok(DayCountConvention::Thirty360US),
            "30E/360" | "EUROBOND" | "THIRTY360E" => Ok(DayCountConvention::Thirty360E),
            _ => Err(StratumError::day_count_error(format!(
                "unknown day count convention: '{s}'"
            ))),
        }
    }
}

//! Swaption volatility structures.
//!
//! Basket generation only needs a smile lookup per expiry and underlying
//! tenor, plus the ATM level and the displacement of the quoting
//! convention. Cube interpolation lives outside this crate; anything that
//! answers these questions can drive the generator.

use std::fmt;

use stratum_core::daycounts::DayCountConvention;
use stratum_core::types::{Date, Period};

use crate::error::{ModelError, ModelResult};

/// How swaption volatilities are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VolatilityType {
    /// Black volatility on the shifted forward.
    #[default]
    ShiftedLognormal,
    /// Bachelier (absolute) volatility.
    Normal,
}

impl fmt::Display for VolatilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityType::ShiftedLognormal => write!(f, "ShiftedLognormal"),
            VolatilityType::Normal => write!(f, "Normal"),
        }
    }
}

/// Swaption volatilities by expiry, underlying tenor and strike.
pub trait SwaptionVolatility: Send + Sync {
    /// Day count used to measure swap lengths.
    fn day_count(&self) -> DayCountConvention;

    /// Quoting convention.
    fn volatility_type(&self) -> VolatilityType;

    /// Volatility of the swaption expiring at `expiry` on a `tenor` swap.
    fn volatility(&self, expiry: Date, tenor: Period, strike: f64) -> ModelResult<f64>;

    /// ATM forward swap rate, if the structure knows it.
    fn atm_level(&self, _expiry: Date, _tenor: Period) -> Option<f64> {
        None
    }

    /// Displacement of the shifted lognormal convention.
    fn shift(&self, _expiry: Date, _tenor: Period) -> f64 {
        0.0
    }
}

/// A flat volatility for every expiry, tenor and strike.
///
/// ```rust
/// use stratum_core::types::{Date, Period};
/// use stratum_models::volatility::{ConstantSwaptionVolatility, SwaptionVolatility, VolatilityType};
///
/// let vol = ConstantSwaptionVolatility::new(0.0080, VolatilityType::Normal).unwrap();
/// let expiry = Date::from_ymd(2026, 1, 15).unwrap();
/// assert_eq!(vol.volatility(expiry, Period::years(5), 0.03).unwrap(), 0.0080);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantSwaptionVolatility {
    volatility: f64,
    volatility_type: VolatilityType,
    day_count: DayCountConvention,
    shift: f64,
    atm_level: Option<f64>,
}

impl ConstantSwaptionVolatility {
    /// Creates a flat structure; the volatility must be positive.
    pub fn new(volatility: f64, volatility_type: VolatilityType) -> ModelResult<Self> {
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(ModelError::precondition(format!(
                "swaption volatility {volatility} must be positive"
            )));
        }
        Ok(Self {
            volatility,
            volatility_type,
            day_count: DayCountConvention::Act365Fixed,
            shift: 0.0,
            atm_level: None,
        })
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the lognormal displacement.
    #[must_use]
    pub fn with_shift(mut self, shift: f64) -> Self {
        self.shift = shift;
        self
    }

    /// Sets a flat ATM level.
    #[must_use]
    pub fn with_atm_level(mut self, atm_level: f64) -> Self {
        self.atm_level = Some(atm_level);
        self
    }
}

impl SwaptionVolatility for ConstantSwaptionVolatility {
    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn volatility_type(&self) -> VolatilityType {
        self.volatility_type
    }

    fn volatility(&self, _expiry: Date, _tenor: Period, _strike: f64) -> ModelResult<f64> {
        Ok(self.volatility)
    }

    fn atm_level(&self, _expiry: Date, _tenor: Period) -> Option<f64> {
        self.atm_level
    }

    fn shift(&self, _expiry: Date, _tenor: Period) -> f64 {
        self.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_structure() {
        let expiry = Date::from_ymd(2026, 1, 15).unwrap();
        let vol = ConstantSwaptionVolatility::new(0.20, VolatilityType::ShiftedLognormal)
            .unwrap()
            .with_shift(0.01)
            .with_day_count(DayCountConvention::Act360);

        assert_eq!(vol.volatility(expiry, Period::years(10), -0.005).unwrap(), 0.20);
        assert_eq!(vol.shift(expiry, Period::years(10)), 0.01);
        assert_eq!(vol.atm_level(expiry, Period::years(10)), None);
        assert_eq!(vol.with_atm_level(0.03).atm_level(expiry, Period::years(2)), Some(0.03));
        assert_eq!(vol.day_count(), DayCountConvention::Act360);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(ConstantSwaptionVolatility::new(0.0, VolatilityType::Normal)
            .unwrap_err()
            .is_precondition());
        assert!(ConstantSwaptionVolatility::new(f64::NAN, VolatilityType::Normal).is_err());
    }
}

//! Tenors such as `3M` or `10Y`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StratumError;

/// Unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days
    Days,
    /// Weeks of seven days
    Weeks,
    /// Calendar months
    Months,
    /// Calendar years
    Years,
}

/// A length of time expressed in a calendar unit.
///
/// Month periods display in normalized form, so `Period::months(15)`
/// prints as `1Y3M`.
///
/// # Example
///
/// ```rust
/// use stratum_core::types::Period;
///
/// let tenor: Period = "18M".parse().unwrap();
/// assert_eq!(tenor.total_months(), Some(18));
/// assert_eq!(tenor.to_string(), "1Y6M");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    length: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(length: i32, unit: TimeUnit) -> Self {
        Self { length, unit }
    }

    /// A period of `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Days)
    }

    /// A period of `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Weeks)
    }

    /// A period of `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Months)
    }

    /// A period of `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Years)
    }

    /// Combines whole years and months into a single month period.
    #[must_use]
    pub const fn years_months(years: i32, months: i32) -> Self {
        Self::months(years * 12 + months)
    }

    /// Returns the length in units.
    #[must_use]
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Returns the unit.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns the length in months for month and year periods.
    #[must_use]
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Months => Some(self.length),
            TimeUnit::Years => Some(self.length * 12),
            TimeUnit::Days | TimeUnit::Weeks => None,
        }
    }

    /// Approximate length in years, used for sorting and volatility lookups.
    #[must_use]
    pub fn approximate_years(&self) -> f64 {
        match self.unit {
            TimeUnit::Days => f64::from(self.length) / 365.0,
            TimeUnit::Weeks => f64::from(self.length) * 7.0 / 365.0,
            TimeUnit::Months => f64::from(self.length) / 12.0,
            TimeUnit::Years => f64::from(self.length),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            TimeUnit::Days => write!(f, "{}D", self.length),
            TimeUnit::Weeks => write!(f, "{}W", self.length),
            TimeUnit::Years => write!(f, "{}Y", self.length),
            TimeUnit::Months => {
                let years = self.length / 12;
                let months = self.length % 12;
                match (years, months) {
                    (0, m) => write!(f, "{m}M"),
                    (y, 0) => write!(f, "{y}Y"),
                    (y, m) => write!(f, "{y}Y{m}M"),
                }
            }
        }
    }
}

impl FromStr for Period {
    type Err = StratumError;

    /// Parses tenors like `2D`, `1W`, `6M`, `10Y` and `1Y6M`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        if upper.is_empty() {
            return Err(StratumError::invalid_period("empty tenor"));
        }

        let mut total: Option<Period> = None;
        let mut digits = String::new();
        for c in upper.chars() {
            if c.is_ascii_digit() || (c == '-' && digits.is_empty()) {
                digits.push(c);
                continue;
            }
            let n: i32 = digits
                .parse()
                .map_err(|_| StratumError::invalid_period(format!("Invalid tenor: {s}")))?;
            digits.clear();
            let part = match c {
                'D' => Period::days(n),
                'W' => Period::weeks(n),
                'M' => Period::months(n),
                'Y' => Period::years(n),
                _ => return Err(StratumError::invalid_period(format!("Invalid tenor: {s}"))),
            };
            total = Some(match total {
                None => part,
                Some(prev) => match (prev.total_months(), part.total_months()) {
                    (Some(a), Some(b)) => Period::months(a + b),
                    _ => {
                        return Err(StratumError::invalid_period(format!(
                            "Cannot combine day and month units: {s}"
                        )))
                    }
                },
            });
        }

        if !digits.is_empty() {
            return Err(StratumError::invalid_period(format!("Missing unit: {s}")));
        }
        total.ok_or_else(|| StratumError::invalid_period(format!("Invalid tenor: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tenors() {
        assert_eq!("3M".parse::<Period>().unwrap(), Period::months(3));
        assert_eq!("10y".parse::<Period>().unwrap(), Period::years(10));
        assert_eq!("1W".parse::<Period>().unwrap(), Period::weeks(1));
        assert_eq!("2D".parse::<Period>().unwrap(), Period::days(2));
    }

    #[test]
    fn test_parse_compound_tenor() {
        let p: Period = "1Y6M".parse().unwrap();
        assert_eq!(p, Period::months(18));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<Period>().is_err());
        assert!("3".parse::<Period>().is_err());
        assert!("3Q".parse::<Period>().is_err());
        assert!("1W2M".parse::<Period>().is_err());
    }

    #[test]
    fn test_display_normalizes_months() {
        assert_eq!(Period::months(15).to_string(), "1Y3M");
        assert_eq!(Period::months(24).to_string(), "2Y");
        assert_eq!(Period::months(1).to_string(), "1M");
        assert_eq!(Period::years_months(5, 3).to_string(), "5Y3M");
    }

    #[test]
    fn test_total_months() {
        assert_eq!(Period::years(2).total_months(), Some(24));
        assert_eq!(Period::days(10).total_months(), None);
    }
}

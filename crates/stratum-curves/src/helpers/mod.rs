//! Bootstrap helpers.
//!
//! A helper wraps one quoted market instrument and pins one curve node:
//! the node at its [`pillar_date`](BootstrapHelper::pillar_date). During a
//! bootstrap it is priced against the trial curve handed to
//! [`RateHelper::quote_error`] (or [`DefaultHelper::quote_error`]); the
//! helper never stores the curve, so one helper can serve several curves.
//!
//! # Available Helpers
//!
//! ## Yield curves
//! - [`DepositRateHelper`]: money market deposits
//! - [`FraRateHelper`]: forward rate agreements
//! - [`SwapRateHelper`]: fixed-for-floating swaps, optionally discounted
//!   on another curve
//! - [`OisRateHelper`]: overnight index swaps
//!
//! ## Credit curves
//! - [`CdsHelper`]: running-spread credit default swaps

mod cds;
mod deposit;
mod fra;
mod swap;

pub use cds::CdsHelper;
pub use deposit::DepositRateHelper;
pub use fra::FraRateHelper;
pub use swap::{OisRateHelper, SwapRateHelper};

use stratum_core::quotes::QuoteHandle;
use stratum_core::types::{Date, Frequency};

use crate::error::{CurveError, CurveResult};
use crate::traits::{CreditCurve, YieldCurve};

/// Common interface of every helper, independent of the curve family.
pub trait BootstrapHelper: Send + Sync {
    /// The market quote.
    fn quote(&self) -> &QuoteHandle;

    /// Current quote value.
    ///
    /// # Errors
    ///
    /// Returns a precondition error if the quote is empty or not finite.
    fn quote_value(&self) -> CurveResult<f64> {
        self.quote()
            .value()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                CurveError::precondition(format!("{} has an invalid quote", self.description()))
            })
    }

    /// Date of the node this helper pins.
    fn pillar_date(&self) -> Date;

    /// First date the helper's pricing depends on.
    fn earliest_date(&self) -> Date;

    /// Node value to start the root search from, when the helper knows one.
    fn initial_guess(&self) -> Option<f64> {
        None
    }

    /// Human-readable description used in diagnostics.
    fn description(&self) -> String;

    /// Revision of every observable the helper prices from.
    fn revision(&self) -> u64 {
        self.quote().revision()
    }
}

/// A helper calibrating a yield curve.
pub trait RateHelper: BootstrapHelper {
    /// Quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn YieldCurve) -> CurveResult<f64>;

    /// Signed quote error `quote - implied` against `curve`.
    fn quote_error(&self, curve: &dyn YieldCurve) -> CurveResult<f64> {
        Ok(self.quote_value()? - self.implied_quote(curve)?)
    }
}

/// A helper calibrating a default-probability curve.
pub trait DefaultHelper: BootstrapHelper {
    /// Quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn CreditCurve) -> CurveResult<f64>;

    /// Signed quote error `quote - implied` against `curve`.
    fn quote_error(&self, curve: &dyn CreditCurve) -> CurveResult<f64> {
        Ok(self.quote_value()? - self.implied_quote(curve)?)
    }
}

/// Payment dates from `start` (exclusive) to `end` (inclusive).
///
/// Dates roll forward from `start` in whole periods, each computed from
/// `start` directly so month-end clipping does not accumulate. A short
/// final stub ends on `end`.
pub fn schedule(start: Date, end: Date, frequency: Frequency) -> CurveResult<Vec<Date>> {
    if end <= start {
        return Err(CurveError::precondition(format!(
            "schedule end {end} must be after start {start}"
        )));
    }
    let Some(step) = frequency.period() else {
        return Ok(vec![end]);
    };
    let months = step.total_months().unwrap_or(12);

    let mut dates = Vec::new();
    let mut k = 1;
    loop {
        let next = start.add_months(months * k)?;
        if next >= end {
            break;
        }
        dates.push(next);
        k += 1;
    }
    dates.push(end);
    Ok(dates)
}

/// Checks that a helper's dates are ordered.
pub(crate) fn check_dates(start: Date, end: Date, what: &str) -> CurveResult<()> {
    if end <= start {
        return Err(CurveError::precondition(format!(
            "{what}: maturity {end} must be after start {start}"
        )));
    }
    Ok(())
}

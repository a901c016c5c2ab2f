//! Repricing validation for bootstrapped curves.
//!
//! A bootstrapped curve must reprice every helper it was built from to
//! within the bootstrap accuracy. [`RepricingReport`] records the quote
//! error of each helper against the finished curve so callers can audit a
//! curve before using it.
//!
//! # Usage
//!
//! ```rust,ignore
//! let report = curve.repricing_report()?;
//! if !report.is_valid() {
//!     for check in report.failed_checks() {
//!         eprintln!("{check}");
//!     }
//! }
//! ```

use std::fmt;

/// Quote error of one helper against a finished curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Helper description.
    pub instrument: String,

    /// Market quote.
    pub quote: f64,

    /// Quote implied by the curve.
    pub implied: f64,

    /// Absolute quote error.
    pub error: f64,

    /// Largest acceptable error.
    pub tolerance: f64,

    /// Whether the helper reprices within tolerance.
    pub passed: bool,
}

impl RepricingCheck {
    /// Creates a check from a quote and the curve-implied value.
    #[must_use]
    pub fn new(instrument: String, quote: f64, implied: f64, tolerance: f64) -> Self {
        let error = (quote - implied).abs();
        Self {
            instrument,
            quote,
            implied,
            error,
            tolerance,
            passed: error <= tolerance,
        }
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "✓" } else { "✗" };
        write!(
            f,
            "{} {} | quote {:.8} | implied {:.8} | error {:.2e} (tol {:.2e})",
            status, self.instrument, self.quote, self.implied, self.error, self.tolerance
        )
    }
}

/// Repricing checks of every helper of a curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
    max_error: f64,
    rms_error: f64,
    passed_count: usize,
}

impl RepricingReport {
    /// Aggregates individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        let max_error = checks.iter().map(|c| c.error).fold(0.0_f64, f64::max);
        let rms_error = if checks.is_empty() {
            0.0
        } else {
            let sum_sq: f64 = checks.iter().map(|c| c.error * c.error).sum();
            (sum_sq / checks.len() as f64).sqrt()
        };
        let passed_count = checks.iter().filter(|c| c.passed).count();

        Self {
            checks,
            max_error,
            rms_error,
            passed_count,
        }
    }

    /// True when every helper passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.passed_count == self.checks.len()
    }

    /// The individual checks, in pillar order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Largest absolute quote error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Root mean square quote error.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    /// Number of helpers within tolerance.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed_count
    }

    /// Number of helpers outside tolerance.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.checks.len() - self.passed_count
    }

    /// Checks outside tolerance.
    #[must_use]
    pub fn failed_checks(&self) -> Vec<&RepricingCheck> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repricing Report")?;
        writeln!(f, "================")?;
        writeln!(f, "Status: {}", if self.is_valid() { "PASSED" } else { "FAILED" })?;
        writeln!(f, "Instruments: {}/{} passed", self.passed_count, self.checks.len())?;
        writeln!(f, "Max Error: {:.2e}", self.max_error)?;
        writeln!(f, "RMS Error: {:.2e}", self.rms_error)?;

        if !self.checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Details:")?;
            for check in &self.checks {
                writeln!(f, "  {check}")?;
            }
        }
        Ok(())
    }
}

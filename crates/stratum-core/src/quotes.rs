//! Market quotes with revision tracking.
//!
//! Every quote carries a revision drawn from a process-wide counter. A
//! consumer that remembers the largest revision it has seen can detect any
//! later change to any of its inputs with a single comparison, which is how
//! lazily bootstrapped curves decide to recompute.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

static REVISION: AtomicU64 = AtomicU64::new(0);

/// Draws a fresh revision, strictly greater than every earlier one.
pub fn next_revision() -> u64 {
    REVISION.fetch_add(1, Ordering::SeqCst) + 1
}

/// An observable market value.
pub trait Quote: Send + Sync {
    /// Current value, `None` when no value has been set.
    fn value(&self) -> Option<f64>;

    /// Revision of the current value.
    fn revision(&self) -> u64;

    /// True when the quote holds a finite value.
    fn is_valid(&self) -> bool {
        self.value().is_some_and(f64::is_finite)
    }
}

/// Shared handle to a quote.
pub type QuoteHandle = Arc<dyn Quote>;

#[derive(Debug, Clone, Copy)]
struct QuoteState {
    value: Option<f64>,
    revision: u64,
}

/// A quote whose value is set directly.
///
/// # Example
///
/// ```rust
/// use stratum_core::quotes::{Quote, SimpleQuote};
///
/// let quote = SimpleQuote::new(0.05);
/// assert_eq!(quote.value(), Some(0.05));
///
/// let rev = quote.revision();
/// quote.set_value(0.051);
/// assert!(quote.revision() > rev);
/// ```
#[derive(Debug)]
pub struct SimpleQuote {
    state: RwLock<QuoteState>,
}

impl SimpleQuote {
    /// Creates a shared quote holding `value`.
    #[must_use]
    pub fn new(value: f64) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(QuoteState {
                value: Some(value),
                revision: next_revision(),
            }),
        })
    }

    /// Creates a shared quote without a value.
    #[must_use]
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(QuoteState {
                value: None,
                revision: next_revision(),
            }),
        })
    }

    /// Replaces the value and bumps the revision.
    pub fn set_value(&self, value: f64) {
        let mut state = self.state.write();
        state.value = Some(value);
        state.revision = next_revision();
    }

    /// Clears the value and bumps the revision.
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.value = None;
        state.revision = next_revision();
    }
}

impl Quote for SimpleQuote {
    fn value(&self) -> Option<f64> {
        self.state.read().value
    }

    fn revision(&self) -> u64 {
        self.state.read().revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisions_increase() {
        let a = next_revision();
        let b = next_revision();
        assert!(b > a);
    }

    #[test]
    fn test_set_value_bumps_revision() {
        let quote = SimpleQuote::new(0.03);
        let other = SimpleQuote::new(0.04);
        quote.set_value(0.035);
        assert_eq!(quote.value(), Some(0.035));
        assert!(quote.revision() > other.revision());
    }

    #[test]
    fn test_validity() {
        assert!(SimpleQuote::new(0.01).is_valid());
        assert!(!SimpleQuote::new(f64::NAN).is_valid());
        assert!(!SimpleQuote::new(f64::INFINITY).is_valid());

        let quote = SimpleQuote::empty();
        assert!(!quote.is_valid());
        quote.set_value(0.02);
        assert!(quote.is_valid());
        quote.reset();
        assert_eq!(quote.value(), None);
    }

    #[test]
    fn test_handle_is_shareable_across_threads() {
        let quote = SimpleQuote::new(1.0);
        let handle: QuoteHandle = quote.clone();
        let reader = std::thread::spawn(move || handle.value());
        assert_eq!(reader.join().unwrap(), Some(1.0));
    }
}

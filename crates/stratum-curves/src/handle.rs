//! Relinkable curve handles.
//!
//! Helpers take their exogenous curves at construction, but curves take
//! their helpers at construction too. When two curves reference each other
//! one side has to be a [`RelinkableCurve`]: the helper is built against
//! the empty handle, and the handle is linked once the target exists.
//!
//! The handle holds its target weakly, so a pair of mutually dependent
//! curves does not keep itself alive.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::next_revision;
use stratum_core::types::Date;

use crate::error::{CurveError, CurveResult};
use crate::traits::YieldCurve;

struct Link {
    target: Option<Weak<dyn YieldCurve>>,
    revision: u64,
}

/// A yield curve that forwards to a target set after construction.
///
/// Reading an unlinked handle is a precondition error; reading a handle
/// whose target was dropped is [`CurveError::CurveDropped`]. Relinking
/// bumps the handle's revision so that dependent curves recompute.
///
/// # Example
///
/// ```rust,ignore
/// let ois_link = RelinkableCurve::new(today, DayCountConvention::Act365Fixed);
/// let swap = SwapRateHelper::from_tenor(quote, today, Period::years(5))?
///     .with_discount_curve(ois_link.clone());
/// // ... build the OIS curve ...
/// ois_link.link_to(&ois_curve);
/// ```
pub struct RelinkableCurve {
    reference_date: Date,
    day_count: DayCountConvention,
    link: RwLock<Link>,
}

impl RelinkableCurve {
    /// Creates an unlinked handle.
    #[must_use]
    pub fn new(reference_date: Date, day_count: DayCountConvention) -> Arc<Self> {
        Arc::new(Self {
            reference_date,
            day_count,
            link: RwLock::new(Link {
                target: None,
                revision: next_revision(),
            }),
        })
    }

    /// Points the handle at `target`.
    pub fn link_to<C: YieldCurve + 'static>(&self, target: &Arc<C>) {
        let weak: Weak<dyn YieldCurve> = Arc::downgrade(target) as Weak<dyn YieldCurve>;
        let mut link = self.link.write();
        link.target = Some(weak);
        link.revision = next_revision();
    }

    /// True when the handle points at a live curve.
    pub fn is_linked(&self) -> bool {
        self.link
            .read()
            .target
            .as_ref()
            .is_some_and(|t| t.strong_count() > 0)
    }

    fn target(&self) -> CurveResult<Arc<dyn YieldCurve>> {
        let link = self.link.read();
        let weak = link
            .target
            .as_ref()
            .ok_or_else(|| CurveError::precondition("curve handle is not linked"))?;
        weak.upgrade().ok_or(CurveError::CurveDropped)
    }
}

impl YieldCurve for RelinkableCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.target()?.discount_factor(t)
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.target()
            .map_or(self.reference_date, |target| target.max_date())
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn revision(&self) -> u64 {
        let own = self.link.read().revision;
        self.target().map_or(own, |target| own.max(target.revision()))
    }
}

impl std::fmt::Debug for RelinkableCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelinkableCurve")
            .field("reference_date", &self.reference_date)
            .field("linked", &self.is_linked())
            .finish()
    }
}

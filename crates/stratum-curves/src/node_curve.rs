//! Node storage shared by the bootstrap and the joint optimizer.
//!
//! A [`NodeCurve`] holds the discretization of one term structure: node
//! dates, times and values, plus the interpolation built over them. The
//! node values mean whatever the curve's [`NodeUpdatePolicy`] says they
//! mean (discount factors, zero yields, hazard rates, ...), and the policy
//! turns the interpolated values back into discount factors or survival
//! probabilities.
//!
//! During an iterative bootstrap only a prefix of the nodes is *active*:
//! nodes beyond the segment being solved exist with placeholder values but
//! are invisible to pricing.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use stratum_core::daycounts::DayCountConvention;
use stratum_core::types::Date;
use stratum_math::interpolation::{InterpolationScheme, Interpolator, Linear};

use crate::error::{CurveError, CurveResult};
use crate::policies::{DefaultNodePolicy, NodeUpdatePolicy, YieldNodePolicy};
use crate::traits::{CreditCurve, YieldCurve};

/// Dates, times and values of a piecewise term structure.
pub struct NodeCurve<P, I> {
    reference_date: Date,
    day_count: DayCountConvention,
    scheme: I,
    dates: Vec<Date>,
    times: Vec<f64>,
    data: Vec<f64>,
    active: usize,
    interpolation: Option<Arc<dyn Interpolator>>,
    linear_fallback: bool,
    _policy: PhantomData<fn() -> P>,
}

impl<P: NodeUpdatePolicy, I: InterpolationScheme> NodeCurve<P, I> {
    /// Creates a curve holding only the reference node.
    pub fn new(reference_date: Date, day_count: DayCountConvention, scheme: I) -> Self {
        Self {
            reference_date,
            day_count,
            scheme,
            dates: vec![reference_date],
            times: vec![0.0],
            data: vec![P::initial_value()],
            active: 1,
            interpolation: None,
            linear_fallback: false,
            _policy: PhantomData,
        }
    }

    /// Lays out one node per pillar after the reference node.
    ///
    /// Every node value is reset to the policy's initial value and only the
    /// reference node stays active.
    pub fn reset(&mut self, pillars: &[Date]) -> CurveResult<()> {
        self.dates.clear();
        self.times.clear();
        self.dates.push(self.reference_date);
        self.times.push(0.0);

        for &pillar in pillars {
            let t = self.day_count.year_fraction(self.reference_date, pillar);
            let last = self.times[self.times.len() - 1];
            if t <= last {
                return Err(CurveError::precondition(format!(
                    "node {pillar} maps to time {t}, not after the previous node time {last}"
                )));
            }
            self.dates.push(pillar);
            self.times.push(t);
        }

        self.data.clear();
        self.data.resize(self.dates.len(), P::initial_value());
        self.active = 1;
        self.interpolation = None;
        Ok(())
    }

    /// Reference date of the curve.
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Day count mapping dates to node times.
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// All node dates, the reference date first.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// All node times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// All node values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Total number of nodes, the reference node included.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when only the reference node exists.
    pub fn is_empty(&self) -> bool {
        self.dates.len() <= 1
    }

    /// Number of nodes visible to pricing.
    pub fn active_nodes(&self) -> usize {
        self.active
    }

    /// Makes the first `count` nodes visible to pricing.
    pub fn activate(&mut self, count: usize) {
        self.active = count.clamp(1, self.dates.len());
    }

    /// Builds the interpolation with [`Linear`] instead of the curve's own
    /// scheme. Used for the first pass over a global scheme, whose nodes
    /// would otherwise move as later segments are added.
    pub fn set_linear_fallback(&mut self, on: bool) {
        self.linear_fallback = on;
    }

    /// Applies the policy's update rule for a solved node value.
    pub fn update(&mut self, i: usize, value: f64) {
        P::update_guess(&mut self.data, value, i);
    }

    /// Replaces every node value.
    pub fn set_data(&mut self, data: &[f64]) -> CurveResult<()> {
        if data.len() != self.data.len() {
            return Err(CurveError::precondition(format!(
                "expected {} node values, got {}",
                self.data.len(),
                data.len()
            )));
        }
        self.data.copy_from_slice(data);
        Ok(())
    }

    /// Rebuilds the interpolation over the active nodes.
    pub fn rebuild(&mut self) -> CurveResult<()> {
        let n = self.active;
        let (xs, ys) = (&self.times[..n], &self.data[..n]);
        let interpolation = if self.linear_fallback || n < I::REQUIRED_POINTS {
            Linear.interpolate(xs, ys)?
        } else {
            self.scheme.interpolate(xs, ys)?
        };
        self.interpolation = Some(interpolation);
        Ok(())
    }

    /// The current interpolation.
    ///
    /// # Errors
    ///
    /// Returns a precondition error when no interpolation has been built yet.
    pub fn interpolator(&self) -> CurveResult<&dyn Interpolator> {
        self.interpolation
            .as_deref()
            .ok_or_else(|| CurveError::precondition("curve interpolation has not been built"))
    }

    /// Last active node date.
    pub fn last_date(&self) -> Date {
        self.dates[self.active - 1]
    }
}

impl<P, I: fmt::Debug> fmt::Debug for NodeCurve<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCurve")
            .field("reference_date", &self.reference_date)
            .field("scheme", &self.scheme)
            .field("times", &self.times)
            .field("data", &self.data)
            .field("active", &self.active)
            .finish()
    }
}

impl<P, I> YieldCurve for NodeCurve<P, I>
where
    P: YieldNodePolicy,
    I: InterpolationScheme,
{
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok(P::discount(self.interpolator()?, t))
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.last_date()
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

impl<P, I> CreditCurve for NodeCurve<P, I>
where
    P: DefaultNodePolicy,
    I: InterpolationScheme,
{
    fn survival_probability(&self, t: f64) -> CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        Ok(P::survival_probability(self.interpolator()?, t))
    }

    fn hazard_rate(&self, t: f64) -> CurveResult<f64> {
        Ok(P::hazard_rate(self.interpolator()?, t.max(0.0)))
    }

    fn default_density(&self, t: f64) -> CurveResult<f64> {
        Ok(P::default_density(self.interpolator()?, t.max(0.0)))
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.last_date()
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }
}

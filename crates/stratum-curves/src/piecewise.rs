//! Lazily bootstrapped piecewise curves.
//!
//! A [`PiecewiseCurve`] owns its helpers and computes its nodes on first
//! use. Every read through [`YieldCurve`] or [`CreditCurve`] first calls
//! [`PiecewiseCurve::ensure_computed`], which compares the revision of the
//! curve's inputs with the revision it last computed from and recomputes
//! the whole node set when they differ.
//!
//! ```text
//! Uninitialized ──read──> Bootstrapping(1) ──> ... ──> Complete
//!                                  │                      │
//!                                  └───────> Failed <─────┘ (quote change + read)
//! ```
//!
//! A failed pass is cached like a successful one: reads keep returning the
//! same error until an input changes.
//!
//! Curves built with [`PiecewiseCurveBuilder::build_joint`] are calibrated
//! together by a [`MultiCurveOptimizer`] instead of the node-by-node loop;
//! a read of any curve in the group calibrates the whole group.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::{ReentrantMutex, RwLock};
use stratum_core::daycounts::DayCountConvention;
use stratum_core::types::Date;
use stratum_math::interpolation::{BackwardFlat, InterpolationScheme};
use tracing::{info, warn};

use crate::bootstrap::{bootstrap, sort_helpers, JointCurve, MultiCurveOptimizer};
use crate::config::{BootstrapConfig, Validate};
use crate::error::{CurveError, CurveResult};
use crate::helpers::BootstrapHelper;
use crate::node_curve::NodeCurve;
use crate::policies::{
    DefaultDensity, DefaultNodePolicy, Discount, ForwardRate, HazardRate, NodeUpdatePolicy,
    SurvivalProbability, YieldNodePolicy, ZeroYield,
};
use crate::repricing::{RepricingCheck, RepricingReport};
use crate::traits::{CreditCurve, YieldCurve};

thread_local! {
    /// Curves whose input revision is being resolved on this thread.
    static RESOLVING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Removes a curve from [`RESOLVING`] when its revision is resolved.
struct ResolveGuard(usize);

impl ResolveGuard {
    fn enter(key: usize) -> Option<Self> {
        RESOLVING.with(|resolving| {
            let mut resolving = resolving.borrow_mut();
            if resolving.contains(&key) {
                None
            } else {
                resolving.push(key);
                Some(Self(key))
            }
        })
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        RESOLVING.with(|resolving| resolving.borrow_mut().retain(|&k| k != self.0));
    }
}

/// Calculation state of a lazy curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    /// Never computed.
    Uninitialized,
    /// Solving the node with this index.
    Bootstrapping {
        /// Node being solved.
        segment: usize,
    },
    /// Inside a joint calibration of its group.
    Calibrating,
    /// Nodes reprice every helper.
    Complete,
    /// The last pass failed.
    Failed,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Bootstrapping { segment } => write!(f, "bootstrapping segment {segment}"),
            Self::Calibrating => write!(f, "calibrating"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

enum CurveMode {
    Standalone,
    Joint(Arc<MultiCurveOptimizer>),
}

struct CurveState<P, I> {
    nodes: Option<NodeCurve<P, I>>,
    status: BootstrapState,
    observed_revision: Option<u64>,
    failure: Option<CurveError>,
}

impl<P, I> CurveState<P, I> {
    fn outcome(&self) -> CurveResult<()> {
        self.failure.clone().map_or(Ok(()), Err)
    }
}

/// A term structure bootstrapped on demand from its helpers.
///
/// `P` fixes what the nodes are (discount factors, hazard rates, ...) and
/// `I` how they are interpolated. See the type aliases [`DiscountCurve`],
/// [`FlatForwardCurve`], [`HazardRateCurve`] and friends for the common
/// combinations.
///
/// # Example
///
/// ```rust,ignore
/// let curve = DiscountCurve::<LogLinear>::builder(today)
///     .add_helper(deposit_1m)
///     .add_helper(deposit_3m)
///     .build()?;
/// let df = curve.discount_factor_at(today.add_months(2)?)?; // bootstraps here
/// ```
pub struct PiecewiseCurve<P: NodeUpdatePolicy, I> {
    name: String,
    reference_date: Date,
    day_count: DayCountConvention,
    scheme: I,
    helpers: Vec<Arc<P::Helper>>,
    config: BootstrapConfig,
    mode: CurveMode,
    guard: Arc<ReentrantMutex<()>>,
    state: RwLock<CurveState<P, I>>,
}

/// Discount factor nodes.
pub type DiscountCurve<I> = PiecewiseCurve<Discount, I>;
/// Zero yield nodes.
pub type ZeroYieldCurve<I> = PiecewiseCurve<ZeroYield, I>;
/// Instantaneous forward nodes.
pub type ForwardRateCurve<I> = PiecewiseCurve<ForwardRate, I>;
/// Piecewise flat forward curve.
pub type FlatForwardCurve = PiecewiseCurve<ForwardRate, BackwardFlat>;
/// Hazard rate nodes.
pub type HazardRateCurve<I> = PiecewiseCurve<HazardRate, I>;
/// Survival probability nodes.
pub type SurvivalProbabilityCurve<I> = PiecewiseCurve<SurvivalProbability, I>;
/// Default density nodes.
pub type DefaultDensityCurve<I> = PiecewiseCurve<DefaultDensity, I>;

impl<P, I> PiecewiseCurve<P, I>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    /// Starts building a curve anchored at `reference_date`.
    #[must_use]
    pub fn builder(reference_date: Date) -> PiecewiseCurveBuilder<P, I> {
        PiecewiseCurveBuilder::new(reference_date)
    }

    /// Curve name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The helpers, sorted by pillar date.
    pub fn helpers(&self) -> &[Arc<P::Helper>] {
        &self.helpers
    }

    /// Bootstrap settings.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Current calculation state, without triggering a calculation.
    pub fn state(&self) -> BootstrapState {
        self.state.read_recursive().status
    }

    /// True when the curve belongs to a joint calibration group.
    pub fn is_joint(&self) -> bool {
        matches!(self.mode, CurveMode::Joint(_))
    }

    /// Largest revision among the curve's inputs.
    ///
    /// Dependency cycles through other curves contribute nothing once they
    /// come back to this curve.
    pub fn input_revision(&self) -> u64 {
        let Some(_resolving) = ResolveGuard::enter(self as *const Self as usize) else {
            return 0;
        };
        self.helpers.iter().map(|h| h.revision()).max().unwrap_or(0)
    }

    /// Brings the nodes up to date with the helpers' quotes.
    ///
    /// Does nothing when no input changed since the last pass, successful
    /// or not; otherwise runs a full bootstrap (or a joint calibration of
    /// the curve's group) from scratch.
    ///
    /// # Errors
    ///
    /// The error of the current pass, or of the cached failed pass. Reading
    /// a curve from inside its own bootstrap is a precondition error.
    pub fn ensure_computed(&self) -> CurveResult<()> {
        let revision = self.input_revision();
        if let Some(outcome) = self.cached(revision) {
            return outcome;
        }

        let _lock = self.guard.lock();
        let previous = {
            let state = self.state.read_recursive();
            match state.status {
                BootstrapState::Calibrating => return Ok(()),
                BootstrapState::Bootstrapping { segment } => {
                    return Err(CurveError::precondition(format!(
                        "{} was read while bootstrapping its segment {segment}",
                        self.name
                    )));
                }
                _ => state.observed_revision,
            }
        };

        // Another thread may have finished the pass while we waited.
        let revision = self.input_revision();
        if let Some(outcome) = self.cached(revision) {
            return outcome;
        }
        if let Some(previous) = previous {
            warn!(curve = %self.name, previous, revision, "inputs changed, recomputing curve");
        }

        match &self.mode {
            CurveMode::Standalone => self.run_bootstrap(revision),
            CurveMode::Joint(optimizer) => {
                optimizer.calibrate()?;
                self.state.read_recursive().outcome()
            }
        }
    }

    fn cached(&self, revision: u64) -> Option<CurveResult<()>> {
        let state = self.state.read_recursive();
        let finished = matches!(state.status, BootstrapState::Complete | BootstrapState::Failed);
        (finished && state.observed_revision == Some(revision)).then(|| state.outcome())
    }

    fn run_bootstrap(&self, revision: u64) -> CurveResult<()> {
        {
            let mut state = self.state.write();
            state.nodes = None;
            state.status = BootstrapState::Bootstrapping { segment: 0 };
        }

        let mut nodes = NodeCurve::new(self.reference_date, self.day_count, self.scheme.clone());
        let outcome = bootstrap(&mut nodes, &self.helpers, &self.config, |segment| {
            self.state.write().status = BootstrapState::Bootstrapping { segment };
        });

        let mut state = self.state.write();
        state.observed_revision = Some(revision);
        match outcome {
            Ok(()) => {
                info!(curve = %self.name, revision, "curve bootstrapped");
                state.nodes = Some(nodes);
                state.status = BootstrapState::Complete;
                state.failure = None;
                Ok(())
            }
            Err(err) => {
                state.nodes = None;
                state.status = BootstrapState::Failed;
                state.failure = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Runs `f` on the up-to-date nodes.
    ///
    /// Nodes that are complete for the current input revision are read
    /// without locking the group. Otherwise the group lock is held from
    /// the recompute through the read, so a pass started by another
    /// thread cannot clear the nodes in between.
    fn with_nodes<R>(&self, f: impl FnOnce(&NodeCurve<P, I>) -> CurveResult<R>) -> CurveResult<R> {
        let revision = self.input_revision();
        {
            let state = self.state.read_recursive();
            if let (BootstrapState::Complete, Some(nodes)) = (state.status, state.nodes.as_ref()) {
                if state.observed_revision == Some(revision) {
                    return f(nodes);
                }
            }
        }

        let _lock = self.guard.lock();
        self.ensure_computed()?;
        let state = self.state.read_recursive();
        let nodes = state
            .nodes
            .as_ref()
            .ok_or_else(|| CurveError::precondition(format!("{} holds no nodes", self.name)))?;
        f(nodes)
    }

    /// Node dates and values, the reference node first.
    pub fn nodes(&self) -> CurveResult<Vec<(Date, f64)>> {
        self.with_nodes(|nodes| {
            Ok(nodes
                .dates()
                .iter()
                .copied()
                .zip(nodes.data().iter().copied())
                .collect())
        })
    }

    /// Node dates.
    pub fn dates(&self) -> CurveResult<Vec<Date>> {
        self.with_nodes(|nodes| Ok(nodes.dates().to_vec()))
    }

    /// Node times.
    pub fn times(&self) -> CurveResult<Vec<f64>> {
        self.with_nodes(|nodes| Ok(nodes.times().to_vec()))
    }

    /// Node values.
    pub fn data(&self) -> CurveResult<Vec<f64>> {
        self.with_nodes(|nodes| Ok(nodes.data().to_vec()))
    }

    /// Reprices every helper against the current nodes.
    pub fn repricing_report(&self) -> CurveResult<RepricingReport> {
        self.with_nodes(|nodes| {
            let mut checks = Vec::with_capacity(self.helpers.len());
            for helper in &self.helpers {
                let quote = helper.quote_value()?;
                let error = P::quote_error(helper.as_ref(), nodes)?;
                checks.push(RepricingCheck::new(
                    helper.description(),
                    quote,
                    quote - error,
                    self.config.accuracy,
                ));
            }
            Ok(RepricingReport::new(checks))
        })
    }

    fn last_pillar(&self) -> Date {
        self.helpers
            .last()
            .map_or(self.reference_date, |h| h.pillar_date())
    }
}

impl<P, I> JointCurve for PiecewiseCurve<P, I>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    fn accuracy(&self) -> f64 {
        self.config.accuracy
    }

    fn revision(&self) -> u64 {
        self.input_revision()
    }

    fn instrument_count(&self) -> usize {
        self.helpers.len()
    }

    fn initialize_joint(&self) -> CurveResult<Vec<f64>> {
        for helper in &self.helpers {
            helper.quote_value()?;
        }
        let pillars: Vec<Date> = self.helpers.iter().map(|h| h.pillar_date()).collect();

        let mut nodes = NodeCurve::new(self.reference_date, self.day_count, self.scheme.clone());
        nodes.reset(&pillars)?;
        let count = nodes.len();
        nodes.activate(count);
        nodes.rebuild()?;
        let free = nodes.data()[P::FIXED_NODES..].to_vec();

        let mut state = self.state.write();
        state.nodes = Some(nodes);
        state.status = BootstrapState::Calibrating;
        state.failure = None;
        Ok(free)
    }

    fn set_joint_values(&self, values: &[f64]) -> CurveResult<()> {
        let mut state = self.state.write();
        let nodes = state
            .nodes
            .as_mut()
            .ok_or_else(|| CurveError::precondition(format!("{} is not calibrating", self.name)))?;
        if values.len() + P::FIXED_NODES != nodes.len() {
            return Err(CurveError::precondition(format!(
                "{} expects {} free node values, got {}",
                self.name,
                nodes.len() - P::FIXED_NODES,
                values.len()
            )));
        }
        // The policy's rule also moves the fixed short end with node 1.
        for (k, &value) in values.iter().enumerate() {
            nodes.update(P::FIXED_NODES + k, value);
        }
        nodes.rebuild()
    }

    fn joint_quote_errors(&self, errors: &mut Vec<f64>) -> CurveResult<()> {
        let state = self.state.read_recursive();
        let nodes = state
            .nodes
            .as_ref()
            .ok_or_else(|| CurveError::precondition(format!("{} is not calibrating", self.name)))?;
        for helper in &self.helpers {
            errors.push(P::quote_error(helper.as_ref(), nodes)?);
        }
        Ok(())
    }

    fn complete_joint(&self, revision: u64, outcome: CurveResult<()>) {
        let mut state = self.state.write();
        let outcome = outcome.and_then(|()| match state.nodes.as_ref() {
            Some(nodes) => validate_nodes(nodes),
            None => Err(CurveError::precondition(format!("{} holds no nodes", self.name))),
        });
        state.observed_revision = Some(revision);
        match outcome {
            Ok(()) => {
                state.status = BootstrapState::Complete;
                state.failure = None;
            }
            Err(err) => {
                state.nodes = None;
                state.status = BootstrapState::Failed;
                state.failure = Some(err);
            }
        }
    }
}

/// Checks every solved node of a jointly calibrated curve.
fn validate_nodes<P, I>(nodes: &NodeCurve<P, I>) -> CurveResult<()>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    let interpolation = nodes.interpolator()?;
    for i in P::FIXED_NODES..nodes.len() {
        P::validate_node(i, nodes.times(), nodes.data(), interpolation)
            .map_err(|reason| CurveError::numerical_domain(i, reason))?;
    }
    Ok(())
}

impl<P, I> YieldCurve for PiecewiseCurve<P, I>
where
    P: YieldNodePolicy,
    I: InterpolationScheme,
{
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        self.with_nodes(|nodes| nodes.discount_factor(t))
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.last_pillar()
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn revision(&self) -> u64 {
        self.input_revision()
    }
}

impl<P, I> CreditCurve for PiecewiseCurve<P, I>
where
    P: DefaultNodePolicy,
    I: InterpolationScheme,
{
    fn survival_probability(&self, t: f64) -> CurveResult<f64> {
        self.with_nodes(|nodes| nodes.survival_probability(t))
    }

    fn hazard_rate(&self, t: f64) -> CurveResult<f64> {
        self.with_nodes(|nodes| nodes.hazard_rate(t))
    }

    fn default_density(&self, t: f64) -> CurveResult<f64> {
        self.with_nodes(|nodes| nodes.default_density(t))
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.last_pillar()
    }

    fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    fn revision(&self) -> u64 {
        self.input_revision()
    }
}

impl<P: NodeUpdatePolicy, I: fmt::Debug> fmt::Debug for PiecewiseCurve<P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiecewiseCurve")
            .field("name", &self.name)
            .field("policy", &P::NAME)
            .field("reference_date", &self.reference_date)
            .field("scheme", &self.scheme)
            .field("helpers", &self.helpers.len())
            .field("state", &self.state.read_recursive().status)
            .finish()
    }
}

/// Builder for [`PiecewiseCurve`].
pub struct PiecewiseCurveBuilder<P: NodeUpdatePolicy, I> {
    reference_date: Date,
    day_count: DayCountConvention,
    scheme: I,
    config: BootstrapConfig,
    name: Option<String>,
    helpers: Vec<Arc<P::Helper>>,
}

impl<P, I> PiecewiseCurveBuilder<P, I>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    /// Creates a builder with Act/365F time and default settings.
    #[must_use]
    pub fn new(reference_date: Date) -> Self {
        Self {
            reference_date,
            day_count: DayCountConvention::Act365Fixed,
            scheme: I::default(),
            config: BootstrapConfig::default(),
            name: None,
            helpers: Vec::new(),
        }
    }

    /// Sets the day count mapping dates to curve times.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the interpolation scheme instance.
    #[must_use]
    pub fn with_interpolation(mut self, scheme: I) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sets the bootstrap settings.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Names the curve.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Adds a helper.
    #[must_use]
    pub fn add_helper(mut self, helper: Arc<P::Helper>) -> Self {
        self.helpers.push(helper);
        self
    }

    /// Adds several helpers.
    #[must_use]
    pub fn add_helpers(mut self, helpers: impl IntoIterator<Item = Arc<P::Helper>>) -> Self {
        self.helpers.extend(helpers);
        self
    }

    /// Builds a curve that bootstraps itself node by node.
    ///
    /// # Errors
    ///
    /// Precondition errors for an invalid configuration, no or too few
    /// helpers, a pillar not after the reference date, and
    /// [`CurveError::DuplicatePillar`] for two helpers on the same date.
    pub fn build(self) -> CurveResult<PiecewiseCurve<P, I>> {
        let guard = Arc::new(ReentrantMutex::new(()));
        self.into_curve(CurveMode::Standalone, guard)
    }

    /// Builds a curve calibrated jointly with the rest of `optimizer`'s
    /// group.
    ///
    /// # Errors
    ///
    /// Same as [`build`](Self::build).
    pub fn build_joint(
        self,
        optimizer: &Arc<MultiCurveOptimizer>,
    ) -> CurveResult<Arc<PiecewiseCurve<P, I>>> {
        let curve = Arc::new(self.into_curve(CurveMode::Joint(Arc::clone(optimizer)), optimizer.guard())?);
        let member: Weak<dyn JointCurve> = Arc::downgrade(&curve) as Weak<dyn JointCurve>;
        optimizer.register(member);
        Ok(curve)
    }

    fn into_curve(
        mut self,
        mode: CurveMode,
        guard: Arc<ReentrantMutex<()>>,
    ) -> CurveResult<PiecewiseCurve<P, I>> {
        self.config.validate_or_error()?;
        if self.helpers.is_empty() {
            return Err(CurveError::precondition("no helpers provided"));
        }
        let required = I::REQUIRED_POINTS.max(1);
        if self.helpers.len() < required {
            return Err(CurveError::precondition(format!(
                "{} helpers provided, the interpolation needs at least {required}",
                self.helpers.len()
            )));
        }
        sort_helpers(self.reference_date, &mut self.helpers)?;

        Ok(PiecewiseCurve {
            name: self.name.unwrap_or_else(|| format!("{} curve", P::NAME)),
            reference_date: self.reference_date,
            day_count: self.day_count,
            scheme: self.scheme,
            helpers: self.helpers,
            config: self.config,
            mode,
            guard,
            state: RwLock::new(CurveState {
                nodes: None,
                status: BootstrapState::Uninitialized,
                observed_revision: None,
                failure: None,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{DepositRateHelper, RateHelper};
    use approx::assert_relative_eq;
    use stratum_core::quotes::SimpleQuote;
    use stratum_core::types::Period;
    use stratum_math::interpolation::{Cubic, LogLinear};

    fn reference() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    fn deposit(quote: &Arc<SimpleQuote>, months: i32) -> Arc<dyn RateHelper> {
        Arc::new(
            DepositRateHelper::from_tenor(quote.clone(), reference(), Period::months(months)).unwrap(),
        )
    }

    fn quotes() -> Vec<Arc<SimpleQuote>> {
        vec![
            SimpleQuote::new(0.040),
            SimpleQuote::new(0.042),
            SimpleQuote::new(0.045),
        ]
    }

    fn curve(quotes: &[Arc<SimpleQuote>]) -> DiscountCurve<LogLinear> {
        DiscountCurve::<LogLinear>::builder(reference())
            .with_name("test")
            .add_helper(deposit(&quotes[2], 6))
            .add_helper(deposit(&quotes[0], 1))
            .add_helper(deposit(&quotes[1], 3))
            .build()
            .unwrap()
    }

    #[test]
    fn test_lazy_bootstrap_on_first_read() {
        let quotes = quotes();
        let curve = curve(&quotes);
        assert_eq!(curve.state(), BootstrapState::Uninitialized);

        let data = curve.data().unwrap();
        assert_eq!(curve.state(), BootstrapState::Complete);
        assert_eq!(data.len(), 4);
        assert_eq!(data[0], 1.0);
        assert!(data.windows(2).all(|w| w[1] < w[0]));
        assert_eq!(curve.max_date(), reference().add_months(6).unwrap());
    }

    #[test]
    fn test_quote_change_triggers_recompute() {
        let quotes = quotes();
        let curve = curve(&quotes);
        let before = curve.data().unwrap();

        quotes[1].set_value(0.043);
        assert_eq!(curve.state(), BootstrapState::Complete);
        let after = curve.data().unwrap();
        assert_eq!(before[1], after[1]);
        assert!(after[2] < before[2]);

        let report = curve.repricing_report().unwrap();
        assert!(report.is_valid());
        assert_relative_eq!(report.checks()[1].quote, 0.043);
    }

    #[test]
    fn test_failure_is_cached_until_inputs_change() {
        let quotes = quotes();
        let curve = curve(&quotes);
        quotes[2].set_value(-0.5);

        let first = curve.discount_factor(0.3).unwrap_err();
        assert!(matches!(first, CurveError::BootstrapFailed { segment: 3, .. }));
        assert_eq!(curve.state(), BootstrapState::Failed);
        assert_eq!(curve.data().unwrap_err(), first);

        quotes[2].set_value(0.045);
        assert!(curve.discount_factor(0.3).is_ok());
        assert_eq!(curve.state(), BootstrapState::Complete);
    }

    #[test]
    fn test_builder_rejects_duplicate_pillars() {
        let quotes = quotes();
        let err = DiscountCurve::<LogLinear>::builder(reference())
            .add_helper(deposit(&quotes[0], 3))
            .add_helper(deposit(&quotes[1], 3))
            .build()
            .unwrap_err();
        assert!(matches!(err, CurveError::DuplicatePillar { .. }));

        let empty = DiscountCurve::<LogLinear>::builder(reference()).build();
        assert!(empty.unwrap_err().is_precondition());
    }

    #[test]
    fn test_global_scheme_reprices() {
        let quotes = quotes();
        let curve = DiscountCurve::<Cubic>::builder(reference())
            .add_helpers(vec![deposit(&quotes[0], 1), deposit(&quotes[1], 3), deposit(&quotes[2], 6)])
            .with_config(BootstrapConfig::default().with_accuracy(1e-10))
            .build()
            .unwrap();
        let report = curve.repricing_report().unwrap();
        assert!(report.is_valid(), "{report}");
    }

    #[test]
    fn test_revision_tracks_helpers() {
        let quotes = quotes();
        let curve = curve(&quotes);
        let revision = curve.input_revision();
        quotes[0].set_value(0.041);
        assert!(curve.input_revision() > revision);
        assert_eq!(YieldCurve::revision(&curve), curve.input_revision());
    }
}

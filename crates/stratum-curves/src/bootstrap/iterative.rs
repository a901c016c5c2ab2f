//! Node-by-node bootstrap.
//!
//! Helpers are sorted by pillar date and solved in order. Node `i` is the
//! only unknown while helper `i` is priced: every earlier node is final,
//! every later node is inactive. A scalar root search on the helper's
//! quote error pins the node, then the loop moves on.
//!
//! Global interpolations (cubic splines) make early nodes depend on later
//! ones. For those the first pass interpolates linearly, and further passes
//! re-solve every node over the full curve until the nodes settle.

use std::sync::Arc;

use stratum_core::types::Date;
use stratum_math::interpolation::InterpolationScheme;
use stratum_math::solvers::{solve_bracketed, SolverConfig};
use tracing::{debug, error, info};

use crate::config::{BootstrapConfig, Validate};
use crate::error::{CurveError, CurveResult};
use crate::helpers::BootstrapHelper;
use crate::node_curve::NodeCurve;
use crate::policies::NodeUpdatePolicy;

/// Number of recent trial and node values kept for diagnostics.
const TRACE_DEPTH: usize = 3;

/// Guess scaling applied to the previous pass in refinement passes.
const REFINEMENT_SHRINK: f64 = 0.99;

/// Sorts helpers by pillar date and rejects unusable helper sets.
///
/// Fails with [`CurveError::DuplicatePillar`] when two helpers pin the same
/// node and with a precondition error when a pillar is not after
/// `reference_date` or a quote is missing.
pub fn sort_helpers<H>(reference_date: Date, helpers: &mut [Arc<H>]) -> CurveResult<()>
where
    H: ?Sized + BootstrapHelper,
{
    helpers.sort_by_key(|h| h.pillar_date());
    for pair in helpers.windows(2) {
        if pair[0].pillar_date() == pair[1].pillar_date() {
            return Err(CurveError::duplicate_pillar(
                pair[1].pillar_date(),
                pair[0].description(),
                pair[1].description(),
            ));
        }
    }
    for helper in helpers.iter() {
        if helper.pillar_date() <= reference_date {
            return Err(CurveError::precondition(format!(
                "{} has pillar {} not after the reference date {reference_date}",
                helper.description(),
                helper.pillar_date()
            )));
        }
    }
    Ok(())
}

/// Bootstraps `curve` so that every helper reprices to its quote.
///
/// `helpers` must already be sorted (see [`sort_helpers`]); node `i` is
/// pinned by `helpers[i - 1]`. `on_segment` is called before each segment
/// is solved.
///
/// # Errors
///
/// - precondition errors for an invalid configuration, too few helpers,
///   unsorted or duplicate pillars, or a missing quote, all raised before
///   the first solve;
/// - [`CurveError::BootstrapFailed`] when a segment's root search fails;
/// - [`CurveError::NumericalDomain`] when a pinned node is invalid for the
///   curve type;
/// - [`CurveError::GlobalConvergence`] when refinement passes do not settle.
pub fn bootstrap<P, I>(
    curve: &mut NodeCurve<P, I>,
    helpers: &[Arc<P::Helper>],
    config: &BootstrapConfig,
    mut on_segment: impl FnMut(usize),
) -> CurveResult<()>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    config.validate_or_error()?;

    let n = helpers.len();
    let required = I::REQUIRED_POINTS.max(1);
    if n < required {
        return Err(CurveError::precondition(format!(
            "{n} helpers provided, the interpolation needs at least {required}"
        )));
    }
    for pair in helpers.windows(2) {
        if pair[0].pillar_date() == pair[1].pillar_date() {
            return Err(CurveError::duplicate_pillar(
                pair[1].pillar_date(),
                pair[0].description(),
                pair[1].description(),
            ));
        }
        if pair[1].pillar_date() < pair[0].pillar_date() {
            return Err(CurveError::precondition(format!(
                "helpers are not sorted: {} precedes {}",
                pair[0].description(),
                pair[1].description()
            )));
        }
    }
    for helper in helpers {
        helper.quote_value()?;
    }

    let pillars: Vec<Date> = helpers.iter().map(|h| h.pillar_date()).collect();
    curve.reset(&pillars)?;

    curve.set_linear_fallback(I::GLOBAL);
    for (k, helper) in helpers.iter().enumerate() {
        let i = k + 1;
        on_segment(i);
        curve.activate(i + 1);
        solve_segment(curve, i, helper.as_ref(), config, None)?;
    }
    curve.set_linear_fallback(false);
    curve.rebuild()?;

    if I::GLOBAL {
        refine(curve, helpers, config, &mut on_segment)?;
    }

    info!(
        policy = P::NAME,
        nodes = curve.len(),
        max_date = %curve.last_date(),
        "bootstrap complete"
    );
    Ok(())
}

/// Re-solves every node over the full curve until the nodes settle.
fn refine<P, I>(
    curve: &mut NodeCurve<P, I>,
    helpers: &[Arc<P::Helper>],
    config: &BootstrapConfig,
    on_segment: &mut impl FnMut(usize),
) -> CurveResult<()>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    let n = helpers.len();
    let threshold = n as f64 * config.accuracy;
    let mut improvement = f64::INFINITY;

    for pass in 1..=config.max_global_iterations {
        let previous = curve.data().to_vec();
        for (k, helper) in helpers.iter().enumerate() {
            let i = k + 1;
            on_segment(i);
            let guess = REFINEMENT_SHRINK * previous[i];
            solve_segment(curve, i, helper.as_ref(), config, Some(guess))?;
        }
        improvement = curve
            .data()
            .iter()
            .zip(&previous)
            .skip(1)
            .map(|(a, b)| (a - b).abs())
            .sum();
        debug!(pass, improvement, "global refinement pass");
        if improvement <= threshold {
            return Ok(());
        }
    }

    Err(CurveError::GlobalConvergence {
        iterations: config.max_global_iterations,
        improvement,
    })
}

/// Pins node `i` from `helper`.
fn solve_segment<P, I>(
    curve: &mut NodeCurve<P, I>,
    i: usize,
    helper: &P::Helper,
    config: &BootstrapConfig,
    guess_override: Option<f64>,
) -> CurveResult<()>
where
    P: NodeUpdatePolicy,
    I: InterpolationScheme,
{
    let min = P::min_value_after(i, curve.data(), config.accuracy);
    let max = P::max_value_after(i, curve.data());
    let pillar = curve.dates()[i];

    let mut guess = guess_override
        .or_else(|| helper.initial_guess())
        .or_else(|| P::guess(i, curve.times(), curve.data()))
        .unwrap_or_else(P::initial_guess);
    if !(guess > min && guess < max) {
        guess = 0.5 * (min + max);
    }

    let mut trials: Vec<f64> = Vec::with_capacity(TRACE_DEPTH);
    let mut pricing_error: Option<CurveError> = None;

    let outcome = if min < max {
        let step = (guess.abs() * config.step_fraction).max(1e-6);
        let solver = SolverConfig::new(config.accuracy, config.max_evaluations);
        solve_bracketed(
            |x| {
                if trials.len() == TRACE_DEPTH {
                    trials.remove(0);
                }
                trials.push(x);
                curve.update(i, x);
                let error = curve.rebuild().and_then(|()| P::quote_error(helper, curve));
                match error {
                    Ok(value) => value,
                    Err(e) => {
                        pricing_error.get_or_insert(e);
                        f64::NAN
                    }
                }
            },
            guess,
            step,
            min,
            max,
            &solver,
        )
        .map_err(|e| e.to_string())
    } else {
        Err(format!("empty search interval [{min}, {max}]"))
    };

    let result = match outcome {
        Ok(result) => result,
        Err(reason) => {
            let reason = pricing_error.map_or(reason, |e| e.to_string());
            let nodes = curve.data()[i.saturating_sub(TRACE_DEPTH)..i].to_vec();
            let instrument = helper.description();
            error!(
                segment = i,
                instrument = %instrument,
                pillar = %pillar,
                guess,
                min,
                max,
                reason = %reason,
                "bootstrap segment failed"
            );
            return Err(CurveError::BootstrapFailed {
                segment: i,
                instrument,
                pillar,
                guess,
                min,
                max,
                trials,
                nodes,
                reason,
            });
        }
    };

    curve.update(i, result.root);
    curve.rebuild()?;
    P::validate_node(i, curve.times(), curve.data(), curve.interpolator()?)
        .map_err(|reason| CurveError::numerical_domain(i, reason))?;

    debug!(
        segment = i,
        pillar = %pillar,
        value = result.root,
        iterations = result.iterations,
        "segment pinned"
    );
    Ok(())
}

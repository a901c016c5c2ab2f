//! Joint calibration of mutually dependent curves.
//!
//! When curve A's helpers price off curve B and B's price off A, no helper
//! ordering makes the node-by-node bootstrap well posed. The
//! [`MultiCurveOptimizer`] instead treats the free nodes of every curve in
//! its group as one vector and minimizes the quote errors of all helpers of
//! all curves at once.
//!
//! ```text
//! x = [ curve 0 free nodes | curve 1 free nodes | ... ]
//!       ^offsets[0]          ^offsets[1]
//! ```
//!
//! Each curve's slice starts after the leading nodes its policy fixes
//! ([`NodeUpdatePolicy::FIXED_NODES`]).
//!
//! [`NodeUpdatePolicy::FIXED_NODES`]: crate::policies::NodeUpdatePolicy::FIXED_NODES

use std::sync::{Arc, Weak};

use nalgebra::DVector;
use parking_lot::{Mutex, ReentrantMutex};
use stratum_math::optimization::{
    Constraint, CostFunction, EndCriteria, EndCriteriaType, LevenbergMarquardt,
    OptimizationMethod, Problem, Simplex,
};
use stratum_math::MathResult;
use tracing::{debug, info, warn};

use crate::config::{JointCalibrationConfig, PenaltyKind, Validate};
use crate::error::{CurveError, CurveResult};

/// Initial simplex edge for the L1 penalty.
const SIMPLEX_LAMBDA: f64 = 0.01;

/// A curve that can take part in a joint calibration.
///
/// Implemented by [`PiecewiseCurve`](crate::piecewise::PiecewiseCurve);
/// the optimizer drives curves only through this interface.
pub trait JointCurve: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> String;

    /// Target quote error of the curve's helpers.
    fn accuracy(&self) -> f64;

    /// Revision of every input of the curve.
    fn revision(&self) -> u64;

    /// Number of helpers, i.e. residuals contributed to the penalty.
    fn instrument_count(&self) -> usize;

    /// Seeds the nodes flat and marks the curve as calibrating.
    ///
    /// Returns the initial values of the free nodes.
    fn initialize_joint(&self) -> CurveResult<Vec<f64>>;

    /// Writes trial values into the free nodes.
    fn set_joint_values(&self, values: &[f64]) -> CurveResult<()>;

    /// Appends the signed quote error of every helper.
    fn joint_quote_errors(&self, errors: &mut Vec<f64>) -> CurveResult<()>;

    /// Records the outcome of a calibration observed at `revision`.
    fn complete_joint(&self, revision: u64, outcome: CurveResult<()>);
}

/// Joint penalty over the concatenated free nodes of a curve group.
struct JointPenalty<'a> {
    curves: &'a [Arc<dyn JointCurve>],
    offsets: &'a [usize],
    instruments: usize,
    kind: PenaltyKind,
}

impl JointPenalty<'_> {
    /// Loads `x` into the curves and collects every quote error.
    ///
    /// A trial point a curve cannot represent (for instance a non-positive
    /// discount factor under log-linear interpolation) yields `None`.
    fn quote_errors(&self, x: &DVector<f64>) -> Option<Vec<f64>> {
        let x = x.as_slice();
        for (k, curve) in self.curves.iter().enumerate() {
            curve
                .set_joint_values(&x[self.offsets[k]..self.offsets[k + 1]])
                .ok()?;
        }
        let mut errors = Vec::with_capacity(self.instruments);
        for curve in self.curves {
            curve.joint_quote_errors(&mut errors).ok()?;
        }
        errors.iter().all(|e| e.is_finite()).then_some(errors)
    }
}

impl CostFunction for JointPenalty<'_> {
    fn values(&self, x: &DVector<f64>) -> MathResult<DVector<f64>> {
        Ok(match self.quote_errors(x) {
            Some(errors) => DVector::from_vec(errors),
            None => DVector::from_element(self.instruments, f64::INFINITY),
        })
    }

    fn value(&self, x: &DVector<f64>) -> MathResult<f64> {
        let errors = self.values(x)?;
        Ok(match self.kind {
            PenaltyKind::LeastSquares => errors.norm_squared(),
            PenaltyKind::AbsoluteSum => errors.iter().map(|e| e.abs()).sum(),
        })
    }
}

/// Calibrates a group of curves simultaneously.
///
/// Curves join the group through
/// [`PiecewiseCurveBuilder::build_joint`](crate::piecewise::PiecewiseCurveBuilder::build_joint)
/// and are held weakly; dropped curves leave the group. All curves of a
/// group share one reentrant guard, so a calibration triggered by any of
/// them runs once for the whole group and blocks other threads until done.
pub struct MultiCurveOptimizer {
    config: JointCalibrationConfig,
    curves: Mutex<Vec<Weak<dyn JointCurve>>>,
    guard: Arc<ReentrantMutex<()>>,
}

impl MultiCurveOptimizer {
    /// Creates an empty calibration group.
    pub fn new(config: JointCalibrationConfig) -> CurveResult<Arc<Self>> {
        config.validate_or_error()?;
        Ok(Arc::new(Self {
            config,
            curves: Mutex::new(Vec::new()),
            guard: Arc::new(ReentrantMutex::new(())),
        }))
    }

    /// The group's configuration.
    pub fn config(&self) -> &JointCalibrationConfig {
        &self.config
    }

    /// Lock shared by every curve of the group.
    pub(crate) fn guard(&self) -> Arc<ReentrantMutex<()>> {
        Arc::clone(&self.guard)
    }

    /// Adds a curve to the group.
    pub fn register(&self, curve: Weak<dyn JointCurve>) {
        self.curves.lock().push(curve);
    }

    /// Number of live curves in the group.
    pub fn curve_count(&self) -> usize {
        self.curves
            .lock()
            .iter()
            .filter(|c| c.strong_count() > 0)
            .count()
    }

    /// Calibrates every live curve of the group.
    ///
    /// Each curve ends up either complete, holding its slice of the
    /// converged vector, or failed with the same error.
    ///
    /// # Errors
    ///
    /// - [`CurveError::CurveDropped`] when no curve is left in the group;
    /// - precondition errors from a curve's helpers;
    /// - [`CurveError::JointCalibrationFailed`] when the optimizer stops for
    ///   any reason other than a stationary penalty.
    pub fn calibrate(&self) -> CurveResult<()> {
        let _lock = self.guard.lock();

        let curves: Vec<Arc<dyn JointCurve>> = {
            let mut registered = self.curves.lock();
            registered.retain(|c| c.strong_count() > 0);
            registered.iter().filter_map(Weak::upgrade).collect()
        };
        if curves.is_empty() {
            return Err(CurveError::CurveDropped);
        }

        let revisions: Vec<u64> = curves.iter().map(|c| c.revision()).collect();
        let outcome = self.run(&curves);
        for (curve, revision) in curves.iter().zip(revisions) {
            curve.complete_joint(revision, outcome.clone());
        }
        outcome
    }

    fn run(&self, curves: &[Arc<dyn JointCurve>]) -> CurveResult<()> {
        let mut offsets = Vec::with_capacity(curves.len() + 1);
        let mut initial = Vec::new();
        for curve in curves {
            offsets.push(initial.len());
            initial.extend(curve.initialize_joint()?);
        }
        offsets.push(initial.len());

        let instruments: usize = curves.iter().map(|c| c.instrument_count()).sum();
        let accuracy = curves
            .iter()
            .map(|c| c.accuracy())
            .fold(f64::INFINITY, f64::min);
        let names: Vec<String> = curves.iter().map(|c| c.name()).collect();

        let penalty = JointPenalty {
            curves,
            offsets: &offsets,
            instruments,
            kind: self.config.penalty,
        };
        let constraint = if self.config.force_positive {
            Constraint::Positive
        } else {
            Constraint::NoConstraint
        };
        let max_iterations = self.config.iterations_per_instrument * instruments;
        let stationary = self.config.max_stationary_iterations;

        let mut problem = Problem::new(&penalty, constraint, DVector::from_vec(initial));
        let end = match self.config.penalty {
            PenaltyKind::LeastSquares => {
                let criteria = EndCriteria::new(max_iterations, stationary, 0.0, accuracy * accuracy, 0.0);
                LevenbergMarquardt::new().minimize(&mut problem, &criteria)?
            }
            PenaltyKind::AbsoluteSum => {
                let criteria = EndCriteria::new(max_iterations, stationary, 0.0, accuracy, 0.0);
                Simplex::new(SIMPLEX_LAMBDA).minimize(&mut problem, &criteria)?
            }
        };

        // Evaluating the best point leaves it loaded in every curve.
        let best = problem.current_value().clone();
        let value = penalty.value(&best)?;
        debug!(
            curves = ?names,
            evaluations = problem.evaluations(),
            penalty = value,
            "joint optimizer stopped"
        );

        if !matches!(
            end,
            EndCriteriaType::StationaryFunctionValue | EndCriteriaType::StationaryFunctionAccuracy
        ) || !value.is_finite()
        {
            warn!(curves = ?names, penalty = value, end_criteria = %end, "joint calibration rejected");
            return Err(CurveError::JointCalibrationFailed {
                penalty: value,
                end_criteria: end,
                curves: names,
            });
        }

        info!(
            curves = ?names,
            instruments,
            penalty = value,
            end_criteria = %end,
            "joint calibration complete"
        );
        Ok(())
    }
}

impl std::fmt::Debug for MultiCurveOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiCurveOptimizer")
            .field("config", &self.config)
            .field("curves", &self.curve_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Two scalar "curves" whose residuals couple them:
    /// `x0 + x1 = 3` and `x0 - x1 = 1`.
    struct Coupled {
        index: usize,
        values: Arc<Mutex<[f64; 2]>>,
        outcome: Mutex<Option<CurveResult<()>>>,
    }

    impl JointCurve for Coupled {
        fn name(&self) -> String {
            format!("coupled {}", self.index)
        }
        fn accuracy(&self) -> f64 {
            1e-10
        }
        fn revision(&self) -> u64 {
            7
        }
        fn instrument_count(&self) -> usize {
            1
        }
        fn initialize_joint(&self) -> CurveResult<Vec<f64>> {
            Ok(vec![1.0])
        }
        fn set_joint_values(&self, values: &[f64]) -> CurveResult<()> {
            self.values.lock()[self.index] = values[0];
            Ok(())
        }
        fn joint_quote_errors(&self, errors: &mut Vec<f64>) -> CurveResult<()> {
            let v = *self.values.lock();
            errors.push(if self.index == 0 { v[0] + v[1] - 3.0 } else { v[0] - v[1] - 1.0 });
            Ok(())
        }
        fn complete_joint(&self, _revision: u64, outcome: CurveResult<()>) {
            *self.outcome.lock() = Some(outcome);
        }
    }

    fn group(config: JointCalibrationConfig) -> (Arc<MultiCurveOptimizer>, Vec<Arc<Coupled>>) {
        let optimizer = MultiCurveOptimizer::new(config).unwrap();
        let values = Arc::new(Mutex::new([0.0; 2]));
        let curves: Vec<Arc<Coupled>> = (0..2)
            .map(|index| {
                Arc::new(Coupled {
                    index,
                    values: Arc::clone(&values),
                    outcome: Mutex::new(None),
                })
            })
            .collect();
        for curve in &curves {
            let weak: Weak<dyn JointCurve> = Arc::downgrade(curve) as Weak<dyn JointCurve>;
            optimizer.register(weak);
        }
        (optimizer, curves)
    }

    #[test]
    fn test_least_squares_solves_coupled_system() {
        let (optimizer, curves) = group(JointCalibrationConfig::default());
        optimizer.calibrate().unwrap();

        let values = *curves[0].values.lock();
        assert_relative_eq!(values[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(values[1], 1.0, epsilon = 1e-9);
        assert!(matches!(*curves[1].outcome.lock(), Some(Ok(()))));
    }

    #[test]
    fn test_absolute_sum_with_simplex() {
        let config = JointCalibrationConfig::default()
            .with_penalty(PenaltyKind::AbsoluteSum)
            .with_iterations_per_instrument(200);
        let (optimizer, curves) = group(config);
        optimizer.calibrate().unwrap();

        let values = *curves[0].values.lock();
        assert!((values[0] + values[1] - 3.0).abs() < 1e-6);
        assert!((values[0] - values[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_budget_failure_is_reported() {
        let config = JointCalibrationConfig::default()
            .with_penalty(PenaltyKind::AbsoluteSum)
            .with_iterations_per_instrument(1);
        let (optimizer, curves) = group(config);
        let err = optimizer.calibrate().unwrap_err();
        match &err {
            CurveError::JointCalibrationFailed {
                end_criteria, curves, ..
            } => {
                assert_eq!(*end_criteria, EndCriteriaType::MaxIterations);
                assert_eq!(curves.len(), 2);
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(matches!(*curves[0].outcome.lock(), Some(Err(_))));
    }

    #[test]
    fn test_dropped_curves_leave_the_group() {
        let (optimizer, curves) = group(JointCalibrationConfig::default());
        assert_eq!(optimizer.curve_count(), 2);
        drop(curves);
        assert_eq!(optimizer.curve_count(), 0);
        assert_eq!(optimizer.calibrate(), Err(CurveError::CurveDropped));
    }
}

//! Default-probability curve policies.

use stratum_math::interpolation::{InterpolationScheme, Interpolator};

use super::{flat_rate, log_slope_extension, positive_floor, DefaultNodePolicy, NodeUpdatePolicy};
use crate::error::CurveResult;
use crate::helpers::DefaultHelper;
use crate::node_curve::NodeCurve;

const MAX_HAZARD: f64 = 3.0;

/// Nodes are hazard rates; `S(t) = exp(-∫h)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HazardRate;

impl NodeUpdatePolicy for HazardRate {
    type Helper = dyn DefaultHelper;

    const NAME: &'static str = "hazard rate";

    fn initial_value() -> f64 {
        0.01
    }

    fn guess(i: usize, _times: &[f64], data: &[f64]) -> Option<f64> {
        (i > 1).then(|| data[i - 1])
    }

    fn min_value_after(_i: usize, _data: &[f64], accuracy: f64) -> f64 {
        positive_floor(accuracy)
    }

    fn max_value_after(_i: usize, _data: &[f64]) -> f64 {
        MAX_HAZARD
    }

    fn update_guess(data: &mut [f64], value: f64, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = value;
        }
    }

    fn validate_node(
        i: usize,
        _times: &[f64],
        data: &[f64],
        _interpolation: &dyn Interpolator,
    ) -> Result<(), String> {
        if data[i] >= 0.0 {
            Ok(())
        } else {
            Err(format!("hazard rate {} is negative", data[i]))
        }
    }

    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64> {
        helper.quote_error(curve)
    }
}

impl DefaultNodePolicy for HazardRate {
    fn survival_probability(interpolation: &dyn Interpolator, t: f64) -> f64 {
        (-interpolation.primitive(t)).exp()
    }

    fn hazard_rate(interpolation: &dyn Interpolator, t: f64) -> f64 {
        interpolation.interpolate(t)
    }
}

/// Nodes are survival probabilities, `data[0] = 1`.
///
/// Beyond the last node the curve continues at the hazard rate of the last
/// segment. Nodes must not increase.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurvivalProbability;

impl NodeUpdatePolicy for SurvivalProbability {
    type Helper = dyn DefaultHelper;

    const NAME: &'static str = "survival probability";

    fn initial_value() -> f64 {
        1.0
    }

    fn initial_guess() -> f64 {
        0.99
    }

    fn guess(i: usize, times: &[f64], data: &[f64]) -> Option<f64> {
        if i <= 1 {
            return None;
        }
        let hazard = flat_rate(data[i - 1], times[i - 1])?;
        Some((-hazard * times[i]).exp())
    }

    fn min_value_after(_i: usize, _data: &[f64], accuracy: f64) -> f64 {
        positive_floor(accuracy)
    }

    fn max_value_after(i: usize, data: &[f64]) -> f64 {
        data[i - 1]
    }

    fn validate_node(
        i: usize,
        _times: &[f64],
        data: &[f64],
        _interpolation: &dyn Interpolator,
    ) -> Result<(), String> {
        if data[i] <= 0.0 {
            return Err(format!("survival probability {} is not positive", data[i]));
        }
        if data[i] > data[i - 1] {
            return Err(format!(
                "survival probability increases from {} to {}",
                data[i - 1],
                data[i]
            ));
        }
        Ok(())
    }

    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64> {
        helper.quote_error(curve)
    }
}

impl DefaultNodePolicy for SurvivalProbability {
    fn survival_probability(interpolation: &dyn Interpolator, t: f64) -> f64 {
        log_slope_extension(interpolation, t)
    }

    fn hazard_rate(interpolation: &dyn Interpolator, t: f64) -> f64 {
        let t = t.min(interpolation.max_x());
        let s = interpolation.interpolate(t);
        if s <= 0.0 {
            return 0.0;
        }
        -interpolation.derivative(t) / s
    }
}

/// Nodes are default densities; `S(t) = 1 - ∫p`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDensity;

impl NodeUpdatePolicy for DefaultDensity {
    type Helper = dyn DefaultHelper;

    const NAME: &'static str = "default density";

    fn initial_value() -> f64 {
        0.01
    }

    fn guess(i: usize, _times: &[f64], data: &[f64]) -> Option<f64> {
        (i > 1).then(|| data[i - 1])
    }

    fn min_value_after(_i: usize, _data: &[f64], accuracy: f64) -> f64 {
        positive_floor(accuracy)
    }

    fn max_value_after(_i: usize, _data: &[f64]) -> f64 {
        MAX_HAZARD
    }

    fn update_guess(data: &mut [f64], value: f64, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = value;
        }
    }

    fn validate_node(
        i: usize,
        times: &[f64],
        data: &[f64],
        interpolation: &dyn Interpolator,
    ) -> Result<(), String> {
        if data[i] < 0.0 {
            return Err(format!("default density {} is negative", data[i]));
        }
        let survival = 1.0 - interpolation.primitive(times[i]);
        if survival <= 0.0 {
            return Err(format!(
                "cumulative default probability reaches {} by t = {}",
                1.0 - survival,
                times[i]
            ));
        }
        Ok(())
    }

    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64> {
        helper.quote_error(curve)
    }
}

impl DefaultNodePolicy for DefaultDensity {
    fn survival_probability(interpolation: &dyn Interpolator, t: f64) -> f64 {
        1.0 - interpolation.primitive(t)
    }

    fn hazard_rate(interpolation: &dyn Interpolator, t: f64) -> f64 {
        let s = Self::survival_probability(interpolation, t);
        if s <= 0.0 {
            return 0.0;
        }
        interpolation.interpolate(t) / s
    }

    fn default_density(interpolation: &dyn Interpolator, t: f64) -> f64 {
        interpolation.interpolate(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stratum_math::interpolation::{BackwardFlat, LogLinear};

    #[test]
    fn test_hazard_rate_survival() {
        let interp = BackwardFlat.interpolate(&[0.0, 1.0, 3.0], &[0.01, 0.01, 0.02]).unwrap();
        assert_relative_eq!(
            HazardRate::survival_probability(interp.as_ref(), 3.0),
            (-0.05_f64).exp(),
            epsilon = 1e-14
        );
        let density = HazardRate::default_density(interp.as_ref(), 2.0);
        assert_relative_eq!(density, 0.02 * (-0.03_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_survival_monotonicity_is_checked() {
        let times = [0.0, 1.0, 2.0];
        let interp = LogLinear.interpolate(&times, &[1.0, 0.98, 0.99]).unwrap();
        assert!(SurvivalProbability::validate_node(1, &times, &[1.0, 0.98, 0.99], interp.as_ref()).is_ok());
        let err = SurvivalProbability::validate_node(2, &times, &[1.0, 0.98, 0.99], interp.as_ref())
            .unwrap_err();
        assert!(err.contains("increases"));
        assert_eq!(SurvivalProbability::max_value_after(2, &[1.0, 0.98, 0.99]), 0.98);
    }

    #[test]
    fn test_survival_flat_hazard_tail() {
        let s1 = (-0.02_f64).exp();
        let interp = LogLinear.interpolate(&[0.0, 1.0], &[1.0, s1]).unwrap();
        assert_relative_eq!(SurvivalProbability::hazard_rate(interp.as_ref(), 0.5), 0.02, epsilon = 1e-12);
        assert_relative_eq!(SurvivalProbability::hazard_rate(interp.as_ref(), 5.0), 0.02, epsilon = 1e-12);
        assert_relative_eq!(
            SurvivalProbability::survival_probability(interp.as_ref(), 4.0),
            (-0.08_f64).exp(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            SurvivalProbability::guess(2, &[0.0, 1.0, 2.0], &[1.0, s1, 1.0]).unwrap(),
            (-0.04_f64).exp(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_default_density_survival() {
        let times = [0.0, 1.0, 2.0];
        let data = [0.02, 0.02, 0.03];
        let interp = BackwardFlat.interpolate(&times, &data).unwrap();
        assert_relative_eq!(DefaultDensity::survival_probability(interp.as_ref(), 2.0), 0.95, epsilon = 1e-14);
        assert_relative_eq!(DefaultDensity::hazard_rate(interp.as_ref(), 2.0), 0.03 / 0.95, epsilon = 1e-14);
        assert!(DefaultDensity::validate_node(2, &times, &data, interp.as_ref()).is_ok());

        let heavy = [0.9, 0.9, 0.9];
        let interp = BackwardFlat.interpolate(&times, &heavy).unwrap();
        assert!(DefaultDensity::validate_node(2, &times, &heavy, interp.as_ref()).is_err());
    }
}

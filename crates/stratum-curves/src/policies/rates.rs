//! Yield curve policies.

use stratum_math::interpolation::{InterpolationScheme, Interpolator};

use super::{flat_rate, log_slope_extension, positive_floor, NodeUpdatePolicy, YieldNodePolicy};
use crate::error::CurveResult;
use crate::helpers::RateHelper;
use crate::node_curve::NodeCurve;

/// Bounds for rate-valued nodes.
const MIN_RATE: f64 = -1.0;
const MAX_RATE: f64 = 3.0;

/// Nodes are discount factors, `data[0] = 1`.
///
/// Beyond the last node the curve continues at the instantaneous forward
/// of the last segment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discount;

impl NodeUpdatePolicy for Discount {
    type Helper = dyn RateHelper;

    const NAME: &'static str = "discount";

    fn initial_value() -> f64 {
        1.0
    }

    fn initial_guess() -> f64 {
        0.9
    }

    fn guess(i: usize, times: &[f64], data: &[f64]) -> Option<f64> {
        if i <= 1 {
            return None;
        }
        let rate = flat_rate(data[i - 1], times[i - 1])?;
        Some((-rate * times[i]).exp())
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
        if data[i] > 0.0 {
            Ok(())
        } else {
            Err(format!("discount factor {} is not positive", data[i]))
        }
    }

    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64> {
        helper.quote_error(curve)
    }
}

impl YieldNodePolicy for Discount {
    fn discount(interpolation: &dyn Interpolator, t: f64) -> f64 {
        log_slope_extension(interpolation, t)
    }
}

/// Nodes are continuously compounded zero rates.
///
/// Solving node 1 also moves the reference node, so the short end stays
/// flat at the first solved rate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroYield;

impl NodeUpdatePolicy for ZeroYield {
    type Helper = dyn RateHelper;

    const NAME: &'static str = "zero yield";

    fn initial_value() -> f64 {
        0.05
    }

    fn guess(i: usize, _times: &[f64], data: &[f64]) -> Option<f64> {
        (i > 1).then(|| data[i - 1])
    }

    fn min_value_after(_i: usize, _data: &[f64], _accuracy: f64) -> f64 {
        MIN_RATE
    }

    fn max_value_after(_i: usize, _data: &[f64]) -> f64 {
        MAX_RATE
    }

    fn update_guess(data: &mut [f64], value: f64, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = value;
        }
    }

    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64> {
        helper.quote_error(curve)
    }
}

impl YieldNodePolicy for ZeroYield {
    fn discount(interpolation: &dyn Interpolator, t: f64) -> f64 {
        (-interpolation.interpolate(t) * t).exp()
    }
}

/// Nodes are instantaneous forward rates; with backward-flat
/// interpolation this is the piecewise flat forward curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardRate;

impl NodeUpdatePolicy for ForwardRate {
    type Helper = dyn RateHelper;

    const NAME: &'static str = "forward rate";

    fn initial_value() -> f64 {
        0.05
    }

    fn guess(i: usize, _times: &[f64], data: &[f64]) -> Option<f64> {
        (i > 1).then(|| data[i - 1])
    }

    fn min_value_after(_i: usize, _data: &[f64], _accuracy: f64) -> f64 {
        MIN_RATE
    }

    fn max_value_after(_i: usize, _data: &[f64]) -> f64 {
        MAX_RATE
    }

    fn update_guess(data: &mut [f64], value: f64, i: usize) {
        data[i] = value;
        if i == 1 {
            data[0] = value;
        }
    }

    fn quote_error<I: InterpolationScheme>(
        helper: &Self::Helper,
        curve: &NodeCurve<Self, I>,
    ) -> CurveResult<f64> {
        helper.quote_error(curve)
    }
}

impl YieldNodePolicy for ForwardRate {
    fn discount(interpolation: &dyn Interpolator, t: f64) -> f64 {
        (-interpolation.primitive(t)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use stratum_math::interpolation::{BackwardFlat, Linear, LogLinear};

    #[test]
    fn test_discount_guess_extrapolates_flat_rate() {
        let times = [0.0, 1.0, 2.0];
        let data = [1.0, (-0.04_f64).exp(), 1.0];
        assert_eq!(Discount::guess(1, &times, &data), None);
        assert_relative_eq!(
            Discount::guess(2, &times, &data).unwrap(),
            (-0.08_f64).exp(),
            epsilon = 1e-14
        );
        assert_eq!(Discount::max_value_after(2, &data), data[1]);
        assert_relative_eq!(Discount::min_value_after(2, &data, 1e-12), 1e-15);
    }

    #[test]
    fn test_discount_extrapolates_last_forward() {
        let interp = LogLinear.interpolate(&[0.0, 1.0, 2.0], &[1.0, 0.97, 0.93]).unwrap();
        let forward = (0.97_f64 / 0.93).ln();
        assert_relative_eq!(Discount::discount(interp.as_ref(), 1.5), (0.97_f64 * 0.93).sqrt(), epsilon = 1e-14);
        assert_relative_eq!(
            Discount::discount(interp.as_ref(), 3.0),
            0.93 * (-forward).exp(),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_discount_rejects_non_positive_node() {
        let interp = Linear.interpolate(&[0.0, 1.0], &[1.0, 0.9]).unwrap();
        assert!(Discount::validate_node(1, &[0.0, 1.0], &[1.0, 0.9], interp.as_ref()).is_ok());
        assert!(Discount::validate_node(1, &[0.0, 1.0], &[1.0, -0.1], interp.as_ref()).is_err());
    }

    #[test]
    fn test_zero_yield_moves_reference_node() {
        let mut data = [0.05, 0.05, 0.05];
        ZeroYield::update_guess(&mut data, 0.03, 1);
        assert_eq!(data, [0.03, 0.03, 0.05]);
        ZeroYield::update_guess(&mut data, 0.04, 2);
        assert_eq!(data, [0.03, 0.03, 0.04]);

        let interp = Linear.interpolate(&[0.0, 1.0, 2.0], &data).unwrap();
        assert_relative_eq!(ZeroYield::discount(interp.as_ref(), 2.0), (-0.08_f64).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_forward_rate_integrates_forwards() {
        let interp = BackwardFlat.interpolate(&[0.0, 1.0, 2.0], &[0.02, 0.02, 0.04]).unwrap();
        assert_relative_eq!(ForwardRate::discount(interp.as_ref(), 2.0), (-0.06_f64).exp(), epsilon = 1e-14);
        assert_relative_eq!(ForwardRate::discount(interp.as_ref(), 3.0), (-0.10_f64).exp(), epsilon = 1e-14);
        assert_eq!(ForwardRate::guess(3, &[0.0, 1.0, 2.0, 3.0], &[0.02, 0.02, 0.04, 0.05]), Some(0.04));
    }
}

//! Property tests for the root finders and interpolators.

use proptest::prelude::*;
use stratum_math::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn bracketed_solver_recovers_discount_factor(rate in -0.01f64..0.15, tau in 0.05f64..5.0) {
        let target = 1.0 / (1.0 + rate * tau);
        let f = |df: f64| (1.0 / df - 1.0) / tau - rate;
        let config = SolverConfig::new(1e-13, 100);
        let result = solve_bracketed(f, 0.9, 0.009, 1e-6, 2.0, &config).unwrap();
        prop_assert!(f(result.root).abs() <= 1e-13);
        prop_assert!((result.root - target).abs() < 1e-10);
    }

    #[test]
    fn brent_residual_within_tolerance(shift in -0.9f64..0.9) {
        let f = |x: f64| x.powi(3) + x - shift;
        let config = SolverConfig::new(1e-14, 100);
        let result = brent(f, -1.0, 1.0, &config).unwrap();
        prop_assert!(f(result.root).abs() <= 1e-14);
    }

    #[test]
    fn log_linear_stays_between_neighbours(
        d1 in 0.5f64..1.0,
        d2 in 0.5f64..1.0,
        x in 0.0f64..1.0,
    ) {
        let interp = LogLinear.interpolate(&[0.0, 1.0], &[d1, d2]).unwrap();
        let y = interp.interpolate(x);
        prop_assert!(y >= d1.min(d2) - 1e-15 && y <= d1.max(d2) + 1e-15);
    }

    #[test]
    fn primitive_derivative_is_value(
        ys in prop::collection::vec(0.0f64..0.1, 4),
        x in 0.01f64..2.99,
    ) {
        let xs = [0.0, 1.0, 2.0, 3.0];
        for interp in [
            Linear.interpolate(&xs, &ys).unwrap(),
            Cubic.interpolate(&xs, &ys).unwrap(),
        ] {
            let h = 1e-6;
            let numeric = (interp.primitive(x + h) - interp.primitive(x - h)) / (2.0 * h);
            prop_assert!((numeric - interp.interpolate(x)).abs() < 1e-6);
        }
    }
}

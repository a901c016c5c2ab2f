//! Integration tests: credit curves bootstrapped from CDS spreads.

use std::sync::Arc;

use stratum_core::quotes::SimpleQuote;
use stratum_core::types::{Date, Period};
use stratum_curves::prelude::*;
use stratum_math::interpolation::{BackwardFlat, Linear, LogLinear};

const RECOVERY: f64 = 0.4;

fn today() -> Date {
    Date::from_ymd(2025, 3, 20).unwrap()
}

fn discount_curve() -> Arc<dyn YieldCurve> {
    let helpers: Vec<Arc<dyn RateHelper>> = vec![
        Arc::new(DepositRateHelper::from_tenor(SimpleQuote::new(0.030), today(), Period::months(6)).unwrap()),
        Arc::new(SwapRateHelper::from_tenor(SimpleQuote::new(0.032), today(), Period::years(2)).unwrap()),
        Arc::new(SwapRateHelper::from_tenor(SimpleQuote::new(0.034), today(), Period::years(5)).unwrap()),
        Arc::new(SwapRateHelper::from_tenor(SimpleQuote::new(0.036), today(), Period::years(10)).unwrap()),
    ];
    Arc::new(
        DiscountCurve::<LogLinear>::builder(today())
            .with_name("USD")
            .add_helpers(helpers)
            .build()
            .unwrap(),
    )
}

fn cds_helpers(spreads: &[(f64, i32)], discount: &Arc<dyn YieldCurve>) -> Vec<Arc<dyn DefaultHelper>> {
    spreads
        .iter()
        .map(|&(spread, years)| {
            let helper = CdsHelper::from_tenor(
                SimpleQuote::new(spread),
                today(),
                Period::years(years),
                RECOVERY,
                Arc::clone(discount),
            )
            .unwrap();
            Arc::new(helper) as Arc<dyn DefaultHelper>
        })
        .collect()
}

#[test]
fn upward_spreads_give_decreasing_survival() {
    let discount = discount_curve();
    let curve = SurvivalProbabilityCurve::<LogLinear>::builder(today())
        .add_helpers(cds_helpers(&[(0.0100, 1), (0.0150, 3), (0.0200, 5)], &discount))
        .build()
        .unwrap();

    let data = curve.data().unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data[0], 1.0);
    assert!(data.windows(2).all(|w| w[1] < w[0]), "{data:?}");
    assert!(data.iter().all(|&s| s > 0.0));

    let report = curve.repricing_report().unwrap();
    assert!(report.is_valid(), "{report}");

    // Steeper spreads imply a rising hazard.
    let short = curve.hazard_rate(0.5).unwrap();
    let long = curve.hazard_rate(4.0).unwrap();
    assert!(long > short, "{short} vs {long}");

    // Credit triangle: a 1Y hazard close to spread / (1 - R).
    let implied = -data[1].ln() / curve.times().unwrap()[1];
    assert!((implied - 0.0100 / (1.0 - RECOVERY)).abs() < 2e-3, "{implied}");

    let t = 2.5;
    let s = curve.survival_probability(t).unwrap();
    assert!((curve.default_probability(t).unwrap() - (1.0 - s)).abs() < 1e-14);
}

#[test]
fn inverted_spreads_that_need_negative_hazard_fail() {
    let discount = discount_curve();
    let curve = SurvivalProbabilityCurve::<LogLinear>::builder(today())
        .add_helpers(cds_helpers(&[(0.0300, 1), (0.0050, 3)], &discount))
        .build()
        .unwrap();

    let err = curve.data().unwrap_err();
    assert!(
        matches!(
            err,
            CurveError::BootstrapFailed { segment: 2, .. } | CurveError::NumericalDomain { .. }
        ),
        "{err}"
    );
    assert!(!err.is_precondition());
    assert_eq!(curve.state(), BootstrapState::Failed);
}

#[test]
fn flat_hazard_curve_is_positive_and_reprices() {
    let discount = discount_curve();
    let curve = HazardRateCurve::<BackwardFlat>::builder(today())
        .add_helpers(cds_helpers(&[(0.0100, 1), (0.0150, 3), (0.0200, 5), (0.0220, 7)], &discount))
        .build()
        .unwrap();

    let data = curve.data().unwrap();
    assert_eq!(data.len(), 5);
    assert!(data.iter().all(|&h| h > 0.0), "{data:?}");
    assert_eq!(data[0], data[1]);
    assert!(curve.repricing_report().unwrap().is_valid());

    let times = curve.times().unwrap();
    let mid = 0.5 * (times[2] + times[3]);
    assert!((curve.hazard_rate(mid).unwrap() - data[3]).abs() < 1e-12);
}

#[test]
fn discount_quote_change_reaches_the_credit_curve() {
    let usd_quote = SimpleQuote::new(0.034);
    let discount: Arc<dyn YieldCurve> = Arc::new(
        DiscountCurve::<LogLinear>::builder(today())
            .add_helper(Arc::new(
                DepositRateHelper::from_tenor(SimpleQuote::new(0.030), today(), Period::months(6)).unwrap(),
            ))
            .add_helper(Arc::new(
                SwapRateHelper::from_tenor(usd_quote.clone(), today(), Period::years(5)).unwrap(),
            ))
            .build()
            .unwrap(),
    );
    let curve = SurvivalProbabilityCurve::<LogLinear>::builder(today())
        .add_helpers(cds_helpers(&[(0.0100, 1), (0.0150, 3)], &discount))
        .build()
        .unwrap();

    let before = curve.data().unwrap();
    let revision = curve.input_revision();
    usd_quote.set_value(0.060);
    assert!(curve.input_revision() > revision);

    let after = curve.data().unwrap();
    assert!(after.iter().zip(&before).skip(1).any(|(a, b)| a != b));
    assert!(curve.repricing_report().unwrap().is_valid());
}

#[test]
fn default_density_curve_reprices() {
    let discount = discount_curve();
    let curve = DefaultDensityCurve::<Linear>::builder(today())
        .add_helpers(cds_helpers(&[(0.0100, 1), (0.0150, 3), (0.0200, 5)], &discount))
        .build()
        .unwrap();

    let data = curve.data().unwrap();
    assert_eq!(data.len(), 4);
    assert_eq!(data[0], data[1]);
    assert!(data.iter().all(|&d| d > 0.0), "{data:?}");
    let report = curve.repricing_report().unwrap();
    assert!(report.is_valid(), "{report}");

    let survival: Vec<f64> = curve
        .times()
        .unwrap()
        .iter()
        .map(|&t| curve.survival_probability(t).unwrap())
        .collect();
    assert_eq!(survival[0], 1.0);
    assert!(survival.windows(2).all(|w| w[1] < w[0]), "{survival:?}");

    let t = 2.0;
    let hazard = curve.hazard_rate(t).unwrap();
    let density = curve.default_density(t).unwrap();
    assert!((density - hazard * curve.survival_probability(t).unwrap()).abs() < 1e-10);
}

#[test]
fn joint_hazard_curve_agrees_with_its_bootstrap() {
    let discount = discount_curve();
    let helpers = cds_helpers(&[(0.0100, 1), (0.0150, 3), (0.0200, 5)], &discount);
    let config = BootstrapConfig::default().with_accuracy(1e-10);

    let single = HazardRateCurve::<BackwardFlat>::builder(today())
        .with_config(config)
        .add_helpers(helpers.clone())
        .build()
        .unwrap();
    let optimizer = MultiCurveOptimizer::new(JointCalibrationConfig::default()).unwrap();
    let joint = HazardRateCurve::<BackwardFlat>::builder(today())
        .with_config(config)
        .add_helpers(helpers)
        .build_joint(&optimizer)
        .unwrap();

    let single_nodes = single.data().unwrap();
    let joint_nodes = joint.data().unwrap();
    assert_eq!(joint_nodes[0], joint_nodes[1]);
    for (s, j) in single_nodes.iter().zip(&joint_nodes) {
        assert!((s - j).abs() < 1e-5, "{single_nodes:?} vs {joint_nodes:?}");
    }
    assert!(joint.repricing_report().unwrap().is_valid());

    // Before the first pillar both curves carry the 1Y hazard.
    let early = 0.1;
    assert!((single.hazard_rate(early).unwrap() - joint.hazard_rate(early).unwrap()).abs() < 1e-5);
    assert!((single.survival_probability(0.5).unwrap() - joint.survival_probability(0.5).unwrap()).abs() < 1e-6);
}

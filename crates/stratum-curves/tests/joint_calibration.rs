//! Integration tests: joint calibration of two curves that discount off
//! each other.
//!
//! | Curve | Helpers | Discounted on |
//! |-------|---------|---------------|
//! | A | deposit 6M, OIS 1Y, OIS 2Y, OIS 3Y | B (OIS) |
//! | B | deposit 6M, swap 1Y, swap 2Y, swap 3Y | A (swaps) |
//!
//! Neither curve can be bootstrapped alone: each needs the other's
//! discount factors before its own swaps can be priced.

use std::sync::Arc;

use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::SimpleQuote;
use stratum_core::types::{Compounding, Date, Period};
use stratum_curves::prelude::*;
use stratum_math::interpolation::{Linear, LogLinear};
use stratum_math::optimization::EndCriteriaType;

const ACCURACY: f64 = 1e-8;

fn today() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

struct Group {
    optimizer: Arc<MultiCurveOptimizer>,
    a: Arc<DiscountCurve<LogLinear>>,
    b: Arc<DiscountCurve<LogLinear>>,
    b_quote: Arc<SimpleQuote>,
}

fn build_group(config: JointCalibrationConfig) -> Group {
    let optimizer = MultiCurveOptimizer::new(config).unwrap();
    let link_a = RelinkableCurve::new(today(), DayCountConvention::Act365Fixed);
    let link_b = RelinkableCurve::new(today(), DayCountConvention::Act365Fixed);
    let curve_config = BootstrapConfig::default().with_accuracy(ACCURACY);

    let mut a_helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
        DepositRateHelper::from_tenor(SimpleQuote::new(0.0300), today(), Period::months(6)).unwrap(),
    )];
    for (rate, years) in [(0.0310, 1), (0.0320, 2), (0.0330, 3)] {
        let helper = OisRateHelper::from_tenor(SimpleQuote::new(rate), today(), Period::years(years))
            .unwrap()
            .with_discount_curve(link_b.clone());
        a_helpers.push(Arc::new(helper));
    }

    let b_quote = SimpleQuote::new(0.0370);
    let mut b_helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
        DepositRateHelper::from_tenor(SimpleQuote::new(0.0350), today(), Period::months(6)).unwrap(),
    )];
    for (quote, years) in [(SimpleQuote::new(0.0360), 1), (b_quote.clone(), 2), (SimpleQuote::new(0.0380), 3)] {
        let helper = SwapRateHelper::from_tenor(quote, today(), Period::years(years))
            .unwrap()
            .with_discount_curve(link_a.clone());
        b_helpers.push(Arc::new(helper));
    }

    let a = DiscountCurve::<LogLinear>::builder(today())
        .with_name("A")
        .with_config(curve_config)
        .add_helpers(a_helpers)
        .build_joint(&optimizer)
        .unwrap();
    let b = DiscountCurve::<LogLinear>::builder(today())
        .with_name("B")
        .with_config(curve_config)
        .add_helpers(b_helpers)
        .build_joint(&optimizer)
        .unwrap();
    link_a.link_to(&a);
    link_b.link_to(&b);

    Group {
        optimizer,
        a,
        b,
        b_quote,
    }
}

#[test]
fn cross_referencing_curves_converge_together() {
    let group = build_group(JointCalibrationConfig::default());
    assert_eq!(group.optimizer.curve_count(), 2);
    assert!(group.a.is_joint());
    assert_eq!(group.a.state(), BootstrapState::Uninitialized);

    // Reading one curve calibrates the whole group.
    let a_nodes = group.a.data().unwrap();
    assert_eq!(group.a.state(), BootstrapState::Complete);
    assert_eq!(group.b.state(), BootstrapState::Complete);

    let b_nodes = group.b.data().unwrap();
    assert_eq!(a_nodes.len(), 5);
    assert_eq!(b_nodes.len(), 5);
    assert_eq!(a_nodes[0], 1.0);
    assert!(a_nodes.windows(2).all(|w| w[1] < w[0]));
    assert!(b_nodes.windows(2).all(|w| w[1] < w[0]));

    for curve in [&group.a, &group.b] {
        let report = curve.repricing_report().unwrap();
        assert!(report.is_valid(), "{report}");
        assert!(report.max_error() <= ACCURACY);
    }
}

#[test]
fn quote_change_recalibrates_the_group() {
    let group = build_group(JointCalibrationConfig::default());
    let a_before = group.a.data().unwrap();
    let b_before = group.b.data().unwrap();

    group.b_quote.set_value(0.0400);
    // A discounts its OIS on B, so A is stale too.
    let a_after = group.a.data().unwrap();
    let b_after = group.b.data().unwrap();

    assert!((b_after[3] - b_before[3]).abs() > 1e-4);
    assert!(a_after.iter().zip(&a_before).any(|(x, y)| x != y));
    assert!(group.b.repricing_report().unwrap().is_valid());
}

#[test]
fn exhausted_budget_fails_every_curve() {
    let config = JointCalibrationConfig::default()
        .with_penalty(PenaltyKind::AbsoluteSum)
        .with_iterations_per_instrument(1);
    let group = build_group(config);

    let err = group.a.data().unwrap_err();
    match &err {
        CurveError::JointCalibrationFailed {
            end_criteria,
            curves,
            penalty,
        } => {
            assert_eq!(*end_criteria, EndCriteriaType::MaxIterations);
            assert_eq!(curves, &vec!["A".to_string(), "B".to_string()]);
            assert!(*penalty > 0.0);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(group.b.state(), BootstrapState::Failed);
    assert_eq!(group.b.discount_factor(1.0).unwrap_err(), err);
}

#[test]
fn joint_zero_curve_agrees_with_its_bootstrap() {
    let helpers: Vec<Arc<dyn RateHelper>> = vec![
        Arc::new(DepositRateHelper::from_tenor(SimpleQuote::new(0.0200), today(), Period::months(3)).unwrap()),
        Arc::new(SwapRateHelper::from_tenor(SimpleQuote::new(0.0220), today(), Period::years(2)).unwrap()),
        Arc::new(SwapRateHelper::from_tenor(SimpleQuote::new(0.0250), today(), Period::years(5)).unwrap()),
    ];
    let config = BootstrapConfig::default().with_accuracy(ACCURACY);

    let single = ZeroYieldCurve::<Linear>::builder(today())
        .with_config(config)
        .add_helpers(helpers.clone())
        .build()
        .unwrap();
    let optimizer = MultiCurveOptimizer::new(JointCalibrationConfig::default()).unwrap();
    let joint = ZeroYieldCurve::<Linear>::builder(today())
        .with_config(config)
        .add_helpers(helpers)
        .build_joint(&optimizer)
        .unwrap();

    let single_nodes = single.data().unwrap();
    let joint_nodes = joint.data().unwrap();
    assert_eq!(joint_nodes.len(), 4);
    // The short end follows the first pillar, not the starting seed.
    assert_eq!(joint_nodes[0], joint_nodes[1]);
    for (s, j) in single_nodes.iter().zip(&joint_nodes) {
        assert!((s - j).abs() < 1e-6, "{single_nodes:?} vs {joint_nodes:?}");
    }

    let one_month = today().add_months(1).unwrap();
    let single_short = single.zero_rate_at(one_month, Compounding::Continuous).unwrap();
    let joint_short = joint.zero_rate_at(one_month, Compounding::Continuous).unwrap();
    assert!((single_short - joint_short).abs() < 1e-6, "{single_short} vs {joint_short}");
    assert!(joint.repricing_report().unwrap().is_valid());
}

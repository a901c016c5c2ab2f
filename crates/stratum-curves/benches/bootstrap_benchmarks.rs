//! Benchmarks for curve bootstrapping.
//!
//! Run with: cargo bench -p stratum-curves

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::SimpleQuote;
use stratum_core::types::{Date, Period};
use stratum_curves::prelude::*;
use stratum_math::interpolation::{Cubic, Linear, LogLinear};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn today() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

fn create_market(swap_years: &[i32]) -> Vec<Arc<dyn RateHelper>> {
    let mut helpers: Vec<Arc<dyn RateHelper>> = [(0.0400, 1), (0.0410, 3), (0.0420, 6)]
        .into_iter()
        .map(|(rate, months)| {
            Arc::new(
                DepositRateHelper::from_tenor(SimpleQuote::new(rate), today(), Period::months(months)).unwrap(),
            ) as Arc<dyn RateHelper>
        })
        .collect();
    for (k, &years) in swap_years.iter().enumerate() {
        let rate = 0.0430 + 0.0005 * k as f64;
        helpers.push(Arc::new(
            SwapRateHelper::from_tenor(SimpleQuote::new(rate), today(), Period::years(years)).unwrap(),
        ));
    }
    helpers
}

const SWAP_YEARS: [i32; 9] = [1, 2, 3, 5, 7, 10, 15, 20, 30];

// =============================================================================
// SINGLE-CURVE BOOTSTRAP
// =============================================================================

fn bench_policies(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_policy");
    group.sample_size(30);

    group.bench_function("discount_loglinear", |b| {
        b.iter(|| {
            let curve = DiscountCurve::<LogLinear>::builder(today())
                .add_helpers(create_market(&SWAP_YEARS))
                .build()
                .unwrap();
            black_box(curve.data().unwrap())
        })
    });

    group.bench_function("zero_linear", |b| {
        b.iter(|| {
            let curve = ZeroYieldCurve::<Linear>::builder(today())
                .add_helpers(create_market(&SWAP_YEARS))
                .build()
                .unwrap();
            black_box(curve.data().unwrap())
        })
    });

    group.bench_function("flat_forward", |b| {
        b.iter(|| {
            let curve = FlatForwardCurve::builder(today())
                .add_helpers(create_market(&SWAP_YEARS))
                .build()
                .unwrap();
            black_box(curve.data().unwrap())
        })
    });

    group.bench_function("discount_cubic", |b| {
        b.iter(|| {
            let curve = DiscountCurve::<Cubic>::builder(today())
                .add_helpers(create_market(&SWAP_YEARS))
                .build()
                .unwrap();
            black_box(curve.data().unwrap())
        })
    });

    group.finish();
}

fn bench_curve_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("bootstrap_size");
    group.sample_size(30);

    for count in [3usize, 6, 9] {
        let years = &SWAP_YEARS[..count];
        group.bench_with_input(BenchmarkId::from_parameter(count + 3), &years, |b, years| {
            b.iter(|| {
                let curve = DiscountCurve::<LogLinear>::builder(today())
                    .add_helpers(create_market(years))
                    .build()
                    .unwrap();
                black_box(curve.data().unwrap())
            })
        });
    }

    group.finish();
}

// =============================================================================
// LAZY RECALCULATION
// =============================================================================

fn bench_recalculation(c: &mut Criterion) {
    let mut group = c.benchmark_group("recalculation");

    let quote = SimpleQuote::new(0.0420);
    let mut helpers = create_market(&SWAP_YEARS[1..]);
    helpers[2] = Arc::new(DepositRateHelper::from_tenor(quote.clone(), today(), Period::months(6)).unwrap());
    let curve = DiscountCurve::<LogLinear>::builder(today())
        .add_helpers(helpers)
        .build()
        .unwrap();

    group.bench_function("cached_read", |b| {
        curve.data().unwrap();
        b.iter(|| black_box(curve.discount_factor(black_box(4.5)).unwrap()))
    });

    group.bench_function("quote_change", |b| {
        let mut bump = 0.0;
        b.iter(|| {
            bump = if bump == 0.0 { 1e-4 } else { 0.0 };
            quote.set_value(0.0420 + bump);
            black_box(curve.discount_factor(4.5).unwrap())
        })
    });

    group.finish();
}

// =============================================================================
// JOINT CALIBRATION
// =============================================================================

fn bench_joint(c: &mut Criterion) {
    let mut group = c.benchmark_group("joint_calibration");
    group.sample_size(10);

    group.bench_function("two_curves", |b| {
        b.iter(|| {
            let optimizer = MultiCurveOptimizer::new(JointCalibrationConfig::default()).unwrap();
            let link_a = RelinkableCurve::new(today(), DayCountConvention::Act365Fixed);
            let link_b = RelinkableCurve::new(today(), DayCountConvention::Act365Fixed);

            let side = |base: f64, link: &Arc<RelinkableCurve>| {
                let mut helpers: Vec<Arc<dyn RateHelper>> = vec![Arc::new(
                    DepositRateHelper::from_tenor(SimpleQuote::new(base), today(), Period::months(6)).unwrap(),
                )];
                for years in 1..=3 {
                    let helper = SwapRateHelper::from_tenor(
                        SimpleQuote::new(base + 0.001 * f64::from(years)),
                        today(),
                        Period::years(years),
                    )
                    .unwrap()
                    .with_discount_curve(link.clone());
                    helpers.push(Arc::new(helper));
                }
                helpers
            };

            let a = DiscountCurve::<LogLinear>::builder(today())
                .add_helpers(side(0.030, &link_b))
                .build_joint(&optimizer)
                .unwrap();
            let b_curve = DiscountCurve::<LogLinear>::builder(today())
                .add_helpers(side(0.035, &link_a))
                .build_joint(&optimizer)
                .unwrap();
            link_a.link_to(&a);
            link_b.link_to(&b_curve);
            black_box(a.data().unwrap())
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_policies,
    bench_curve_size,
    bench_recalculation,
    bench_joint,
);

criterion_main!(benches);

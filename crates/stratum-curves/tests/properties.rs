//! Property tests for the single-curve bootstrap.

use std::sync::Arc;

use proptest::prelude::*;
use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::SimpleQuote;
use stratum_core::types::{Date, Period};
use stratum_curves::prelude::*;
use stratum_math::interpolation::{Linear, LogLinear};

const TENORS: [Period; 4] = [
    Period::months(1),
    Period::months(3),
    Period::months(6),
    Period::years(1),
];

fn today() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

fn deposits(rates: &[f64]) -> Vec<Arc<dyn RateHelper>> {
    rates
        .iter()
        .zip(TENORS)
        .map(|(&rate, tenor)| {
            Arc::new(DepositRateHelper::from_tenor(SimpleQuote::new(rate), today(), tenor).unwrap())
                as Arc<dyn RateHelper>
        })
        .collect()
}

fn rates_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.001f64..0.10, TENORS.len())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deposits_reprice_to_accuracy(rates in rates_strategy()) {
        let curve = ZeroYieldCurve::<Linear>::builder(today())
            .add_helpers(deposits(&rates))
            .build()
            .unwrap();

        let report = curve.repricing_report().unwrap();
        prop_assert!(report.is_valid(), "{}", report);
        prop_assert!(report.max_error() <= curve.config().accuracy);

        // A simple deposit pins its pillar discount factor.
        for (date, rate) in curve.dates().unwrap().into_iter().skip(1).zip(&rates) {
            let tau = DayCountConvention::Act360.year_fraction(today(), date);
            let expected = 1.0 / (1.0 + rate * tau);
            prop_assert!((curve.discount_factor_at(date).unwrap() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn upward_deposits_give_decreasing_discount_factors(mut rates in rates_strategy()) {
        rates.sort_by(f64::total_cmp);
        let curve = DiscountCurve::<LogLinear>::builder(today())
            .add_helpers(deposits(&rates))
            .build()
            .unwrap();

        let data = curve.data().unwrap();
        prop_assert_eq!(data[0], 1.0);
        prop_assert!(data.windows(2).all(|w| w[1] < w[0]), "{:?}", data);
    }

    #[test]
    fn bootstrap_is_deterministic(rates in rates_strategy()) {
        let build = || {
            ZeroYieldCurve::<Linear>::builder(today())
                .add_helpers(deposits(&rates))
                .build()
                .unwrap()
                .data()
                .unwrap()
        };
        prop_assert_eq!(build(), build());
    }
}

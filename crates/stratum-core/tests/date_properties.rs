//! Property tests for date arithmetic and day counts.

use proptest::prelude::*;
use stratum_core::prelude::*;

fn date_strategy() -> impl Strategy<Value = Date> {
    (2000i32..2080i32, 1u32..13u32, 1u32..29u32)
        .prop_filter_map("valid date", |(y, m, d)| Date::from_ymd(y, m, d).ok())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn year_fraction_sign_follows_date_order(start in date_strategy(), end in date_strategy()) {
        for convention in DayCountConvention::all() {
            let yf = convention.year_fraction(start, end);
            if start < end {
                prop_assert!(yf > 0.0, "{} {} {} {}", convention, start, end, yf);
            } else if start == end {
                prop_assert_eq!(yf, 0.0);
            }
        }
    }

    #[test]
    fn act360_over_act365_is_constant(start in date_strategy(), end in date_strategy()) {
        prop_assume!(start != end);
        let ratio = DayCountConvention::Act360.year_fraction(start, end)
            / DayCountConvention::Act365Fixed.year_fraction(start, end);
        prop_assert!((ratio - 365.0 / 360.0).abs() < 1e-12);
    }

    #[test]
    fn month_advance_is_monotone(date in date_strategy(), months in 1i32..360) {
        let later = date.advance(Period::months(months)).unwrap();
        prop_assert!(later > date);
        let total = (later.year() - date.year()) * 12 + later.month() as i32 - date.month() as i32;
        prop_assert_eq!(total, months);
    }
}

//! Credit default swap helper.

use std::sync::Arc;

use stratum_core::daycounts::DayCountConvention;
use stratum_core::quotes::QuoteHandle;
use stratum_core::types::{Date, Frequency, Period};

use super::{check_dates, schedule, BootstrapHelper, DefaultHelper};
use crate::error::{CurveError, CurveResult};
use crate::traits::{CreditCurve, YieldCurve};

/// A CDS quoted by its running par spread.
///
/// Premium and protection legs are discretized on the premium schedule.
/// Each period `[T_{i-1}, T_i]` contributes
///
/// ```text
/// RPV01      += τ_i · D(T_i) · (S_i + ½ (S_{i-1} - S_i))
/// protection += (1 - R) · D(T_mid) · (S_{i-1} - S_i)
/// ```
///
/// with accrued premium paid on default, and the implied spread is
/// `protection / RPV01`.
pub struct CdsHelper {
    quote: QuoteHandle,
    tenor: Option<Period>,
    start: Date,
    end: Date,
    recovery: f64,
    day_count: DayCountConvention,
    payment_dates: Vec<Date>,
    discount: Arc<dyn YieldCurve>,
}

impl CdsHelper {
    /// Creates a CDS helper with quarterly ACT/360 premium payments.
    pub fn new(
        quote: QuoteHandle,
        start: Date,
        end: Date,
        recovery: f64,
        discount: Arc<dyn YieldCurve>,
    ) -> CurveResult<Self> {
        check_dates(start, end, "CDS")?;
        if !(0.0..1.0).contains(&recovery) {
            return Err(CurveError::precondition(format!(
                "CDS recovery {recovery} must lie in [0, 1)"
            )));
        }
        Ok(Self {
            quote,
            tenor: None,
            start,
            end,
            recovery,
            day_count: DayCountConvention::Act360,
            payment_dates: schedule(start, end, Frequency::Quarterly)?,
            discount,
        })
    }

    /// Creates a CDS helper running `tenor` from `start`.
    pub fn from_tenor(
        quote: QuoteHandle,
        start: Date,
        tenor: Period,
        recovery: f64,
        discount: Arc<dyn YieldCurve>,
    ) -> CurveResult<Self> {
        let end = start.advance(tenor)?;
        let mut helper = Self::new(quote, start, end, recovery, discount)?;
        helper.tenor = Some(tenor);
        Ok(helper)
    }

    /// Assumed recovery rate.
    #[must_use]
    pub fn recovery(&self) -> f64 {
        self.recovery
    }

    /// Risky annuity and protection leg value against `curve`.
    fn legs(&self, curve: &dyn CreditCurve) -> CurveResult<(f64, f64)> {
        let mut rpv01 = 0.0;
        let mut protection = 0.0;
        let mut prev = self.start;
        let mut s_prev = curve.survival_probability_at(prev)?;
        for &date in &self.payment_dates {
            let s = curve.survival_probability_at(date)?;
            let tau = self.day_count.year_fraction(prev, date);
            let df = self.discount.discount_factor_at(date)?;
            let mid = prev.add_days(prev.days_between(&date) / 2);
            let df_mid = self.discount.discount_factor_at(mid)?;

            rpv01 += tau * df * (s + 0.5 * (s_prev - s));
            protection += (1.0 - self.recovery) * df_mid * (s_prev - s);

            prev = date;
            s_prev = s;
        }
        Ok((rpv01, protection))
    }
}

impl BootstrapHelper for CdsHelper {
    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn pillar_date(&self) -> Date {
        self.end
    }

    fn earliest_date(&self) -> Date {
        self.start
    }

    fn description(&self) -> String {
        match self.tenor {
            Some(tenor) => format!("CDS {tenor} from {}", self.start),
            None => format!("CDS {} to {}", self.start, self.end),
        }
    }

    fn revision(&self) -> u64 {
        self.quote.revision().max(self.discount.revision())
    }
}

impl DefaultHelper for CdsHelper {
    fn implied_quote(&self, curve: &dyn CreditCurve) -> CurveResult<f64> {
        let (rpv01, protection) = self.legs(curve)?;
        if rpv01 <= 0.0 || !rpv01.is_finite() {
            return Err(CurveError::precondition(format!(
                "{} has a non-positive risky annuity {rpv01}",
                self.description()
            )));
        }
        Ok(protection / rpv01)
    }
}

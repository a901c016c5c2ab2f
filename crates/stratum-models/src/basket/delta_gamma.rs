//! Matching a vanilla swap to an exotic's NPV, delta and gamma.

use std::cell::RefCell;

use nalgebra::DVector;
use stratum_core::types::Date;
use stratum_curves::helpers::schedule;
use stratum_math::optimization::CostFunction;
use stratum_math::MathResult;

use crate::error::{ModelError, ModelResult};
use crate::exotic::{SwapConventions, SwapType};
use crate::gaussian1d::Gaussian1dModel;

/// Value, first and second derivative in the standardized state at zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Profile {
    pub npv: f64,
    pub delta: f64,
    pub gamma: f64,
}

impl Profile {
    /// Central differences of `value` at `-h`, `0` and `h`.
    pub fn measure(h: f64, mut value: impl FnMut(f64) -> ModelResult<f64>) -> ModelResult<Self> {
        let down = value(-h)?;
        let npv = value(0.0)?;
        let up = value(h)?;
        Ok(Self {
            npv,
            delta: (up - down) / (2.0 * h),
            gamma: (up - 2.0 * npv + down) / (h * h),
        })
    }

    pub fn norm_squared(&self) -> f64 {
        self.npv * self.npv + self.delta * self.delta + self.gamma * self.gamma
    }
}

/// A standard swap entered at `expiry` and ending at `end`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct VanillaSwap {
    pub swap_type: SwapType,
    pub conventions: SwapConventions,
    pub expiry: Date,
    pub end: Date,
    pub nominal: f64,
    pub strike: f64,
}

impl VanillaSwap {
    /// Value at `expiry` in state `y`.
    pub fn npv(&self, model: &dyn Gaussian1dModel, y: f64) -> ModelResult<f64> {
        let (floating, annuity) = self.legs(model, y)?;
        Ok(self.swap_type.sign() * self.nominal * (floating - self.strike * annuity))
    }

    /// Par rate at `expiry` in state `y`.
    pub fn fair_rate(&self, model: &dyn Gaussian1dModel, y: f64) -> ModelResult<f64> {
        let (floating, annuity) = self.legs(model, y)?;
        Ok(floating / annuity)
    }

    fn legs(&self, model: &dyn Gaussian1dModel, y: f64) -> ModelResult<(f64, f64)> {
        if self.end <= self.expiry {
            return Ok((0.0, 0.0));
        }
        let day_count = self.conventions.fixed_day_count;
        let mut annuity = 0.0;
        let mut previous = self.expiry;
        for date in schedule(self.expiry, self.end, self.conventions.fixed_frequency)? {
            annuity += day_count.year_fraction(previous, date) * model.zerobond(date, self.expiry, y, None)?;
            previous = date;
        }
        let floating = 1.0 - model.zerobond(self.end, self.expiry, y, None)?;
        Ok((floating, annuity))
    }
}

/// Residuals of a candidate `[nominal, maturity, strike]` against the
/// exotic's profile.
///
/// Maturities between whole months blend the two neighbouring swaps:
/// with `m = 12 · maturity` the candidate is `α · swap(⌊m⌋) + (1 - α) ·
/// swap(⌊m⌋ + 1)` and `α = 1 - (m - ⌊m⌋)`. Residuals are
///
/// ```text
/// [(npv - npv₀) / δ₀, (δ - δ₀) / δ₀, (γ - γ₀) / γ₀]
/// ```
///
/// with a unit scale standing in for a zero `δ₀` or `γ₀`. Pricing
/// failures give infinite residuals; the first one is kept for the caller.
pub(crate) struct DeltaGammaMatch<'a> {
    pub model: &'a dyn Gaussian1dModel,
    pub swap_type: SwapType,
    pub conventions: SwapConventions,
    pub expiry: Date,
    pub max_maturity: f64,
    pub bump: f64,
    pub target: Profile,
    pub failure: RefCell<Option<ModelError>>,
}

impl DeltaGammaMatch<'_> {
    fn scale(value: f64) -> f64 {
        if value == 0.0 {
            1.0
        } else {
            value
        }
    }

    fn swap(&self, months: i32, nominal: f64, strike: f64) -> ModelResult<VanillaSwap> {
        Ok(VanillaSwap {
            swap_type: self.swap_type,
            conventions: self.conventions,
            expiry: self.expiry,
            end: self.expiry.add_months(months)?,
            nominal,
            strike,
        })
    }

    fn profile(&self, x: &DVector<f64>) -> ModelResult<Profile> {
        let (nominal, strike) = (x[0], x[2]);
        let months = 12.0 * x[1].abs().min(self.max_maturity);
        let whole = months.floor();
        let alpha = 1.0 - (months - whole);

        let short = self.swap(whole as i32, nominal, strike)?;
        let long = self.swap(whole as i32 + 1, nominal, strike)?;
        Profile::measure(self.bump, |y| {
            Ok(alpha * short.npv(self.model, y)? + (1.0 - alpha) * long.npv(self.model, y)?)
        })
    }
}

impl CostFunction for DeltaGammaMatch<'_> {
    fn values(&self, x: &DVector<f64>) -> MathResult<DVector<f64>> {
        match self.profile(x) {
            Ok(profile) => {
                let delta_scale = Self::scale(self.target.delta);
                let gamma_scale = Self::scale(self.target.gamma);
                Ok(DVector::from_vec(vec![
                    (profile.npv - self.target.npv) / delta_scale,
                    (profile.delta - self.target.delta) / delta_scale,
                    (profile.gamma - self.target.gamma) / gamma_scale,
                ]))
            }
            Err(err) => {
                self.failure.borrow_mut().get_or_insert(err);
                Ok(DVector::from_element(3, f64::INFINITY))
            }
        }
    }
}

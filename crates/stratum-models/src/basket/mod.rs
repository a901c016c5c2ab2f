//! Calibration basket generation.
//!
//! For each live exercise date of an exotic, the generator picks one
//! European swaption to calibrate the model against:
//!
//! - **Naive**: the ATM swaption from the exercise date to the end of the
//!   underlying, on unit nominal
//! - **MaturityStrikeByDeltaGamma**: the swaption whose underlying swap
//!   reproduces the exotic's NPV, delta and gamma in the model state at
//!   that date
//!
//! ```rust,ignore
//! use stratum_models::prelude::*;
//!
//! let generator = BasketGenerator::new(model, BasketConfig::default())?;
//! let basket = generator.calibration_basket(
//!     &swaption,
//!     &SwapConventions::default(),
//!     &volatility,
//!     CalibrationBasketType::MaturityStrikeByDeltaGamma,
//! )?;
//! ```

mod delta_gamma;

use std::cell::RefCell;
use std::fmt;
use std::sync::Arc;

use nalgebra::DVector;
use stratum_core::quotes::SimpleQuote;
use stratum_core::types::{Date, Period};
use stratum_curves::config::Validate;
use stratum_curves::YieldCurve;
use stratum_math::optimization::{
    Constraint, EndCriteriaType, LevenbergMarquardt, OptimizationMethod, Problem,
};
use tracing::{debug, info, warn};

use crate::config::BasketConfig;
use crate::error::{ModelError, ModelResult};
use crate::exotic::{BasketExotic, SwapConventions, SwapType};
use crate::gaussian1d::Gaussian1dModel;
use crate::volatility::{SwaptionVolatility, VolatilityType};

use delta_gamma::{DeltaGammaMatch, Profile, VanillaSwap};

/// Strike floor of the calibration swaptions, before the smile shift.
const STRIKE_FLOOR: f64 = 1e-5;

/// Nominal floor of the calibration swaptions.
const NOMINAL_FLOOR: f64 = 1e-6;

/// Strike used for the volatility lookup when the structure has no ATM
/// level.
const FALLBACK_STRIKE: f64 = 0.03;

/// Relative Jacobian step of the match. Finite-difference gammas are too
/// noisy for the optimizer's default step.
const JACOBIAN_STEP: f64 = 1e-5;

/// How the basket is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalibrationBasketType {
    /// ATM coterminal swaptions.
    Naive,
    /// Swaptions matching the exotic's NPV, delta and gamma.
    MaturityStrikeByDeltaGamma,
}

impl fmt::Display for CalibrationBasketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibrationBasketType::Naive => write!(f, "Naive"),
            CalibrationBasketType::MaturityStrikeByDeltaGamma => {
                write!(f, "MaturityStrikeByDeltaGamma")
            }
        }
    }
}

/// End of a calibration swaption's underlying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwaptionMaturity {
    /// Fixed end date.
    Date(Date),
    /// Tenor from the exercise date.
    Tenor(Period),
}

/// A European swaption selected for model calibration.
#[derive(Debug, Clone)]
pub struct CalibrationSwaption {
    expiry: Date,
    maturity: SwaptionMaturity,
    volatility: Arc<SimpleQuote>,
    volatility_type: VolatilityType,
    strike: Option<f64>,
    nominal: f64,
    shift: f64,
    swap_type: SwapType,
    conventions: SwapConventions,
}

impl CalibrationSwaption {
    /// Exercise date.
    #[must_use]
    pub fn expiry(&self) -> Date {
        self.expiry
    }

    /// End of the underlying.
    #[must_use]
    pub fn maturity(&self) -> SwaptionMaturity {
        self.maturity
    }

    /// End date of the underlying.
    pub fn end_date(&self) -> ModelResult<Date> {
        match self.maturity {
            SwaptionMaturity::Date(date) => Ok(date),
            SwaptionMaturity::Tenor(tenor) => Ok(self.expiry.advance(tenor)?),
        }
    }

    /// Market volatility quote.
    #[must_use]
    pub fn volatility_quote(&self) -> &Arc<SimpleQuote> {
        &self.volatility
    }

    /// Quoting convention of the volatility.
    #[must_use]
    pub fn volatility_type(&self) -> VolatilityType {
        self.volatility_type
    }

    /// Strike; `None` means at the money.
    #[must_use]
    pub fn strike(&self) -> Option<f64> {
        self.strike
    }

    /// Nominal.
    #[must_use]
    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    /// Lognormal displacement of the volatility quote.
    #[must_use]
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Direction of the underlying.
    #[must_use]
    pub fn swap_type(&self) -> SwapType {
        self.swap_type
    }

    /// Value at expiry of the underlying swap in state `y`.
    ///
    /// An ATM swaption struck at the model's mean-scenario par rate.
    pub fn underlying_npv(&self, model: &dyn Gaussian1dModel, y: f64) -> ModelResult<f64> {
        let mut swap = VanillaSwap {
            swap_type: self.swap_type,
            conventions: self.conventions,
            expiry: self.expiry,
            end: self.end_date()?,
            nominal: self.nominal,
            strike: 0.0,
        };
        swap.strike = match self.strike {
            Some(strike) => strike,
            None => swap.fair_rate(model, 0.0)?,
        };
        swap.npv(model, y)
    }
}

/// Builds calibration baskets for exotics under a Gaussian model.
pub struct BasketGenerator {
    model: Arc<dyn Gaussian1dModel>,
    config: BasketConfig,
    discount: Option<Arc<dyn YieldCurve>>,
}

impl BasketGenerator {
    /// Creates a generator; the configuration is validated.
    pub fn new(model: Arc<dyn Gaussian1dModel>, config: BasketConfig) -> ModelResult<Self> {
        config.validate_or_error()?;
        Ok(Self {
            model,
            config,
            discount: None,
        })
    }

    /// Discounts rebates on `curve` instead of the model curve.
    #[must_use]
    pub fn with_discount_curve(mut self, curve: Arc<dyn YieldCurve>) -> Self {
        self.discount = Some(curve);
        self
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &BasketConfig {
        &self.config
    }

    /// One calibration swaption per exercise date after the model's
    /// reference date.
    ///
    /// # Errors
    ///
    /// - a precondition error when the exotic has zero NPV, delta and
    ///   gamma at an exercise date, before any optimization;
    /// - [`ModelError::OptimizerFailed`] when the match stops on
    ///   `MaxIterations`, `Unknown` or `None`;
    /// - curve and date errors from pricing.
    pub fn calibration_basket(
        &self,
        exotic: &dyn BasketExotic,
        conventions: &SwapConventions,
        volatility: &dyn SwaptionVolatility,
        basket_type: CalibrationBasketType,
    ) -> ModelResult<Vec<CalibrationSwaption>> {
        let today = self.model.reference_date();
        let exercise = exotic.exercise();
        let first_alive = exercise.dates().partition_point(|d| *d <= today);

        let mut basket = Vec::with_capacity(exercise.dates().len() - first_alive);
        for (i, &expiry) in exercise.dates().iter().enumerate().skip(first_alive) {
            let helper = match basket_type {
                CalibrationBasketType::Naive => {
                    self.naive(exotic, conventions, volatility, expiry)?
                }
                CalibrationBasketType::MaturityStrikeByDeltaGamma => {
                    self.delta_gamma(exotic, conventions, volatility, expiry, i)?
                }
            };
            debug!(
                expiry = %expiry,
                maturity = ?helper.maturity,
                strike = ?helper.strike,
                nominal = helper.nominal,
                "calibration swaption selected"
            );
            basket.push(helper);
        }

        info!(
            basket_type = %basket_type,
            model = self.model.name(),
            size = basket.len(),
            skipped = first_alive,
            "calibration basket generated"
        );
        Ok(basket)
    }

    fn naive(
        &self,
        exotic: &dyn BasketExotic,
        conventions: &SwapConventions,
        volatility: &dyn SwaptionVolatility,
        expiry: Date,
    ) -> ModelResult<CalibrationSwaption> {
        let end = exotic.underlying_last_date();
        let length = volatility.day_count().year_fraction(expiry, end);
        let months = ((length * 12.0).round() as i32).max(1);
        let tenor = Period::months(months);

        let strike = volatility
            .atm_level(expiry, tenor)
            .unwrap_or(FALLBACK_STRIKE);
        let vol = volatility.volatility(expiry, tenor, strike)?;

        Ok(CalibrationSwaption {
            expiry,
            maturity: SwaptionMaturity::Date(end),
            volatility: SimpleQuote::new(vol),
            volatility_type: volatility.volatility_type(),
            strike: None,
            nominal: 1.0,
            shift: volatility.shift(expiry, tenor),
            swap_type: exotic.underlying_type(),
            conventions: *conventions,
        })
    }

    /// Value at `expiry` of exercising, rebate included.
    fn exercise_value(
        &self,
        exotic: &dyn BasketExotic,
        expiry: Date,
        i: usize,
        y: f64,
    ) -> ModelResult<f64> {
        let underlying = exotic.underlying_npv(self.model.as_ref(), expiry, y)?;
        let rebate = exotic.exercise().rebate(i);
        if rebate.amount == 0.0 {
            return Ok(underlying);
        }
        let spread_discount = self.config.oas.map_or(1.0, |oas| {
            let tau = self
                .model
                .term_structure()
                .day_count()
                .year_fraction(expiry, rebate.payment_date);
            (-oas * tau).exp()
        });
        let bond = self
            .model
            .zerobond(rebate.payment_date, expiry, y, self.discount.as_deref())?;
        Ok(underlying + rebate.amount * bond * spread_discount)
    }

    fn delta_gamma(
        &self,
        exotic: &dyn BasketExotic,
        conventions: &SwapConventions,
        volatility: &dyn SwaptionVolatility,
        expiry: Date,
        i: usize,
    ) -> ModelResult<CalibrationSwaption> {
        let target = Profile::measure(self.config.bump, |y| {
            self.exercise_value(exotic, expiry, i, y)
        })?;
        if !(target.norm_squared() > 0.0) {
            return Err(ModelError::precondition(format!(
                "exotic (npv, delta, gamma) at {expiry} must have a positive norm, got ({}, {}, {})",
                target.npv, target.delta, target.gamma
            )));
        }

        let matcher = DeltaGammaMatch {
            model: self.model.as_ref(),
            swap_type: exotic.underlying_type(),
            conventions: *conventions,
            expiry,
            max_maturity: self.config.max_maturity,
            bump: self.config.bump,
            target,
            failure: RefCell::new(None),
        };
        let initial = DVector::from_row_slice(&exotic.initial_guess(expiry)?);
        let mut problem = Problem::new(&matcher, Constraint::NoConstraint, initial);
        let optimizer = LevenbergMarquardt {
            jacobian_step: JACOBIAN_STEP,
            ..LevenbergMarquardt::new()
        };
        let end = optimizer.minimize(&mut problem, &self.config.end_criteria)?;
        let cost = problem.function_value();

        if matches!(
            end,
            EndCriteriaType::MaxIterations | EndCriteriaType::Unknown | EndCriteriaType::None
        ) || !cost.is_finite()
        {
            if let Some(err) = matcher.failure.borrow_mut().take() {
                return Err(err);
            }
            warn!(expiry = %expiry, end_criteria = %end, residual = cost, "basket match failed");
            return Err(ModelError::OptimizerFailed {
                expiry,
                end_criteria: end,
                residual: cost,
            });
        }

        let solution = problem.current_value();
        let tenor = round_to_months(solution[1].abs().min(self.config.max_maturity));
        let shift = volatility.shift(expiry, tenor);
        let strike = solution[2].max(STRIKE_FLOOR - shift);
        let nominal = solution[0].max(NOMINAL_FLOOR);
        let vol = volatility.volatility(expiry, tenor, strike)?;

        debug!(
            expiry = %expiry,
            end_criteria = %end,
            residual = cost,
            evaluations = problem.evaluations(),
            "delta-gamma match converged"
        );

        Ok(CalibrationSwaption {
            expiry,
            maturity: SwaptionMaturity::Tenor(tenor),
            volatility: SimpleQuote::new(vol),
            volatility_type: volatility.volatility_type(),
            strike: Some(strike),
            nominal,
            shift,
            swap_type: exotic.underlying_type(),
            conventions: *conventions,
        })
    }
}

impl fmt::Debug for BasketGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasketGenerator")
            .field("model", &self.model.name())
            .field("config", &self.config)
            .field("discount", &self.discount.is_some())
            .finish()
    }
}

/// Whole years plus the nearest whole month, at least one month.
fn round_to_months(years: f64) -> Period {
    let whole_years = years.floor();
    let mut months = ((years - whole_years) * 12.0 + 0.5).floor() as i32;
    let whole_years = whole_years as i32;
    if whole_years == 0 && months == 0 {
        months = 1;
    }
    Period::years_months(whole_years, months)
}

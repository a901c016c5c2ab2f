//! Hull-White one-factor short rate model.
//!
//! The Hull-White model is defined by:
//!
//! ```text
//! dr = (θ(t) - a*r)dt + σ*dW
//! ```
//!
//! Where:
//! - `a` = mean reversion speed
//! - `σ` = volatility
//! - `θ(t)` = time-dependent drift fitted to the initial curve
//!
//! Writing `r(t) = x(t) + α(t)` with `x` a zero-mean Ornstein-Uhlenbeck
//! process, zero bonds are
//!
//! ```text
//! P(t,T | x) = P(0,T) / P(0,t) · exp(-B x - B σ²/(2a²) (1 - e^{-at})² - σ²/(4a) (1 - e^{-2at}) B²)
//! B(t,T)     = (1 - e^{-a(T-t)}) / a
//! ```

use std::sync::Arc;

use stratum_core::types::Date;
use stratum_curves::YieldCurve;

use super::Gaussian1dModel;
use crate::error::{ModelError, ModelResult};

/// Hull-White one-factor model on a yield curve.
///
/// # Example
///
/// ```rust,ignore
/// use stratum_models::gaussian1d::{Gaussian1dModel, HullWhite};
///
/// // 3% mean reversion, 1% volatility
/// let model = HullWhite::new(curve, 0.03, 0.01)?;
/// let bond = model.zerobond(maturity, expiry, 0.0, None)?;
/// ```
#[derive(Clone)]
pub struct HullWhite {
    term_structure: Arc<dyn YieldCurve>,
    /// Mean reversion speed (a).
    mean_reversion: f64,
    /// Short rate volatility (σ).
    volatility: f64,
}

impl HullWhite {
    /// Creates a Hull-White model.
    ///
    /// Both parameters must be positive and finite.
    pub fn new(
        term_structure: Arc<dyn YieldCurve>,
        mean_reversion: f64,
        volatility: f64,
    ) -> ModelResult<Self> {
        if !(mean_reversion.is_finite() && mean_reversion > 0.0) {
            return Err(ModelError::precondition(format!(
                "mean reversion {mean_reversion} must be positive"
            )));
        }
        if !(volatility.is_finite() && volatility > 0.0) {
            return Err(ModelError::precondition(format!(
                "volatility {volatility} must be positive"
            )));
        }
        Ok(Self {
            term_structure,
            mean_reversion,
            volatility,
        })
    }

    /// Mean reversion speed.
    #[must_use]
    pub fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    /// Short rate volatility.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// B(t,T) = (1 - exp(-a*(T-t))) / a
    fn b_factor(&self, t: f64, big_t: f64) -> f64 {
        let a = self.mean_reversion;
        (1.0 - (-a * (big_t - t)).exp()) / a
    }

    fn variance(&self, t: f64) -> f64 {
        let a = self.mean_reversion;
        let sigma = self.volatility;
        sigma * sigma * (1.0 - (-2.0 * a * t).exp()) / (2.0 * a)
    }
}

impl Gaussian1dModel for HullWhite {
    fn name(&self) -> &'static str {
        "Hull-White"
    }

    fn term_structure(&self) -> &Arc<dyn YieldCurve> {
        &self.term_structure
    }

    fn state_std_dev(&self, t: f64) -> f64 {
        self.variance(t.max(0.0)).sqrt()
    }

    fn zerobond(
        &self,
        maturity: Date,
        reference: Date,
        y: f64,
        discount: Option<&dyn YieldCurve>,
    ) -> ModelResult<f64> {
        if maturity < reference {
            return Err(ModelError::precondition(format!(
                "zero bond maturity {maturity} precedes its observation date {reference}"
            )));
        }
        if maturity == reference {
            return Ok(1.0);
        }

        let t = self.time(reference);
        let big_t = self.time(maturity);
        let curve = discount.unwrap_or(self.term_structure.as_ref());
        let forward_bond = curve.discount_factor(big_t)? / curve.discount_factor(t)?;

        let a = self.mean_reversion;
        let sigma = self.volatility;
        let b = self.b_factor(t, big_t);
        let x = y * self.state_std_dev(t);
        let drift = sigma * sigma / (2.0 * a * a) * (1.0 - (-a * t).exp()).powi(2);
        let convexity = sigma * sigma / (4.0 * a) * (1.0 - (-2.0 * a * t).exp());

        Ok(forward_bond * (-b * x - b * drift - convexity * b * b).exp())
    }
}

impl std::fmt::Debug for HullWhite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HullWhite")
            .field("reference_date", &self.term_structure.reference_date())
            .field("mean_reversion", &self.mean_reversion)
            .field("volatility", &self.volatility)
            .finish()
    }
}

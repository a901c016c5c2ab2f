//! Exotic underlyings that can generate their own calibration basket.
//!
//! An exotic exposes, per exercise date, the value of what the holder
//! receives on exercise as a function of the model state. The basket
//! generator only sees this [`BasketExotic`] view.

use std::fmt;

use stratum_core::daycounts::DayCountConvention;
use stratum_core::types::{Date, Frequency};
use stratum_curves::helpers::schedule;

use crate::error::{ModelError, ModelResult};
use crate::gaussian1d::Gaussian1dModel;

/// Direction of a fixed-for-floating swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwapType {
    /// Pays fixed, receives floating.
    #[default]
    Payer,
    /// Receives fixed, pays floating.
    Receiver,
}

impl SwapType {
    /// `+1` for payers, `-1` for receivers.
    #[must_use]
    pub fn sign(self) -> f64 {
        match self {
            SwapType::Payer => 1.0,
            SwapType::Receiver => -1.0,
        }
    }
}

impl fmt::Display for SwapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwapType::Payer => write!(f, "Payer"),
            SwapType::Receiver => write!(f, "Receiver"),
        }
    }
}

/// Fixed leg conventions of the standard swaps used for calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapConventions {
    /// Fixed leg payment frequency.
    pub fixed_frequency: Frequency,
    /// Fixed leg day count.
    pub fixed_day_count: DayCountConvention,
}

impl Default for SwapConventions {
    fn default() -> Self {
        Self {
            fixed_frequency: Frequency::Annual,
            fixed_day_count: DayCountConvention::Thirty360US,
        }
    }
}

/// A rebate paid when the holder exercises.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rebate {
    /// Amount paid.
    pub amount: f64,
    /// Payment date, on or after the exercise date.
    pub payment_date: Date,
}

/// Bermudan exercise schedule, optionally rebated.
#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    dates: Vec<Date>,
    rebates: Vec<Rebate>,
}

impl Exercise {
    /// Creates an exercise on strictly increasing `dates`.
    pub fn bermudan(dates: Vec<Date>) -> ModelResult<Self> {
        if dates.is_empty() {
            return Err(ModelError::precondition("exercise has no dates"));
        }
        if dates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ModelError::precondition(
                "exercise dates must be strictly increasing",
            ));
        }
        Ok(Self {
            dates,
            rebates: Vec::new(),
        })
    }

    /// Attaches one rebate per exercise date.
    pub fn with_rebates(mut self, rebates: Vec<Rebate>) -> ModelResult<Self> {
        if rebates.len() != self.dates.len() {
            return Err(ModelError::precondition(format!(
                "{} rebates for {} exercise dates",
                rebates.len(),
                self.dates.len()
            )));
        }
        for (date, rebate) in self.dates.iter().zip(&rebates) {
            if rebate.payment_date < *date {
                return Err(ModelError::precondition(format!(
                    "rebate for {date} is paid before exercise, on {}",
                    rebate.payment_date
                )));
            }
        }
        self.rebates = rebates;
        Ok(self)
    }

    /// Exercise dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Rebate on exercise `i`; zero, paid on the exercise date, when the
    /// exercise is not rebated.
    #[must_use]
    pub fn rebate(&self, i: usize) -> Rebate {
        self.rebates.get(i).copied().unwrap_or(Rebate {
            amount: 0.0,
            payment_date: self.dates[i],
        })
    }
}

/// An exotic whose exercise right can be hedged by a vanilla basket.
pub trait BasketExotic: Send + Sync {
    /// Exercise schedule.
    fn exercise(&self) -> &Exercise;

    /// Direction of the underlying.
    fn underlying_type(&self) -> SwapType;

    /// Last payment date of the underlying.
    fn underlying_last_date(&self) -> Date;

    /// Value at `expiry` of the underlying entered on exercise, in
    /// standardized state `y`.
    fn underlying_npv(&self, model: &dyn Gaussian1dModel, expiry: Date, y: f64) -> ModelResult<f64>;

    /// Starting point `[nominal, maturity in years, strike]` for matching
    /// the exercise at `expiry`.
    fn initial_guess(&self, expiry: Date) -> ModelResult<[f64; 3]>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FixedPeriod {
    start: Date,
    end: Date,
    nominal: f64,
    rate: f64,
}

/// A Bermudan swaption on a swap with period-dependent nominal and rate.
///
/// The floating leg pays the model's own index on the fixed schedule and
/// is valued by telescoping zero bonds, so each fixed period `i` entered
/// at `t` contributes
///
/// ```text
/// N_i · (P(t, S_i) - P(t, E_i) - K_i τ_i P(t, E_i))
/// ```
///
/// signed by the swap direction.
#[derive(Debug, Clone, PartialEq)]
pub struct NonstandardSwaption {
    swap_type: SwapType,
    periods: Vec<FixedPeriod>,
    day_count: DayCountConvention,
    exercise: Exercise,
}

impl NonstandardSwaption {
    /// Creates the swaption.
    ///
    /// `nominals` and `rates` hold one entry per fixed period, or a single
    /// entry applied to every period.
    pub fn new(
        swap_type: SwapType,
        start: Date,
        end: Date,
        conventions: SwapConventions,
        nominals: &[f64],
        rates: &[f64],
        exercise: Exercise,
    ) -> ModelResult<Self> {
        let ends = schedule(start, end, conventions.fixed_frequency)?;
        let n = ends.len();
        let expand = |values: &[f64], what: &str| -> ModelResult<Vec<f64>> {
            match values.len() {
                1 => Ok(vec![values[0]; n]),
                len if len == n => Ok(values.to_vec()),
                len => Err(ModelError::precondition(format!(
                    "{len} {what} for {n} fixed periods"
                ))),
            }
        };
        let nominals = expand(nominals, "nominals")?;
        let rates = expand(rates, "rates")?;
        if nominals.iter().chain(&rates).any(|v| !v.is_finite()) {
            return Err(ModelError::precondition("nominals and rates must be finite"));
        }

        let mut periods = Vec::with_capacity(n);
        let mut previous = start;
        for ((date, nominal), rate) in ends.into_iter().zip(nominals).zip(rates) {
            periods.push(FixedPeriod {
                start: previous,
                end: date,
                nominal,
                rate,
            });
            previous = date;
        }

        if exercise.dates().iter().any(|d| *d >= end) {
            return Err(ModelError::precondition(
                "exercise dates must precede the end of the underlying",
            ));
        }

        Ok(Self {
            swap_type,
            periods,
            day_count: conventions.fixed_day_count,
            exercise,
        })
    }

    /// Fixed periods entered by exercising at `expiry`.
    fn live_periods(&self, expiry: Date) -> impl Iterator<Item = &FixedPeriod> {
        self.periods.iter().filter(move |p| p.start >= expiry)
    }
}

impl BasketExotic for NonstandardSwaption {
    fn exercise(&self) -> &Exercise {
        &self.exercise
    }

    fn underlying_type(&self) -> SwapType {
        self.swap_type
    }

    fn underlying_last_date(&self) -> Date {
        self.periods.last().map_or(self.exercise.dates()[0], |p| p.end)
    }

    fn underlying_npv(&self, model: &dyn Gaussian1dModel, expiry: Date, y: f64) -> ModelResult<f64> {
        let mut npv = 0.0;
        for period in self.live_periods(expiry) {
            let start = model.zerobond(period.start, expiry, y, None)?;
            let end = model.zerobond(period.end, expiry, y, None)?;
            let tau = self.day_count.year_fraction(period.start, period.end);
            npv += period.nominal * (start - end - period.rate * tau * end);
        }
        Ok(self.swap_type.sign() * npv)
    }

    fn initial_guess(&self, expiry: Date) -> ModelResult<[f64; 3]> {
        let (count, nominal_sum, weighted_rate) = self
            .live_periods(expiry)
            .fold((0usize, 0.0, 0.0), |(c, n, r), p| {
                (c + 1, n + p.nominal, r + p.nominal * p.rate)
            });
        if count == 0 {
            return Err(ModelError::precondition(format!(
                "no fixed period starts on or after {expiry}"
            )));
        }
        let nominal = nominal_sum / count as f64;
        let strike = if nominal_sum == 0.0 {
            0.0
        } else {
            weighted_rate / nominal_sum
        };
        let maturity = DayCountConvention::Act365Fixed.year_fraction(expiry, self.underlying_last_date());
        Ok([nominal, maturity, strike])
    }
}

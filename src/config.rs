//! Engine configuration and the temperature schedule record.

use crate::error::AnnealError;
use crate::state::CopyStrategy;

/// A temperature schedule: the sole data interchange between the
/// [`crate::ScheduleEstimator`] and the [`crate::AnnealRunner`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    /// Starting (maximum) temperature.
    pub tmax: f64,

    /// Final (minimum) temperature. Must be strictly positive.
    pub tmin: f64,

    /// Trial moves per temperature rung. Must be positive.
    pub steps_per_temperature: usize,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            tmax: 25_000.0,
            tmin: 2.5,
            steps_per_temperature: 1000,
        }
    }
}

/// Configuration for a fixed-schedule annealing run.
///
/// # Examples
///
/// ```
/// use sim_anneal::{AnnealConfig, CopyStrategy, Schedule};
///
/// let config = AnnealConfig::default()
///     .with_schedule(Schedule {
///         tmax: 100.0,
///         tmin: 0.1,
///         steps_per_temperature: 200,
///     })
///     .with_cooling_steps(50)
///     .with_copy_strategy(CopyStrategy::Method)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Temperature schedule: bounds and trials per rung.
    pub schedule: Schedule,

    /// Number of discrete temperature rungs between `tmax` and `tmin`
    /// inclusive. Must be at least 2.
    pub cooling_steps: usize,

    /// How states are duplicated at accept/reject/re-anchor boundaries.
    pub copy_strategy: CopyStrategy,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Save the best state through the persistence collaborator on
    /// completion. Ignored when no store is supplied.
    pub save_best_on_exit: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            schedule: Schedule::default(),
            cooling_steps: 100,
            copy_strategy: CopyStrategy::default(),
            seed: None,
            save_best_on_exit: false,
        }
    }
}

impl AnnealConfig {
    /// Replaces the whole schedule, typically with an estimator result.
    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_tmax(mut self, tmax: f64) -> Self {
        self.schedule.tmax = tmax;
        self
    }

    pub fn with_tmin(mut self, tmin: f64) -> Self {
        self.schedule.tmin = tmin;
        self
    }

    pub fn with_steps_per_temperature(mut self, n: usize) -> Self {
        self.schedule.steps_per_temperature = n;
        self
    }

    pub fn with_cooling_steps(mut self, n: usize) -> Self {
        self.cooling_steps = n;
        self
    }

    pub fn with_copy_strategy(mut self, strategy: CopyStrategy) -> Self {
        self.copy_strategy = strategy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_save_best_on_exit(mut self, save: bool) -> Self {
        self.save_best_on_exit = save;
        self
    }

    /// Validates the configuration. The runner calls this before any move
    /// is attempted.
    pub fn validate(&self) -> Result<(), AnnealError> {
        // `!(tmin > 0)` also rejects NaN.
        if !(self.schedule.tmin > 0.0) {
            return Err(AnnealError::NonPositiveTmin {
                tmin: self.schedule.tmin,
            });
        }
        if self.schedule.tmax < self.schedule.tmin {
            return Err(AnnealError::InvertedTemperatureBounds {
                tmax: self.schedule.tmax,
                tmin: self.schedule.tmin,
            });
        }
        if self.schedule.steps_per_temperature == 0 {
            return Err(AnnealError::ZeroStepsPerTemperature);
        }
        if self.cooling_steps < 2 {
            return Err(AnnealError::TooFewCoolingSteps(self.cooling_steps));
        }
        Ok(())
    }
}

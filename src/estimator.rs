//! Automatic temperature schedule estimation.
//!
//! The estimator probes the caller's move/energy model at constant
//! temperatures to discover a schedule empirically:
//!
//! 1. Seed a temperature scale from the first move with a nonzero delta
//! 2. Walk the temperature by factors of 1.5 (rounded to two significant
//!    figures) until a full probe's acceptance rate straddles 98%; that
//!    temperature becomes `tmax`
//! 3. Keep shrinking until a full probe accepts no strictly improving
//!    move; that temperature becomes `tmin`
//! 4. Derive `steps_per_temperature`: the probe length itself, or a value
//!    scaled from measured probe throughput to fit a target wall-clock
//!    duration
//!
//! The estimator performs no annealing of its own; it hands back a
//! [`Schedule`] for the [`crate::AnnealRunner`] to consume, along with the
//! probed state (re-anchored to the best point the probes found).

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Schedule;
use crate::error::AnnealError;
use crate::model::AnnealModel;
use crate::observer::{ProgressObserver, ProgressUpdate, StderrProgress};
use crate::state::{CopyStrategy, StateCopier};
use crate::util::round_figures;

/// Acceptance rate targeted when searching for `tmax`.
const TMAX_ACCEPTANCE: f64 = 0.98;

/// Multiplicative step between probe temperatures.
const TEMPERATURE_RATIO: f64 = 1.5;

/// Significant figures kept in probe temperatures, so the search settles
/// on stable, human-readable values instead of oscillating on float noise.
const TEMPERATURE_FIGURES: u32 = 2;

/// Configuration for the schedule estimator.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EstimatorConfig {
    /// Trial moves per constant-temperature probe. Also reported as the
    /// schedule's `steps_per_temperature` when no target duration is set.
    pub steps_per_probe: usize,

    /// Wall-clock budget the final schedule should approximate. The
    /// derived `steps_per_temperature` scales measured probe throughput
    /// to this duration; a best-effort projection, not a deadline.
    pub target_duration: Option<Duration>,

    /// Rung count of the run the schedule is meant for.
    pub cooling_steps: usize,

    /// How probe states are duplicated.
    pub copy_strategy: CopyStrategy,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Cap on temperature-seeding moves. `None` leaves the seed loop
    /// unbounded, which requires the move operation to eventually produce
    /// a nonzero delta from the initial state.
    pub max_seed_moves: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            steps_per_probe: 1000,
            target_duration: None,
            cooling_steps: 100,
            copy_strategy: CopyStrategy::default(),
            seed: None,
            max_seed_moves: None,
        }
    }
}

impl EstimatorConfig {
    pub fn with_steps_per_probe(mut self, n: usize) -> Self {
        self.steps_per_probe = n;
        self
    }

    pub fn with_target_duration(mut self, duration: Duration) -> Self {
        self.target_duration = Some(duration);
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

    pub fn with_max_seed_moves(mut self, cap: usize) -> Self {
        self.max_seed_moves = Some(cap);
        self
    }

    /// Validates the configuration. The estimator calls this before any
    /// move is attempted.
    pub fn validate(&self) -> Result<(), AnnealError> {
        if self.steps_per_probe == 0 {
            return Err(AnnealError::ZeroStepsPerTemperature);
        }
        if self.cooling_steps < 2 {
            return Err(AnnealError::TooFewCoolingSteps(self.cooling_steps));
        }
        Ok(())
    }
}

/// What the estimator hands back.
#[derive(Debug, Clone)]
pub struct EstimateOutcome<S> {
    /// Schedule for [`crate::AnnealConfig::with_schedule`].
    pub schedule: Schedule,

    /// The state after the last probe, re-anchored to the best point the
    /// probes found. The estimator consumes the caller's initial state,
    /// so it is handed back here.
    pub state: S,

    /// Best energy seen across all probes.
    pub best_energy: f64,

    /// Number of constant-temperature probes executed.
    pub probes: usize,
}

/// Discovers annealing schedules by probing the move/energy model.
pub struct ScheduleEstimator;

impl ScheduleEstimator {
    /// Estimates a schedule with the default stderr progress table.
    pub fn estimate<M: AnnealModel>(
        model: &M,
        initial: M::State,
        config: &EstimatorConfig,
    ) -> Result<EstimateOutcome<M::State>, AnnealError> {
        Self::estimate_with(model, initial, config, &mut StderrProgress::new())
    }

    /// Estimates a schedule, reporting each search probe to the observer.
    pub fn estimate_with<M, O>(
        model: &M,
        initial: M::State,
        config: &EstimatorConfig,
        observer: &mut O,
    ) -> Result<EstimateOutcome<M::State>, AnnealError>
    where
        M: AnnealModel,
        O: ProgressObserver + ?Sized,
    {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let start = Instant::now();

        let copier = StateCopier::new(config.copy_strategy);
        let best_energy = model.energy(&initial);
        let best = copier.copy(&initial)?;
        let mut search = ProbeSearch {
            model,
            copier,
            rng,
            state: initial,
            best,
            best_energy,
            steps_per_probe: config.steps_per_probe,
            step: 0,
            probes: 0,
        };

        // Seed the temperature scale: apply moves (each kept, no
        // acceptance test) until one changes the energy.
        let mut temperature = 0.0;
        while temperature == 0.0 {
            if let Some(cap) = config.max_seed_moves {
                if search.step >= cap {
                    return Err(AnnealError::SeedMovesExhausted(cap));
                }
            }
            search.step += 1;
            temperature = model.apply_move(&mut search.state, &mut search.rng).abs();
        }

        let (mut energy, mut acceptance, mut improvement) = search.probe(temperature)?;

        // Search for tmax: the temperature where a full probe's acceptance
        // rate straddles the 98% target. Shrink while too hot, then grow
        // while too cold.
        while acceptance > TMAX_ACCEPTANCE {
            temperature = round_figures(temperature / TEMPERATURE_RATIO, TEMPERATURE_FIGURES);
            (energy, acceptance, improvement) = search.probe(temperature)?;
            search.notify(observer, start, temperature, energy, acceptance, improvement);
        }
        while acceptance < TMAX_ACCEPTANCE {
            temperature = round_figures(temperature * TEMPERATURE_RATIO, TEMPERATURE_FIGURES);
            (energy, acceptance, improvement) = search.probe(temperature)?;
            search.notify(observer, start, temperature, energy, acceptance, improvement);
        }
        let tmax = temperature;

        // Search for tmin: keep cooling until a full probe accepts no
        // strictly improving move.
        while improvement > 0.0 {
            temperature = round_figures(temperature / TEMPERATURE_RATIO, TEMPERATURE_FIGURES);
            (energy, acceptance, improvement) = search.probe(temperature)?;
            search.notify(observer, start, temperature, energy, acceptance, improvement);
        }
        let tmin = temperature;

        let steps_per_temperature = match config.target_duration {
            None => config.steps_per_probe,
            Some(duration) => {
                let elapsed = start.elapsed().as_secs_f64();
                if elapsed > 0.0 {
                    let projected = round_figures(
                        (duration.as_secs_f64() * search.step as f64 / elapsed).round(),
                        TEMPERATURE_FIGURES,
                    );
                    ((projected / config.cooling_steps as f64) as usize).max(1)
                } else {
                    config.steps_per_probe
                }
            }
        };

        Ok(EstimateOutcome {
            schedule: Schedule {
                tmax,
                tmin,
                steps_per_temperature,
            },
            state: search.state,
            best_energy: search.best_energy,
            probes: search.probes,
        })
    }
}

/// Mutable context of one estimation: the probed state, the best point
/// found so far, and the trial counters. Owned by a single `estimate_with`
/// call so concurrent estimations cannot share state.
struct ProbeSearch<'a, M: AnnealModel> {
    model: &'a M,
    copier: StateCopier,
    rng: StdRng,
    state: M::State,
    best: M::State,
    best_energy: f64,
    steps_per_probe: usize,
    step: usize,
    probes: usize,
}

impl<M: AnnealModel> ProbeSearch<'_, M> {
    /// One constant-temperature probe: the engine's Metropolis trial loop
    /// without per-rung re-anchoring until the probe ends. Starts from a
    /// fresh energy readout and finishes with the state re-anchored to the
    /// best point found so far. Returns the best energy plus the probe's
    /// acceptance and improvement rates.
    fn probe(&mut self, temperature: f64) -> Result<(f64, f64, f64), AnnealError> {
        self.probes += 1;
        self.step += self.steps_per_probe;

        let mut energy = self.model.energy(&self.state);
        let mut previous = self.copier.copy(&self.state)?;
        let mut previous_energy = energy;
        let mut accepts = 0usize;
        let mut improves = 0usize;

        for _ in 0..self.steps_per_probe {
            let delta = self.model.apply_move(&mut self.state, &mut self.rng);
            energy = previous_energy + delta;

            if delta > 0.0
                && (-delta / temperature).exp() < self.rng.random_range(0.0..1.0)
            {
                self.state = self.copier.copy(&previous)?;
                energy = previous_energy;
            } else {
                accepts += 1;
                if delta < 0.0 {
                    improves += 1;
                }
                previous = self.copier.copy(&self.state)?;
                previous_energy = energy;
                if energy < self.best_energy {
                    self.best = self.copier.copy(&self.state)?;
                    self.best_energy = energy;
                }
            }
        }

        self.state = self.copier.copy(&self.best)?;
        Ok((
            self.best_energy,
            accepts as f64 / self.steps_per_probe as f64,
            improves as f64 / self.steps_per_probe as f64,
        ))
    }

    fn notify<O: ProgressObserver + ?Sized>(
        &self,
        observer: &mut O,
        start: Instant,
        temperature: f64,
        energy: f64,
        acceptance: f64,
        improvement: f64,
    ) {
        observer.on_progress(&ProgressUpdate {
            step: self.step,
            temperature,
            energy,
            acceptance,
            improvement,
            elapsed: start.elapsed(),
            remaining: None,
        });
    }
}

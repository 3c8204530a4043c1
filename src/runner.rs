//! Fixed-schedule annealing engine.
//!
//! # Algorithm
//!
//! 1. Evaluate the initial energy (the run's only from-scratch evaluation)
//! 2. For each of `cooling_steps` temperature rungs, exponentially
//!    interpolated from `tmax` down to `tmin`:
//!    a. Perform `steps_per_temperature` in-place trial moves
//!    b. Accept per the Metropolis criterion; on rejection restore the
//!       previous accepted snapshot
//!    c. Track the best state/energy seen
//!    d. Re-anchor current and previous to the best, notify the observer
//! 3. Optionally save the best state, return it with its energy
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::AnnealConfig;
use crate::error::AnnealError;
use crate::model::AnnealModel;
use crate::observer::{ProgressObserver, ProgressUpdate, StderrProgress};
use crate::state::StateCopier;
use crate::store::{MemoryStore, StateStore};

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<S> {
    /// Best state found.
    pub best: S,

    /// Energy of the best state. Never worse than the initial energy.
    pub best_energy: f64,

    /// Total trial moves performed.
    pub steps: usize,

    /// Trials accepted by the Metropolis criterion, including worsening
    /// moves reached by thermal excitation.
    pub accepted_moves: usize,

    /// Accepted trials that strictly decreased energy.
    pub improving_moves: usize,
}

/// Executes the annealing loop.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs annealing with the default stderr progress table and no
    /// persistence collaborator.
    pub fn run<M: AnnealModel>(
        model: &M,
        initial: M::State,
        config: &AnnealConfig,
    ) -> Result<AnnealResult<M::State>, AnnealError> {
        Self::run_with::<M, _, MemoryStore<M::State>>(
            model,
            initial,
            config,
            &mut StderrProgress::new(),
            None,
        )
    }

    /// Loads the initial state from a persistence collaborator, then runs.
    ///
    /// When `save_best_on_exit` is set, the best state is written back to
    /// the same store on completion.
    pub fn run_loaded<M, T>(
        model: &M,
        config: &AnnealConfig,
        store: &mut T,
        handle: &T::Handle,
    ) -> Result<AnnealResult<M::State>, AnnealError>
    where
        M: AnnealModel,
        T: StateStore<M::State>,
    {
        let initial = store.load(handle)?;
        Self::run_with(model, initial, config, &mut StderrProgress::new(), Some(store))
    }

    /// Runs annealing with an injected observer and an optional
    /// persistence collaborator.
    ///
    /// The observer is notified once per cooling rung with the rung
    /// temperature, the best energy so far, and the rung's acceptance and
    /// improvement rates.
    pub fn run_with<M, O, T>(
        model: &M,
        initial: M::State,
        config: &AnnealConfig,
        observer: &mut O,
        mut store: Option<&mut T>,
    ) -> Result<AnnealResult<M::State>, AnnealError>
    where
        M: AnnealModel,
        O: ProgressObserver + ?Sized,
        T: StateStore<M::State>,
    {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        };
        let copier = StateCopier::new(config.copy_strategy);
        let schedule = &config.schedule;
        let start = Instant::now();

        // Negative for tmax > tmin; zero when the bounds coincide.
        let t_factor = (schedule.tmin / schedule.tmax).ln();

        // The only from-scratch energy evaluation of the run; everything
        // after this tracks energy by accumulating move deltas.
        let mut current = initial;
        let mut energy = model.energy(&current);
        let mut best = copier.copy(&current)?;
        let mut best_energy = energy;
        let mut previous = copier.copy(&current)?;
        let mut previous_energy = energy;

        let total_steps = schedule.steps_per_temperature * config.cooling_steps;
        let mut steps = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;

        for rung in 0..config.cooling_steps {
            let temperature = schedule.tmax
                * (t_factor * rung as f64 / (config.cooling_steps - 1) as f64).exp();

            let mut trials = 0usize;
            let mut accepts = 0usize;
            let mut improves = 0usize;

            for _ in 0..schedule.steps_per_temperature {
                steps += 1;
                trials += 1;

                let delta = model.apply_move(&mut current, &mut rng);
                energy += delta;

                if delta > 0.0 && (-delta / temperature).exp() < rng.random_range(0.0..1.0) {
                    // Rejected: restore the previous accepted snapshot.
                    current = copier.copy(&previous)?;
                    energy = previous_energy;
                } else {
                    accepts += 1;
                    if delta < 0.0 {
                        improves += 1;
                    }
                    previous = copier.copy(&current)?;
                    previous_energy = energy;
                    if energy < best_energy {
                        best = copier.copy(&current)?;
                        best_energy = energy;
                    }
                }
            }

            // Re-anchor exploration to the best point found so far rather
            // than drifting with the last accepted point.
            current = copier.copy(&best)?;
            energy = best_energy;
            previous = copier.copy(&best)?;
            previous_energy = best_energy;

            accepted_moves += accepts;
            improving_moves += improves;

            let elapsed = start.elapsed();
            let remaining =
                Duration::from_secs_f64(elapsed.as_secs_f64() * (total_steps - steps) as f64
                    / steps as f64);
            observer.on_progress(&ProgressUpdate {
                step: steps,
                temperature,
                energy: best_energy,
                // Positive trial count is enforced by validate(); the
                // rates are always well defined.
                acceptance: accepts as f64 / trials as f64,
                improvement: improves as f64 / trials as f64,
                elapsed,
                remaining: Some(remaining),
            });
        }

        if config.save_best_on_exit {
            if let Some(store) = store.as_deref_mut() {
                store.save(&best)?;
            }
        }

        Ok(AnnealResult {
            best,
            best_energy,
            steps,
            accepted_moves,
            improving_moves,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Schedule;
    use crate::observer::NullProgress;
    use crate::state::CopyStrategy;
    use std::cell::Cell;

    // ---- Quadratic minimization: f(x) = x^2, minimum at 0 ----

    struct Quadratic;

    impl AnnealModel for Quadratic {
        type State = f64;

        fn apply_move<R: Rng>(&self, x: &mut f64, rng: &mut R) -> f64 {
            let old = *x;
            *x += rng.random_range(-1.0..1.0);
            *x * *x - old * old
        }

        fn energy(&self, x: &f64) -> f64 {
            x * x
        }
    }

    fn quiet_run<M: AnnealModel>(
        model: &M,
        initial: M::State,
        config: &AnnealConfig,
    ) -> Result<AnnealResult<M::State>, AnnealError> {
        AnnealRunner::run_with::<M, _, MemoryStore<M::State>>(
            model,
            initial,
            config,
            &mut NullProgress,
            None,
        )
    }

    fn quadratic_config() -> AnnealConfig {
        AnnealConfig::default()
            .with_schedule(Schedule {
                tmax: 100.0,
                tmin: 0.1,
                steps_per_temperature: 200,
            })
            .with_cooling_steps(50)
            .with_seed(42)
    }

    #[test]
    fn test_quadratic_converges_near_zero() {
        let result = quiet_run(&Quadratic, 100.0, &quadratic_config()).unwrap();

        assert!(
            result.best_energy < 0.1,
            "expected near-zero energy from x=100, got {}",
            result.best_energy
        );
        assert!(
            result.best.abs() < 0.4,
            "expected best x near 0, got {}",
            result.best
        );
        assert_eq!(result.steps, 50 * 200);
    }

    #[test]
    fn test_best_never_worse_than_initial() {
        for seed in 0..5 {
            let config = quadratic_config().with_seed(seed);
            let initial = 10.0;
            let result = quiet_run(&Quadratic, initial, &config).unwrap();
            assert!(
                result.best_energy <= Quadratic.energy(&initial),
                "seed {seed}: best energy {} worse than initial {}",
                result.best_energy,
                Quadratic.energy(&initial)
            );
        }
    }

    #[test]
    fn test_zero_tmin_fails_before_any_move() {
        struct CountingModel<'a> {
            moves: &'a Cell<usize>,
        }

        impl AnnealModel for CountingModel<'_> {
            type State = f64;

            fn apply_move<R: Rng>(&self, _x: &mut f64, _rng: &mut R) -> f64 {
                self.moves.set(self.moves.get() + 1);
                0.0
            }

            fn energy(&self, _x: &f64) -> f64 {
                0.0
            }
        }

        let moves = Cell::new(0);
        let model = CountingModel { moves: &moves };
        let config = AnnealConfig::default().with_tmin(0.0);

        let err = quiet_run(&model, 0.0, &config).unwrap_err();
        assert!(matches!(err, AnnealError::NonPositiveTmin { .. }));
        assert_eq!(moves.get(), 0, "no move may run under an invalid config");
    }

    #[test]
    fn test_downhill_moves_always_accepted() {
        // Every move strictly decreases energy; acceptance must be
        // unconditional regardless of the thermal draw.
        struct Downhill;

        impl AnnealModel for Downhill {
            type State = f64;

            fn apply_move<R: Rng>(&self, x: &mut f64, _rng: &mut R) -> f64 {
                *x -= 1.0;
                -1.0
            }

            fn energy(&self, x: &f64) -> f64 {
                *x
            }
        }

        let config = AnnealConfig::default()
            .with_tmax(1.0)
            .with_tmin(0.001)
            .with_steps_per_temperature(100)
            .with_cooling_steps(5)
            .with_seed(1);

        let result = quiet_run(&Downhill, 0.0, &config).unwrap();
        assert_eq!(result.accepted_moves, result.steps);
        assert_eq!(result.improving_moves, result.steps);
        assert_eq!(result.best_energy, -(result.steps as f64));
    }

    #[test]
    fn test_high_temperature_accepts_nearly_everything() {
        // Bounded |dE| and T >> |dE| pushes acceptance toward 1.
        let config = AnnealConfig::default()
            .with_tmax(1e9)
            .with_tmin(1e8)
            .with_steps_per_temperature(1000)
            .with_cooling_steps(5)
            .with_seed(42);

        let result = quiet_run(&Quadratic, 1.0, &config).unwrap();
        let acceptance = result.accepted_moves as f64 / result.steps as f64;
        assert!(
            acceptance > 0.999,
            "expected ~full acceptance at extreme temperature, got {acceptance}"
        );
    }

    #[test]
    fn test_low_temperature_rejects_uphill() {
        struct Uphill;

        impl AnnealModel for Uphill {
            type State = f64;

            fn apply_move<R: Rng>(&self, x: &mut f64, _rng: &mut R) -> f64 {
                *x += 1.0;
                1.0
            }

            fn energy(&self, x: &f64) -> f64 {
                *x
            }
        }

        let config = AnnealConfig::default()
            .with_tmax(1e-9)
            .with_tmin(1e-9)
            .with_steps_per_temperature(500)
            .with_cooling_steps(2)
            .with_seed(42);

        let result = quiet_run(&Uphill, 0.0, &config).unwrap();
        assert_eq!(result.accepted_moves, 0);
        assert_eq!(result.best_energy, 0.0);
        assert_eq!(result.best, 0.0);
    }

    #[test]
    fn test_rejection_restores_previous_state() {
        // All-uphill moves on a vector at negligible temperature: every
        // trial is rejected and the run must hand back the initial state
        // untouched.
        struct VecUphill;

        impl AnnealModel for VecUphill {
            type State = Vec<f64>;

            fn apply_move<R: Rng>(&self, state: &mut Vec<f64>, rng: &mut R) -> f64 {
                let i = rng.random_range(0..state.len());
                state[i] += 1.0;
                1.0
            }

            fn energy(&self, state: &Vec<f64>) -> f64 {
                state.iter().sum()
            }
        }

        let config = AnnealConfig::default()
            .with_tmax(1e-9)
            .with_tmin(1e-9)
            .with_steps_per_temperature(50)
            .with_cooling_steps(2)
            .with_copy_strategy(CopyStrategy::Slice)
            .with_seed(3);

        let result = quiet_run(&VecUphill, vec![0.0, 0.0, 0.0], &config).unwrap();
        assert_eq!(result.best, vec![0.0, 0.0, 0.0]);
        assert_eq!(result.accepted_moves, 0);
    }

    #[test]
    fn test_temperature_ladder_hits_bounds_monotonically() {
        struct Ladder(Vec<f64>);

        impl ProgressObserver for Ladder {
            fn on_progress(&mut self, update: &ProgressUpdate) {
                self.0.push(update.temperature);
            }
        }

        let config = quadratic_config();
        let mut ladder = Ladder(Vec::new());
        AnnealRunner::run_with::<_, _, MemoryStore<f64>>(
            &Quadratic,
            10.0,
            &config,
            &mut ladder,
            None,
        )
        .unwrap();

        let temperatures = ladder.0;
        assert_eq!(temperatures.len(), 50);
        assert!((temperatures[0] - 100.0).abs() < 1e-9);
        assert!((temperatures[49] - 0.1).abs() < 1e-9);
        for window in temperatures.windows(2) {
            assert!(
                window[1] < window[0],
                "temperature ladder must decrease: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_observer_sees_rates_and_progress() {
        struct Rates(Vec<ProgressUpdate>);

        impl ProgressObserver for Rates {
            fn on_progress(&mut self, update: &ProgressUpdate) {
                self.0.push(*update);
            }
        }

        let config = quadratic_config().with_cooling_steps(10);
        let mut rates = Rates(Vec::new());
        AnnealRunner::run_with::<_, _, MemoryStore<f64>>(
            &Quadratic,
            5.0,
            &config,
            &mut rates,
            None,
        )
        .unwrap();

        assert_eq!(rates.0.len(), 10);
        for (i, update) in rates.0.iter().enumerate() {
            assert_eq!(update.step, (i + 1) * 200);
            assert!((0.0..=1.0).contains(&update.acceptance));
            assert!((0.0..=1.0).contains(&update.improvement));
            assert!(update.improvement <= update.acceptance);
            assert!(update.remaining.is_some());
        }
    }

    #[test]
    fn test_save_best_on_exit_writes_to_store() {
        let config = quadratic_config().with_save_best_on_exit(true);
        let mut store = MemoryStore::new();

        let result = AnnealRunner::run_with(
            &Quadratic,
            10.0,
            &config,
            &mut NullProgress,
            Some(&mut store),
        )
        .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.load(&0).unwrap(), result.best);
    }

    #[test]
    fn test_save_best_on_exit_without_store_is_a_noop() {
        let config = quadratic_config().with_save_best_on_exit(true);
        let result = quiet_run(&Quadratic, 10.0, &config).unwrap();
        assert!(result.best_energy < 0.1);
    }

    #[test]
    fn test_run_loaded_starts_from_saved_state() {
        let mut store = MemoryStore::new();
        let handle = store.save(&10.0f64).unwrap();

        let config = quadratic_config().with_save_best_on_exit(true);
        let result = AnnealRunner::run_loaded(&Quadratic, &config, &mut store, &handle).unwrap();

        assert!(result.best_energy < 0.1);
        // Initial state plus the best state written back on exit.
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unsupported_copy_strategy_fails_at_first_use() {
        let config = quadratic_config().with_copy_strategy(CopyStrategy::Slice);
        let err = quiet_run(&Quadratic, 10.0, &config).unwrap_err();
        assert!(matches!(
            err,
            AnnealError::UnsupportedCopyStrategy {
                strategy: CopyStrategy::Slice
            }
        ));
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = quadratic_config();
        let first = quiet_run(&Quadratic, 25.0, &config).unwrap();
        let second = quiet_run(&Quadratic, 25.0, &config).unwrap();
        assert_eq!(first.best, second.best);
        assert_eq!(first.best_energy, second.best_energy);
        assert_eq!(first.accepted_moves, second.accepted_moves);
    }
}

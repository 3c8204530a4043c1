//! Generic simulated annealing.
//!
//! Minimizes a caller-defined scalar energy over an arbitrary state space
//! by probabilistically accepting energy-increasing moves according to a
//! temperature schedule that decreases over time (the Metropolis
//! criterion under exponential Tmax-to-Tmin cooling).
//!
//! Components:
//!
//! - **[`AnnealModel`]**: the caller-supplied capability pair, an
//!   in-place move operation returning its energy delta and a
//!   from-scratch energy evaluation. The state itself is opaque.
//! - **[`AnnealRunner`]**: the fixed-schedule annealing loop with
//!   best-state tracking and per-rung re-anchoring to the best point.
//! - **[`ScheduleEstimator`]**: empirically discovers a [`Schedule`]:
//!   a `tmax` giving ~98% acceptance, a `tmin` giving ~0% improving
//!   moves, and a per-temperature step count optionally scaled to fit a
//!   target wall-clock duration.
//! - **[`CopyState`] / [`CopyStrategy`]**: configurable defensive copying
//!   so that the current, previous-accepted, and best states never alias.
//! - **[`ProgressObserver`]** and **[`StateStore`]**: injectable progress
//!   and persistence collaborators; neither is baked into the engine.
//!
//! Execution is single-threaded and synchronous: a run owns its state
//! exclusively and performs no internal parallelism.
//!
//! # Example
//!
//! ```
//! use rand::Rng;
//! use sim_anneal::{
//!     AnnealConfig, AnnealModel, AnnealRunner, MemoryStore, NullProgress, Schedule,
//! };
//!
//! /// Minimize f(x) = x^2 with uniform +-1 perturbations.
//! struct Quadratic;
//!
//! impl AnnealModel for Quadratic {
//!     type State = f64;
//!
//!     fn apply_move<R: Rng>(&self, x: &mut f64, rng: &mut R) -> f64 {
//!         let old = *x;
//!         *x += rng.random_range(-1.0..1.0);
//!         *x * *x - old * old
//!     }
//!
//!     fn energy(&self, x: &f64) -> f64 {
//!         x * x
//!     }
//! }
//!
//! let config = AnnealConfig::default()
//!     .with_schedule(Schedule {
//!         tmax: 100.0,
//!         tmin: 0.1,
//!         steps_per_temperature: 200,
//!     })
//!     .with_cooling_steps(50)
//!     .with_seed(42);
//!
//! let result = AnnealRunner::run_with::<_, _, MemoryStore<f64>>(
//!     &Quadratic,
//!     100.0,
//!     &config,
//!     &mut NullProgress,
//!     None,
//! )
//! .unwrap();
//!
//! assert!(result.best_energy < 0.1);
//! ```
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod error;
mod estimator;
mod model;
mod observer;
mod runner;
mod state;
mod store;
mod util;

pub use config::{AnnealConfig, Schedule};
pub use error::AnnealError;
pub use estimator::{EstimateOutcome, EstimatorConfig, ScheduleEstimator};
pub use model::AnnealModel;
pub use observer::{NullProgress, ProgressObserver, ProgressUpdate, StderrProgress};
pub use runner::{AnnealResult, AnnealRunner};
pub use state::{CopyState, CopyStrategy, StateCopier};
pub use store::{MemoryStore, StateStore};
pub use util::{round_figures, time_string};

//! Core trait for annealing problems.

use rand::Rng;

use crate::state::CopyState;

/// Defines the caller side of a simulated annealing problem: how to
/// perturb a state and how to measure its energy.
///
/// The engine owns temperature management, the Metropolis acceptance
/// criterion, best-state tracking, and cooling; the model only supplies
/// moves and energies. The state itself is opaque to the engine: it is
/// copied (per the configured [`crate::CopyStrategy`]) and handed back
/// into the model, never inspected.
///
/// # Minimization
///
/// Annealing minimizes energy. For maximization, negate the energy.
///
/// # Delta discipline
///
/// [`apply_move`](Self::apply_move) perturbs the state in place and
/// returns the signed energy change `dE` it caused, so that
/// `energy_after = energy_before + dE` exactly. The engine tracks energy
/// by accumulating deltas; [`energy`](Self::energy) is evaluated from
/// scratch only at run initialization (and at the start of each estimator
/// probe). Deltas that drift from the true energy are a model defect the
/// engine does not detect.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use sim_anneal::AnnealModel;
///
/// /// Minimize f(x) = x^2 with uniform +-1 perturbations.
/// struct Quadratic;
///
/// impl AnnealModel for Quadratic {
///     type State = f64;
///
///     fn apply_move<R: Rng>(&self, x: &mut f64, rng: &mut R) -> f64 {
///         let old = *x;
///         *x += rng.random_range(-1.0..1.0);
///         *x * *x - old * old
///     }
///
///     fn energy(&self, x: &f64) -> f64 {
///         x * x
///     }
/// }
/// ```
pub trait AnnealModel {
    /// The state representation.
    type State: CopyState;

    /// Perturbs the state in place, returning the energy delta caused by
    /// the perturbation.
    fn apply_move<R: Rng>(&self, state: &mut Self::State, rng: &mut R) -> f64;

    /// Computes the absolute energy of a state from scratch. Lower is
    /// better.
    fn energy(&self, state: &Self::State) -> f64;
}

//! Error types.

use thiserror::Error;

use crate::state::CopyStrategy;

/// Errors surfaced by the annealing engine and the schedule estimator.
///
/// Configuration errors are raised by `validate()` before any move is
/// attempted. Defects in the caller's model (panicking callbacks,
/// non-finite deltas, a seed loop that never produces a nonzero delta)
/// are not caught here and propagate as-is.
#[derive(Debug, Error)]
pub enum AnnealError {
    /// Exponential cooling takes `ln(tmin / tmax)`; a non-positive floor
    /// temperature makes that undefined.
    #[error("exponential cooling requires tmin > 0, got {tmin}")]
    NonPositiveTmin {
        /// The rejected floor temperature.
        tmin: f64,
    },

    /// A schedule whose ceiling lies below its floor.
    #[error("schedule requires tmax >= tmin, got tmax {tmax} < tmin {tmin}")]
    InvertedTemperatureBounds {
        /// The rejected ceiling temperature.
        tmax: f64,
        /// The floor temperature it fell below.
        tmin: f64,
    },

    /// The rung temperature interpolation divides by `cooling_steps - 1`.
    #[error("cooling schedule requires at least 2 rungs, got {0}")]
    TooFewCoolingSteps(usize),

    /// A zero-trial rung would make its acceptance and improvement rates
    /// 0/0, so zero is rejected up front.
    #[error("steps_per_temperature must be positive")]
    ZeroStepsPerTemperature,

    /// The configured copy strategy is not offered by the state type.
    /// Raised on the first copy, never silently aliased around.
    #[error("copy strategy {strategy:?} is not supported by this state type")]
    UnsupportedCopyStrategy {
        /// The strategy the state type declined.
        strategy: CopyStrategy,
    },

    /// The temperature seed probe hit its configured move cap without
    /// observing a nonzero energy delta.
    #[error("temperature seeding exhausted {0} moves without a nonzero energy delta")]
    SeedMovesExhausted(usize),

    /// A persistence collaborator failure, propagated unmodified.
    #[error("state persistence failed")]
    Persistence(#[from] std::io::Error),
}

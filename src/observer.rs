//! Progress reporting capability.
//!
//! Progress is a side-effecting callback injected into the engine, not a
//! logging concern baked into it: the default implementation writes a
//! fixed-width table to stderr, and embedders swap in their own sink (or
//! [`NullProgress`]) without touching the annealing loop.

use std::io::Write;
use std::time::Duration;

use crate::util::time_string;

/// A per-rung (engine) or per-probe (estimator) progress report.
#[derive(Debug, Clone, Copy)]
pub struct ProgressUpdate {
    /// Total trial moves performed so far.
    pub step: usize,

    /// Temperature of the rung or probe just finished.
    pub temperature: f64,

    /// Best energy found so far.
    pub energy: f64,

    /// Fraction of trials accepted by the Metropolis criterion, including
    /// worsening moves reached by thermal excitation.
    pub acceptance: f64,

    /// Fraction of trials that were accepted and strictly decreased
    /// energy. Tends toward zero at low temperatures.
    pub improvement: f64,

    /// Wall-clock time since the run started.
    pub elapsed: Duration,

    /// Projected time to completion, when the total run length is known.
    /// Estimator probes report `None`.
    pub remaining: Option<Duration>,
}

/// Side-effecting sink for progress updates.
///
/// Invoked once per cooling rung by the engine and once per probe by the
/// estimator. The return value is ignored and implementations must not
/// mutate the annealing state. An embedding system that wants
/// cancellation can check a flag here and unwind.
pub trait ProgressObserver {
    /// Receives one progress report.
    fn on_progress(&mut self, update: &ProgressUpdate);
}

/// Discards all updates.
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {
    fn on_progress(&mut self, _update: &ProgressUpdate) {}
}

/// Default observer: a fixed-width progress table on stderr, one
/// carriage-returned row per update. Write failures are ignored; a broken
/// stderr must not abort a long run.
#[derive(Debug, Default)]
pub struct StderrProgress {
    header_written: bool,
}

impl StderrProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressObserver for StderrProgress {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        let mut err = std::io::stderr();
        if !self.header_written {
            let _ = writeln!(
                err,
                " Temperature        Energy    Accept   Improve     Elapsed   Remaining"
            );
            self.header_written = true;
        }
        let remaining = match update.remaining {
            Some(remaining) => time_string(remaining.as_secs_f64()),
            None => "        --".to_string(),
        };
        let _ = write!(
            err,
            "\r{:12.5}  {:12.2}   {:6.2}%   {:6.2}%  {}  {}",
            update.temperature,
            update.energy,
            update.acceptance * 100.0,
            update.improvement * 100.0,
            time_string(update.elapsed.as_secs_f64()),
            remaining,
        );
        let _ = err.flush();
    }
}

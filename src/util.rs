//! Shared numeric and formatting helpers.

/// Rounds `x` to `n` significant figures.
///
/// Used by the schedule estimator to keep probe temperatures stable and
/// human-readable while walking the 1.5x temperature ladder.
pub fn round_figures(x: f64, n: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let magnitude = x.abs().log10().ceil() as i32;
    let factor = 10f64.powi(n as i32 - magnitude);
    (x * factor).round() / factor
}

/// Formats a duration in seconds as `HHHH:MM:SS`.
pub fn time_string(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (hours, rest) = (total / 3600, total % 3600);
    let (minutes, secs) = (rest / 60, rest % 60);
    format!("{hours:4}:{minutes:02}:{secs:02}")
}

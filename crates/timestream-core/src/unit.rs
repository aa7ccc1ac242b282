//! Small numeric helpers for probabilities, scores and tunables.
//!
//! Every probability or score in the pipeline lives in a closed interval.
//! These helpers clamp at the boundary instead of rejecting input, so a
//! misconfigured tunable degrades gracefully rather than stalling the
//! stream.

/// Clamp `value` into `[low, high]`. `NaN` collapses to `low`.
pub fn clamp(value: f64, low: f64, high: f64) -> f64 {
    if value.is_nan() {
        return low;
    }
    value.max(low).min(high)
}

/// Clamp `value` into the unit interval `[0, 1]`. `NaN` collapses to 0.0.
pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// Round to two decimal places, the precision exposed in debug payloads.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

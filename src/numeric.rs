//! Numeric conversion helpers used across the project.
//!
//! Host timestamps arrive as `f64` seconds while the simulation runs in `f32`.
//! These utilities keep the narrowing conversions in one place and recover
//! locally from non-physical values instead of surfacing errors.

/// Narrow an `f64` to `f32`, mapping non-finite input to `None`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Values are checked for finiteness; precision loss is acceptable for deltas."
)]
#[must_use]
pub fn narrow_f32(value: f64) -> Option<f32> {
    if !value.is_finite() {
        return None;
    }
    let narrowed = value as f32;
    narrowed.is_finite().then_some(narrowed)
}

/// Elapsed seconds between two host timestamps.
///
/// Returns `None` when either timestamp is non-finite or time ran backwards,
/// so callers can treat the sample as unreliable.
///
/// # Examples
///
/// ```
/// use palmtide::numeric::elapsed_seconds;
/// assert_eq!(elapsed_seconds(1.0, 1.5), Some(0.5));
/// assert_eq!(elapsed_seconds(2.0, 1.0), None);
/// ```
#[must_use]
pub fn elapsed_seconds(earlier: f64, later: f64) -> Option<f32> {
    let delta = later - earlier;
    if delta < 0.0 {
        return None;
    }
    narrow_f32(delta)
}

/// Convert a small count into `f32` for averaging.
#[expect(
    clippy::cast_precision_loss,
    reason = "Counts here are landmark or sample counts far below 2^24."
)]
#[must_use]
pub const fn count_f32(count: usize) -> f32 {
    count as f32
}

/// Convert a substep count into `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Substep counts are single digits."
)]
#[must_use]
pub const fn substeps_f32(count: u32) -> f32 {
    count as f32
}

//! Basic vector math helper functions.
//! Small helpers for clamping, blending and normalising 2D vectors.
use glam::Vec2;

/// Limits the magnitude of `vector` to `max`, preserving its direction.
///
/// Non-finite input collapses to the zero vector so a single bad sample
/// cannot poison downstream velocities.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use palmtide::vector_math::clamp_magnitude;
/// let clamped = clamp_magnitude(Vec2::new(30.0, 40.0), 10.0);
/// assert!((clamped.length() - 10.0).abs() < 1e-4);
/// assert!((clamped.x - 6.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn clamp_magnitude(vector: Vec2, max: f32) -> Vec2 {
    if !vector.is_finite() {
        return Vec2::ZERO;
    }
    vector.clamp_length_max(max.max(0.0))
}

/// Returns the unit vector in the direction of `vector`.
///
/// The function checks that all components are finite and the vector is
/// non-zero before normalising. Invalid or zero input returns `None` so the
/// caller can pick a fallback axis.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use palmtide::vec_normalize;
/// let unit = vec_normalize(Vec2::new(3.0, 4.0)).unwrap_or_default();
/// assert!((unit.x - 0.6).abs() < 1e-6);
/// assert!((unit.y - 0.8).abs() < 1e-6);
///
/// assert!(vec_normalize(Vec2::ZERO).is_none());
/// ```
#[must_use]
pub fn vec_normalize(vector: Vec2) -> Option<Vec2> {
    if !vector.is_finite() {
        return None;
    }
    vector.try_normalize()
}

/// Linear interpolation from `from` toward `to` by factor `t` in `[0, 1]`.
#[must_use]
pub fn lerp(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Component-wise average of `points`, or `None` when empty.
#[must_use]
pub fn centroid(points: impl IntoIterator<Item = Vec2>) -> Option<Vec2> {
    let (sum, count) = points
        .into_iter()
        .fold((Vec2::ZERO, 0_usize), |(acc, n), p| (acc + p, n + 1));
    (count > 0).then(|| sum / crate::numeric::count_f32(count))
}

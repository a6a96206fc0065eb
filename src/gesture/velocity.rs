//! Velocity estimation for pointer anchors.
//!
//! Instantaneous velocity is only computed when the interval since the
//! previous sample lies inside a plausible band; stalls and duplicate
//! callbacks fall outside it and the estimate decays toward zero instead.
//! Accepted samples are clamped to the throw speed cap and blended into the
//! running estimate.

use glam::Vec2;

use crate::config::GestureConfig;
use crate::numeric::elapsed_seconds;
use crate::vector_math::{clamp_magnitude, lerp};

/// Returns the sample interval if it lies in the plausible band.
#[must_use]
pub fn plausible_dt(previous: f64, current: f64, config: &GestureConfig) -> Option<f32> {
    elapsed_seconds(previous, current)
        .filter(|dt| (config.min_sample_dt..=config.max_sample_dt).contains(dt))
}

/// Smoothed world-space velocity of one tracked point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityEstimator {
    last: Option<(Vec2, f64)>,
    velocity: Vec2,
}

impl VelocityEstimator {
    /// Current smoothed velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Feeds a position sample taken at host time `t`.
    pub fn update(&mut self, pos: Vec2, t: f64, config: &GestureConfig, max_speed: f32) -> Vec2 {
        let instantaneous = self.last.and_then(|(prev_pos, prev_t)| {
            plausible_dt(prev_t, t, config).map(|dt| (pos - prev_pos) / dt)
        });
        self.velocity = match instantaneous {
            Some(raw) => lerp(
                clamp_magnitude(raw, max_speed),
                self.velocity,
                config.velocity_smoothing,
            ),
            None => self.velocity * config.velocity_decay,
        };
        self.last = Some((pos, t));
        self.velocity
    }

    /// Forgets all history.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

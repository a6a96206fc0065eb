//! Release velocity estimation.
//!
//! While a body is held, every detector callback records the hand's pointer
//! velocity. At release the trailing window is reduced to one velocity: the
//! component-wise median rejects single-frame tracking spikes, and an
//! exponentially recency-weighted mean of the surviving samples keeps the
//! acceleration at the moment of release.

use std::collections::VecDeque;

use glam::Vec2;
use ordered_float::OrderedFloat;

use crate::config::ThrowConfig;
use crate::numeric::narrow_f32;
use crate::vector_math::clamp_magnitude;

/// Upper bound on stored samples; the time window normally prunes first.
const MAX_SAMPLES: usize = 64;

/// A pointer velocity observed during a grab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowSample {
    /// World-space velocity.
    pub vel: Vec2,
    /// Host time in seconds.
    pub t: f64,
}

/// Rolling sample buffer for one hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThrowHistory {
    samples: VecDeque<ThrowSample>,
}

fn median(values: &mut [f32]) -> f32 {
    values.sort_unstable_by_key(|v| OrderedFloat(*v));
    let mid = values.len() / 2;
    match (values.get(mid.wrapping_sub(1)), values.get(mid)) {
        (Some(lo), Some(hi)) if values.len() % 2 == 0 => (lo + hi) * 0.5,
        (_, Some(mid_value)) => *mid_value,
        _ => 0.0,
    }
}

impl ThrowHistory {
    /// Records a sample, discarding non-finite velocities.
    pub fn push(&mut self, vel: Vec2, t: f64) {
        if !vel.is_finite() {
            return;
        }
        if self.samples.len() == MAX_SAMPLES {
            self.samples.pop_front();
        }
        self.samples.push_back(ThrowSample { vel, t });
    }

    /// Number of stored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Forgets every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Drops samples older than `window` seconds before `now`.
    pub fn prune(&mut self, now: f64, window: f32) {
        let oldest = now - f64::from(window);
        self.samples.retain(|s| s.t >= oldest);
    }

    /// Robust throw velocity over the trailing window ending at `now`.
    ///
    /// Returns `None` when fewer than `min_samples` samples fall inside the
    /// window, so the caller can fall back to the live pointer velocity.
    pub fn estimate(&mut self, now: f64, config: &ThrowConfig) -> Option<Vec2> {
        self.prune(now, config.window);
        if self.samples.len() < config.min_samples.max(1) {
            return None;
        }

        let mut xs: Vec<f32> = self.samples.iter().map(|s| s.vel.x).collect();
        let mut ys: Vec<f32> = self.samples.iter().map(|s| s.vel.y).collect();
        let center = Vec2::new(median(&mut xs), median(&mut ys));

        let threshold = config.outlier_fraction * config.max_speed;
        let inliers: Vec<&ThrowSample> = self
            .samples
            .iter()
            .filter(|s| s.vel.distance(center) <= threshold)
            .collect();
        let chosen: Vec<&ThrowSample> = if inliers.is_empty() {
            self.samples.iter().collect()
        } else {
            inliers
        };

        let (sum, weight) = chosen.iter().fold((Vec2::ZERO, 0.0_f32), |(sum, weight), s| {
            let age = narrow_f32(now - s.t).unwrap_or(0.0).max(0.0);
            let w = 0.5_f32.powf(age / config.half_life);
            (sum + s.vel * w, weight + w)
        });
        if !(weight > 0.0) {
            return None;
        }
        Some(clamp_magnitude(sum / weight, config.max_speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> ThrowConfig {
        ThrowConfig::default()
    }

    #[rstest]
    fn too_few_samples_defer_to_fallback(config: ThrowConfig) {
        let mut history = ThrowHistory::default();
        history.push(Vec2::new(100.0, 0.0), 0.0);
        history.push(Vec2::new(100.0, 0.0), 0.016);
        assert!(history.estimate(0.02, &config).is_none());
    }

    #[rstest]
    fn stale_samples_fall_out_of_window(config: ThrowConfig) {
        let mut history = ThrowHistory::default();
        for i in 0_u8..5 {
            history.push(Vec2::new(100.0, 0.0), f64::from(i) * 0.016);
        }
        assert!(history.estimate(2.0, &config).is_none());
        assert!(history.is_empty());
    }

    #[rstest]
    fn single_spike_is_rejected(config: ThrowConfig) {
        let mut history = ThrowHistory::default();
        let samples = [
            (500.0, 0.0),
            (520.0, 0.016),
            (3200.0, 0.032),
            (510.0, 0.048),
            (505.0, 0.064),
        ];
        for (vx, t) in samples {
            history.push(Vec2::new(vx, 0.0), t);
        }
        let estimate = history.estimate(0.07, &config).expect("enough samples");
        assert!(estimate.x > 490.0 && estimate.x < 530.0, "got {estimate:?}");
    }

    #[rstest]
    fn recent_samples_weigh_more(config: ThrowConfig) {
        let mut history = ThrowHistory::default();
        history.push(Vec2::new(100.0, 0.0), 0.0);
        history.push(Vec2::new(200.0, 0.0), 0.035);
        history.push(Vec2::new(300.0, 0.0), 0.07);
        let estimate = history.estimate(0.07, &config).expect("enough samples");
        assert!(estimate.x > 200.0);
        assert_relative_eq!(estimate.y, 0.0);
    }

    #[rstest]
    fn estimate_respects_speed_cap(config: ThrowConfig) {
        let mut history = ThrowHistory::default();
        for i in 0_u8..4 {
            history.push(Vec2::new(9000.0, 9000.0), f64::from(i) * 0.01);
        }
        let estimate = history.estimate(0.03, &config).expect("enough samples");
        assert!(estimate.length() <= config.max_speed + 1e-2);
    }
}

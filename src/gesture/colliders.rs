//! Kinematic hand colliders.
//!
//! Each tracked hand contributes one palm circle and four knuckle circles in
//! world space. Their velocities are finite differences of consecutive
//! positions, gated by the same plausible-interval band as pointer
//! velocities and capped at the same speed, so bodies can be batted around
//! without grabbing them.

use glam::Vec2;

use super::landmarks::ScreenHand;
use crate::camera::{Camera, Viewport};
use crate::config::{GestureConfig, HandColliderConfig};
use crate::constants::KNUCKLE_LANDMARKS;
use crate::gesture::velocity::plausible_dt;
use crate::vector_math::clamp_magnitude;
use crate::world::body::Shape;
use crate::world::resolve::FixedCollider;

/// Collider positions and their timestamp for one hand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandColliders {
    colliders: Vec<FixedCollider>,
    sampled_at: Option<f64>,
}

impl HandColliders {
    /// Current colliders, empty when the hand is not tracked.
    #[must_use]
    pub fn as_slice(&self) -> &[FixedCollider] {
        &self.colliders
    }

    /// Drops every collider.
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.sampled_at = None;
    }

    /// Rebuilds the colliders from this frame's points.
    pub fn rebuild(
        &mut self,
        frame: &ColliderFrame<'_>,
        palm_screen: Vec2,
        screen: &ScreenHand,
        t: f64,
    ) {
        let dt = self
            .sampled_at
            .and_then(|prev| plausible_dt(prev, t, frame.gesture));
        let palm_radius = frame.camera.screen_len_to_world(
            frame.hand.palm_radius * frame.viewport.pixel_ratio,
        );
        let knuckle_radius = frame.camera.screen_len_to_world(
            frame.hand.knuckle_radius * frame.viewport.pixel_ratio,
        );

        let centres = std::iter::once((palm_screen, palm_radius)).chain(
            KNUCKLE_LANDMARKS
                .iter()
                .filter_map(|&i| screen.get(i).copied())
                .map(|p| (p, knuckle_radius)),
        );
        let previous = std::mem::take(&mut self.colliders);
        self.colliders = centres
            .enumerate()
            .map(|(slot, (point, radius))| {
                let pos = frame.camera.screen_to_world(point, frame.viewport);
                let vel = match (dt, previous.get(slot)) {
                    (Some(dt), Some(prev)) => {
                        clamp_magnitude((pos - prev.pos) / dt, frame.max_speed)
                    }
                    _ => Vec2::ZERO,
                };
                FixedCollider {
                    pos,
                    vel,
                    shape: Shape::Circle { radius },
                    restitution: frame.hand.restitution,
                }
            })
            .collect();
        self.sampled_at = Some(t);
    }
}

/// Camera and tuning needed to place colliders.
#[derive(Debug, Clone, Copy)]
pub struct ColliderFrame<'a> {
    /// Current camera.
    pub camera: &'a Camera,
    /// Current surface.
    pub viewport: &'a Viewport,
    /// Interval gating.
    pub gesture: &'a GestureConfig,
    /// Collider sizes.
    pub hand: &'a HandColliderConfig,
    /// Cap on collider speed in world px/s.
    pub max_speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn shifted(dx: f32) -> ScreenHand {
        let mut screen = [Vec2::new(200.0, 200.0); 21];
        for p in &mut screen {
            p.x += dx;
        }
        screen
    }

    #[rstest]
    fn palm_and_knuckles_are_built() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera {
            zoom: 0.5,
            ..Camera::identity_for(&viewport)
        };
        let gesture = GestureConfig::default();
        let hand = HandColliderConfig::default();
        let frame = ColliderFrame {
            camera: &camera,
            viewport: &viewport,
            gesture: &gesture,
            hand: &hand,
            max_speed: 3200.0,
        };
        let mut colliders = HandColliders::default();
        colliders.rebuild(&frame, Vec2::new(200.0, 200.0), &shifted(0.0), 0.0);
        assert_eq!(colliders.as_slice().len(), 5);
        let palm = colliders.as_slice().first().expect("palm collider");
        assert_eq!(
            palm.shape,
            Shape::Circle {
                radius: hand.palm_radius * 2.0
            }
        );
        assert_eq!(palm.vel, Vec2::ZERO);

        colliders.rebuild(&frame, Vec2::new(210.0, 200.0), &shifted(10.0), 1.0 / 30.0);
        let moved = colliders.as_slice().first().expect("palm collider");
        assert_relative_eq!(moved.vel.x, 600.0, epsilon = 0.1);
    }

    #[rstest]
    fn tracking_jump_is_capped() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera::identity_for(&viewport);
        let gesture = GestureConfig::default();
        let hand = HandColliderConfig::default();
        let frame = ColliderFrame {
            camera: &camera,
            viewport: &viewport,
            gesture: &gesture,
            hand: &hand,
            max_speed: 1000.0,
        };
        let mut colliders = HandColliders::default();
        colliders.rebuild(&frame, Vec2::new(100.0, 200.0), &shifted(-100.0), 0.0);
        colliders.rebuild(&frame, Vec2::new(700.0, 200.0), &shifted(500.0), 1.0 / 30.0);
        for collider in colliders.as_slice() {
            assert!(collider.vel.length() <= 1000.0 + 1e-2, "got {:?}", collider.vel);
        }
        let palm = colliders.as_slice().first().expect("palm collider");
        assert_relative_eq!(palm.vel.x, 1000.0, epsilon = 0.1);
    }
}

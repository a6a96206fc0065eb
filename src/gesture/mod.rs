//! Gesture interpreter.
//!
//! Turns one hand's raw landmarks into screen points, a smoothed point cloud,
//! a pinch classification, pointer and palm velocities, and kinematic
//! colliders. It writes only to the [`HandState`] it is given; grabbing and
//! releasing bodies is left to the caller, driven by the returned
//! [`PinchEdge`].

pub mod colliders;
pub mod landmarks;
pub mod pinch;
pub mod velocity;

use glam::Vec2;

use crate::camera::{Camera, Viewport};
use crate::config::{GestureConfig, HandColliderConfig};
use crate::hand::HandState;
use crate::vector_math::lerp;
use colliders::ColliderFrame;
use landmarks::{palm_center, pinch_anchor, screen_pinch_distance, HandLandmarks, ScreenHand};
use pinch::PinchEdge;

/// Result of interpreting one hand for one callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureUpdate {
    /// Pinch transition this callback.
    pub edge: PinchEdge,
    /// Pinch anchor in world space.
    pub anchor_world: Vec2,
}

/// Stateless per-hand interpreter carrying its tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureInterpreter {
    gesture: GestureConfig,
    hand: HandColliderConfig,
    max_speed: f32,
}

/// Blends every point of `raw` toward `previous` by `factor`.
fn smooth(previous: Option<&ScreenHand>, raw: &ScreenHand, factor: f32) -> ScreenHand {
    match previous {
        Some(prev) => {
            let mut out = *raw;
            for (point, old) in out.iter_mut().zip(prev) {
                *point = lerp(*point, *old, factor);
            }
            out
        }
        None => *raw,
    }
}

impl GestureInterpreter {
    /// Interpreter with the given tuning; `max_speed` caps pointer velocity.
    #[must_use]
    pub const fn new(gesture: GestureConfig, hand: HandColliderConfig, max_speed: f32) -> Self {
        Self {
            gesture,
            hand,
            max_speed,
        }
    }

    /// Pinch distance used for classification.
    ///
    /// The smaller of the normalised distance and the pixel distance over
    /// the viewport's smaller side, so a pinch reads the same on wide and
    /// tall surfaces.
    #[must_use]
    pub fn pinch_distance(landmarks: &HandLandmarks, screen: &ScreenHand, viewport: &Viewport) -> f32 {
        landmarks
            .pinch_distance()
            .min(screen_pinch_distance(screen, viewport))
    }

    /// Updates `state` from this callback's landmarks taken at host time `t`.
    pub fn update(
        &self,
        state: &mut HandState,
        landmarks: &HandLandmarks,
        t: f64,
        camera: &Camera,
        viewport: &Viewport,
    ) -> GestureUpdate {
        let raw = landmarks.to_screen(viewport);
        let distance = Self::pinch_distance(landmarks, &raw, viewport);
        let edge = state
            .pinch
            .update(distance, self.gesture.pinch_start, self.gesture.pinch_end);
        state.tracked = true;

        let factor = if state.pinch.is_pinching() {
            self.gesture.pinch_point_smoothing
        } else {
            self.gesture.point_smoothing
        };
        let smoothed = smooth(state.smoothed.as_ref(), &raw, factor);
        state.smoothed = Some(smoothed);

        let anchor = pinch_anchor(&smoothed);
        let anchor_world = camera.screen_to_world(anchor, viewport);
        state.pointer.prev_pinch = state.pointer.pinch;
        state.pointer.pinch = state.pinch.is_pinching().then_some(anchor);
        state
            .pointer
            .estimator_mut()
            .update(anchor_world, t, &self.gesture, self.max_speed);

        let palm = palm_center(&smoothed);
        state.palm = Some(palm);
        state.palm_velocity.update(
            camera.screen_to_world(palm, viewport),
            t,
            &self.gesture,
            self.max_speed,
        );

        let frame = ColliderFrame {
            camera,
            viewport,
            gesture: &self.gesture,
            hand: &self.hand,
            max_speed: self.max_speed,
        };
        state.colliders.rebuild(&frame, palm, &smoothed, t);

        GestureUpdate { edge, anchor_world }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::constants::{INDEX_TIP, LANDMARK_COUNT, THUMB_TIP};
    use landmarks::Landmark;
    use rstest::{fixture, rstest};

    #[fixture]
    fn interpreter() -> GestureInterpreter {
        let config = EngineConfig::default();
        GestureInterpreter::new(config.gesture, config.hand, config.throw.max_speed)
    }

    fn hand(center: Vec2, gap: f32) -> HandLandmarks {
        let mut points = [Landmark::new(center.x, center.y + 0.1); LANDMARK_COUNT];
        if let Some(p) = points.get_mut(THUMB_TIP) {
            *p = Landmark::new(center.x - gap * 0.5, center.y);
        }
        if let Some(p) = points.get_mut(INDEX_TIP) {
            *p = Landmark::new(center.x + gap * 0.5, center.y);
        }
        HandLandmarks::new(points).expect("finite landmarks")
    }

    #[rstest]
    fn pinch_sets_pointer_and_release_clears_it(interpreter: GestureInterpreter) {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera::identity_for(&viewport);
        let mut state = HandState::default();

        let open = interpreter.update(&mut state, &hand(Vec2::splat(0.5), 0.2), 0.0, &camera, &viewport);
        assert_eq!(open.edge, PinchEdge::None);
        assert!(state.pointer.pinch.is_none());
        assert_eq!(state.colliders.as_slice().len(), 5);

        let closed = interpreter.update(
            &mut state,
            &hand(Vec2::splat(0.5), 0.01),
            1.0 / 30.0,
            &camera,
            &viewport,
        );
        assert_eq!(closed.edge, PinchEdge::Started);
        assert!(state.pointer.pinch.is_some());
        assert!(state.is_pinching());

        let reopened = interpreter.update(
            &mut state,
            &hand(Vec2::splat(0.5), 0.3),
            2.0 / 30.0,
            &camera,
            &viewport,
        );
        assert_eq!(reopened.edge, PinchEdge::Ended);
        assert!(state.pointer.pinch.is_none());
    }

    #[rstest]
    fn moving_hand_builds_velocity(interpreter: GestureInterpreter) {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera::identity_for(&viewport);
        let mut state = HandState::default();
        for i in 0_u8..6 {
            let x = 0.7 - f32::from(i) * 0.02;
            let t = f64::from(i) / 30.0;
            interpreter.update(&mut state, &hand(Vec2::new(x, 0.5), 0.2), t, &camera, &viewport);
        }
        // Landmark x decreases, so the mirrored screen x increases.
        assert!(state.pointer.pinch_vel().x > 0.0);
        assert!(state.palm_velocity.velocity().x > 0.0);
    }
}

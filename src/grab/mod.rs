//! Grab controller: acquire, follow, and release.
//!
//! A pinch start picks the nearest body within the zoom-aware grab radius.
//! While held, the body's velocity is pulled toward the pinch target each
//! substep. A pinch end hands the body back to physics with the robust
//! throw estimate from [`throw::ThrowHistory`].

pub mod throw;

use glam::Vec2;
use log::debug;

use crate::camera::{Camera, Viewport};
use crate::config::{GrabConfig, ThrowConfig};
use crate::hand::HandSlots;
use crate::vector_math::{clamp_magnitude, lerp};
use crate::world::body::{BodyId, PhysicsBody};
use crate::world::contact::pick_distance;
use crate::world::{GrabDrive, PhysicsWorld};

/// Velocity a held body should move with for one substep.
///
/// The desired velocity is the pointer's own velocity plus a spring term
/// toward the target; the body blends toward it by `follow_strength`.
#[must_use]
pub fn follow_velocity(body: &PhysicsBody, drive: &GrabDrive, config: &GrabConfig) -> Vec2 {
    let desired = drive.pointer_vel + (drive.target - body.pos) * config.gain;
    let desired = clamp_magnitude(desired, config.max_speed);
    lerp(body.vel, desired, config.follow_strength)
}

/// Finds the body a pinch at `anchor` would pick up for `hand`.
///
/// Bodies already held by another hand are skipped. Ties keep the earliest
/// body in storage order.
fn pick_body(
    world: &PhysicsWorld,
    slots: &HandSlots,
    hand: usize,
    anchor: Vec2,
    radius: f32,
) -> Option<BodyId> {
    world
        .bodies()
        .iter()
        .filter(|body| !slots.held_by_other(body.id, hand))
        .map(|body| (body.id, pick_distance(anchor, body.pos, &body.shape)))
        .filter(|(_, distance)| *distance <= radius)
        .fold(None, |best: Option<(BodyId, f32)>, (id, distance)| match best {
            Some((_, best_distance)) if best_distance <= distance => best,
            _ => Some((id, distance)),
        })
        .map(|(id, _)| id)
}

/// Velocity to impart on release.
///
/// Prefers the windowed estimate and falls back to the live pointer
/// velocity. The result is scaled, capped, and blended with the body's
/// current velocity.
fn release_velocity(
    estimate: Option<Vec2>,
    pointer_vel: Vec2,
    body_vel: Vec2,
    config: &ThrowConfig,
) -> Vec2 {
    let base = clamp_magnitude(estimate.unwrap_or(pointer_vel) * config.scale, config.max_speed);
    clamp_magnitude(lerp(body_vel, base, config.blend), config.max_speed)
}

/// Grab and throw tuning with the acquire, sample and release entry points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrabController {
    grab: GrabConfig,
    throw: ThrowConfig,
}

impl GrabController {
    /// Controller with the given tuning.
    #[must_use]
    pub const fn new(grab: GrabConfig, throw: ThrowConfig) -> Self {
        Self { grab, throw }
    }

    /// Grab radius in world units for the current zoom.
    fn radius_world(&self, camera: &Camera, viewport: &Viewport) -> f32 {
        camera.screen_len_to_world(self.grab.radius * viewport.pixel_ratio)
    }

    /// Attempts a grab for `hand` at world point `anchor`.
    ///
    /// On success the hand's throw history is reset and the id is stored in
    /// the slot. Returns the grabbed body.
    pub fn acquire(
        &self,
        slots: &mut HandSlots,
        hand: usize,
        world: &PhysicsWorld,
        anchor: Vec2,
        camera: &Camera,
        viewport: &Viewport,
    ) -> Option<BodyId> {
        let radius = self.radius_world(camera, viewport);
        let picked = pick_body(world, slots, hand, anchor, radius)?;
        let state = slots.get_mut(hand)?;
        state.grab_active_id = Some(picked);
        state.throw_history.clear();
        debug!("hand {hand} grabbed body {picked}");
        Some(picked)
    }

    /// Releases whatever `hand` holds at host time `now`.
    ///
    /// Handles both a pinch-end edge and a lost hand. The released body
    /// ignores this hand's colliders for the configured window. A grab naming
    /// a body that no longer exists is simply dropped. Returns the released
    /// body if it still exists.
    pub fn release(
        &self,
        slots: &mut HandSlots,
        hand: usize,
        world: &mut PhysicsWorld,
        now: f64,
    ) -> Option<BodyId> {
        let config = &self.throw;
        let state = slots.get_mut(hand)?;
        let id = state.grab_active_id.take()?;
        let estimate = state.throw_history.estimate(now, config);
        let pointer_vel = state.pointer.pinch_vel();
        state.throw_history.clear();

        let Some(body) = world.bodies_mut().get_mut(id) else {
            debug!("hand {hand} released missing body {id}");
            return None;
        };
        body.vel = release_velocity(estimate, pointer_vel, body.vel, config);
        debug!("hand {hand} released body {id} at {:?}", body.vel);
        world.ignore_hand(id, hand, now + f64::from(config.ignore_window));
        Some(id)
    }

    /// Records the pointer velocity of every grabbing hand as a throw sample
    /// and drops samples older than the throw window.
    pub fn record_samples(&self, slots: &mut HandSlots, now: f64) {
        for (_, state) in slots.iter_mut() {
            if state.grab_active_id.is_some() {
                let vel = state.pointer.pinch_vel();
                state.throw_history.push(vel, now);
                state.throw_history.prune(now, self.throw.window);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::world::body::{Material, Shape};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const MATERIAL: Material = Material {
        restitution: 0.5,
        friction: 0.2,
    };

    #[fixture]
    fn world() -> PhysicsWorld {
        let mut world = PhysicsWorld::new(PhysicsConfig::default(), GrabConfig::default());
        for (x, shape) in [
            (100.0, Shape::Circle { radius: 20.0 }),
            (300.0, Shape::Box {
                width: 40.0,
                height: 40.0,
            }),
        ] {
            let id = world.bodies_mut().allocate_id();
            world.bodies_mut().insert(PhysicsBody::new(
                id,
                shape,
                Vec2::new(x, 100.0),
                MATERIAL,
                0.001,
            ));
        }
        world
    }

    #[rstest]
    fn follow_moves_toward_target() {
        let body = PhysicsBody::new(
            BodyId(1),
            Shape::Circle { radius: 10.0 },
            Vec2::ZERO,
            MATERIAL,
            0.001,
        );
        let drive = GrabDrive {
            body: body.id,
            target: Vec2::new(10.0, 0.0),
            pointer_vel: Vec2::ZERO,
        };
        let config = GrabConfig::default();
        let vel = follow_velocity(&body, &drive, &config);
        assert_relative_eq!(vel.x, 10.0 * config.gain * config.follow_strength);
    }

    #[rstest]
    fn pick_prefers_nearest_in_radius(world: PhysicsWorld) {
        let slots = HandSlots::default();
        assert_eq!(
            pick_body(&world, &slots, 0, Vec2::new(290.0, 100.0), 90.0),
            Some(BodyId(2))
        );
        assert_eq!(pick_body(&world, &slots, 0, Vec2::new(700.0, 100.0), 90.0), None);
    }

    #[fixture]
    fn controller() -> GrabController {
        GrabController::default()
    }

    fn grab_at(
        controller: &GrabController,
        slots: &mut HandSlots,
        hand: usize,
        world: &PhysicsWorld,
    ) -> Option<BodyId> {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = Camera::identity_for(&viewport);
        controller.acquire(slots, hand, world, Vec2::new(100.0, 100.0), &camera, &viewport)
    }

    #[rstest]
    fn held_body_cannot_be_taken(controller: GrabController, world: PhysicsWorld) {
        let mut slots = HandSlots::default();
        assert_eq!(grab_at(&controller, &mut slots, 0, &world), Some(BodyId(1)));
        assert_eq!(grab_at(&controller, &mut slots, 1, &world), None);
    }

    #[rstest]
    fn release_without_samples_uses_pointer_velocity(
        controller: GrabController,
        mut world: PhysicsWorld,
    ) {
        let mut slots = HandSlots::default();
        grab_at(&controller, &mut slots, 0, &world);
        let released = controller.release(&mut slots, 0, &mut world, 2.0);
        assert_eq!(released, Some(BodyId(1)));
        assert!(world.is_ignored(BodyId(1), 0, 2.1));
        assert!(slots.get(0).is_some_and(|h| h.grab_active_id.is_none()));
    }

    #[rstest]
    fn release_of_cleared_body_drops_grab(controller: GrabController, mut world: PhysicsWorld) {
        let mut slots = HandSlots::default();
        grab_at(&controller, &mut slots, 0, &world);
        world.clear();
        assert_eq!(controller.release(&mut slots, 0, &mut world, 1.0), None);
        assert!(slots.get(0).is_some_and(|h| h.grab_active_id.is_none()));
    }

    #[rstest]
    fn samples_outside_the_window_are_dropped(controller: GrabController, world: PhysicsWorld) {
        let mut slots = HandSlots::default();
        grab_at(&controller, &mut slots, 0, &world);
        controller.record_samples(&mut slots, 1.0);
        controller.record_samples(&mut slots, 1.05);
        controller.record_samples(&mut slots, 2.0);
        assert_eq!(slots.get(0).map(|h| h.throw_history.len()), Some(1));
        assert_eq!(slots.get(1).map(|h| h.throw_history.len()), Some(0));
    }

    #[rstest]
    fn release_velocity_is_capped() {
        let config = ThrowConfig::default();
        let vel = release_velocity(
            Some(Vec2::new(1.0e6, 0.0)),
            Vec2::ZERO,
            Vec2::new(1.0e6, 0.0),
            &config,
        );
        assert!(vel.length() <= config.max_speed + 1e-2);
    }
}

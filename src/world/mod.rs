//! Physics world: body storage and the fixed-substep pipeline.
//!
//! Each call to [`PhysicsWorld::step`] advances one substep in a fixed order:
//!
//! 1. grab follow for held bodies, gravity and drag for free ones, then
//!    position integration;
//! 2. two passes against the kinematic hand colliders;
//! 3. static rig collisions and hoop scoring;
//! 4. floor and wall constraints;
//! 5. two passes of body-body resolution.
//!
//! Hands and the release ignore map refer to bodies by [`BodyId`] only.

pub mod body;
pub mod contact;
pub mod hoop;
pub mod resolve;
pub mod spawn;

use glam::Vec2;
use hashbrown::HashMap;

use crate::config::{GrabConfig, PhysicsConfig};
use crate::grab::follow_velocity;
use body::{BodyArena, BodyId, PhysicsBody};
use hoop::Hoop;
use resolve::{collide_fixed, collide_pair, constrain_floor, constrain_walls, FixedCollider};

/// Number of resolution passes for hand and body-body contacts.
const RESOLVE_PASSES: usize = 2;

/// A hand driving a grabbed body this substep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrabDrive {
    /// The held body.
    pub body: BodyId,
    /// Live pinch target in world space.
    pub target: Vec2,
    /// Smoothed pinch velocity in world px/s.
    pub pointer_vel: Vec2,
}

/// A hand's physical presence this substep.
#[derive(Debug, Clone, Copy)]
pub struct HandPresence<'a> {
    /// Hand slot index.
    pub hand: usize,
    /// Body held by this hand, which its colliders never touch.
    pub grabbed: Option<BodyId>,
    /// Palm and knuckle circles.
    pub colliders: &'a [FixedCollider],
}

/// Per-substep inputs owned by the engine.
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    /// Substep length in seconds.
    pub dt: f32,
    /// Host time of the tick, used for ignore-window expiry.
    pub now: f64,
    /// Downward acceleration.
    pub gravity: f32,
    /// World y of the floor line.
    pub floor_y: f32,
    /// World x of the left and right walls.
    pub walls: (f32, f32),
    /// Grab drives, at most one per body.
    pub drives: &'a [GrabDrive],
    /// Hand collider sets.
    pub hands: &'a [HandPresence<'a>],
}

/// Owns every dynamic body and advances them.
#[derive(Debug, Clone, Default)]
pub struct PhysicsWorld {
    bodies: BodyArena,
    ignore: HashMap<(BodyId, usize), f64>,
    hoop: Hoop,
    physics: PhysicsConfig,
    grab: GrabConfig,
}

impl PhysicsWorld {
    /// Empty world using the given tuning.
    #[must_use]
    pub fn new(physics: PhysicsConfig, grab: GrabConfig) -> Self {
        Self {
            bodies: BodyArena::new(),
            ignore: HashMap::new(),
            hoop: Hoop::default(),
            physics,
            grab,
        }
    }

    /// Read access to the bodies.
    #[must_use]
    pub const fn bodies(&self) -> &BodyArena {
        &self.bodies
    }

    /// Mutable access to the bodies.
    pub fn bodies_mut(&mut self) -> &mut BodyArena {
        &mut self.bodies
    }

    /// Looks a body up by id.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.get(id)
    }

    /// Hoop rig state.
    #[must_use]
    pub const fn hoop(&self) -> &Hoop {
        &self.hoop
    }

    /// Mutable hoop rig state.
    pub fn hoop_mut(&mut self) -> &mut Hoop {
        &mut self.hoop
    }

    /// Makes `body` ignore `hand`'s colliders until host time `until`.
    pub fn ignore_hand(&mut self, body: BodyId, hand: usize, until: f64) {
        self.ignore.insert((body, hand), until);
    }

    /// Whether contacts between `body` and `hand` are suppressed at `now`.
    #[must_use]
    pub fn is_ignored(&self, body: BodyId, hand: usize, now: f64) -> bool {
        self.ignore
            .get(&(body, hand))
            .is_some_and(|&until| now < until)
    }

    /// Removes every body, ignore entry and score.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.ignore.clear();
        self.hoop.reset();
    }

    /// Advances one substep.
    pub fn step(&mut self, input: &StepInput<'_>) {
        self.ignore.retain(|_, until| input.now < *until);
        self.integrate(input);
        for _ in 0..RESOLVE_PASSES {
            self.resolve_hands(input);
        }
        self.resolve_static();
        self.constrain(input);
        for _ in 0..RESOLVE_PASSES {
            self.resolve_bodies(input.drives);
        }
    }

    fn integrate(&mut self, input: &StepInput<'_>) {
        let drag = (1.0 - self.physics.air_drag * input.dt).max(0.0);
        for body in self.bodies.as_mut_slice() {
            match input.drives.iter().find(|d| d.body == body.id) {
                Some(drive) => {
                    body.vel = follow_velocity(body, drive, &self.grab);
                }
                None => {
                    body.vel.y += input.gravity * input.dt;
                    body.vel *= drag;
                }
            }
            body.pos += body.vel * input.dt;
        }
    }

    fn resolve_hands(&mut self, input: &StepInput<'_>) {
        for body in self.bodies.as_mut_slice() {
            for hand in input.hands {
                if hand.grabbed == Some(body.id) {
                    continue;
                }
                if self
                    .ignore
                    .get(&(body.id, hand.hand))
                    .is_some_and(|&until| input.now < until)
                {
                    continue;
                }
                for collider in hand.colliders {
                    collide_fixed(body, collider);
                }
            }
        }
    }

    fn resolve_static(&mut self) {
        let Some(geometry) = self.hoop.geometry().copied() else {
            return;
        };
        for body in self.bodies.as_mut_slice() {
            for collider in geometry.colliders() {
                collide_fixed(body, collider);
            }
            self.hoop.observe(body);
        }
    }

    fn constrain(&mut self, input: &StepInput<'_>) {
        let (left, right) = input.walls;
        for body in self.bodies.as_mut_slice() {
            constrain_floor(body, input.floor_y, self.physics.rest_speed, input.dt);
            constrain_walls(body, left, right, self.physics.wall_bounce);
        }
    }

    fn resolve_bodies(&mut self, drives: &[GrabDrive]) {
        let grabbed = |id: BodyId| drives.iter().any(|d| d.body == id);
        let bodies = self.bodies.as_mut_slice();
        for split in 1..bodies.len() {
            let (head, tail) = bodies.split_at_mut(split);
            let Some((b, _)) = tail.split_first_mut() else {
                continue;
            };
            for a in head.iter_mut() {
                let bias = if grabbed(a.id) || grabbed(b.id) {
                    self.grab.grabbed_bias
                } else {
                    1.0
                };
                collide_pair(a, b, bias);
            }
        }
    }
}

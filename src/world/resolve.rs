//! Contact resolution primitives.
//!
//! Positional correction pushes overlapping shapes apart, then a normal
//! impulse and a tangential friction impulse adjust velocities. A `bias` in
//! `[0, 1]` scales both when a grabbed body is involved so collisions do not
//! fight the hand's pull.

use glam::Vec2;
use serde::Serialize;

use super::body::{PhysicsBody, Shape};
use super::contact::{shape_contact, Contact};
use crate::vector_math::vec_normalize;

/// Reference frame rate for per-contact floor friction.
const FRICTION_REFERENCE_HZ: f32 = 60.0;

/// A collider with externally driven position and velocity and infinite mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedCollider {
    /// Centre position in world space.
    pub pos: Vec2,
    /// Instantaneous velocity in world px/s.
    pub vel: Vec2,
    /// Geometry.
    pub shape: Shape,
    /// Bounce coefficient; the lower of this and the body's is used.
    pub restitution: f32,
}

impl FixedCollider {
    /// A motionless collider.
    #[must_use]
    pub const fn stationary(pos: Vec2, shape: Shape, restitution: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            shape,
            restitution,
        }
    }
}

/// Resolves a contact between two dynamic bodies.
///
/// `contact` must point from `a` toward `b`. Correction is split by inverse
/// mass, restitution is the lower of the two bodies, friction is their mean.
pub fn resolve_pair(a: &mut PhysicsBody, b: &mut PhysicsBody, contact: Contact, bias: f32) {
    let inv_a = a.inv_mass();
    let inv_b = b.inv_mass();
    let inv_sum = inv_a + inv_b;
    if !(inv_sum > 0.0) {
        return;
    }
    let normal = contact.normal;

    let correction = contact.depth * bias / inv_sum;
    a.pos -= normal * correction * inv_a;
    b.pos += normal * correction * inv_b;

    let relative = b.vel - a.vel;
    let approach = relative.dot(normal);
    if approach >= 0.0 {
        return;
    }
    let restitution = a.material.restitution.min(b.material.restitution);
    let normal_impulse = -(1.0 + restitution) * approach / inv_sum * bias;
    a.vel -= normal * normal_impulse * inv_a;
    b.vel += normal * normal_impulse * inv_b;

    let sliding = b.vel - a.vel;
    let Some(tangent) = vec_normalize(sliding - normal * sliding.dot(normal)) else {
        return;
    };
    let friction = (a.material.friction + b.material.friction) * 0.5;
    let limit = normal_impulse * friction;
    let tangent_impulse = (-sliding.dot(tangent) / inv_sum).clamp(-limit, limit);
    a.vel -= tangent * tangent_impulse * inv_a;
    b.vel += tangent * tangent_impulse * inv_b;
}

/// Tests and resolves a body against two dynamic shapes, returning whether
/// they were in contact.
pub fn collide_pair(a: &mut PhysicsBody, b: &mut PhysicsBody, bias: f32) -> bool {
    match shape_contact(a.pos, &a.shape, b.pos, &b.shape) {
        Some(contact) => {
            resolve_pair(a, b, contact, bias);
            true
        }
        None => false,
    }
}

/// Resolves a body against an infinite-mass collider.
///
/// The body is pushed fully out of the collider. Relative approach speed is
/// reflected using the lower restitution, and relative sliding speed is
/// damped by the body's friction.
pub fn collide_fixed(body: &mut PhysicsBody, collider: &FixedCollider) -> bool {
    let Some(contact) = shape_contact(collider.pos, &collider.shape, body.pos, &body.shape) else {
        return false;
    };
    let normal = contact.normal;
    body.pos += normal * contact.depth;

    let relative = body.vel - collider.vel;
    let approach = relative.dot(normal);
    if approach < 0.0 {
        let restitution = collider.restitution.min(body.material.restitution);
        let sliding = relative - normal * approach;
        body.vel -= normal * (1.0 + restitution) * approach;
        body.vel -= sliding * body.material.friction;
    }
    true
}

/// Keeps a body above the floor line.
///
/// On contact the vertical velocity is reflected by restitution (and zeroed
/// below `rest_speed`) and horizontal speed loses `friction` per 1/60 s.
pub fn constrain_floor(body: &mut PhysicsBody, floor_y: f32, rest_speed: f32, dt: f32) -> bool {
    let half_height = body.shape.half_height();
    if body.pos.y + half_height <= floor_y {
        return false;
    }
    body.pos.y = floor_y - half_height;
    if body.vel.y > 0.0 {
        let bounced = -body.vel.y * body.material.restitution;
        body.vel.y = if bounced.abs() < rest_speed { 0.0 } else { bounced };
    }
    let keep = (1.0 - body.material.friction)
        .clamp(0.0, 1.0)
        .powf(dt * FRICTION_REFERENCE_HZ);
    body.vel.x *= keep;
    true
}

/// Keeps a body between the side walls, bouncing with `wall_bounce`.
pub fn constrain_walls(body: &mut PhysicsBody, left: f32, right: f32, wall_bounce: f32) -> bool {
    let half_width = body.shape.half_width();
    if body.pos.x - half_width < left {
        body.pos.x = left + half_width;
        if body.vel.x < 0.0 {
            body.vel.x = -body.vel.x * wall_bounce;
        }
        true
    } else if body.pos.x + half_width > right {
        body.pos.x = right - half_width;
        if body.vel.x > 0.0 {
            body.vel.x = -body.vel.x * wall_bounce;
        }
        true
    } else {
        false
    }
}

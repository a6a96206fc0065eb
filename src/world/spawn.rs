//! Randomised body construction for the spawn entry points.

use glam::Vec2;
use rand::Rng;

use super::body::{BodyId, Material, PhysicsBody, Rgb, Shape, ShapeHint};
use crate::camera::{Camera, Viewport};

const PALETTE: [Rgb; 6] = [
    Rgb(255, 99, 132),
    Rgb(54, 162, 235),
    Rgb(255, 206, 86),
    Rgb(75, 192, 192),
    Rgb(153, 102, 255),
    Rgb(255, 159, 64),
];

/// Where and how new bodies appear.
#[derive(Debug, Clone, Copy)]
pub struct SpawnSite<'a> {
    /// Current camera.
    pub camera: &'a Camera,
    /// Current surface.
    pub viewport: &'a Viewport,
    /// Material copied from the live settings.
    pub material: Material,
    /// Mass per square pixel.
    pub density: f32,
}

fn random_shape(rng: &mut impl Rng, hint: ShapeHint) -> Shape {
    match hint {
        ShapeHint::Circle => Shape::Circle {
            radius: rng.random_range(18.0..34.0),
        },
        ShapeHint::Box => Shape::Box {
            width: rng.random_range(34.0..64.0),
            height: rng.random_range(34.0..64.0),
        },
    }
}

/// Picks a shape family uniformly.
pub fn random_hint(rng: &mut impl Rng) -> ShapeHint {
    if rng.random_bool(0.5) {
        ShapeHint::Circle
    } else {
        ShapeHint::Box
    }
}

/// Builds a body near the top centre of the screen with a small random
/// launch velocity.
pub fn random_body(rng: &mut impl Rng, id: BodyId, hint: ShapeHint, site: &SpawnSite<'_>) -> PhysicsBody {
    let shape = random_shape(rng, hint);
    let screen = Vec2::new(
        site.viewport.width * rng.random_range(0.35..0.65),
        site.viewport.height * rng.random_range(0.08..0.16),
    );
    let mut body = PhysicsBody::new(
        id,
        shape,
        site.camera.screen_to_world(screen, site.viewport),
        site.material,
        site.density,
    );
    body.vel = Vec2::new(rng.random_range(-220.0..220.0), rng.random_range(-120.0..40.0));
    body.color = PALETTE
        .get(rng.random_range(0..PALETTE.len()))
        .copied()
        .unwrap_or(Rgb(255, 255, 255));
    body
}

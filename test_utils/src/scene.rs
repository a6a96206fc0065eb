//! Small physics scenes.

use glam::Vec2;
use palmtide::world::body::Material;
use palmtide::world::{GrabDrive, HandPresence, StepInput};
use palmtide::{BodyId, Engine, EngineConfig, PhysicsBody, PhysicsWorld, Shape, Viewport};

/// Material with the given coefficients.
pub fn material(restitution: f32, friction: f32) -> Material {
    Material {
        restitution,
        friction,
    }
}

/// A circle of mass 1 with the given state, not yet in any world.
pub fn unit_mass_circle(id: u64, pos: Vec2, vel: Vec2, radius: f32, material: Material) -> PhysicsBody {
    let mut body = PhysicsBody::new(BodyId(id), Shape::Circle { radius }, pos, material, 0.001);
    body.vel = vel;
    body.set_mass(1.0);
    body
}

/// Inserts a body of `shape` at rest at `pos`.
pub fn add_body(world: &mut PhysicsWorld, shape: Shape, pos: Vec2, material: Material) -> BodyId {
    let id = world.bodies_mut().allocate_id();
    world
        .bodies_mut()
        .insert(PhysicsBody::new(id, shape, pos, material, 0.001))
}

/// Step input with no hands, walls at `0` and `width`.
pub fn step_input<'a>(
    dt: f32,
    floor_y: f32,
    width: f32,
    drives: &'a [GrabDrive],
    hands: &'a [HandPresence<'a>],
) -> StepInput<'a> {
    StepInput {
        dt,
        now: 0.0,
        gravity: 2200.0,
        floor_y,
        walls: (0.0, width),
        drives,
        hands,
    }
}

/// Engine with default tuning and a fixed seed on a `width` by `height`
/// surface.
pub fn test_engine(width: f32, height: f32) -> Engine {
    Engine::with_seed(EngineConfig::default(), Viewport::new(width, height), 42)
        .expect("default config is valid")
}

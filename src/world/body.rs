//! Dynamic body types and the arena that owns them.
//!
//! Bodies live in a growable arena and are addressed by [`BodyId`] handles.
//! Hands and the ignore map only ever hold ids, so a bulk clear can never
//! leave a dangling reference: a lookup for a removed id simply misses.

use glam::Vec2;
use serde::Serialize;

/// Stable, never-reused body identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BodyId(pub u64);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Collision geometry. Boxes are axis-aligned and never rotate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Circle of the given radius.
    Circle {
        /// Radius in world units.
        radius: f32,
    },
    /// Axis-aligned box centred on the body position.
    Box {
        /// Full width in world units.
        width: f32,
        /// Full height in world units.
        height: f32,
    },
}

impl Shape {
    /// Area used to derive mass.
    #[must_use]
    pub fn area(&self) -> f32 {
        match *self {
            Self::Circle { radius } => std::f32::consts::PI * radius * radius,
            Self::Box { width, height } => width * height,
        }
    }

    /// Distance from the centre to the lowest point of the shape.
    #[must_use]
    pub fn half_height(&self) -> f32 {
        match *self {
            Self::Circle { radius } => radius,
            Self::Box { height, .. } => height * 0.5,
        }
    }

    /// Distance from the centre to the leftmost or rightmost point.
    #[must_use]
    pub fn half_width(&self) -> f32 {
        match *self {
            Self::Circle { radius } => radius,
            Self::Box { width, .. } => width * 0.5,
        }
    }
}

/// Requested shape family for a spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ShapeHint {
    /// Spawn a circle.
    Circle,
    /// Spawn a box.
    Box,
}

/// Bounce and friction coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    /// Coefficient of restitution in `[0, 1]`.
    pub restitution: f32,
    /// Tangential damping coefficient in `[0, 1]`.
    pub friction: f32,
}

/// Display colour, carried through untouched for the render adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// A simulated body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsBody {
    /// Arena handle.
    pub id: BodyId,
    /// Collision geometry.
    pub shape: Shape,
    /// World position of the centre.
    pub pos: Vec2,
    /// World velocity in px/s.
    pub vel: Vec2,
    /// Bounce and friction.
    pub material: Material,
    mass: f32,
    /// Cosmetic colour.
    pub color: Rgb,
}

/// Smallest mass a body can carry.
const MIN_MASS: f32 = 1e-3;

impl PhysicsBody {
    /// Builds a body with mass derived from its area.
    ///
    /// Mass is floored at a small positive value so impulse resolution never
    /// divides by zero, even for degenerate shapes.
    #[must_use]
    pub fn new(id: BodyId, shape: Shape, pos: Vec2, material: Material, density: f32) -> Self {
        let mass = (shape.area() * density).max(MIN_MASS);
        Self {
            id,
            shape,
            pos,
            vel: Vec2::ZERO,
            material,
            mass: if mass.is_finite() { mass } else { MIN_MASS },
            color: Rgb(255, 255, 255),
        }
    }

    /// Mass, always strictly positive.
    #[must_use]
    pub const fn mass(&self) -> f32 {
        self.mass
    }

    /// Overrides the mass, keeping it strictly positive.
    pub fn set_mass(&mut self, mass: f32) {
        self.mass = if mass.is_finite() { mass.max(MIN_MASS) } else { MIN_MASS };
    }

    /// Reciprocal of the mass.
    #[must_use]
    pub fn inv_mass(&self) -> f32 {
        self.mass.recip()
    }
}

/// Growable body storage with monotonically increasing ids.
#[derive(Debug, Default, Clone)]
pub struct BodyArena {
    bodies: Vec<PhysicsBody>,
    next_id: u64,
}

impl BodyArena {
    /// Empty arena whose first id is 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Reserves the next id. Ids are never handed out twice.
    pub fn allocate_id(&mut self) -> BodyId {
        let id = BodyId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Stores a body built with an id from [`BodyArena::allocate_id`].
    pub fn insert(&mut self, body: PhysicsBody) -> BodyId {
        let id = body.id;
        self.bodies.push(body);
        id
    }

    /// Looks a body up by id.
    #[must_use]
    pub fn get(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut PhysicsBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    /// All bodies in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[PhysicsBody] {
        &self.bodies
    }

    /// Mutable access to all bodies.
    pub fn as_mut_slice(&mut self) -> &mut [PhysicsBody] {
        &mut self.bodies
    }

    /// Iterates over the bodies.
    pub fn iter(&self) -> std::slice::Iter<'_, PhysicsBody> {
        self.bodies.iter()
    }

    /// Number of stored bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// Whether the arena holds no bodies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Removes every body. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.bodies.clear();
    }
}

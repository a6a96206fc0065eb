//! Narrow-phase contact generation.
//!
//! Every routine returns a [`Contact`] whose normal points from the first
//! shape toward the second, together with the penetration depth. Shapes that
//! merely touch produce no contact.

use glam::Vec2;

use super::body::Shape;
use crate::vector_math::vec_normalize;

/// Penetration between two shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal from the first shape toward the second.
    pub normal: Vec2,
    /// Overlap along the normal, always positive.
    pub depth: f32,
}

impl Contact {
    /// The same contact seen from the other shape.
    #[must_use]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            depth: self.depth,
        }
    }
}

/// Sign that treats zero as positive, so coincident centres still pick a side.
fn side(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Circle against circle.
#[must_use]
pub fn circle_circle(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> Option<Contact> {
    let delta = b - a;
    let reach = radius_a + radius_b;
    let dist_sq = delta.length_squared();
    if !(dist_sq < reach * reach) {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = vec_normalize(delta).unwrap_or(Vec2::NEG_Y);
    Some(Contact {
        normal,
        depth: reach - dist,
    })
}

/// Circle against an axis-aligned box given by centre and half extents.
///
/// When the circle centre lies inside the box the closest-point normal is
/// undefined; the circle is then pushed out along the axis of least
/// penetration instead.
#[must_use]
pub fn circle_box(center: Vec2, radius: f32, box_center: Vec2, half: Vec2) -> Option<Contact> {
    let closest = center.clamp(box_center - half, box_center + half);
    let delta = closest - center;
    let dist_sq = delta.length_squared();
    if !(dist_sq < radius * radius) {
        return None;
    }
    if let Some(normal) = vec_normalize(delta).filter(|_| dist_sq > f32::EPSILON) {
        return Some(Contact {
            normal,
            depth: radius - dist_sq.sqrt(),
        });
    }

    let offset = box_center - center;
    let overlap_x = half.x + radius - offset.x.abs();
    let overlap_y = half.y + radius - offset.y.abs();
    if overlap_x < overlap_y {
        Some(Contact {
            normal: Vec2::new(side(offset.x), 0.0),
            depth: overlap_x,
        })
    } else {
        Some(Contact {
            normal: Vec2::new(0.0, side(offset.y)),
            depth: overlap_y,
        })
    }
}

/// Axis-aligned box against axis-aligned box.
#[must_use]
pub fn box_box(a: Vec2, half_a: Vec2, b: Vec2, half_b: Vec2) -> Option<Contact> {
    let offset = b - a;
    let overlap_x = half_a.x + half_b.x - offset.x.abs();
    let overlap_y = half_a.y + half_b.y - offset.y.abs();
    if !(overlap_x > 0.0 && overlap_y > 0.0) {
        return None;
    }
    if overlap_x < overlap_y {
        Some(Contact {
            normal: Vec2::new(side(offset.x), 0.0),
            depth: overlap_x,
        })
    } else {
        Some(Contact {
            normal: Vec2::new(0.0, side(offset.y)),
            depth: overlap_y,
        })
    }
}

/// Half extents of a box shape.
#[must_use]
pub fn half_extents(width: f32, height: f32) -> Vec2 {
    Vec2::new(width, height) * 0.5
}

/// Dispatches to the routine matching both shapes.
#[must_use]
pub fn shape_contact(a_pos: Vec2, a: &Shape, b_pos: Vec2, b: &Shape) -> Option<Contact> {
    match (*a, *b) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a_pos, ra, b_pos, rb)
        }
        (Shape::Circle { radius }, Shape::Box { width, height }) => {
            circle_box(a_pos, radius, b_pos, half_extents(width, height))
        }
        (Shape::Box { width, height }, Shape::Circle { radius }) => {
            circle_box(b_pos, radius, a_pos, half_extents(width, height)).map(Contact::flipped)
        }
        (
            Shape::Box {
                width: wa,
                height: ha,
            },
            Shape::Box {
                width: wb,
                height: hb,
            },
        ) => box_box(a_pos, half_extents(wa, ha), b_pos, half_extents(wb, hb)),
    }
}

/// Signed distance from `point` to the surface of a shape at `pos`.
///
/// Circles report negative values inside; boxes report zero inside.
#[must_use]
pub fn pick_distance(point: Vec2, pos: Vec2, shape: &Shape) -> f32 {
    match *shape {
        Shape::Circle { radius } => point.distance(pos) - radius,
        Shape::Box { width, height } => {
            let half = half_extents(width, height);
            let closest = point.clamp(pos - half, pos + half);
            point.distance(closest)
        }
    }
}

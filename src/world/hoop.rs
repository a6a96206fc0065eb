//! Optional playground rig: a backboard, two rim circles and a scoring sensor.
//!
//! The rig is laid out from viewport fractions so it stays in view when the
//! surface resizes or the camera zooms. A circle body scores when its centre
//! crosses the sensor line moving downward while horizontally inside the
//! band; each crossing counts exactly once.

use glam::Vec2;
use hashbrown::HashMap;
use log::info;
use serde::Serialize;

use super::body::{BodyId, PhysicsBody, Shape};
use super::resolve::FixedCollider;
use crate::camera::{Camera, Viewport};
use crate::config::HoopConfig;

/// Restitution of the rim and backboard.
const RIG_RESTITUTION: f32 = 0.5;

/// Horizontal scoring band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorBand {
    /// Left edge in world x.
    pub left: f32,
    /// Right edge in world x.
    pub right: f32,
    /// Sensor line in world y.
    pub y: f32,
}

impl SensorBand {
    fn spans(&self, x: f32) -> bool {
        (self.left..=self.right).contains(&x)
    }
}

/// World-space rig geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoopGeometry {
    /// Backboard box.
    pub backboard: FixedCollider,
    /// Left and right rim circles.
    pub rims: [FixedCollider; 2],
    /// Scoring band between the rims.
    pub sensor: SensorBand,
}

impl HoopGeometry {
    /// Lays the rig out for the current camera and viewport.
    #[must_use]
    pub fn layout(config: &HoopConfig, camera: &Camera, viewport: &Viewport) -> Self {
        let anchor = camera.screen_to_world(
            Vec2::new(config.anchor_x * viewport.width, config.anchor_y * viewport.height),
            viewport,
        );
        let half_rim = config.rim_width * 0.5;
        let rim = |x: f32| {
            FixedCollider::stationary(
                Vec2::new(x, anchor.y),
                Shape::Circle {
                    radius: config.rim_radius,
                },
                RIG_RESTITUTION,
            )
        };
        let board_x = anchor.x + half_rim + config.rim_radius + config.board_width * 0.5;
        let backboard = FixedCollider::stationary(
            Vec2::new(board_x, anchor.y - config.board_height * 0.35),
            Shape::Box {
                width: config.board_width,
                height: config.board_height,
            },
            RIG_RESTITUTION,
        );
        Self {
            backboard,
            rims: [rim(anchor.x - half_rim), rim(anchor.x + half_rim)],
            sensor: SensorBand {
                left: anchor.x - half_rim + config.rim_radius,
                right: anchor.x + half_rim - config.rim_radius,
                y: anchor.y + config.sensor_depth * 0.5,
            },
        }
    }

    /// The solid parts of the rig.
    pub fn colliders(&self) -> impl Iterator<Item = &FixedCollider> {
        std::iter::once(&self.backboard).chain(self.rims.iter())
    }
}

/// Rig state: geometry, score and per-body crossing memory.
#[derive(Debug, Clone, Default)]
pub struct Hoop {
    geometry: Option<HoopGeometry>,
    score: u32,
    last_y: HashMap<BodyId, f32>,
}

impl Hoop {
    /// Installs or replaces the rig geometry.
    pub fn set_geometry(&mut self, geometry: Option<HoopGeometry>) {
        self.geometry = geometry;
        if self.geometry.is_none() {
            self.last_y.clear();
        }
    }

    /// Current geometry, if the rig is enabled.
    #[must_use]
    pub const fn geometry(&self) -> Option<&HoopGeometry> {
        self.geometry.as_ref()
    }

    /// Baskets scored since the last reset.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Forgets the score and every tracked body.
    pub fn reset(&mut self) {
        self.score = 0;
        self.last_y.clear();
    }

    /// Records `body`'s position and returns `true` if it just scored.
    pub fn observe(&mut self, body: &PhysicsBody) -> bool {
        let Some(geometry) = self.geometry else {
            return false;
        };
        if !matches!(body.shape, Shape::Circle { .. }) {
            return false;
        }
        let current = body.pos.y;
        let previous = self.last_y.insert(body.id, current);
        let sensor = geometry.sensor;
        let crossed = previous.is_some_and(|prev| prev < sensor.y && current >= sensor.y);
        if crossed && body.vel.y > 0.0 && sensor.spans(body.pos.x) {
            self.score += 1;
            info!("body {} scored, total {}", body.id, self.score);
            return true;
        }
        false
    }
}

//! Read-only render state.
//!
//! The render adapter never touches the engine directly; it draws from a
//! [`RenderSnapshot`] captured after each tick. The snapshot is plain data
//! and serialises to JSON for headless inspection.

use glam::Vec2;
use serde::Serialize;

use crate::camera::{Camera, Viewport};
use crate::engine::Engine;
use crate::world::body::{BodyId, Rgb, Shape};
use crate::world::hoop::HoopGeometry;
use crate::world::resolve::FixedCollider;

/// One body as drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyView {
    /// Stable id.
    pub id: BodyId,
    /// Geometry in world units.
    pub shape: Shape,
    /// World-space centre.
    pub pos: Vec2,
    /// Screen-space centre.
    pub screen_pos: Vec2,
    /// Fill colour.
    pub color: Rgb,
    /// Whether a hand is holding it.
    pub grabbed: bool,
}

/// One tracked hand as drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandView {
    /// Slot index.
    pub index: usize,
    /// Smoothed screen-space landmarks.
    pub points: Vec<Vec2>,
    /// Screen-space pinch anchor while pinching.
    pub pinch: Option<Vec2>,
    /// Held body.
    pub grabbed: Option<BodyId>,
    /// World-space palm and knuckle colliders.
    pub colliders: Vec<FixedCollider>,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Bodies in storage order.
    pub bodies: Vec<BodyView>,
    /// Tracked hands only.
    pub hands: Vec<HandView>,
    /// World y of the floor line.
    pub floor_y: f32,
    /// World x of the left and right walls.
    pub walls: (f32, f32),
    /// Camera used for the frame.
    pub camera: Camera,
    /// Surface size.
    pub viewport: Viewport,
    /// Hoop rig, when enabled.
    pub hoop: Option<HoopGeometry>,
    /// Baskets scored.
    pub score: u32,
}

impl RenderSnapshot {
    /// Captures the engine's current state.
    #[must_use]
    pub fn capture(engine: &Engine) -> Self {
        let camera = *engine.camera();
        let viewport = *engine.viewport();
        let hands = engine.hands();
        let bodies = engine
            .world()
            .bodies()
            .iter()
            .map(|body| BodyView {
                id: body.id,
                shape: body.shape,
                pos: body.pos,
                screen_pos: camera.world_to_screen(body.pos, &viewport),
                color: body.color,
                grabbed: hands.holder_of(body.id).is_some(),
            })
            .collect();
        let hand_views = hands
            .iter()
            .filter(|(_, hand)| hand.tracked)
            .map(|(index, hand)| HandView {
                index,
                points: hand.smoothed.map(|points| points.to_vec()).unwrap_or_default(),
                pinch: hand.pointer.pinch,
                grabbed: hand.grab_active_id,
                colliders: hand.colliders.as_slice().to_vec(),
            })
            .collect();
        Self {
            bodies,
            hands: hand_views,
            floor_y: engine.floor_y(),
            walls: engine.walls(),
            camera,
            viewport,
            hoop: engine.world().hoop().geometry().copied(),
            score: engine.score(),
        }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates [`serde_json::Error`]; in practice only non-string map keys
    /// could trigger it and the snapshot has none.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

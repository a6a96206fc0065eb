#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate for the palmtide gesture-driven physics toy.
//! Re-exports the engine, its collaborator traits and common types for the
//! binary and tests.
pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod engine;
pub mod gesture;
pub mod grab;
pub mod hand;
pub mod logging;
pub mod numeric;
pub mod replay;
pub mod session;
pub mod snapshot;
pub mod vector_math;
pub mod voice;
pub mod world;

// Re-export commonly used items
pub use camera::{Camera, Viewport};
pub use config::{ConfigError, EngineConfig, InvalidValue, Settings};
pub use engine::Engine;
pub use gesture::landmarks::{Detection, HandLandmarks, Landmark, LandmarkError};
pub use hand::{HandSlots, HandState, PointerState};
pub use logging::init as init_logging;
pub use session::{
    DetectorError, HandDetector, Session, SessionError, SessionParts, Surface, VideoFrame,
    VideoSource,
};
pub use snapshot::RenderSnapshot;
pub use vector_math::{clamp_magnitude, vec_normalize};
pub use voice::VoiceCommand;
pub use world::body::{BodyId, PhysicsBody, Shape, ShapeHint};
pub use world::PhysicsWorld;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use palmtide::prelude::*;
    //! ```

    pub use crate::camera::{Camera, Viewport};
    pub use crate::config::{EngineConfig, Settings};
    pub use crate::engine::Engine;
    pub use crate::gesture::landmarks::{Detection, HandLandmarks, Landmark};
    pub use crate::world::body::{BodyId, Shape, ShapeHint};
    pub use glam::Vec2;
}

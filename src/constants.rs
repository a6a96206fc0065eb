//! Hand-model constants and default tuning values shared across the engine.
//!
//! Landmark indices follow the 21-point hand topology reported by the
//! detector. Tuning defaults feed [`crate::config::EngineConfig`]; nothing in
//! the simulation reads them directly, so a loaded configuration always wins.

/// Number of landmarks reported for each tracked hand.
pub const LANDMARK_COUNT: usize = 21;

/// Maximum number of concurrently tracked hands.
pub const MAX_HANDS: usize = 2;

/// Wrist landmark.
pub const WRIST: usize = 0;
/// Thumb tip landmark, one side of the pinch.
pub const THUMB_TIP: usize = 4;
/// Index finger knuckle.
pub const INDEX_MCP: usize = 5;
/// Index finger tip, the other side of the pinch.
pub const INDEX_TIP: usize = 8;
/// Middle finger knuckle.
pub const MIDDLE_MCP: usize = 9;
/// Ring finger knuckle.
pub const RING_MCP: usize = 13;
/// Little finger knuckle.
pub const PINKY_MCP: usize = 17;

/// Landmarks averaged to estimate the palm centre.
pub const PALM_LANDMARKS: [usize; 5] = [WRIST, INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Landmarks that each carry a small knuckle collider.
pub const KNUCKLE_LANDMARKS: [usize; 4] = [INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP];

/// Normalised thumb/index distance below which a pinch starts.
pub const PINCH_START: f32 = 0.045;
/// Normalised thumb/index distance above which a pinch ends.
pub const PINCH_END: f32 = 0.065;
/// Weight kept from the previous smoothed landmark position.
pub const POINT_SMOOTHING: f32 = 0.55;
/// Reduced landmark smoothing while pinching.
pub const PINCH_POINT_SMOOTHING: f32 = 0.25;
/// Weight kept from the previous smoothed velocity.
pub const VELOCITY_SMOOTHING: f32 = 0.35;
/// Velocity retained per discarded sample while the estimator decays.
pub const VELOCITY_DECAY: f32 = 0.85;
/// Shortest plausible interval between detector samples, in seconds.
pub const MIN_SAMPLE_DT: f32 = 1.0 / 120.0;
/// Longest plausible interval between detector samples, in seconds.
pub const MAX_SAMPLE_DT: f32 = 1.0 / 15.0;

/// Grab search radius in screen pixels.
pub const GRAB_RADIUS: f32 = 90.0;
/// Proportional gain pulling a grabbed body toward the pinch, per second.
pub const GRAB_GAIN: f32 = 18.0;
/// Speed cap for a grabbed body, in world px/s.
pub const MAX_GRAB_SPEED: f32 = 2600.0;
/// Blend factor toward the desired grab velocity per substep.
pub const FOLLOW_STRENGTH: f32 = 0.6;
/// Correction and impulse scale applied when a grabbed body collides.
pub const GRABBED_BIAS: f32 = 0.6;

/// Trailing window of throw samples kept at release, in seconds.
pub const THROW_WINDOW: f32 = 0.14;
/// Samples required before the robust throw estimator is used.
pub const THROW_MIN_SAMPLES: usize = 3;
/// Recency half-life of throw sample weights, in seconds.
pub const THROW_HALF_LIFE: f32 = 0.07;
/// Fraction of the max throw speed a sample may deviate from the median.
pub const THROW_OUTLIER_FRACTION: f32 = 0.6;
/// Multiplier applied to the estimated throw velocity.
pub const THROW_SCALE: f32 = 1.0;
/// Blend from the body velocity toward the throw velocity.
pub const THROW_BLEND: f32 = 0.85;
/// Speed cap for throws and pointer velocities, in world px/s.
pub const MAX_THROW_SPEED: f32 = 3200.0;
/// Time a released body ignores the releasing hand, in seconds.
pub const RELEASE_IGNORE_WINDOW: f32 = 0.25;

/// Palm collider radius in screen pixels.
pub const PALM_RADIUS: f32 = 46.0;
/// Knuckle collider radius in screen pixels.
pub const KNUCKLE_RADIUS: f32 = 16.0;
/// Bounce coefficient of the hand colliders.
pub const HAND_RESTITUTION: f32 = 0.4;

/// Downward acceleration in world px/s².
pub const GRAVITY: f32 = 2200.0;
/// Linear air drag coefficient per second.
pub const AIR_DRAG: f32 = 0.35;
/// Floor offset from the bottom of the viewport, in screen pixels.
pub const FLOOR_HEIGHT: f32 = 80.0;
/// Default body restitution.
pub const BOUNCINESS: f32 = 0.45;
/// Default body friction.
pub const FRICTION: f32 = 0.2;
/// Restitution of the side walls.
pub const WALL_BOUNCE: f32 = 0.5;
/// Reflected floor speed below which a body is considered resting.
pub const REST_SPEED: f32 = 40.0;
/// Mass per square pixel of body area.
pub const DENSITY: f32 = 0.001;

/// Largest frame delta simulated in one tick, in seconds.
pub const MAX_DT: f32 = 1.0 / 30.0;
/// Physics substeps per rendering tick.
pub const SUBSTEPS: u32 = 4;

/// Smallest camera zoom.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest camera zoom.
pub const MAX_ZOOM: f32 = 1.6;

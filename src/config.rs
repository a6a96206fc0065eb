//! Engine tuning and live user settings.
//!
//! [`EngineConfig`] groups every product-feel constant (thresholds, gains,
//! windows) so they can be tuned from a TOML file without recompiling. Each
//! section deserialises with defaults, so a file only needs the values it
//! overrides. [`Settings`] is the smaller layer a settings panel changes at
//! runtime through [`crate::Engine::apply_settings`].

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants as c;

/// Errors raised while loading or validating an [`EngineConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value parsed but violates an engine invariant.
    #[error(transparent)]
    Invalid(#[from] InvalidValue),
}

/// A configuration value that breaks an engine invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid config value `{field}`: {reason}")]
pub struct InvalidValue {
    /// Dotted path of the offending field.
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: &'static str,
}

/// Pinch classification, smoothing and pointer velocity tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Distance below which an idle hand starts pinching.
    pub pinch_start: f32,
    /// Distance above which a pinching hand lets go. Must exceed `pinch_start`.
    pub pinch_end: f32,
    /// Weight of the previous landmark position in exponential smoothing.
    pub point_smoothing: f32,
    /// Landmark smoothing used while pinching.
    pub pinch_point_smoothing: f32,
    /// Weight of the previous velocity when blending in a new sample.
    pub velocity_smoothing: f32,
    /// Factor applied to the velocity when a sample is discarded.
    pub velocity_decay: f32,
    /// Shortest accepted sample interval in seconds.
    pub min_sample_dt: f32,
    /// Longest accepted sample interval in seconds.
    pub max_sample_dt: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_start: c::PINCH_START,
            pinch_end: c::PINCH_END,
            point_smoothing: c::POINT_SMOOTHING,
            pinch_point_smoothing: c::PINCH_POINT_SMOOTHING,
            velocity_smoothing: c::VELOCITY_SMOOTHING,
            velocity_decay: c::VELOCITY_DECAY,
            min_sample_dt: c::MIN_SAMPLE_DT,
            max_sample_dt: c::MAX_SAMPLE_DT,
        }
    }
}

/// Grab acquisition and follow tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Search radius in screen pixels.
    pub radius: f32,
    /// Positional error gain, per second.
    pub gain: f32,
    /// Speed cap for the desired follow velocity.
    pub max_speed: f32,
    /// Blend toward the desired velocity per substep, in `[0, 1]`.
    pub follow_strength: f32,
    /// Correction and impulse scale for collisions involving grabbed bodies.
    pub grabbed_bias: f32,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            radius: c::GRAB_RADIUS,
            gain: c::GRAB_GAIN,
            max_speed: c::MAX_GRAB_SPEED,
            follow_strength: c::FOLLOW_STRENGTH,
            grabbed_bias: c::GRABBED_BIAS,
        }
    }
}

/// Release velocity estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrowConfig {
    /// Trailing sample window in seconds.
    pub window: f32,
    /// Samples needed before the robust estimator is trusted.
    pub min_samples: usize,
    /// Half-life of the recency weights in seconds.
    pub half_life: f32,
    /// Outlier threshold as a fraction of `max_speed`.
    pub outlier_fraction: f32,
    /// Multiplier on the estimated velocity.
    pub scale: f32,
    /// Blend from the body's velocity toward the throw, in `[0, 1]`.
    pub blend: f32,
    /// Speed cap for throws and pointer velocities.
    pub max_speed: f32,
    /// Seconds a released body ignores the releasing hand's colliders.
    pub ignore_window: f32,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            window: c::THROW_WINDOW,
            min_samples: c::THROW_MIN_SAMPLES,
            half_life: c::THROW_HALF_LIFE,
            outlier_fraction: c::THROW_OUTLIER_FRACTION,
            scale: c::THROW_SCALE,
            blend: c::THROW_BLEND,
            max_speed: c::MAX_THROW_SPEED,
            ignore_window: c::RELEASE_IGNORE_WINDOW,
        }
    }
}

/// Kinematic hand collider sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandColliderConfig {
    /// Palm radius in screen pixels.
    pub palm_radius: f32,
    /// Knuckle radius in screen pixels.
    pub knuckle_radius: f32,
    /// Restitution used against bodies (the lower of the pair wins).
    pub restitution: f32,
}

impl Default for HandColliderConfig {
    fn default() -> Self {
        Self {
            palm_radius: c::PALM_RADIUS,
            knuckle_radius: c::KNUCKLE_RADIUS,
            restitution: c::HAND_RESTITUTION,
        }
    }
}

/// World constants not exposed through [`Settings`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Linear air drag per second.
    pub air_drag: f32,
    /// Side wall restitution.
    pub wall_bounce: f32,
    /// Reflected floor speed treated as resting.
    pub rest_speed: f32,
    /// Mass per square pixel.
    pub density: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            air_drag: c::AIR_DRAG,
            wall_bounce: c::WALL_BOUNCE,
            rest_speed: c::REST_SPEED,
            density: c::DENSITY,
        }
    }
}

/// Fixed substep clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Largest frame delta simulated per tick.
    pub max_dt: f32,
    /// Substeps per tick.
    pub substeps: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_dt: c::MAX_DT,
            substeps: c::SUBSTEPS,
        }
    }
}

/// Camera zoom bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Smallest zoom (most world visible).
    pub min_zoom: f32,
    /// Largest zoom.
    pub max_zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            min_zoom: c::MIN_ZOOM,
            max_zoom: c::MAX_ZOOM,
        }
    }
}

/// Geometry of the optional hoop rig, in screen-relative fractions so the
/// rig follows the viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoopConfig {
    /// Horizontal position of the rim centre as a fraction of viewport width.
    pub anchor_x: f32,
    /// Vertical position of the rim as a fraction of viewport height.
    pub anchor_y: f32,
    /// Distance between the two rim circles in world pixels.
    pub rim_width: f32,
    /// Radius of each rim circle.
    pub rim_radius: f32,
    /// Backboard width.
    pub board_width: f32,
    /// Backboard height.
    pub board_height: f32,
    /// Vertical thickness of the scoring sensor band.
    pub sensor_depth: f32,
}

impl Default for HoopConfig {
    fn default() -> Self {
        Self {
            anchor_x: 0.78,
            anchor_y: 0.38,
            rim_width: 110.0,
            rim_radius: 6.0,
            board_width: 12.0,
            board_height: 120.0,
            sensor_depth: 14.0,
        }
    }
}

/// Complete engine tuning.
///
/// # Examples
///
/// ```
/// use palmtide::config::EngineConfig;
/// let config = EngineConfig::from_toml_str("[clock]\nsubsteps = 8\n").unwrap_or_default();
/// assert_eq!(config.clock.substeps, 8);
/// assert!(config.gesture.pinch_end > config.gesture.pinch_start);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gesture interpretation.
    pub gesture: GestureConfig,
    /// Grab follow law.
    pub grab: GrabConfig,
    /// Throw estimation.
    pub throw: ThrowConfig,
    /// Hand colliders.
    pub hand: HandColliderConfig,
    /// World constants.
    pub physics: PhysicsConfig,
    /// Simulation clock.
    pub clock: ClockConfig,
    /// Camera bounds.
    pub camera: CameraConfig,
    /// Hoop rig geometry.
    pub hoop: HoopConfig,
}

fn require(ok: bool, field: &'static str, reason: &'static str) -> Result<(), InvalidValue> {
    if ok {
        Ok(())
    } else {
        Err(InvalidValue { field, reason })
    }
}

fn unit_interval(value: f32) -> bool {
    (0.0..=1.0).contains(&value)
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a value breaks an invariant.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks the invariants the engine relies on.
    ///
    /// # Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), InvalidValue> {
        let g = &self.gesture;
        require(
            g.pinch_start > 0.0,
            "gesture.pinch_start",
            "must be positive",
        )?;
        require(
            g.pinch_end > g.pinch_start,
            "gesture.pinch_end",
            "must exceed pinch_start",
        )?;
        require(
            g.min_sample_dt > 0.0 && g.max_sample_dt > g.min_sample_dt,
            "gesture.max_sample_dt",
            "sample band must be positive and ordered",
        )?;
        require(
            unit_interval(g.point_smoothing)
                && unit_interval(g.pinch_point_smoothing)
                && unit_interval(g.velocity_smoothing)
                && unit_interval(g.velocity_decay),
            "gesture",
            "smoothing factors must lie in [0, 1]",
        )?;
        require(
            unit_interval(self.grab.follow_strength),
            "grab.follow_strength",
            "must lie in [0, 1]",
        )?;
        require(
            self.grab.radius >= 0.0 && self.grab.max_speed > 0.0,
            "grab",
            "radius and max_speed must be non-negative",
        )?;
        require(
            unit_interval(self.throw.blend),
            "throw.blend",
            "must lie in [0, 1]",
        )?;
        require(
            self.throw.window > 0.0 && self.throw.half_life > 0.0,
            "throw.window",
            "window and half_life must be positive",
        )?;
        require(
            self.throw.max_speed > 0.0,
            "throw.max_speed",
            "must be positive",
        )?;
        require(
            self.physics.density > 0.0,
            "physics.density",
            "must be positive so bodies keep positive mass",
        )?;
        require(self.clock.substeps >= 1, "clock.substeps", "must be at least 1")?;
        require(self.clock.max_dt > 0.0, "clock.max_dt", "must be positive")?;
        require(
            self.camera.min_zoom > 0.0 && self.camera.max_zoom >= self.camera.min_zoom,
            "camera",
            "zoom bounds must be positive and ordered",
        )
    }
}

/// Live settings adjustable while the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera zoom; values below 1 reveal more of the world.
    pub zoom: f32,
    /// Downward acceleration in world px/s².
    pub gravity: f32,
    /// Floor offset from the bottom of the viewport in screen pixels.
    pub floor_height: f32,
    /// Restitution applied to every body.
    pub bounciness: f32,
    /// Friction applied to every body.
    pub friction: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            gravity: c::GRAVITY,
            floor_height: c::FLOOR_HEIGHT,
            bounciness: c::BOUNCINESS,
            friction: c::FRICTION,
        }
    }
}

impl Settings {
    /// Returns a copy with every value forced into its valid range.
    #[must_use]
    pub fn sanitised(self, camera: &CameraConfig) -> Self {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32| if value.is_finite() { value } else { fallback };
        Self {
            zoom: finite_or(self.zoom, defaults.zoom).clamp(camera.min_zoom, camera.max_zoom),
            gravity: finite_or(self.gravity, defaults.gravity),
            floor_height: finite_or(self.floor_height, defaults.floor_height).max(0.0),
            bounciness: finite_or(self.bounciness, defaults.bounciness).clamp(0.0, 1.0),
            friction: finite_or(self.friction, defaults.friction).clamp(0.0, 1.0),
        }
    }
}

//! Scripted collaborators for headless runs.
//!
//! [`ScriptedDetector`] plays back keyframed hand motion as plausible
//! 21-point hands, delivered after a fixed latency. [`SyntheticCamera`] and
//! [`HeadlessSurface`] stand in for the camera and the canvas so a full
//! [`Session`](crate::session::Session) can run without any hardware.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::Viewport;
use crate::constants::{
    INDEX_MCP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_MCP, PINKY_MCP, RING_MCP, THUMB_TIP, WRIST,
};
use crate::gesture::landmarks::{Detection, HandLandmarks, Landmark};
use crate::numeric::narrow_f32;
use crate::session::{DetectorError, HandDetector, Surface, VideoFrame, VideoSource};
use crate::snapshot::RenderSnapshot;
use crate::vector_math::lerp;

/// Fingertip gap for an open hand, in normalised units.
const OPEN_GAP: f32 = 0.12;
/// Fingertip gap for a pinch.
const PINCHED_GAP: f32 = 0.015;

/// Hand pose at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandKeyframe {
    /// Host time in seconds.
    pub at: f64,
    /// Pinch point in image-normalised coordinates.
    pub center: Vec2,
    /// Whether thumb and index touch.
    pub pinched: bool,
}

/// Keyframes for one hand slot, sorted by time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandTrack {
    keyframes: Vec<HandKeyframe>,
}

impl HandTrack {
    /// Builds a track, sorting keyframes by time.
    #[must_use]
    pub fn new(mut keyframes: Vec<HandKeyframe>) -> Self {
        keyframes.sort_by(|a, b| a.at.total_cmp(&b.at));
        Self { keyframes }
    }

    /// Pose at time `t`, or `None` outside the track.
    ///
    /// Position is interpolated linearly; the pinch flag holds the value of
    /// the latest keyframe at or before `t`.
    #[must_use]
    pub fn sample(&self, t: f64) -> Option<(Vec2, bool)> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        if t < first.at || t > last.at {
            return None;
        }
        let next_index = self.keyframes.iter().position(|k| k.at > t);
        let Some(next_index) = next_index else {
            return Some((last.center, last.pinched));
        };
        let next = self.keyframes.get(next_index)?;
        let prev = self.keyframes.get(next_index.checked_sub(1)?)?;
        let span = next.at - prev.at;
        let fraction = if span > 0.0 {
            narrow_f32((t - prev.at) / span).unwrap_or(0.0)
        } else {
            0.0
        };
        Some((lerp(prev.center, next.center, fraction), prev.pinched))
    }
}

/// Builds a plausible hand whose pinch anchor sits at `center`.
#[must_use]
pub fn synthesize_hand(center: Vec2, pinched: bool) -> Option<HandLandmarks> {
    let gap = if pinched { PINCHED_GAP } else { OPEN_GAP };
    let mut points = [Landmark::new(center.x, center.y + 0.08); LANDMARK_COUNT];
    let mut place = |index: usize, offset: Vec2| {
        if let Some(point) = points.get_mut(index) {
            *point = Landmark::new(center.x + offset.x, center.y + offset.y);
        }
    };
    place(WRIST, Vec2::new(0.0, 0.2));
    place(INDEX_MCP, Vec2::new(-0.03, 0.1));
    place(MIDDLE_MCP, Vec2::new(-0.01, 0.1));
    place(RING_MCP, Vec2::new(0.01, 0.1));
    place(PINKY_MCP, Vec2::new(0.03, 0.11));
    place(THUMB_TIP, Vec2::new(-gap * 0.5, 0.0));
    place(INDEX_TIP, Vec2::new(gap * 0.5, 0.0));
    HandLandmarks::new(points).ok()
}

/// Detector that replays hand tracks.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    tracks: Vec<HandTrack>,
    latency: f64,
    pending: Option<(f64, f64)>,
    init_failure: Option<String>,
    fail_after: Option<usize>,
    submitted: usize,
    closed: usize,
}

impl ScriptedDetector {
    /// Detector replaying `tracks`, one per hand slot, after `latency`
    /// seconds.
    #[must_use]
    pub const fn new(tracks: Vec<HandTrack>, latency: f64) -> Self {
        Self {
            tracks,
            latency,
            pending: None,
            init_failure: None,
            fail_after: None,
            submitted: 0,
            closed: 0,
        }
    }

    /// Makes [`HandDetector::init`] fail with `reason`.
    #[must_use]
    pub fn failing_init(mut self, reason: &str) -> Self {
        self.init_failure = Some(reason.to_owned());
        self
    }

    /// Makes every submission after the first `count` fail.
    #[must_use]
    pub fn failing_after(mut self, count: usize) -> Self {
        self.fail_after = Some(count);
        self
    }

    /// Frames accepted so far.
    #[must_use]
    pub const fn submitted(&self) -> usize {
        self.submitted
    }

    /// Times [`HandDetector::close`] ran.
    #[must_use]
    pub const fn closed(&self) -> usize {
        self.closed
    }

    /// Detection for a frame captured at `t`.
    #[must_use]
    pub fn detect(&self, t: f64) -> Detection {
        let hands = self
            .tracks
            .iter()
            .filter_map(|track| track.sample(t))
            .filter_map(|(center, pinched)| synthesize_hand(center, pinched))
            .collect();
        Detection { timestamp: t, hands }
    }
}

impl HandDetector for ScriptedDetector {
    fn init(&mut self) -> Result<(), DetectorError> {
        match &self.init_failure {
            Some(reason) => Err(DetectorError::Init(reason.clone())),
            None => Ok(()),
        }
    }

    fn submit(&mut self, _frame: &VideoFrame, timestamp: f64) -> Result<(), DetectorError> {
        if self.fail_after.is_some_and(|limit| self.submitted >= limit) {
            return Err(DetectorError::Submit("scripted runtime abort".to_owned()));
        }
        self.submitted += 1;
        self.pending = Some((timestamp, timestamp + self.latency));
        Ok(())
    }

    fn poll(&mut self, now: f64) -> Option<Detection> {
        let (captured, ready) = self.pending?;
        if now < ready {
            return None;
        }
        self.pending = None;
        Some(self.detect(captured))
    }

    fn close(&mut self) {
        self.closed += 1;
        self.pending = None;
    }
}

/// Camera producing blank frames of a fixed size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntheticCamera {
    width: u32,
    height: u32,
    stopped: usize,
}

impl SyntheticCamera {
    /// Camera with the given frame size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stopped: 0,
        }
    }

    /// Times [`VideoSource::stop`] ran.
    #[must_use]
    pub const fn stopped(&self) -> usize {
        self.stopped
    }
}

impl VideoSource for SyntheticCamera {
    fn capture(&mut self) -> Option<VideoFrame> {
        (self.stopped == 0).then(|| VideoFrame {
            width: self.width,
            height: self.height,
            pixels: Vec::new(),
        })
    }

    fn stop(&mut self) {
        self.stopped += 1;
    }
}

/// Surface that keeps the last snapshot instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    viewport: Viewport,
    frames: usize,
    last: Option<RenderSnapshot>,
}

impl HeadlessSurface {
    /// Surface of the given size.
    #[must_use]
    pub const fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            frames: 0,
            last: None,
        }
    }

    /// Frames presented.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// Most recent snapshot.
    #[must_use]
    pub const fn last(&self) -> Option<&RenderSnapshot> {
        self.last.as_ref()
    }
}

impl Surface for HeadlessSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn present(&mut self, snapshot: &RenderSnapshot) {
        self.frames += 1;
        self.last = Some(snapshot.clone());
    }
}

//! Mount/unmount lifecycle around the engine.
//!
//! A [`Session`] binds three external collaborators: a [`Surface`] to draw
//! on, a [`VideoSource`] producing camera frames, and a [`HandDetector`]
//! that turns frames into [`Detection`]s some time later. Detector failures
//! are fatal to the input pipeline but never to the session: the camera is
//! stopped, no further frames are submitted, and ticking carries on with no
//! hand input.
//!
//! Teardown takes each collaborator out of its slot before releasing it, so
//! every resource is released exactly once and a detection arriving after
//! unmount finds nothing to act on.

use log::{debug, error, info, warn};
use thiserror::Error;

use crate::camera::Viewport;
use crate::config::{EngineConfig, InvalidValue};
use crate::engine::Engine;
use crate::gesture::landmarks::Detection;
use crate::snapshot::RenderSnapshot;

/// A captured camera frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Packed RGBA bytes; may be empty for synthetic sources.
    pub pixels: Vec<u8>,
}

/// Failure reported by a detector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectorError {
    /// The model or runtime could not be loaded.
    #[error("detector initialisation failed: {0}")]
    Init(String),
    /// A frame could not be handed to the detector.
    #[error("frame submission failed: {0}")]
    Submit(String),
}

/// Setup failure at mount time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No render target was supplied.
    #[error("no render surface")]
    MissingSurface,
    /// No camera was supplied.
    #[error("no video source")]
    MissingVideoSource,
    /// No detector was supplied.
    #[error("no hand detector")]
    MissingDetector,
    /// The engine tuning breaks an invariant.
    #[error(transparent)]
    InvalidConfig(#[from] InvalidValue),
}

/// Asynchronous hand-landmark detector.
pub trait HandDetector {
    /// Loads the model.
    ///
    /// # Errors
    /// Returns [`DetectorError::Init`] when the runtime is unavailable.
    fn init(&mut self) -> Result<(), DetectorError>;

    /// Starts analysing `frame`, captured at host time `timestamp`.
    ///
    /// # Errors
    /// Returns [`DetectorError::Submit`] when the runtime aborted.
    fn submit(&mut self, frame: &VideoFrame, timestamp: f64) -> Result<(), DetectorError>;

    /// Returns a finished result, if one is ready at host time `now`.
    fn poll(&mut self, now: f64) -> Option<Detection>;

    /// Releases the detector's resources.
    fn close(&mut self);
}

/// Camera frames.
pub trait VideoSource {
    /// Grabs the current frame, or `None` if none is ready.
    fn capture(&mut self) -> Option<VideoFrame>;

    /// Stops the camera and its tracks.
    fn stop(&mut self);
}

impl<T: HandDetector + ?Sized> HandDetector for &mut T {
    fn init(&mut self) -> Result<(), DetectorError> {
        (**self).init()
    }

    fn submit(&mut self, frame: &VideoFrame, timestamp: f64) -> Result<(), DetectorError> {
        (**self).submit(frame, timestamp)
    }

    fn poll(&mut self, now: f64) -> Option<Detection> {
        (**self).poll(now)
    }

    fn close(&mut self) {
        (**self).close();
    }
}

impl<T: VideoSource + ?Sized> VideoSource for &mut T {
    fn capture(&mut self) -> Option<VideoFrame> {
        (**self).capture()
    }

    fn stop(&mut self) {
        (**self).stop();
    }
}

/// Render target.
pub trait Surface {
    /// Current backing-store size.
    fn viewport(&self) -> Viewport;

    /// Draws one frame.
    fn present(&mut self, snapshot: &RenderSnapshot);
}

/// Collaborators handed to [`Session::mount`]; any may be missing.
#[derive(Debug)]
pub struct SessionParts<S, V, D> {
    /// Render target.
    pub surface: Option<S>,
    /// Camera.
    pub video: Option<V>,
    /// Landmark detector.
    pub detector: Option<D>,
}

/// Whether frames are still being fed to the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Frames are submitted every tick.
    Running,
    /// A detector failure stopped the pipeline for good.
    Halted,
}

/// Outcome of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// A frame is now in flight.
    Submitted,
    /// A previous frame is still in flight; this one was dropped.
    Dropped,
    /// The camera had no frame ready.
    NoFrame,
    /// The pipeline is halted or the session is unmounted.
    Halted,
}

type FirstResult = Box<dyn FnOnce()>;

/// A mounted engine with its collaborators.
pub struct Session<S, V, D> {
    engine: Engine,
    surface: Option<S>,
    video: Option<V>,
    detector: Option<D>,
    pipeline: PipelineState,
    in_flight: bool,
    on_first_result: Option<FirstResult>,
}

impl<S, V, D> std::fmt::Debug for Session<S, V, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("mounted", &self.surface.is_some())
            .field("pipeline", &self.pipeline)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<S: Surface, V: VideoSource, D: HandDetector> Session<S, V, D> {
    /// Binds the collaborators and starts the detector pipeline.
    ///
    /// `on_first_result` runs exactly once, on the first detection handled.
    /// A detector that fails to initialise halts the pipeline but the
    /// session still mounts.
    ///
    /// # Errors
    /// Returns a [`SessionError`] naming the first missing collaborator, or
    /// [`SessionError::InvalidConfig`] when `engine_config` fails validation.
    /// The detector is not initialised in either case.
    pub fn mount(
        parts: SessionParts<S, V, D>,
        engine_config: EngineConfig,
        seed: Option<u64>,
        on_first_result: impl FnOnce() + 'static,
    ) -> Result<Self, SessionError> {
        let SessionParts {
            surface,
            video,
            detector,
        } = parts;
        let surface = surface.ok_or(SessionError::MissingSurface);
        let video = video.ok_or(SessionError::MissingVideoSource);
        let detector = detector.ok_or(SessionError::MissingDetector);
        let (surface, mut video, mut detector) = match (surface, video, detector) {
            (Ok(s), Ok(v), Ok(d)) => (s, v, d),
            (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
                error!("mount failed: {err}");
                return Err(err);
            }
        };

        let viewport = surface.viewport();
        let built = match seed {
            Some(seed) => Engine::with_seed(engine_config, viewport, seed),
            None => Engine::new(engine_config, viewport),
        };
        let engine = built.map_err(|err| {
            error!("mount failed: {err}");
            SessionError::from(err)
        })?;
        let pipeline = match detector.init() {
            Ok(()) => PipelineState::Running,
            Err(err) => {
                warn!("{err}; hand input disabled");
                video.stop();
                PipelineState::Halted
            }
        };
        info!(
            "session mounted on {}x{} surface",
            viewport.width, viewport.height
        );
        Ok(Self {
            engine,
            surface: Some(surface),
            video: (pipeline == PipelineState::Running).then_some(video),
            detector: Some(detector),
            pipeline,
            in_flight: false,
            on_first_result: Some(Box::new(on_first_result)),
        })
    }

    /// Whether [`Session::unmount`] has not yet run.
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    /// Input pipeline state.
    #[must_use]
    pub const fn pipeline(&self) -> PipelineState {
        self.pipeline
    }

    /// Whether a submitted frame is awaiting its result.
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// The engine.
    #[must_use]
    pub const fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Render target, until unmount.
    #[must_use]
    pub const fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Mutable engine, for settings, spawning and resets.
    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    fn halt(&mut self, err: &DetectorError) {
        warn!("{err}; hand input disabled");
        self.pipeline = PipelineState::Halted;
        self.in_flight = false;
        if let Some(mut video) = self.video.take() {
            video.stop();
        }
    }

    /// Submits the current camera frame unless one is already in flight.
    pub fn submit_frame(&mut self, now: f64) -> Submission {
        if !self.is_mounted() || self.pipeline == PipelineState::Halted {
            return Submission::Halted;
        }
        if self.in_flight {
            debug!("frame dropped: detector busy");
            return Submission::Dropped;
        }
        let Some(frame) = self.video.as_mut().and_then(VideoSource::capture) else {
            return Submission::NoFrame;
        };
        let Some(detector) = self.detector.as_mut() else {
            return Submission::Halted;
        };
        match detector.submit(&frame, now) {
            Ok(()) => {
                self.in_flight = true;
                Submission::Submitted
            }
            Err(err) => {
                self.halt(&err);
                Submission::Halted
            }
        }
    }

    /// Collects a finished detection, if any, and applies it.
    pub fn poll_detector(&mut self, now: f64) -> bool {
        let Some(detection) = self.detector.as_mut().and_then(|d| d.poll(now)) else {
            return false;
        };
        self.in_flight = false;
        self.handle_detection(&detection)
    }

    /// Applies a detection delivered by the detector.
    ///
    /// Returns `false` without touching any state once unmounted.
    pub fn handle_detection(&mut self, detection: &Detection) -> bool {
        if !self.is_mounted() {
            return false;
        }
        if let Some(first) = self.on_first_result.take() {
            first();
        }
        self.engine.on_detection(detection);
        true
    }

    /// One rendering tick: submit, collect, simulate, draw.
    pub fn tick(&mut self, now: f64) {
        if !self.is_mounted() {
            return;
        }
        if let Some(viewport) = self.surface.as_ref().map(Surface::viewport) {
            if viewport != *self.engine.viewport() {
                self.engine.set_viewport(viewport);
            }
        }
        self.submit_frame(now);
        self.poll_detector(now);
        self.engine.tick(now);
        if let Some(surface) = self.surface.as_mut() {
            surface.present(&self.engine.snapshot());
        }
    }

    /// Tears everything down. Returns `false` if already unmounted.
    pub fn unmount(&mut self) -> bool {
        let Some(_surface) = self.surface.take() else {
            return false;
        };
        if let Some(mut detector) = self.detector.take() {
            detector.close();
        }
        if let Some(mut video) = self.video.take() {
            video.stop();
        }
        self.on_first_result = None;
        self.in_flight = false;
        self.engine.clear();
        info!("session unmounted");
        true
    }
}

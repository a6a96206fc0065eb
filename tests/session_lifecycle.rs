//! Mount, submission and teardown behaviour of `Session`.

use std::cell::Cell;
use std::rc::Rc;

use mockall::mock;
use mockall::predicate::always;
use palmtide::config::CameraConfig;
use palmtide::replay::HeadlessSurface;
use palmtide::session::{PipelineState, Submission};
use palmtide::{
    Detection, DetectorError, EngineConfig, HandDetector, InvalidValue, Session, SessionError,
    SessionParts, VideoFrame, VideoSource, Viewport,
};
use rstest::rstest;

mock! {
    pub Detector {}
    impl HandDetector for Detector {
        fn init(&mut self) -> Result<(), DetectorError>;
        fn submit(&mut self, frame: &VideoFrame, timestamp: f64) -> Result<(), DetectorError>;
        fn poll(&mut self, now: f64) -> Option<Detection>;
        fn close(&mut self);
    }
}

mock! {
    pub Camera {}
    impl VideoSource for Camera {
        fn capture(&mut self) -> Option<VideoFrame>;
        fn stop(&mut self);
    }
}

type TestSession = Session<HeadlessSurface, MockCamera, MockDetector>;

fn surface() -> HeadlessSurface {
    HeadlessSurface::new(Viewport::new(640.0, 480.0))
}

fn camera(stops: usize) -> MockCamera {
    let mut camera = MockCamera::new();
    camera.expect_capture().returning(|| Some(VideoFrame::default()));
    camera.expect_stop().times(stops).return_const(());
    camera
}

fn mount(detector: MockDetector, camera: MockCamera, counter: &Rc<Cell<u32>>) -> TestSession {
    let seen = Rc::clone(counter);
    Session::mount(
        SessionParts {
            surface: Some(surface()),
            video: Some(camera),
            detector: Some(detector),
        },
        EngineConfig::default(),
        Some(1),
        move || seen.set(seen.get() + 1),
    )
    .expect("all collaborators present")
}

#[rstest]
fn missing_detector_is_a_setup_failure() {
    let result: Result<TestSession, SessionError> = Session::mount(
        SessionParts {
            surface: Some(surface()),
            video: Some(MockCamera::new()),
            detector: None,
        },
        EngineConfig::default(),
        None,
        || {},
    );
    assert_eq!(result.err(), Some(SessionError::MissingDetector));
}

#[rstest]
fn missing_surface_is_reported_first() {
    let result: Result<TestSession, SessionError> = Session::mount(
        SessionParts {
            surface: None,
            video: None,
            detector: None,
        },
        EngineConfig::default(),
        None,
        || {},
    );
    assert_eq!(result.err(), Some(SessionError::MissingSurface));
}

#[rstest]
fn inverted_zoom_bounds_fail_mount_before_detector_init() {
    let mut detector = MockDetector::new();
    detector.expect_init().never();
    let config = EngineConfig {
        camera: CameraConfig {
            min_zoom: 2.0,
            max_zoom: 1.0,
        },
        ..EngineConfig::default()
    };
    let result: Result<TestSession, SessionError> = Session::mount(
        SessionParts {
            surface: Some(surface()),
            video: Some(MockCamera::new()),
            detector: Some(detector),
        },
        config,
        Some(1),
        || {},
    );
    assert!(matches!(
        result.err(),
        Some(SessionError::InvalidConfig(InvalidValue { field: "camera", .. }))
    ));
}

#[rstest]
fn overlapping_submission_is_dropped_and_first_result_fires_once() {
    let mut detector = MockDetector::new();
    detector.expect_init().times(1).returning(|| Ok(()));
    detector
        .expect_submit()
        .with(always(), always())
        .times(2)
        .returning(|_, _| Ok(()));
    let mut ready = [false, true, true].into_iter();
    detector.expect_poll().returning(move |now| {
        ready.next().unwrap_or(true).then(|| Detection {
            timestamp: now,
            hands: Vec::new(),
        })
    });
    detector.expect_close().times(1).return_const(());

    let counter = Rc::new(Cell::new(0));
    let mut session = mount(detector, camera(1), &counter);

    assert_eq!(session.submit_frame(0.0), Submission::Submitted);
    assert_eq!(session.submit_frame(0.01), Submission::Dropped);
    assert!(!session.poll_detector(0.02));
    assert!(session.poll_detector(0.03));
    assert_eq!(session.submit_frame(0.04), Submission::Submitted);
    assert!(session.poll_detector(0.05));
    assert_eq!(counter.get(), 1);

    assert!(session.unmount());
}

#[rstest]
fn init_failure_halts_pipeline_but_ticking_continues() {
    let mut detector = MockDetector::new();
    detector
        .expect_init()
        .times(1)
        .returning(|| Err(DetectorError::Init("runtime missing".to_owned())));
    detector.expect_submit().never();
    detector.expect_poll().returning(|_| None);
    detector.expect_close().times(1).return_const(());

    let counter = Rc::new(Cell::new(0));
    let mut session = mount(detector, camera(1), &counter);
    assert_eq!(session.pipeline(), PipelineState::Halted);

    let id = session.engine_mut().spawn_random_body();
    let start = session.engine().world().body(id).expect("spawned").pos;
    session.tick(0.0);
    session.tick(1.0 / 60.0);
    session.tick(2.0 / 60.0);
    let moved = session.engine().world().body(id).expect("still there").pos;
    assert_ne!(start, moved);
    assert_eq!(session.submit_frame(0.1), Submission::Halted);

    assert!(session.unmount());
}

#[rstest]
fn submission_failure_stops_camera_once() {
    let mut detector = MockDetector::new();
    detector.expect_init().returning(|| Ok(()));
    detector
        .expect_submit()
        .times(1)
        .returning(|_, _| Err(DetectorError::Submit("abort".to_owned())));
    detector.expect_poll().returning(|_| None);
    detector.expect_close().times(1).return_const(());

    let counter = Rc::new(Cell::new(0));
    let mut session = mount(detector, camera(1), &counter);
    assert_eq!(session.submit_frame(0.0), Submission::Halted);
    assert_eq!(session.pipeline(), PipelineState::Halted);
    assert_eq!(session.submit_frame(0.1), Submission::Halted);
    assert!(session.unmount());
    assert_eq!(counter.get(), 0);
}

#[rstest]
fn unmount_is_idempotent_and_late_results_are_ignored() {
    let mut detector = MockDetector::new();
    detector.expect_init().returning(|| Ok(()));
    detector.expect_close().times(1).return_const(());

    let counter = Rc::new(Cell::new(0));
    let mut session = mount(detector, camera(1), &counter);
    session.engine_mut().spawn_random_body();

    assert!(session.unmount());
    assert!(!session.unmount());
    assert!(!session.is_mounted());
    assert!(session.engine().world().bodies().is_empty());
    assert!(!session.handle_detection(&Detection::default()));
    assert_eq!(counter.get(), 0);
    session.tick(1.0);
}

//! A full session driven by the scripted detector.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;
use palmtide::replay::{HandKeyframe, HandTrack, HeadlessSurface, ScriptedDetector, SyntheticCamera};
use palmtide::session::PipelineState;
use palmtide::{EngineConfig, Session, SessionParts, Shape, Viewport};
use rstest::rstest;
use test_utils::{add_body, material, to_normalised};

const TICK: f64 = 1.0 / 60.0;

fn keyframe(at: f64, center: Vec2, pinched: bool) -> HandKeyframe {
    HandKeyframe { at, center, pinched }
}

#[rstest]
fn scripted_hand_carries_and_throws_a_body() {
    palmtide::init_logging(false);
    let viewport = Viewport::new(800.0, 600.0);
    let start = Vec2::new(300.0, 200.0);
    let lift = Vec2::new(500.0, 150.0);
    let track = HandTrack::new(vec![
        keyframe(0.0, to_normalised(start, &viewport), false),
        keyframe(0.05, to_normalised(start, &viewport), true),
        keyframe(0.8, to_normalised(lift, &viewport), true),
        keyframe(0.85, to_normalised(lift, &viewport), false),
        keyframe(1.0, to_normalised(lift, &viewport), false),
    ]);
    let first_results = Rc::new(Cell::new(0_u32));
    let seen = Rc::clone(&first_results);
    let mut session = Session::mount(
        SessionParts {
            surface: Some(HeadlessSurface::new(viewport)),
            video: Some(SyntheticCamera::new(640, 480)),
            detector: Some(ScriptedDetector::new(vec![track], 0.02)),
        },
        EngineConfig::default(),
        Some(5),
        move || seen.set(seen.get() + 1),
    )
    .expect("all collaborators present");

    let max_speed = session.engine().config().throw.max_speed;
    let world = session.engine_mut().world_mut();
    let id = add_body(world, Shape::Circle { radius: 30.0 }, start, material(0.4, 0.2));
    world.hoop_mut().set_geometry(None);

    let mut grabbed_at_some_point = false;
    let mut now = 0.0;
    while now < 0.84 {
        session.tick(now);
        grabbed_at_some_point |= session.engine().grabbed_by(0) == Some(id);
        now += TICK;
    }
    assert!(grabbed_at_some_point, "hand never grabbed the body");

    while now < 0.95 {
        session.tick(now);
        now += TICK;
    }
    assert_eq!(session.engine().grabbed_by(0), None);
    let body = session.engine().world().body(id).expect("body exists");
    assert!(body.vel.x > 0.0, "thrown toward the lift direction: {:?}", body.vel);
    assert!(body.vel.length() <= max_speed + 1e-2);

    assert_eq!(first_results.get(), 1);
    let frames = session.surface().map_or(0, HeadlessSurface::frames);
    assert!(frames > 50);
    let snapshot = session.surface().and_then(HeadlessSurface::last).expect("presented");
    assert_eq!(snapshot.bodies.len(), 1);

    assert!(session.unmount());
    assert!(session.surface().is_none());
}

#[rstest]
#[case::init_failure(ScriptedDetector::new(Vec::new(), 0.02).failing_init("model missing"), 0)]
#[case::abort_after_three_frames(ScriptedDetector::new(Vec::new(), 0.0).failing_after(3), 3)]
fn detector_failure_halts_input_but_bodies_keep_falling(
    #[case] mut detector: ScriptedDetector,
    #[case] accepted: usize,
) {
    let mut camera = SyntheticCamera::new(640, 480);
    {
        let mut session = Session::mount(
            SessionParts {
                surface: Some(HeadlessSurface::new(Viewport::new(800.0, 600.0))),
                video: Some(&mut camera),
                detector: Some(&mut detector),
            },
            EngineConfig::default(),
            Some(9),
            || {},
        )
        .expect("all collaborators present");
        let id = add_body(
            session.engine_mut().world_mut(),
            Shape::Circle { radius: 20.0 },
            Vec2::new(400.0, 100.0),
            material(0.4, 0.2),
        );

        let mut now = 0.0;
        for _ in 0..10 {
            session.tick(now);
            now += TICK;
        }
        assert_eq!(session.pipeline(), PipelineState::Halted);
        let y = session.engine().world().body(id).expect("body exists").pos.y;
        assert!(y > 100.0, "body should keep falling, y = {y}");
        assert!(session.unmount());
        assert!(!session.unmount());
    }
    assert_eq!(detector.submitted(), accepted);
    assert_eq!(detector.closed(), 1);
    assert_eq!(camera.stopped(), 1);
}

//! Behaviour-driven tests for pinch grabbing.

use glam::Vec2;
use palmtide::{BodyId, Engine, Shape};
use test_utils::{add_body, detection, material, open_hand_at, pinching_hand_at, test_engine};

#[path = "support/rspec_runner.rs"]
mod rspec_runner;
use rspec_runner::run_serial;

const CENTER: Vec2 = Vec2::new(400.0, 300.0);

#[derive(Debug, Clone)]
struct GrabScene {
    engine: Engine,
    body: Option<BodyId>,
}

impl Default for GrabScene {
    fn default() -> Self {
        Self {
            engine: test_engine(800.0, 600.0),
            body: None,
        }
    }
}

impl GrabScene {
    fn setup(&mut self) {
        let id = add_body(
            self.engine.world_mut(),
            Shape::Circle { radius: 25.0 },
            CENTER,
            material(0.5, 0.2),
        );
        self.body = Some(id);
    }

    fn pinch_with(&mut self, hands: usize, t: f64) {
        let viewport = *self.engine.viewport();
        let pinching = (0..hands).map(|_| pinching_hand_at(CENTER, &viewport)).collect();
        self.engine.on_detection(&detection(t, pinching));
    }

    fn open_hand(&mut self, t: f64) {
        let viewport = *self.engine.viewport();
        self.engine
            .on_detection(&detection(t, vec![open_hand_at(CENTER, &viewport)]));
    }
}

#[test]
fn pinch_grabs_and_release_throws() {
    run_serial(&rspec::given(
        "a resting circle at the centre of an 800x600 surface",
        GrabScene::default(),
        |ctx| {
            ctx.before_each(|scene| scene.setup());
            ctx.when("one hand pinches over the circle's centre", |ctx| {
                ctx.before_each(|scene| scene.pinch_with(1, 1.0));
                ctx.then("that hand holds the circle immediately", |scene| {
                    assert_eq!(scene.engine.grabbed_by(0), scene.body);
                });
                ctx.when("the hand opens", |ctx| {
                    ctx.before_each(|scene| scene.open_hand(1.0 + 1.0 / 30.0));
                    ctx.then("the grab is released", |scene| {
                        assert_eq!(scene.engine.grabbed_by(0), None);
                    });
                    ctx.then("the circle briefly ignores that hand", |scene| {
                        let id = scene.body.expect("body spawned");
                        assert!(scene.engine.world().is_ignored(id, 0, 1.1));
                    });
                });
            });
            ctx.when("two hands pinch the same circle in one callback", |ctx| {
                ctx.before_each(|scene| scene.pinch_with(2, 1.0));
                ctx.then("only the first hand holds it", |scene| {
                    assert_eq!(scene.engine.grabbed_by(0), scene.body);
                    assert_eq!(scene.engine.grabbed_by(1), None);
                });
                ctx.then("the second hand is still pinching", |scene| {
                    let hand = scene.engine.hand(1).expect("slot exists");
                    assert!(hand.is_pinching());
                });
            });
        },
    ));
}

//! Engine context.
//!
//! [`Engine`] owns every piece of simulation state: camera, settings, the
//! physics world, the hand slots and the clock. Two producers drive it.
//! [`Engine::on_detection`] is the only writer of gesture and pointer state;
//! [`Engine::tick`] is the only driver of physics stepping. Both may run in
//! any order, so the tick treats hand state as a continuously valid
//! snapshot rather than a one-shot message.

use glam::Vec2;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::camera::{Camera, Viewport};
use crate::clock::{SimulationClock, TickPlan};
use crate::config::{EngineConfig, InvalidValue, Settings};
use crate::constants::MAX_HANDS;
use crate::gesture::landmarks::{Detection, HandLandmarks};
use crate::gesture::pinch::PinchEdge;
use crate::gesture::GestureInterpreter;
use crate::grab::GrabController;
use crate::hand::{HandSlots, HandState};
use crate::snapshot::RenderSnapshot;
use crate::world::body::{BodyId, Material, ShapeHint};
use crate::world::hoop::HoopGeometry;
use crate::world::spawn::{random_body, random_hint, SpawnSite};
use crate::world::{GrabDrive, HandPresence, PhysicsWorld, StepInput};

/// All state for one mounted simulation.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    settings: Settings,
    viewport: Viewport,
    camera: Camera,
    world: PhysicsWorld,
    hands: HandSlots,
    interpreter: GestureInterpreter,
    grab: GrabController,
    clock: SimulationClock,
    rng: StdRng,
    hoop_enabled: bool,
}

impl Engine {
    /// Engine seeded from the operating system.
    ///
    /// # Errors
    /// Returns the first invariant `config` violates.
    pub fn new(config: EngineConfig, viewport: Viewport) -> Result<Self, InvalidValue> {
        Self::with_rng(config, viewport, StdRng::from_os_rng())
    }

    /// Engine with reproducible spawns.
    ///
    /// # Errors
    /// Returns the first invariant `config` violates.
    pub fn with_seed(
        config: EngineConfig,
        viewport: Viewport,
        seed: u64,
    ) -> Result<Self, InvalidValue> {
        Self::with_rng(config, viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: EngineConfig,
        viewport: Viewport,
        rng: StdRng,
    ) -> Result<Self, InvalidValue> {
        config.validate()?;
        let settings = Settings::default().sanitised(&config.camera);
        let camera = Camera {
            zoom: settings.zoom,
            ..Camera::identity_for(&viewport)
        };
        Ok(Self {
            world: PhysicsWorld::new(config.physics.clone(), config.grab.clone()),
            hands: HandSlots::default(),
            interpreter: GestureInterpreter::new(
                config.gesture.clone(),
                config.hand.clone(),
                config.throw.max_speed,
            ),
            grab: GrabController::new(config.grab.clone(), config.throw.clone()),
            clock: SimulationClock::new(&config.clock),
            rng,
            hoop_enabled: false,
            config,
            settings,
            viewport,
            camera,
        })
    }

    /// Tuning in effect.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Live settings after sanitising.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current surface.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The physics world.
    #[must_use]
    pub const fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    /// Mutable physics world, for scripted scenes.
    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    /// All hand slots.
    #[must_use]
    pub const fn hands(&self) -> &HandSlots {
        &self.hands
    }

    /// Hand slot `index`.
    #[must_use]
    pub fn hand(&self, index: usize) -> Option<&HandState> {
        self.hands.get(index)
    }

    /// Body held by hand `index`.
    #[must_use]
    pub fn grabbed_by(&self, index: usize) -> Option<BodyId> {
        self.hands.get(index).and_then(|h| h.grab_active_id)
    }

    /// World y of the floor line.
    #[must_use]
    pub fn floor_y(&self) -> f32 {
        self.camera.floor_y(&self.viewport, self.settings.floor_height)
    }

    /// World x of the left and right walls.
    #[must_use]
    pub fn walls(&self) -> (f32, f32) {
        self.camera.horizontal_bounds(&self.viewport)
    }

    /// Whether the hoop rig is installed.
    #[must_use]
    pub const fn hoop_enabled(&self) -> bool {
        self.hoop_enabled
    }

    /// Baskets scored since the last reset.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.world.hoop().score()
    }

    /// Adopts a new surface size and recentres the camera on it.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.world_center = viewport.center();
        self.layout_hoop();
    }

    /// Applies live settings.
    ///
    /// Zoom is clamped to the configured range and bounciness and friction
    /// are written into every existing body.
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitised(&self.config.camera);
        self.camera.zoom = self.settings.zoom;
        let material = self.material();
        for body in self.world.bodies_mut().as_mut_slice() {
            body.material = material;
        }
        self.layout_hoop();
        debug!("applied settings {:?}", self.settings);
    }

    /// Installs or removes the hoop rig.
    pub fn set_hoop_enabled(&mut self, enabled: bool) {
        self.hoop_enabled = enabled;
        self.layout_hoop();
    }

    fn layout_hoop(&mut self) {
        let geometry = self
            .hoop_enabled
            .then(|| HoopGeometry::layout(&self.config.hoop, &self.camera, &self.viewport));
        self.world.hoop_mut().set_geometry(geometry);
    }

    const fn material(&self) -> Material {
        Material {
            restitution: self.settings.bounciness,
            friction: self.settings.friction,
        }
    }

    /// Spawns a body of the given family near the top of the screen.
    pub fn spawn_body(&mut self, hint: ShapeHint) -> BodyId {
        let id = self.world.bodies_mut().allocate_id();
        let site = SpawnSite {
            camera: &self.camera,
            viewport: &self.viewport,
            material: self.material(),
            density: self.config.physics.density,
        };
        let body = random_body(&mut self.rng, id, hint, &site);
        debug!("spawned {:?} body {id} at {:?}", hint, body.pos);
        self.world.bodies_mut().insert(body)
    }

    /// Spawns a body of a random family.
    pub fn spawn_random_body(&mut self) -> BodyId {
        let hint = random_hint(&mut self.rng);
        self.spawn_body(hint)
    }

    /// Removes every body, grab and score. Calling it twice is harmless.
    pub fn reset_scene(&mut self) {
        self.world.clear();
        for (_, state) in self.hands.iter_mut() {
            state.grab_active_id = None;
            state.throw_history.clear();
        }
        info!("scene reset");
    }

    /// Drops all transient state, as on unmount.
    pub fn clear(&mut self) {
        self.world.clear();
        self.hands.clear();
        self.clock.reset();
    }

    /// Applies one detector callback.
    ///
    /// Hand `i` of the detection feeds slot `i`. A slot that received no
    /// landmarks releases its grab through the normal throw path and is then
    /// cleared.
    pub fn on_detection(&mut self, detection: &Detection) {
        let now = detection.timestamp;
        if detection.hands.len() > MAX_HANDS {
            warn!(
                "detector reported {} hands; tracking the first {MAX_HANDS}",
                detection.hands.len()
            );
        }
        for index in 0..MAX_HANDS {
            match detection.hands.get(index) {
                Some(landmarks) => self.update_hand(index, landmarks, now),
                None => self.lose_hand(index, now),
            }
        }
        self.grab.record_samples(&mut self.hands, now);
    }

    fn update_hand(&mut self, index: usize, landmarks: &HandLandmarks, now: f64) {
        let Some(state) = self.hands.get_mut(index) else {
            return;
        };
        let update = self
            .interpreter
            .update(state, landmarks, now, &self.camera, &self.viewport);
        match update.edge {
            PinchEdge::Started => {
                self.grab.acquire(
                    &mut self.hands,
                    index,
                    &self.world,
                    update.anchor_world,
                    &self.camera,
                    &self.viewport,
                );
            }
            PinchEdge::Ended => {
                self.grab
                    .release(&mut self.hands, index, &mut self.world, now);
            }
            PinchEdge::None => {}
        }
    }

    fn lose_hand(&mut self, index: usize, now: f64) {
        if !self.hands.get(index).is_some_and(|h| h.tracked) {
            return;
        }
        self.grab
            .release(&mut self.hands, index, &mut self.world, now);
        if let Some(state) = self.hands.get_mut(index) {
            state.clear();
        }
        debug!("hand {index} lost");
    }

    fn drop_missing_grabs(&mut self) {
        for (index, state) in self.hands.iter_mut() {
            if let Some(id) = state.grab_active_id {
                if self.world.body(id).is_none() {
                    debug!("hand {index} grab on missing body {id} cleared");
                    state.grab_active_id = None;
                    state.throw_history.clear();
                }
            }
        }
    }

    /// Advances the simulation to host time `now`.
    ///
    /// Returns the substep plan that ran, or `None` when no time elapsed.
    pub fn tick(&mut self, now: f64) -> Option<TickPlan> {
        let plan = self.clock.advance(now)?;
        self.drop_missing_grabs();

        let drives: Vec<GrabDrive> = self
            .hands
            .iter()
            .filter_map(|(_, hand)| {
                let body = hand.grab_active_id?;
                let anchor = hand.pointer.pinch?;
                Some(GrabDrive {
                    body,
                    target: self.camera.screen_to_world(anchor, &self.viewport),
                    pointer_vel: hand.pointer.pinch_vel(),
                })
            })
            .collect();
        let presences: Vec<HandPresence<'_>> = self
            .hands
            .iter()
            .filter(|(_, hand)| hand.tracked)
            .map(|(index, hand)| HandPresence {
                hand: index,
                grabbed: hand.grab_active_id,
                colliders: hand.colliders.as_slice(),
            })
            .collect();

        let input = StepInput {
            dt: plan.sub_dt,
            now,
            gravity: self.settings.gravity,
            floor_y: self.camera.floor_y(&self.viewport, self.settings.floor_height),
            walls: self.camera.horizontal_bounds(&self.viewport),
            drives: &drives,
            hands: &presences,
        };
        for _ in 0..plan.substeps {
            self.world.step(&input);
        }
        Some(plan)
    }

    /// Read-only view for the render adapter.
    #[must_use]
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }

    /// World-space position of a screen point under the current camera.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.camera.screen_to_world(screen, &self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn engine() -> Engine {
        Engine::with_seed(EngineConfig::default(), Viewport::new(800.0, 600.0), 7)
            .expect("default config is valid")
    }

    #[rstest]
    fn inverted_zoom_bounds_are_rejected() {
        let mut config = EngineConfig::default();
        config.camera.min_zoom = 2.0;
        config.camera.max_zoom = 1.0;
        let err = Engine::with_seed(config, Viewport::new(800.0, 600.0), 7).err();
        assert_eq!(err.map(|e| e.field), Some("camera"));
    }

    #[rstest]
    fn settings_apply_to_existing_bodies(mut engine: Engine) {
        let id = engine.spawn_body(ShapeHint::Circle);
        engine.apply_settings(Settings {
            bounciness: 0.9,
            friction: 0.05,
            zoom: 9.0,
            ..Settings::default()
        });
        let body = engine.world().body(id).expect("spawned body");
        assert_relative_eq!(body.material.restitution, 0.9);
        assert_relative_eq!(body.material.friction, 0.05);
        assert_relative_eq!(engine.camera().zoom, engine.config().camera.max_zoom);
    }

    #[rstest]
    fn spawned_ids_are_unique(mut engine: Engine) {
        let a = engine.spawn_random_body();
        let b = engine.spawn_random_body();
        assert_ne!(a, b);
        assert_eq!(engine.world().bodies().len(), 2);
    }

    #[rstest]
    fn first_tick_does_not_step(mut engine: Engine) {
        engine.spawn_body(ShapeHint::Box);
        let before = engine.world().bodies().as_slice().to_vec();
        assert!(engine.tick(1.0).is_none());
        assert_eq!(engine.world().bodies().as_slice(), before.as_slice());
        assert!(engine.tick(1.0 + 1.0 / 60.0).is_some());
    }

    #[rstest]
    fn hoop_toggle_installs_geometry(mut engine: Engine) {
        engine.set_hoop_enabled(true);
        assert!(engine.world().hoop().geometry().is_some());
        engine.set_hoop_enabled(false);
        assert!(engine.world().hoop().geometry().is_none());
    }

    #[rstest]
    fn zoom_out_lowers_floor_in_world(mut engine: Engine) {
        let near = engine.floor_y();
        engine.apply_settings(Settings {
            zoom: 0.5,
            ..Settings::default()
        });
        assert!(engine.floor_y() > near);
    }
}

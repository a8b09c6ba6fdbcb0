//! Game Runtime
//!
//! Drives one frame of the simulation and owns the session-level toggles
//! (debug overlay, fps limit). Rendering and the frame limiter live in
//! `main.rs`; everything here also runs headless against a test backend.

use std::time::Duration;

use crate::config::{FpsLimit, RuntimeConfig};
use crate::input::{Action, InputSnapshot};
use crate::physics::{PhysicsWorld, RapierPhysics};
use crate::scene::{SceneDesc, SceneError};
use super::entity::ObjectId;
use super::world::GameWorld;

/// Frame timing data for performance profiling
#[derive(Debug, Clone, Default)]
pub struct FrameTimings {
    /// Input sampling time (ms)
    pub input_ms: f32,
    /// Simulation time (ms): contacts, components and the physics step
    pub logic_ms: f32,
    /// Drawing time (ms)
    pub render_ms: f32,
    /// Total frame time (ms)
    pub total_ms: f32,
}

impl FrameTimings {
    /// Start timing a phase (returns time in seconds from macroquad)
    pub fn start() -> f64 {
        macroquad::prelude::get_time()
    }

    /// Get elapsed time in ms since start
    pub fn elapsed_ms(start: f64) -> f32 {
        ((macroquad::prelude::get_time() - start) * 1000.0) as f32
    }
}

/// What a frame's system actions asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SystemRequests {
    pub reset_scene: bool,
    pub spawn_box: bool,
}

pub struct Runtime<P: PhysicsWorld> {
    pub world: GameWorld<P>,
    config: RuntimeConfig,
    pub show_debug_overlay: bool,
    pub fps_limit: FpsLimit,
    pub frame_timings: FrameTimings,
    frame_count: u64,
}

impl Runtime<RapierPhysics> {
    /// Runtime backed by rapier, with gravity from the config.
    pub fn new(config: RuntimeConfig) -> Self {
        let [gx, gy] = config.physics.gravity;
        let physics = RapierPhysics::new(macroquad::math::vec2(gx, gy));
        Self::with_physics(physics, config)
    }
}

impl<P: PhysicsWorld> Runtime<P> {
    pub fn with_physics(physics: P, config: RuntimeConfig) -> Self {
        let world = GameWorld::new(physics, config.physics.pixels_per_meter);
        Self {
            world,
            fps_limit: config.fps_limit,
            show_debug_overlay: false,
            frame_timings: FrameTimings::default(),
            frame_count: 0,
            config,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Replace everything in the world with a scene.
    pub fn load_scene(&mut self, scene: &SceneDesc) -> Result<Vec<ObjectId>, SceneError> {
        self.world.clear();
        let ids = scene.spawn(&mut self.world, &self.config.player)?;
        tracing::info!(objects = ids.len(), "scene loaded");
        Ok(ids)
    }

    /// Apply session toggles and report the requests the caller handles.
    pub fn handle_system_actions(&mut self, input: &InputSnapshot) -> SystemRequests {
        if input.was_pressed(Action::ToggleOverlay) {
            self.show_debug_overlay = !self.show_debug_overlay;
        }
        if input.was_pressed(Action::CycleFpsLimit) {
            self.fps_limit = self.fps_limit.next();
            tracing::debug!(limit = self.fps_limit.label(), "fps limit changed");
        }
        SystemRequests {
            reset_scene: input.was_pressed(Action::ResetScene),
            spawn_box: input.was_pressed(Action::SpawnBox),
        }
    }

    /// Run one frame of simulation: contacts, components, physics step,
    /// despawns.
    ///
    /// The physics always advances by the configured timestep; `now` is
    /// only used by component timers.
    pub fn tick(&mut self, input: &InputSnapshot, now: Duration) {
        let dt = self.config.physics.timestep;
        if self.config.contacts.derive_flags {
            self.world.classify_contacts(&self.config.contacts);
        }
        self.world.update(input, now);
        self.world.step(dt);
        self.world.flush_despawns();
        self.frame_count += 1;
    }
}

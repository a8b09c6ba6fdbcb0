//! capsule-runtime: component-driven 2D game objects on a rigid-body
//! simulation.
//!
//! - `physics`: the engine seam (`PhysicsWorld`) and its rapier backend
//! - `game`: objects, components, the world and the frame driver
//! - `input`: keyboard bindings sampled into per-frame snapshots
//! - `scene`: RON level descriptions
//! - `config`: RON runtime configuration

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod game;
pub mod input;
pub mod physics;
pub mod scene;

pub use config::RuntimeConfig;
pub use game::{GameObject, GameWorld, Runtime};
pub use physics::{PhysicsWorld, RapierPhysics};

//! Game Module
//!
//! A small component-based runtime for 2D physics games.
//!
//! Key concepts:
//! - Object: shared state plus an ordered list of components
//! - Component: closed set of behaviors (input, physics, graphics)
//! - World: owns the objects and the physics backend they live in
//! - Runtime: runs one frame in a fixed order
//!
//! Frame order: input snapshot, contact classification, component
//! updates (registration order), physics step, deferred despawns, render.

pub mod clock;
pub mod components;
pub mod contact;
pub mod entity;
pub mod object;
pub mod renderer;
pub mod runtime;
pub mod storage;
pub mod world;

// Re-export main types
pub use clock::{Clock, MacroquadClock, ManualClock, Stopwatch};
pub use components::{
    AnimationPlayer, Component, Frame, GraphicsComponent, JumpState, PhysicsComponent, PlayerInput, PlayerPhysics,
};
pub use entity::ObjectId;
pub use object::{
    Animation, ContactFlags, ControlState, GameObject, Geometry, ObjectError, ObjectKind, ObjectState,
    SecondaryBody, Shape,
};
pub use renderer::{render_world, DrawSurface, MacroquadSurface};
pub use runtime::{FrameTimings, Runtime, SystemRequests};
pub use world::GameWorld;

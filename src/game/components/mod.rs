//! Components
//!
//! Behavior attached to a game object. The set is closed, so a component is
//! an enum variant rather than a trait object: every object runs its
//! components in the order they were added, once per frame, each with the
//! same `Frame` and the owner's `ObjectState`.

mod graphics;
mod input;
mod physics;

pub use graphics::{AnimationPlayer, GraphicsComponent};
pub use input::{JumpState, PlayerInput};
pub use physics::{select_animation, select_friction, PhysicsComponent, PlayerPhysics};

use std::time::Duration;

use crate::input::InputSnapshot;
use crate::physics::PhysicsWorld;
use super::object::{ObjectKind, ObjectState};

/// Everything a component may read or drive during one frame.
pub struct Frame<'a> {
    pub physics: &'a mut dyn PhysicsWorld,
    pub input: &'a InputSnapshot,
    /// Frame time since startup
    pub now: Duration,
    pub pixels_per_meter: f32,
}

pub enum Component {
    Input(PlayerInput),
    Physics(PhysicsComponent),
    Graphics(GraphicsComponent),
}

impl Component {
    pub fn update(&mut self, frame: &mut Frame<'_>, owner: &mut ObjectState) {
        match self {
            Component::Input(input) => input.update(frame, owner),
            Component::Physics(physics) => physics.update(frame, owner),
            Component::Graphics(graphics) => graphics.update(frame, owner),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Component::Input(_) => "input",
            Component::Physics(p) => match p.object_kind() {
                ObjectKind::Player => "player-physics",
                ObjectKind::Box => "dynamic-physics",
                ObjectKind::Static => "static-physics",
            },
            Component::Graphics(_) => "graphics",
        }
    }
}

impl From<PlayerInput> for Component {
    fn from(input: PlayerInput) -> Self {
        Component::Input(input)
    }
}

impl From<PhysicsComponent> for Component {
    fn from(physics: PhysicsComponent) -> Self {
        Component::Physics(physics)
    }
}

impl From<GraphicsComponent> for Component {
    fn from(graphics: GraphicsComponent) -> Self {
        Component::Graphics(graphics)
    }
}

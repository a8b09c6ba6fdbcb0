//! Input state management
//!
//! Keyboard state is sampled once per frame into an `InputSnapshot`.
//! Components only ever see the snapshot, so gameplay code never touches
//! the keyboard directly and tests can fabricate input.

use macroquad::prelude::{is_key_down, is_key_pressed};
use super::{Action, InputBindings};

/// Immutable input state for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: u16,
    pressed: u16,
}

impl InputSnapshot {
    /// A snapshot with nothing held.
    pub const EMPTY: InputSnapshot = InputSnapshot { held: 0, pressed: 0 };

    /// Build a snapshot with the given actions held (and just pressed).
    pub fn with_held(actions: &[Action]) -> Self {
        let mut snapshot = Self::EMPTY;
        for &action in actions {
            snapshot.held |= action.bit();
            snapshot.pressed |= action.bit();
        }
        snapshot
    }

    /// Is the action held down this frame?
    pub fn is_held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    /// Did the action go down this frame?
    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed & action.bit() != 0
    }
}

/// Samples the keyboard through a set of bindings.
pub struct InputState {
    bindings: InputBindings,
}

impl InputState {
    pub fn new(bindings: InputBindings) -> Self {
        Self { bindings }
    }

    /// Call once per frame, before updating the world.
    pub fn sample(&self) -> InputSnapshot {
        let mut snapshot = InputSnapshot::EMPTY;
        for action in Action::ALL {
            let keys = self.bindings.keys(action);
            if keys.iter().any(|key| is_key_down(key.key_code())) {
                snapshot.held |= action.bit();
            }
            if keys.iter().any(|key| is_key_pressed(key.key_code())) {
                snapshot.pressed |= action.bit();
            }
        }
        snapshot
    }
}

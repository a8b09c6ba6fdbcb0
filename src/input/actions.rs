//! Game action definitions and key bindings
//!
//! Gameplay reads actions, never raw keys. Bindings are data so they can
//! live in the config file.

use macroquad::input::KeyCode;
use serde::{Deserialize, Serialize};

/// All actions that can be triggered by input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,
    /// Hard stop: kills all velocity while held
    Stop,

    // System
    ToggleOverlay,
    CycleFpsLimit,
    ResetScene,
    SpawnBox,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveLeft,
        Action::MoveRight,
        Action::Jump,
        Action::Stop,
        Action::ToggleOverlay,
        Action::CycleFpsLimit,
        Action::ResetScene,
        Action::SpawnBox,
    ];

    /// Bit used for this action in an input snapshot
    pub(crate) fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Keyboard keys that can be bound in the config file.
///
/// A serializable subset of macroquad's `KeyCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    B,
    R,
    Space,
    F1,
    F2,
}

impl Key {
    pub fn key_code(self) -> KeyCode {
        match self {
            Key::Left => KeyCode::Left,
            Key::Right => KeyCode::Right,
            Key::Up => KeyCode::Up,
            Key::Down => KeyCode::Down,
            Key::A => KeyCode::A,
            Key::D => KeyCode::D,
            Key::W => KeyCode::W,
            Key::S => KeyCode::S,
            Key::B => KeyCode::B,
            Key::R => KeyCode::R,
            Key::Space => KeyCode::Space,
            Key::F1 => KeyCode::F1,
            Key::F2 => KeyCode::F2,
        }
    }
}

/// Which keys trigger which action. Any bound key triggers the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputBindings {
    pub move_left: Vec<Key>,
    pub move_right: Vec<Key>,
    pub jump: Vec<Key>,
    pub stop: Vec<Key>,
    pub toggle_overlay: Vec<Key>,
    pub cycle_fps_limit: Vec<Key>,
    pub reset_scene: Vec<Key>,
    pub spawn_box: Vec<Key>,
}

impl InputBindings {
    pub fn keys(&self, action: Action) -> &[Key] {
        match action {
            Action::MoveLeft => &self.move_left,
            Action::MoveRight => &self.move_right,
            Action::Jump => &self.jump,
            Action::Stop => &self.stop,
            Action::ToggleOverlay => &self.toggle_overlay,
            Action::CycleFpsLimit => &self.cycle_fps_limit,
            Action::ResetScene => &self.reset_scene,
            Action::SpawnBox => &self.spawn_box,
        }
    }
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            move_left: vec![Key::Left, Key::A],
            move_right: vec![Key::Right, Key::D],
            jump: vec![Key::Up, Key::W, Key::Space],
            stop: vec![Key::Down, Key::S],
            toggle_overlay: vec![Key::F1],
            cycle_fps_limit: vec![Key::F2],
            reset_scene: vec![Key::R],
            spawn_box: vec![Key::B],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_bits_are_distinct() {
        let mut seen = 0u16;
        for action in Action::ALL {
            assert_eq!(seen & action.bit(), 0, "{:?} shares a bit", action);
            seen |= action.bit();
        }
    }

    #[test]
    fn test_default_bindings_cover_every_action() {
        let bindings = InputBindings::default();
        for action in Action::ALL {
            assert!(!bindings.keys(action).is_empty(), "{:?} is unbound", action);
        }
    }
}

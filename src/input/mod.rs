//! Keyboard input
//!
//! Provides an action-based input layer. The keyboard is polled once per
//! frame (macroquad) and frozen into an `InputSnapshot` that is handed to
//! every component update.

mod actions;
mod state;

pub use actions::*;
pub use state::*;

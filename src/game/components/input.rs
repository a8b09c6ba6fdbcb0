//! Player input: turns held actions into forces, impulses and control flags.

use std::time::Duration;

use macroquad::math::vec2;

use crate::config::PlayerTuning;
use crate::game::clock::Stopwatch;
use crate::game::object::ObjectState;
use crate::input::Action;
use crate::physics::BodyHandle;
use super::Frame;

/// Jump cycle. A jump can only start from `Idle` after the debounce
/// interval, and stays `Jumping` for at least the hold interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JumpState {
    #[default]
    Idle,
    Jumping,
}

#[derive(Debug, Clone)]
pub struct PlayerInput {
    tuning: PlayerTuning,
    jump: JumpState,
    jump_clock: Stopwatch,
}

impl PlayerInput {
    pub fn new(tuning: PlayerTuning) -> Self {
        Self {
            tuning,
            jump: JumpState::Idle,
            jump_clock: Stopwatch::new(),
        }
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn update(&mut self, frame: &mut Frame<'_>, owner: &mut ObjectState) {
        let Some(body) = owner.body() else { return };
        let Some(velocity) = frame.physics.linear_velocity(body) else { return };
        let mass = frame.physics.mass(body).unwrap_or(0.0);
        let on_ground = owner.flags.on_ground;
        let speed = if on_ground { self.tuning.ground_speed } else { self.tuning.air_speed };

        // Right wins when both directions are held
        if frame.input.is_held(Action::MoveRight) {
            if velocity.x < 0.0 {
                frame.physics.set_linear_velocity(body, vec2(0.0, velocity.y));
            }
            frame.physics.apply_force_to_center(body, vec2(speed * mass, 0.0));
            if let Some(control) = owner.control_mut() {
                control.key_right = true;
            }
        } else if frame.input.is_held(Action::MoveLeft) {
            if velocity.x > 0.0 {
                frame.physics.set_linear_velocity(body, vec2(0.0, velocity.y));
            }
            frame.physics.apply_force_to_center(body, vec2(-speed * mass, 0.0));
            if let Some(control) = owner.control_mut() {
                control.key_left = true;
            }
        }

        if frame.input.is_held(Action::Jump) && on_ground {
            self.update_jump(frame, owner, body, mass);
        }

        if frame.input.is_held(Action::Stop) {
            frame.physics.set_linear_velocity(body, vec2(0.0, 0.0));
        }
    }

    fn update_jump(&mut self, frame: &mut Frame<'_>, owner: &ObjectState, body: BodyHandle, mass: f32) {
        let elapsed = self.jump_clock.elapsed(frame.now);
        match self.jump {
            JumpState::Jumping => {
                if elapsed > Duration::from_millis(self.tuning.jump_hold_ms) {
                    self.jump = JumpState::Idle;
                    self.jump_clock.restart(frame.now);
                }
            }
            JumpState::Idle => {
                if elapsed > Duration::from_millis(self.tuning.jump_debounce_ms) {
                    let Some(center) = frame.physics.world_center(body) else { return };
                    // Push at the top edge of the object
                    let half_height = owner.dimensions().y / frame.pixels_per_meter / 2.0;
                    let point = center - vec2(0.0, half_height);
                    frame.physics.apply_linear_impulse(body, vec2(0.0, -mass * self.tuning.jump_speed), point);
                    self.jump = JumpState::Jumping;
                    self.jump_clock.restart(frame.now);
                    tracing::trace!(?point, "jump");
                }
            }
        }
    }
}

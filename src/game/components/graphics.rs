//! Graphics components
//!
//! Drawing itself happens in the renderer, which reads object state after
//! the frame's simulation. The component only advances per-object visual
//! state (the animation clip and its frame).

use std::time::Duration;

use crate::game::clock::Stopwatch;
use crate::game::object::{Animation, ObjectState};
use super::Frame;

/// Frames per clip in the character sheet
pub const FRAMES_PER_CLIP: usize = 4;
/// Time each frame stays on screen
pub const FRAME_TIME: Duration = Duration::from_millis(120);

pub enum GraphicsComponent {
    /// Static look, nothing to advance
    Plain,
    Animated(AnimationPlayer),
}

impl GraphicsComponent {
    pub fn animated() -> Self {
        GraphicsComponent::Animated(AnimationPlayer::new(FRAMES_PER_CLIP, FRAME_TIME))
    }

    pub fn update(&mut self, frame: &mut Frame<'_>, owner: &mut ObjectState) {
        match self {
            GraphicsComponent::Plain => {}
            GraphicsComponent::Animated(player) => {
                let clip = owner.control().map(|c| c.animation).unwrap_or_default();
                player.advance(clip, frame.now);
            }
        }
    }

    pub fn animation(&self) -> Option<&AnimationPlayer> {
        match self {
            GraphicsComponent::Plain => None,
            GraphicsComponent::Animated(player) => Some(player),
        }
    }
}

/// Steps through the frames of the current clip. Switching clips restarts
/// at frame zero.
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clip: Animation,
    frame: usize,
    frame_count: usize,
    frame_time: Duration,
    clock: Stopwatch,
}

impl AnimationPlayer {
    pub fn new(frame_count: usize, frame_time: Duration) -> Self {
        Self {
            clip: Animation::default(),
            frame: 0,
            frame_count: frame_count.max(1),
            frame_time,
            clock: Stopwatch::new(),
        }
    }

    pub fn clip(&self) -> Animation {
        self.clip
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn advance(&mut self, clip: Animation, now: Duration) {
        if clip != self.clip {
            self.clip = clip;
            self.frame = 0;
            self.clock.restart(now);
        } else if self.clock.elapsed(now) >= self.frame_time {
            self.frame = (self.frame + 1) % self.frame_count;
            self.clock.restart(now);
        }
    }
}

//! Frame clock
//!
//! Time is sampled once per frame and handed to components as a
//! `Duration` since startup. Timers store the instant they were last
//! restarted and compare against the frame time.

use std::cell::Cell;
use std::time::Duration;

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock started.
    fn now(&self) -> Duration;
}

/// Wall clock backed by macroquad's `get_time()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacroquadClock;

impl Clock for MacroquadClock {
    fn now(&self) -> Duration {
        Duration::from_secs_f64(macroquad::prelude::get_time().max(0.0))
    }
}

/// A clock that only moves when told to. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// A restartable stopwatch, like a frame-clock "restart" timer.
///
/// Starts at the clock epoch, so a fresh stopwatch has been running since
/// startup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stopwatch {
    restarted_at: Duration,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the last restart. Never negative.
    pub fn elapsed(&self, now: Duration) -> Duration {
        now.saturating_sub(self.restarted_at)
    }

    pub fn restart(&mut self, now: Duration) {
        self.restarted_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(1));
    }

    #[test]
    fn test_stopwatch_restart() {
        let mut watch = Stopwatch::new();
        assert_eq!(watch.elapsed(Duration::from_millis(100)), Duration::from_millis(100));

        watch.restart(Duration::from_millis(100));
        assert_eq!(watch.elapsed(Duration::from_millis(150)), Duration::from_millis(50));
        // A clock that went backwards saturates to zero
        assert_eq!(watch.elapsed(Duration::from_millis(10)), Duration::ZERO);
    }
}

//! Time management utilities
//!
//! Instances never own a clock; the simulation loop owns a [`FrameClock`]
//! and passes it by reference to anything that needs a time reading.

use std::time::Instant;

/// Monotonic per-tick clock for the simulation loop
///
/// Call [`FrameClock::tick`] exactly once per simulation tick, then hand the
/// clock to `Instance::update` and render submission so they can stamp their
/// state with the current tick and elapsed time.
pub struct FrameClock {
    started: Instant,
    last_tick: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting at tick zero
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_tick: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the clock (should be called once per simulation tick)
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_tick).as_secs_f32();
        self.total_time = now.duration_since(self.started).as_secs_f32();
        self.last_tick = now;
        self.frame_count += 1;
    }

    /// Get the time since the last tick in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since clock creation in seconds
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the number of ticks elapsed so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average ticks per second since clock creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_advances_frame_count() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame_count(), 0);

        clock.tick();
        clock.tick();
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_total_time_is_monotonic() {
        let mut clock = FrameClock::new();
        clock.tick();
        let first = clock.total_time();
        clock.tick();
        assert!(clock.total_time() >= first);
    }
}

//! Frame timing and delta time.
//!
//! [`FrameClock`] is ticked once per redraw. Camera movement is scaled by
//! its delta so motion speed does not depend on frame rate.

use std::time::{Duration, Instant};

/// Longest frame delta handed to the camera. A stall (window drag, debugger
/// pause) would otherwise teleport the camera on the next frame.
pub const MAX_DELTA: Duration = Duration::from_millis(250);

/// Frame timing, updated at the start of each frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    startup: Instant,
    frame_start: Instant,
    delta: Duration,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Start a new frame at the current instant.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Start a new frame at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.delta = now.saturating_duration_since(self.frame_start).min(MAX_DELTA);
        self.frame_start = now;
        self.frame_count += 1;
    }

    /// Duration of the previous frame, capped at [`MAX_DELTA`].
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Delta time in seconds (f32), the most common way to use it.
    pub fn delta_secs(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Total time since the clock started.
    pub fn elapsed(&self) -> Duration {
        self.frame_start.saturating_duration_since(self.startup)
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

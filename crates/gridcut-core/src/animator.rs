//! Fixed-rate frame clock.
//!
//! The game is stepped once per frame. The host feeds the animator whatever
//! time has elapsed since it last asked and gets back the number of frames
//! due. Leftover time carries over, so the step count depends only on total
//! elapsed time and not on how often the host polls.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default frames per second.
pub const DEFAULT_FPS: u32 = 15;

/// Frame accumulator with a run/pause switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animator {
    fps: u32,
    running: bool,
    pending: Duration,
    frames: u64,
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(DEFAULT_FPS)
    }
}

impl Animator {
    /// Creates a stopped animator. Zero fps is treated as one.
    #[must_use]
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            running: false,
            pending: Duration::ZERO,
            frames: 0,
        }
    }

    /// Frames per second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Time between frames.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps
    }

    /// Whether frames are being produced.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames produced since construction.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Resumes producing frames.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Pauses. Time fed while paused is discarded.
    pub fn stop(&mut self) {
        self.running = false;
        self.pending = Duration::ZERO;
    }

    /// Flips between running and paused. Returns the new state.
    pub fn toggle_running(&mut self) -> bool {
        if self.running {
            self.stop();
        } else {
            self.start();
        }
        self.running
    }

    /// Changes the frame rate, dropping any partial frame.
    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.max(1);
        self.pending = Duration::ZERO;
        debug!(fps = self.fps, "frame rate changed");
    }

    /// Feeds elapsed time and returns the number of frames now due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.pending += elapsed;
        let interval = self.interval();
        let due = u32::try_from(self.pending.as_nanos() / interval.as_nanos()).unwrap_or(u32::MAX);
        self.pending -= interval * due;
        self.frames += u64::from(due);
        due
    }
}

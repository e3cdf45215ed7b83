//! Timers driven by explicit timestamps
//!
//! Nothing here reads a wall clock. Callers pass the current time in
//! milliseconds, which keeps the simulation reproducible.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_MS, MAX_FRAME_GAP_MS, MAX_SUBSTEPS};

/// A repeating timer that can be started and cancelled
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl IntervalTimer {
    /// Create a stopped timer
    pub fn new(period_ms: f64) -> Self {
        debug_assert!(period_ms > 0.0);
        Self {
            period_ms,
            next_due_ms: None,
        }
    }

    /// Start (or restart) the timer; the first fire is one period from `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    /// Stop the timer. Pending fires are dropped.
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Count the fires due at `now_ms` and schedule the next one
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };

        let mut fired = 0;
        while due <= now_ms {
            fired += 1;
            due += self.period_ms;
        }
        self.next_due_ms = Some(due);
        fired
    }
}

/// Fixed-step accumulator that turns display refresh times into frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f64,
    last_time: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of fixed frames to run for a refresh at `now_ms`
    pub fn frames_due(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_GAP_MS),
            None => FRAME_MS,
        };
        self.last_time = Some(now_ms);
        self.accumulator += dt;

        let mut frames = 0;
        while self.accumulator >= FRAME_MS && frames < MAX_SUBSTEPS {
            self.accumulator -= FRAME_MS;
            frames += 1;
        }
        frames
    }
}

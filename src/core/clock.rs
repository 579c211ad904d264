//! Fixed-rate tick counter
//!
//! The kernel owns no timer. The host calls the tick entry point at a fixed
//! nominal rate and the clock only counts invocations and records how much
//! wall time has passed since the session started.

use std::time::Instant;

use serde::Serialize;

use crate::core::types::Tick;

/// Monotonic tick id plus a millisecond timestamp relative to session start
#[derive(Debug, Clone)]
pub struct Clock {
    id: Tick,
    timestamp_ms: u64,
    session_start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            id: 0,
            timestamp_ms: 0,
            session_start: Instant::now(),
        }
    }

    /// Current tick id (0 for the first tick)
    pub fn id(&self) -> Tick {
        self.id
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    /// True on every `n`-th tick. Used to throttle expensive per-tick work.
    ///
    /// `n == 0` never matches.
    pub fn is_nth(&self, n: u64) -> bool {
        n != 0 && self.id % n == 0
    }

    /// Advance exactly one tick
    pub fn advance(&mut self) {
        self.id += 1;
        self.timestamp_ms = self.session_start.elapsed().as_millis() as u64;
    }

    /// Zero the tick id and timestamp and start a new session
    pub fn reset(&mut self) {
        self.id = 0;
        self.timestamp_ms = 0;
        self.session_start = Instant::now();
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            tick: self.id,
            timestamp_ms: self.timestamp_ms,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable view of the clock for run summaries
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ClockSnapshot {
    pub tick: Tick,
    pub timestamp_ms: u64,
}

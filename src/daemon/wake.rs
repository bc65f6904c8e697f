//! Sleep/wake detection.
//!
//! The monotonic clock behind `tokio::time` stops while the machine sleeps,
//! so the ticker alone never notices a suspend. The wall clock does jump:
//! a gap between two ticks much larger than the tick period means the
//! machine was asleep (or the screen was locked long enough to throttle us).

use chrono::{DateTime, TimeDelta, Utc};

/// Gap between ticks treated as a wake.
pub const WAKE_GAP_SECONDS: i64 = 30;

/// Tracks the wall-clock time of the last tick.
#[derive(Debug, Clone)]
pub struct WakeDetector {
    last_seen: DateTime<Utc>,
    threshold: TimeDelta,
}

impl WakeDetector {
    /// Creates a detector starting at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_threshold(now, TimeDelta::seconds(WAKE_GAP_SECONDS))
    }

    pub fn with_threshold(now: DateTime<Utc>, threshold: TimeDelta) -> Self {
        Self {
            last_seen: now,
            threshold,
        }
    }

    /// Records a tick at `now`. Returns true if the gap since the previous
    /// tick exceeds the threshold.
    ///
    /// A clock that moved backwards is not a wake.
    pub fn observe(&mut self, now: DateTime<Utc>) -> bool {
        let gap = now.signed_duration_since(self.last_seen);
        self.last_seen = now;
        gap > self.threshold
    }

    pub fn last_seen(&self) -> DateTime<Utc> {
        self.last_seen
    }
}

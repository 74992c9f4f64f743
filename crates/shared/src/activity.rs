//! Last-interaction tracking shared between the UI and the notifier.
//!
//! One holder, constructor-injected into both sides: the UI thread writes on
//! every interaction, the notifier loop reads. Relaxed atomics are enough;
//! a read that is a few milliseconds stale changes nothing at a 5-minute
//! poll granularity.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;

#[derive(Debug)]
pub struct ActivityTracker {
    last_interaction_ms: AtomicI64,
}

impl ActivityTracker {
    /// A tracker that considers "now" the most recent interaction.
    pub fn new() -> Self {
        Self {
            last_interaction_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    /// Record a user interaction. Idempotent; safe to call every frame.
    pub fn touch(&self) {
        self.last_interaction_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Time elapsed since the last recorded interaction.
    pub fn idle(&self) -> Duration {
        let last = self.last_interaction_ms.load(Ordering::Relaxed);
        let elapsed = Utc::now().timestamp_millis().saturating_sub(last);
        Duration::from_millis(elapsed.max(0) as u64)
    }

    pub fn last_interaction_ms(&self) -> i64 {
        self.last_interaction_ms.load(Ordering::Relaxed)
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_resets_idle() {
        let tracker = ActivityTracker::new();
        tracker.touch();
        assert!(tracker.idle() < Duration::from_secs(5));
    }

    #[test]
    fn last_interaction_moves_forward() {
        let tracker = ActivityTracker::new();
        let before = tracker.last_interaction_ms();
        tracker.touch();
        assert!(tracker.last_interaction_ms() >= before);
    }
}

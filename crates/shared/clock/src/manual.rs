use ashmart_core::Timestamp;
use ashmart_ports::Clock;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

/// Fixed clock that only moves when told to
///
/// Clones share the same underlying time, so a test can hand one copy to
/// the engine and keep another to advance past demand deadlines.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Arc<RwLock<Timestamp>>,
}

impl ManualClock {
    /// Create a clock frozen at `initial_time`, or at the current wall time
    pub fn new(initial_time: Option<Timestamp>) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial_time.unwrap_or_else(Utc::now))),
        }
    }

    /// Move time forward. Negative durations are ignored.
    pub fn advance(&self, duration: Duration) {
        if duration <= Duration::zero() {
            return;
        }
        let mut current = self.current.write();
        *current += duration;
    }

    /// Jump to an absolute time
    pub fn set(&self, time: Timestamp) {
        *self.current.write() = time;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.read()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}

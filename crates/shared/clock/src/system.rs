use ashmart_core::Timestamp;
use ashmart_ports::Clock;
use chrono::Utc;

/// Wall-clock time, used for record timestamps and demand deadlines
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        SystemClock
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}

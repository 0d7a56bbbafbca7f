//! Ashmart Clock Infrastructure
//!
//! Provides time sources for production and tests:
//!
//! - [`SystemClock`]: wall-clock time
//! - [`ManualClock`]: frozen time, moved only by explicit calls
//!
//! ## Usage
//!
//! ```ignore
//! use ashmart_clock::{Clock, ManualClock};
//! use chrono::Duration;
//!
//! let clock = ManualClock::new(None);
//! let before = clock.now();
//! clock.advance(Duration::days(2)); // push demands past their deadline
//! assert!(clock.now() > before);
//! ```

mod manual;
mod system;

pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use ashmart_ports::Clock;

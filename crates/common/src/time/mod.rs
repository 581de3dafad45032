//! Time sources
//!
//! Wall-clock access goes through [`Clock`] so that expiry checks and
//! "today" computations can be driven by a [`MockClock`] in tests.
//!
//! ```
//! use std::time::Duration;
//!
//! use calcopilot_common::time::{Clock, MockClock};
//!
//! let clock = MockClock::new();
//! let before = clock.millis_since_epoch();
//! clock.advance(Duration::from_secs(5));
//! assert_eq!(clock.millis_since_epoch() - before, 5_000);
//! ```

mod clock;

pub use clock::{Clock, MockClock, SystemClock};

//! Testing utilities and helpers
//!
//! - **[`time`]**: Clock abstraction with a controllable [`MockClock`]
//!
//! The clock types live here (rather than under [`crate::time`]) so test
//! suites can depend on `test-utils` alone.

pub mod time;

pub use time::{Clock, MockClock, SystemClock};

//! Time utilities and abstractions
//!
//! - **Clock abstractions**: real and mock time (re-exported from
//!   [`crate::testing`])
//! - **[`format`]**: human-readable period formatting
//!
//! ## Usage
//!
//! ```rust
//! # #[cfg(feature = "runtime")]
//! # {
//! use std::time::Duration;
//!
//! use buildhound_common::time::{format_period, MockClock};
//!
//! assert_eq!(format_period(Duration::from_secs(125)), "2 minutes and 5 seconds");
//!
//! let clock = MockClock::new();
//! clock.advance(Duration::from_secs(5));
//! # }
//! ```

pub mod format;

pub use format::format_period;

// Re-export Clock abstractions from testing module
pub use crate::testing::time::{Clock, MockClock, SystemClock};

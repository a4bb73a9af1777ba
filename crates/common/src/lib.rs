//! Modular common utilities shared across BuildHound crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: human-readable formatting (periods, byte counts)
//! - `runtime`: clock abstractions for time-based components
//! - `test-utils`: deterministic [`testing::MockClock`] for test suites

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(any(feature = "foundation", test))]
pub mod utils;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(any(feature = "runtime", test))]
pub mod time;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "runtime", feature = "test-utils", test))]
pub mod testing;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use time::{format_period, Clock, MockClock, SystemClock};
#[cfg(feature = "foundation")]
pub use utils::bytes::format_byte_count;

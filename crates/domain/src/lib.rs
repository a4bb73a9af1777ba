//! # BuildHound Domain
//!
//! Domain types for exporting CI build lifecycle data to Datadog.
//!
//! This crate contains:
//! - The read-only build record handed over by the CI host
//! - Agent destinations and build feature parameters
//! - The metric/event model produced for each build
//! - Exporter configuration structures, constants and the error type
//!
//! ## Architecture
//! - No dependencies on other BuildHound crates
//! - Pure data structures and parsing, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;

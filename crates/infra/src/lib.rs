//! # BuildHound Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The DogStatsD UDP client and its factory
//! - Configuration loading from environment variables and files
//! - Conversions from infrastructure errors into domain errors
//!
//! ## Architecture
//! - Implements traits defined in `buildhound-core`
//! - Contains all "impure" code (sockets, environment, filesystem)

pub mod config;
pub mod errors;
pub mod observability;

// Re-export commonly used items
pub use errors::InfraError;
pub use observability::exporters::{DatadogClient, DatadogClientFactory};
pub use observability::{MetricsError, MetricsResult};

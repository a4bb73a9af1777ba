//! # BuildHound application layer
//!
//! Wires the exporter together for a host process:
//! - Application context (dependency injection)
//! - Tracing initialisation
//! - The `buildhound-replay` operator binary
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Hosts call the listener exposed by [`ExporterContext::listener`]

pub mod context;
pub mod utils;

pub use context::*;
pub use utils::logging::init_tracing;

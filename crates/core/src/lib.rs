//! # BuildHound Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces (metrics clients, client factories, lifecycle listener)
//! - The destination-keyed client registry with idle eviction
//! - Status/tag computation, markdown rendering and emission planning
//! - The build export service
//!
//! ## Architecture Principles
//! - Depends only on `buildhound-common` and `buildhound-domain`
//! - No sockets or config files; the transport arrives through traits
//! - Pure, testable business logic

pub mod clients;
pub mod export;

pub use clients::{ClientFactory, ClientProvider, ClientRegistry, MetricsClient};
pub use export::{
    plan_emission, BuildExportService, BuildLifecycleListener, BuildStatus, ExportSummary,
};

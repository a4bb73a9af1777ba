//! Metrics exporters
//!
//! Exporters send build metrics and events to external monitoring systems.

pub mod datadog;
pub mod factory;

// Re-export exporter types for convenience
pub use datadog::DatadogClient;
pub use factory::{ClientSettings, DatadogClientFactory};

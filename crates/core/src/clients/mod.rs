//! Metrics client ports and the process-wide client registry

pub mod ports;
pub mod registry;

pub use ports::{ClientFactory, ClientProvider, MetricsClient};
pub use registry::ClientRegistry;

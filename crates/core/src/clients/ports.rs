//! Port interfaces for metrics delivery
//!
//! These traits define the boundary between the export logic and the
//! transport that actually talks to a Datadog agent.

use std::sync::Arc;

use buildhound_domain::{Destination, Event, Metric, Result};

/// A connection to one metrics agent
pub trait MetricsClient: Send + Sync {
    /// Send a single counter, timer or histogram sample
    fn emit_metric(&self, metric: &Metric) -> Result<()>;

    /// Send a structured event
    fn record_event(&self, event: &Event) -> Result<()>;
}

/// Builds metrics clients for destinations
pub trait ClientFactory: Send + Sync {
    /// Create a client bound to the destination's host and effective port
    fn create(&self, destination: &Destination) -> Result<Arc<dyn MetricsClient>>;
}

/// Supplies clients to the export service, reusing them where possible
pub trait ClientProvider: Send + Sync {
    /// Return a cached client for the destination or construct a new one
    fn get_or_create(&self, destination: &Destination) -> Result<Arc<dyn MetricsClient>>;
}

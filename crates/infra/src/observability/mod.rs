//! Observability infrastructure: delivery of build metrics and events
//!
//! ## Error Handling
//!
//! Transport methods return `MetricsResult<()>`. A datagram the kernel
//! cannot queue right now (`WouldBlock`) is dropped with a warning and
//! reported as success. Any other socket error is returned so the export
//! service can log it against the destination.
//!
//! ```rust
//! use buildhound_infra::observability::MetricsError;
//!
//! let err = MetricsError::AddressResolution {
//!     address: "agent.invalid:8125".to_string(),
//!     reason: "no addresses".to_string(),
//! };
//! assert!(err.to_string().contains("agent.invalid:8125"));
//! ```

pub mod exporters;

use std::io;

/// Metrics transport error type
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Agent host name could not be resolved to a socket address
    #[error("Failed to resolve agent address '{address}': {reason}")]
    AddressResolution {
        /// `host:port` that failed to resolve
        address: String,
        /// Resolver message
        reason: String,
    },

    /// Local UDP socket could not be opened or configured
    #[error("Failed to open metrics socket: {source}")]
    Socket {
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Network send failed (Datadog UDP)
    #[error("Network send failed: {source}")]
    SendFailed {
        /// Underlying IO error
        #[from]
        source: io::Error,
    },
}

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;

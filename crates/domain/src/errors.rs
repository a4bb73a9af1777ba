//! Error types used throughout the exporter

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for BuildHound
///
/// Nothing of this type ever reaches the CI host: the export service stops
/// every error at the per-destination boundary and logs it.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BuildHoundError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid agent address: {0}")]
    InvalidAddress(String),

    #[error("Metrics client construction failed: {0}")]
    ClientConstruction(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuildHoundError {
    /// Stable label suitable for structured log fields.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::InvalidAddress(_) => "invalid_address",
            Self::ClientConstruction(_) => "client_construction",
            Self::Transport(_) => "transport",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for BuildHound operations
pub type Result<T> = std::result::Result<T, BuildHoundError>;

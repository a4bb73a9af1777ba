//! Conversions from external infrastructure errors into domain errors.

use std::io;

use buildhound_domain::BuildHoundError;

use crate::observability::MetricsError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BuildHoundError);

impl From<InfraError> for BuildHoundError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BuildHoundError> for InfraError {
    fn from(value: BuildHoundError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoBuildHoundError {
    fn into_buildhound(self) -> BuildHoundError;
}

/* -------------------------------------------------------------------------- */
/* MetricsError → BuildHoundError */
/* -------------------------------------------------------------------------- */

impl IntoBuildHoundError for MetricsError {
    fn into_buildhound(self) -> BuildHoundError {
        match self {
            err @ (MetricsError::AddressResolution { .. } | MetricsError::Socket { .. }) => {
                BuildHoundError::ClientConstruction(err.to_string())
            }
            MetricsError::SendFailed { source } => {
                BuildHoundError::Transport(format!("udp send failed: {source}"))
            }
        }
    }
}

impl From<MetricsError> for BuildHoundError {
    fn from(value: MetricsError) -> Self {
        value.into_buildhound()
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → BuildHoundError (config files) */
/* -------------------------------------------------------------------------- */

impl IntoBuildHoundError for io::Error {
    fn into_buildhound(self) -> BuildHoundError {
        match self.kind() {
            io::ErrorKind::NotFound => {
                BuildHoundError::Config(format!("config file not found: {self}"))
            }
            io::ErrorKind::PermissionDenied => {
                BuildHoundError::Config(format!("config file not readable: {self}"))
            }
            _ => BuildHoundError::Config(format!("failed to read config file: {self}")),
        }
    }
}

impl From<io::Error> for InfraError {
    fn from(value: io::Error) -> Self {
        InfraError(value.into_buildhound())
    }
}

/* -------------------------------------------------------------------------- */
/* Parser errors → BuildHoundError */
/* -------------------------------------------------------------------------- */

impl IntoBuildHoundError for toml::de::Error {
    fn into_buildhound(self) -> BuildHoundError {
        BuildHoundError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_buildhound())
    }
}

impl IntoBuildHoundError for serde_json::Error {
    fn into_buildhound(self) -> BuildHoundError {
        BuildHoundError::Config(format!("Invalid JSON format: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_buildhound())
    }
}

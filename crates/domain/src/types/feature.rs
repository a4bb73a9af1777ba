//! Exporter build feature parameters
//!
//! Each enabled exporter feature on a build configuration carries a single
//! string parameter holding the agent address. The host stores parameters
//! as a flat string map; this module converts between that map and a typed
//! [`Destination`].

use std::collections::BTreeMap;

use crate::constants::DATADOG_AGENT_ADDRESS_PARAMETER;
use crate::errors::Result;
use crate::types::destination::Destination;

/// Typed parameters of one exporter feature instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureParameters {
    pub destination: Destination,
}

impl FeatureParameters {
    /// Read parameters from the host's parameter map.
    ///
    /// A missing map, a missing key or an empty value all yield the default
    /// destination (`localhost`, default port).
    ///
    /// # Errors
    /// Returns `BuildHoundError::InvalidAddress` when the address is present
    /// but malformed.
    pub fn from_map(parameters: Option<&BTreeMap<String, String>>) -> Result<Self> {
        let address = parameters
            .and_then(|map| map.get(DATADOG_AGENT_ADDRESS_PARAMETER))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty());

        match address {
            Some(address) => Ok(Self { destination: address.parse()? }),
            None => Ok(Self::default()),
        }
    }

    /// Parameters in the host's map form.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([(DATADOG_AGENT_ADDRESS_PARAMETER.to_string(), self.destination.to_string())])
    }

    /// One-line summary shown next to the feature in the host UI.
    pub fn describe(&self) -> String {
        format!("Send metrics to {}", self.destination)
    }
}

//! Construction of DogStatsD clients for agent destinations

use std::sync::Arc;

use buildhound_core::{ClientFactory, MetricsClient};
use buildhound_domain::{Destination, ExporterConfig, Result};

use super::datadog::DatadogClient;

/// Settings shared by every client the factory builds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub metric_prefix: Option<String>,
    pub constant_tags: Vec<String>,
}

impl From<&ExporterConfig> for ClientSettings {
    fn from(config: &ExporterConfig) -> Self {
        Self {
            metric_prefix: config.metric_prefix.clone(),
            constant_tags: config.constant_tags.clone(),
        }
    }
}

/// [`ClientFactory`] producing UDP DogStatsD clients
#[derive(Debug, Clone, Default)]
pub struct DatadogClientFactory {
    settings: ClientSettings,
}

impl DatadogClientFactory {
    /// Factory applying `settings` to every client it builds
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }
}

impl ClientFactory for DatadogClientFactory {
    fn create(&self, destination: &Destination) -> Result<Arc<dyn MetricsClient>> {
        let client = DatadogClient::connect(&destination.socket_address(), &self.settings)?;
        tracing::info!(
            %destination,
            agent = %client.agent_addr(),
            "Created DogStatsD client"
        );
        Ok(Arc::new(client))
    }
}

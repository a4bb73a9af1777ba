//! Application context - dependency injection container

use std::sync::Arc;

use buildhound_core::{
    BuildExportService, BuildLifecycleListener, ClientFactory, ClientProvider, ClientRegistry,
};
use buildhound_domain::{ExporterConfig, Result};
use buildhound_infra::config;
use buildhound_infra::observability::exporters::{ClientSettings, DatadogClientFactory};

/// Type alias for the lifecycle listener trait object handed to hosts
type DynBuildLifecycleListener = dyn BuildLifecycleListener + 'static;

/// Application context - holds the exporter and its dependencies
pub struct ExporterContext {
    pub config: ExporterConfig,
    pub registry: Arc<ClientRegistry>,
    pub export_service: Arc<BuildExportService>,
}

impl ExporterContext {
    /// Load configuration from the environment or a config file and build
    /// the context with UDP DogStatsD clients.
    pub fn new() -> Result<Self> {
        let config = config::load()?;
        Self::new_with_config(config)
    }

    /// Build the context from an already-loaded configuration
    pub fn new_with_config(config: ExporterConfig) -> Result<Self> {
        let factory = Arc::new(DatadogClientFactory::new(ClientSettings::from(&config)));
        Self::with_factory(config, factory)
    }

    /// Build the context around a caller-supplied client factory
    pub fn with_factory(config: ExporterConfig, factory: Arc<dyn ClientFactory>) -> Result<Self> {
        config.validate()?;

        let registry =
            Arc::new(ClientRegistry::new(factory, config.cache_key, config.client_idle_timeout()));
        let clients: Arc<dyn ClientProvider> = registry.clone();
        let export_service = Arc::new(BuildExportService::new(clients, config.clone()));

        tracing::info!(
            mode = %config.mode,
            cache_key = %config.cache_key,
            idle_timeout_secs = config.client_idle_timeout_secs,
            server_root = %config.server_root(),
            "BuildHound exporter initialised"
        );

        Ok(Self { config, registry, export_service })
    }

    /// Listener the host calls on build lifecycle transitions
    pub fn listener(&self) -> Arc<DynBuildLifecycleListener> {
        self.export_service.clone()
    }
}

//! Build export service - core business logic

use std::sync::Arc;

use buildhound_domain::constants::DATADOG_BUILD_FEATURE_TYPE;
use buildhound_domain::{
    BuildLifecycleEvent, BuildRecord, Destination, Emission, ExporterConfig, FeatureParameters,
    Result,
};
use tracing::{debug, warn};

use super::plan::plan_emission;
use super::ports::BuildLifecycleListener;
use crate::clients::ClientProvider;

/// What one notification did, for callers that want to report on it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Destinations resolved from the build's enabled exporter features
    pub destinations: usize,
    /// Destinations that accepted every metric and the event
    pub delivered: usize,
    /// Destinations skipped because of a construction or send failure
    pub failed: usize,
}

/// Exports build lifecycle notifications to every configured agent
pub struct BuildExportService {
    clients: Arc<dyn ClientProvider>,
    config: ExporterConfig,
}

impl BuildExportService {
    /// Service delivering through `clients`, configured by `config`
    pub fn new(clients: Arc<dyn ClientProvider>, config: ExporterConfig) -> Self {
        Self { clients, config }
    }

    /// Exporter configuration in effect
    pub fn config(&self) -> &ExporterConfig {
        &self.config
    }

    /// Destinations of the build's enabled exporter features, in
    /// configuration order. Features with a malformed address are skipped.
    pub fn resolve_destinations(&self, build: &BuildRecord) -> Vec<Destination> {
        build
            .enabled_features_of_type(DATADOG_BUILD_FEATURE_TYPE)
            .filter_map(|feature| match FeatureParameters::from_map(Some(&feature.parameters)) {
                Ok(parameters) => Some(parameters.destination),
                Err(err) => {
                    warn!(
                        build_id = build.build_id,
                        build_type_id = %build.build_type_id,
                        error = %err,
                        "Skipping exporter feature with invalid agent address"
                    );
                    None
                }
            })
            .collect()
    }

    /// Handle one lifecycle notification. Never fails: delivery problems
    /// are logged per destination and reflected in the summary.
    pub fn handle_build_event(
        &self,
        notification: BuildLifecycleEvent,
        build: &BuildRecord,
    ) -> ExportSummary {
        let destinations = self.resolve_destinations(build);
        let mut summary = ExportSummary { destinations: destinations.len(), ..Default::default() };
        if destinations.is_empty() {
            return summary;
        }

        let Some(emission) = plan_emission(build, notification, &self.config) else {
            debug!(
                build_id = build.build_id,
                %notification,
                personal = build.personal,
                finished = build.finished,
                "Nothing to export for build notification"
            );
            return summary;
        };

        for destination in &destinations {
            match self.deliver(destination, &emission) {
                Ok(()) => {
                    summary.delivered += 1;
                    debug!(
                        build_id = build.build_id,
                        %destination,
                        metrics = emission.metrics.len(),
                        "Exported build to Datadog"
                    );
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(
                        build_id = build.build_id,
                        %destination,
                        error = %err,
                        error_type = err.label(),
                        "Failed to export build to Datadog, ignoring"
                    );
                }
            }
        }

        summary
    }

    fn deliver(&self, destination: &Destination, emission: &Emission) -> Result<()> {
        let client = self.clients.get_or_create(destination)?;
        for metric in &emission.metrics {
            client.emit_metric(metric)?;
        }
        if let Some(event) = &emission.event {
            client.record_event(event)?;
        }
        Ok(())
    }
}

impl BuildLifecycleListener for BuildExportService {
    fn build_started(&self, build: &BuildRecord) {
        self.handle_build_event(BuildLifecycleEvent::Started, build);
    }

    fn build_finished(&self, build: &BuildRecord) {
        self.handle_build_event(BuildLifecycleEvent::Finished, build);
    }

    fn build_interrupted(&self, build: &BuildRecord) {
        self.handle_build_event(BuildLifecycleEvent::Interrupted, build);
    }
}

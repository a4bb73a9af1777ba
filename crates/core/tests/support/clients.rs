//! Metrics client fakes
//!
//! - `RecordingClient`: keeps every metric and event it is given
//! - `FailingClient`: rejects every send with a transport error
//! - `CountingFactory`: hands out recording clients and counts constructions

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use buildhound_core::{ClientFactory, ClientProvider, MetricsClient};
use buildhound_domain::{BuildHoundError, Destination, Event, Metric, Result};

#[derive(Default)]
pub struct RecordingClient {
    metrics: Mutex<Vec<Metric>>,
    events: Mutex<Vec<Event>>,
}

impl RecordingClient {
    pub fn metrics(&self) -> Vec<Metric> {
        self.metrics.lock().unwrap().clone()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn metrics_named(&self, name: &str) -> Vec<Metric> {
        self.metrics().into_iter().filter(|m| m.name() == name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.lock().unwrap().is_empty() && self.events.lock().unwrap().is_empty()
    }
}

impl MetricsClient for RecordingClient {
    fn emit_metric(&self, metric: &Metric) -> Result<()> {
        self.metrics.lock().unwrap().push(metric.clone());
        Ok(())
    }

    fn record_event(&self, event: &Event) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FailingClient {
    pub attempts: AtomicUsize,
}

impl MetricsClient for FailingClient {
    fn emit_metric(&self, _metric: &Metric) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BuildHoundError::Transport("connection refused".into()))
    }

    fn record_event(&self, _event: &Event) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(BuildHoundError::Transport("connection refused".into()))
    }
}

/// Factory that records which destinations it built clients for.
///
/// Destinations whose host starts with `failing` get a [`FailingClient`];
/// hosts starting with `broken` fail construction.
#[derive(Default)]
pub struct CountingFactory {
    created: AtomicUsize,
    clients: Mutex<Vec<(Destination, Arc<RecordingClient>)>>,
}

impl CountingFactory {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Recording clients built for the given host, in construction order.
    pub fn clients_for(&self, host: &str) -> Vec<Arc<RecordingClient>> {
        self.clients
            .lock()
            .unwrap()
            .iter()
            .filter(|(destination, _)| destination.host() == host)
            .map(|(_, client)| client.clone())
            .collect()
    }
}

impl ClientFactory for CountingFactory {
    fn create(&self, destination: &Destination) -> Result<Arc<dyn MetricsClient>> {
        if destination.host().starts_with("broken") {
            return Err(BuildHoundError::ClientConstruction(format!(
                "cannot resolve {destination}"
            )));
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        if destination.host().starts_with("failing") {
            return Ok(Arc::new(FailingClient::default()));
        }
        let client = Arc::new(RecordingClient::default());
        self.clients.lock().unwrap().push((destination.clone(), client.clone()));
        Ok(client)
    }
}

/// Provider that always returns the same client
pub struct FixedProvider(pub Arc<dyn MetricsClient>);

impl ClientProvider for FixedProvider {
    fn get_or_create(&self, _destination: &Destination) -> Result<Arc<dyn MetricsClient>> {
        Ok(self.0.clone())
    }
}

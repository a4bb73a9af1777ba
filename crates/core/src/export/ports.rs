//! Inbound port for the CI host

use buildhound_domain::BuildRecord;

/// Build lifecycle callbacks invoked by the CI host
///
/// Implementations must not fail or panic back into the host: every
/// callback returns normally regardless of delivery problems.
pub trait BuildLifecycleListener: Send + Sync {
    /// A build was started
    fn build_started(&self, build: &BuildRecord);

    /// A build finished, successfully or not
    fn build_finished(&self, build: &BuildRecord);

    /// A build was interrupted before finishing
    fn build_interrupted(&self, build: &BuildRecord);
}

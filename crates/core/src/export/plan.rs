//! Emission planning
//!
//! Turns one lifecycle notification into the metrics and event to send to
//! every destination. Planning is pure: the same build, notification and
//! configuration always yield the same [`Emission`].

use buildhound_domain::constants::{
    METRIC_ARTIFACTS_COUNT, METRIC_ARTIFACTS_TOTAL_SIZE, METRIC_COMPILATION_ERROR_COUNT,
    METRIC_DURATION, METRIC_FAILED_COUNT, METRIC_FINISHED_COUNT, METRIC_LOG_SIZE,
    METRIC_STARTED_COUNT, METRIC_SUCCESS_COUNT, METRIC_TESTS_ALL_COUNT,
    METRIC_TESTS_FAILED_COUNT, METRIC_TESTS_IGNORED_COUNT, METRIC_TESTS_NEW_FAILED_COUNT,
    METRIC_TESTS_PASSED_COUNT, METRIC_TESTS_RUN_COUNT,
};
use buildhound_domain::{
    BuildLifecycleEvent, BuildRecord, Emission, EmissionMode, Event, ExporterConfig, Metric,
    TagSet,
};

use super::render::{render_text, render_title};
use super::status::BuildStatus;
use super::tags::{base_tags, event_tags, ArtifactSummary};

/// Plan what a notification sends, or `None` when it sends nothing.
///
/// Personal builds never produce output. Terminal notifications
/// (`Finished`, `Interrupted`) produce output only for finished builds.
/// `Started` notifications produce output only in extended mode.
pub fn plan_emission(
    build: &BuildRecord,
    notification: BuildLifecycleEvent,
    config: &ExporterConfig,
) -> Option<Emission> {
    if build.personal {
        return None;
    }

    let mode = config.mode;
    match notification {
        BuildLifecycleEvent::Started if mode == EmissionMode::Extended && !build.finished => {
            Some(plan_started(build, config))
        }
        BuildLifecycleEvent::Finished | BuildLifecycleEvent::Interrupted if build.finished => {
            Some(plan_terminal(build, config))
        }
        _ => None,
    }
}

fn plan_started(build: &BuildRecord, config: &ExporterConfig) -> Emission {
    let status = BuildStatus::of(build);
    let tags = base_tags(build, status);
    let artifacts = ArtifactSummary::default();

    Emission {
        metrics: vec![Metric::counter(METRIC_STARTED_COUNT, 1, &tags)],
        event: Some(build_event(build, status, config, &artifacts)),
    }
}

fn plan_terminal(build: &BuildRecord, config: &ExporterConfig) -> Emission {
    let status = BuildStatus::of(build);
    let tags = base_tags(build, status);
    let artifacts = ArtifactSummary::of(&build.artifacts);

    let outcome = if build.is_success() { METRIC_SUCCESS_COUNT } else { METRIC_FAILED_COUNT };
    let mut metrics = vec![
        Metric::counter(METRIC_FINISHED_COUNT, 1, &tags),
        Metric::counter(outcome, 1, &tags),
        Metric::timer(METRIC_DURATION, build.duration_secs.saturating_mul(1_000), &tags),
    ];

    if config.mode == EmissionMode::Extended {
        metrics.extend(histograms(build, &artifacts, &tags));
    }

    Emission { metrics, event: Some(build_event(build, status, config, &artifacts)) }
}

fn histograms(build: &BuildRecord, artifacts: &ArtifactSummary<'_>, tags: &TagSet) -> Vec<Metric> {
    // Counts are reported as-is; DogStatsD histograms carry f64 samples.
    let mut samples = vec![(METRIC_LOG_SIZE, build.log_size_bytes)];

    if let Some(stats) = &build.statistics {
        samples.extend([
            (METRIC_COMPILATION_ERROR_COUNT, stats.compilation_error_count),
            (METRIC_TESTS_RUN_COUNT, stats.test_run_count),
            (METRIC_TESTS_FAILED_COUNT, stats.failed_test_count),
            (METRIC_TESTS_ALL_COUNT, stats.all_test_count),
            (METRIC_TESTS_IGNORED_COUNT, stats.ignored_test_count),
            (METRIC_TESTS_NEW_FAILED_COUNT, stats.new_failed_test_count),
            (METRIC_TESTS_PASSED_COUNT, stats.passed_test_count),
        ]);
    }

    samples.extend([
        (METRIC_ARTIFACTS_COUNT, artifacts.count),
        (METRIC_ARTIFACTS_TOTAL_SIZE, artifacts.total_size),
    ]);

    samples.into_iter().map(|(name, value)| Metric::histogram(name, value as f64, tags)).collect()
}

fn build_event(
    build: &BuildRecord,
    status: BuildStatus,
    config: &ExporterConfig,
    artifacts: &ArtifactSummary<'_>,
) -> Event {
    Event {
        title: render_title(build, status),
        text: render_text(build, config.server_root(), config.mode, artifacts),
        hostname: build.agent.host_name.clone(),
        tags: event_tags(build, status, config.mode, artifacts),
    }
}

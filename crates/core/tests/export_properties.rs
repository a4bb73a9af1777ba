//! End-to-end behaviour of the export service over the client registry.

mod support;

use std::sync::Arc;
use std::time::Duration;

use buildhound_common::MockClock;
use buildhound_core::{
    BuildExportService, BuildLifecycleListener, ClientProvider, ClientRegistry, ExportSummary,
    MetricsClient,
};
use buildhound_domain::{
    BuildLifecycleEvent, BuildRecord, BuildRevision, CacheKeyPolicy, Destination, EmissionMode,
    ExporterConfig, Metric,
};
use support::builds::{exporter_feature, failed_build, finished_build};
use support::clients::{CountingFactory, FailingClient, FixedProvider};

struct Harness {
    service: BuildExportService,
    factory: Arc<CountingFactory>,
    registry: Arc<ClientRegistry<MockClock>>,
    clock: MockClock,
}

fn harness(config: ExporterConfig) -> Harness {
    let factory = Arc::new(CountingFactory::default());
    let clock = MockClock::new();
    let registry = Arc::new(ClientRegistry::with_clock(
        factory.clone(),
        config.cache_key,
        config.client_idle_timeout(),
        clock.clone(),
    ));
    let service = BuildExportService::new(registry.clone(), config);
    Harness { service, factory, registry, clock }
}

fn canonical() -> Harness {
    harness(ExporterConfig::default())
}

#[test]
fn personal_builds_emit_nothing_for_any_destination() {
    let h = canonical();
    let mut build = finished_build();
    build.personal = true;
    build.features.push(exporter_feature("second-agent:9125"));

    h.service.build_finished(&build);
    h.service.build_interrupted(&build);

    assert_eq!(h.factory.created(), 0);
    assert!(h.registry.is_empty());
}

#[test]
fn unfinished_builds_emit_nothing_in_canonical_mode() {
    let h = canonical();
    let build = BuildRecord { finished: false, ..finished_build() };

    h.service.build_started(&build);
    h.service.build_finished(&build);

    assert_eq!(h.factory.created(), 0);
}

#[test]
fn finished_build_emits_one_finished_and_one_outcome_counter_per_destination() {
    let h = canonical();
    let mut build = finished_build();
    build.features.push(exporter_feature("second-agent"));

    let summary = h.service.handle_build_event(BuildLifecycleEvent::Finished, &build);
    assert_eq!(summary, ExportSummary { destinations: 2, delivered: 2, failed: 0 });

    for host in ["agent", "second-agent"] {
        let client = &h.factory.clients_for(host)[0];
        let finished = client.metrics_named("teamcity.build.finished_count");
        let success = client.metrics_named("teamcity.build.success_count");
        assert_eq!(finished.len(), 1);
        assert_eq!(success.len(), 1);
        assert!(client.metrics_named("teamcity.build.failed_count").is_empty());

        let base = [
            "build_project_id:Payments",
            "build_type_id:Payments_Integration",
            "build_branch:main",
            "build_status:success",
        ];
        for metric in finished.iter().chain(&success) {
            assert_eq!(metric.tags().as_slice(), base);
        }
    }
}

#[test]
fn outcome_counter_follows_failures_and_interruption() {
    let cases = [
        (finished_build(), "teamcity.build.success_count"),
        (failed_build(), "teamcity.build.failed_count"),
        (BuildRecord { interrupted: true, ..finished_build() }, "teamcity.build.failed_count"),
    ];

    for (build, expected) in cases {
        let h = canonical();
        h.service.handle_build_event(BuildLifecycleEvent::Finished, &build);

        let client = &h.factory.clients_for("agent")[0];
        let outcomes: Vec<_> = client
            .metrics()
            .into_iter()
            .filter(|m| m.name().ends_with("success_count") || m.name().ends_with("failed_count"))
            .map(|m| m.name().to_string())
            .collect();
        assert_eq!(outcomes, [expected]);
    }
}

#[test]
fn duration_timer_is_seconds_times_one_thousand() {
    for secs in [0, 1, 59, 3_600, 86_401] {
        let h = canonical();
        let build = BuildRecord { duration_secs: secs, ..finished_build() };
        h.service.build_finished(&build);

        let timers = h.factory.clients_for("agent")[0].metrics_named("teamcity.build.duration");
        assert_eq!(timers.len(), 1);
        match &timers[0] {
            Metric::Timer { millis, .. } => assert_eq!(*millis, secs * 1_000),
            other => panic!("expected a timer, got {other:?}"),
        }
    }
}

#[test]
fn host_only_policy_shares_one_client_across_ports() {
    let h = harness(ExporterConfig { cache_key: CacheKeyPolicy::HostOnly, ..Default::default() });
    let build = BuildRecord {
        features: vec![exporter_feature("a.example.com"), exporter_feature("a.example.com:9125")],
        ..finished_build()
    };

    h.service.build_finished(&build);

    assert_eq!(h.factory.created(), 1);
    let client = &h.factory.clients_for("a.example.com")[0];
    assert_eq!(client.metrics_named("teamcity.build.finished_count").len(), 2);
}

#[test]
fn host_and_port_policy_keeps_ports_apart() {
    let h = canonical();
    let first: Destination = "a.example.com".parse().unwrap();
    let second: Destination = "a.example.com:9125".parse().unwrap();

    let a = h.registry.get_or_create(&first).unwrap();
    let b = h.registry.get_or_create(&second).unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(h.factory.created(), 2);
}

#[test]
fn idle_destination_is_rebuilt_and_active_one_is_reused() {
    let h = canonical();
    let destination: Destination = "agent:8125".parse().unwrap();

    let first = h.registry.get_or_create(&destination).unwrap();
    h.clock.advance(Duration::from_secs(59));
    let reused = h.registry.get_or_create(&destination).unwrap();
    assert!(Arc::ptr_eq(&first, &reused));

    h.clock.advance(Duration::from_secs(60));
    let rebuilt = h.registry.get_or_create(&destination).unwrap();
    assert!(!Arc::ptr_eq(&first, &rebuilt));
    assert_eq!(h.factory.created(), 2);
}

#[test]
fn zero_revisions_render_placeholder_line() {
    let h = canonical();
    h.service.build_finished(&finished_build());

    let event = &h.factory.clients_for("agent")[0].events()[0];
    assert!(event.text.contains("\nNo source code VCS roots\n"));
    assert!(!event.tags.iter().any(|t| t.starts_with("vcs_root:")));
}

#[test]
fn single_revision_renders_line_and_tags() {
    let h = canonical();
    let mut build = finished_build();
    build.revisions.push(BuildRevision::new("R1", "abc123"));

    h.service.build_finished(&build);

    let event = &h.factory.clients_for("agent")[0].events()[0];
    let line = event.text.lines().find(|l| l.starts_with("VCS root:")).unwrap();
    assert!(line.contains("R1") && line.contains("abc123"));
    assert!(event.tags.contains("vcs_root:R1"));
    assert!(event.tags.contains("vcs_revision:abc123"));
}

#[test]
fn failure_reasons_render_fenced_and_tagged() {
    let h = canonical();
    h.service.build_finished(&failed_build());

    let client = &h.factory.clients_for("agent")[0];
    let event = &client.events()[0];
    assert!(event.text.contains("```\njavac failed\n```"));
    assert!(event.tags.contains("build_failure_reason:TC_COMPILATION_ERROR"));
    assert!(event.tags.contains("build_status:failed"));
    assert_eq!(event.title, "TeamCity build failed: Payments :: Integration #128");
    assert_eq!(event.hostname, "ci-agent-3.internal");
}

#[test]
fn transport_failure_is_swallowed() {
    let failing = Arc::new(FailingClient::default());
    let service = BuildExportService::new(
        Arc::new(FixedProvider(failing.clone() as Arc<dyn MetricsClient>)),
        ExporterConfig::default(),
    );

    let summary = service.handle_build_event(BuildLifecycleEvent::Finished, &finished_build());

    assert_eq!(summary, ExportSummary { destinations: 1, delivered: 0, failed: 1 });
    // The first failed send abandons the rest for that destination
    assert_eq!(failing.attempts.load(std::sync::atomic::Ordering::SeqCst), 1);
}

#[test]
fn failing_destination_does_not_affect_others() {
    let h = canonical();
    let build = BuildRecord {
        features: vec![
            exporter_feature("broken-agent"),
            exporter_feature("failing-agent"),
            exporter_feature("agent"),
        ],
        ..finished_build()
    };

    let summary = h.service.handle_build_event(BuildLifecycleEvent::Finished, &build);

    assert_eq!(summary, ExportSummary { destinations: 3, delivered: 1, failed: 2 });
    assert_eq!(h.factory.clients_for("agent")[0].events().len(), 1);
}

#[test]
fn extended_mode_reports_starts_and_histograms() {
    let h = harness(ExporterConfig { mode: EmissionMode::Extended, ..Default::default() });
    let running = BuildRecord { finished: false, ..finished_build() };

    h.service.build_started(&running);
    h.service.build_finished(&finished_build());

    let client = &h.factory.clients_for("agent")[0];
    assert_eq!(client.metrics_named("teamcity.build.started_count").len(), 1);
    assert_eq!(client.metrics_named("teamcity.build.log_size").len(), 1);
    assert_eq!(client.metrics_named("teamcity.build.artifacts.total_size").len(), 1);

    let events = client.events();
    assert_eq!(events.len(), 2);
    assert!(events[0].tags.contains("build_started"));
    assert!(events[1].tags.contains("build_finished"));
    assert!(events[1].tags.contains("build_success"));
}

#[test]
fn concurrent_notifications_construct_one_client() {
    let h = canonical();
    let build = finished_build();

    std::thread::scope(|scope| {
        for _ in 0..16 {
            scope.spawn(|| h.service.build_finished(&build));
        }
    });

    assert_eq!(h.factory.created(), 1);
    let client = &h.factory.clients_for("agent")[0];
    assert_eq!(client.metrics_named("teamcity.build.finished_count").len(), 16);
    assert_eq!(client.events().len(), 16);
}

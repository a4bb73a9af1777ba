//! Tag computation for build metrics and events

use buildhound_domain::constants::{
    FLAG_BUILD_FINISHED, FLAG_BUILD_STARTED, FLAG_BUILD_SUCCESS, TAG_AGENT_HOSTNAME,
    TAG_AGENT_IP_ADDRESS, TAG_AGENT_NAME, TAG_ARTIFACT, TAG_BRANCH, TAG_BUILD_ID,
    TAG_BUILD_NUMBER, TAG_BUILD_TYPE_ID, TAG_FAILED_TEST_EXAMPLE, TAG_FAILURE_REASON,
    TAG_INTERNAL_STATUS, TAG_PROJECT_ID, TAG_STATUS, TAG_TRIGGERED_BY, TAG_VCS_REVISION,
    TAG_VCS_ROOT,
};
use buildhound_domain::{BuildArtifact, BuildRecord, EmissionMode, TagSet, TestName};

use super::status::BuildStatus;

/// Reportable artifacts of a build, gathered in one pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtifactSummary<'a> {
    pub count: u64,
    pub total_size: u64,
    pub artifacts: Vec<&'a BuildArtifact>,
}

impl<'a> ArtifactSummary<'a> {
    /// Fold the host's listing, skipping containers and unnamed entries.
    pub fn of(listing: &'a [BuildArtifact]) -> Self {
        listing.iter().filter(|artifact| artifact.is_reportable()).fold(
            Self::default(),
            |mut summary, artifact| {
                summary.count += 1;
                summary.total_size = summary.total_size.saturating_add(artifact.size);
                summary.artifacts.push(artifact);
                summary
            },
        )
    }

    /// Whether no reportable artifact exists
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// The four tags attached to every metric.
pub fn base_tags(build: &BuildRecord, status: BuildStatus) -> TagSet {
    TagSet::new()
        .with(TAG_PROJECT_ID, &build.project_id)
        .with(TAG_BUILD_TYPE_ID, &build.build_type_id)
        .with(TAG_BRANCH, build.branch_name())
        .with(TAG_STATUS, status)
}

/// Tags attached to the build event: the base tags plus identifiers, VCS,
/// agent, failure and artifact details.
pub fn event_tags(
    build: &BuildRecord,
    status: BuildStatus,
    mode: EmissionMode,
    artifacts: &ArtifactSummary<'_>,
) -> TagSet {
    let extended = mode == EmissionMode::Extended;
    let mut tags = base_tags(build, status);

    tags.push(TAG_BUILD_NUMBER, &build.build_number);
    tags.push(TAG_BUILD_ID, build.build_id);
    if build.finished {
        tags.push(TAG_INTERNAL_STATUS, &build.internal_status);
    }
    tags.push(TAG_TRIGGERED_BY, &build.triggered_by.raw);

    for revision in &build.revisions {
        let root =
            if extended { revision.display_description() } else { revision.root_name.as_str() };
        tags.push(TAG_VCS_ROOT, root);
        tags.push(TAG_VCS_REVISION, &revision.revision);
    }

    tags.push(TAG_AGENT_NAME, &build.agent.name);
    tags.push(TAG_AGENT_IP_ADDRESS, &build.agent.host_address);
    tags.push(TAG_AGENT_HOSTNAME, &build.agent.host_name);

    if build.finished {
        for reason in &build.failure_reasons {
            tags.push(TAG_FAILURE_REASON, &reason.problem_type);
        }
        for artifact in &artifacts.artifacts {
            tags.push(TAG_ARTIFACT, &artifact.relative_path);
        }
    }

    if extended {
        tags.push_flag(if build.finished { FLAG_BUILD_FINISHED } else { FLAG_BUILD_STARTED });
        if build.is_success() {
            tags.push_flag(FLAG_BUILD_SUCCESS);
        }
        if let Some(test) = failed_test_example(build) {
            tags.push(TAG_FAILED_TEST_EXAMPLE, &test.short_name);
        }
    }

    tags
}

/// First failed test of a finished, failed build, when the host reported one.
pub fn failed_test_example(build: &BuildRecord) -> Option<&TestName> {
    if !build.finished || !build.has_failures() {
        return None;
    }
    build
        .statistics
        .as_ref()
        .filter(|stats| stats.failed_test_count > 0)
        .and_then(|stats| stats.first_failed_test.as_ref())
}

#[cfg(test)]
mod tests {
    use buildhound_domain::{BuildRevision, BuildStatistics, FailureReason};

    use super::*;

    fn finished_build() -> BuildRecord {
        BuildRecord {
            build_id: 7,
            build_number: "42".into(),
            project_id: "Backend".into(),
            build_type_id: "Backend_Tests".into(),
            finished: true,
            internal_status: "NORMAL".into(),
            ..BuildRecord::default()
        }
    }

    #[test]
    fn test_base_tags_order_and_branch_default() {
        let tags = base_tags(&finished_build(), BuildStatus::Success);
        assert_eq!(
            tags.as_slice(),
            [
                "build_project_id:Backend",
                "build_type_id:Backend_Tests",
                "build_branch:N/A",
                "build_status:success",
            ]
        );
    }

    #[test]
    fn test_artifact_summary_folds_reportable_entries() {
        let listing = vec![
            BuildArtifact::file("dist/app.jar", 1_000),
            BuildArtifact {
                name: "dist".into(),
                relative_path: "dist".into(),
                size: 9_999,
                is_container: true,
            },
            BuildArtifact::file("reports/index.html", 24),
            BuildArtifact::default(),
        ];

        let summary = ArtifactSummary::of(&listing);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_size, 1_024);
        assert_eq!(summary.artifacts[1].relative_path, "reports/index.html");
        assert!(ArtifactSummary::of(&[]).is_empty());
    }

    #[test]
    fn test_event_tags_include_revisions_failures_and_artifacts() {
        let mut build = finished_build();
        build.revisions.push(BuildRevision::new("R1", "abc123"));
        build.failure_reasons.push(FailureReason::new("TC_COMPILATION_ERROR", "javac failed"));
        build.artifacts.push(BuildArtifact::file("out/app.zip", 10));
        let artifacts = ArtifactSummary::of(&build.artifacts);

        let tags = event_tags(&build, BuildStatus::Failed, EmissionMode::Canonical, &artifacts);

        for expected in [
            "build_status:failed",
            "build_number:42",
            "build_id:7",
            "build_internal_status:NORMAL",
            "vcs_root:R1",
            "vcs_revision:abc123",
            "build_failure_reason:TC_COMPILATION_ERROR",
            "build_artifact:out/app.zip",
        ] {
            assert!(tags.contains(expected), "missing {expected} in {tags:?}");
        }
        assert!(!tags.contains("build_finished"));
    }

    #[test]
    fn test_extended_tags_add_flags_and_root_description() {
        let mut build = finished_build();
        let mut revision = BuildRevision::new("R1", "abc123");
        revision.root_description = Some("git@example.com:acme/r1.git".into());
        build.revisions.push(revision);
        let artifacts = ArtifactSummary::of(&build.artifacts);

        let tags = event_tags(&build, BuildStatus::Success, EmissionMode::Extended, &artifacts);

        assert!(tags.contains("vcs_root:git@example.com:acme/r1.git"));
        assert!(tags.contains("build_finished"));
        assert!(tags.contains("build_success"));
    }

    #[test]
    fn test_failed_test_example_requires_failures() {
        let mut build = finished_build();
        build.statistics = Some(BuildStatistics {
            failed_test_count: 2,
            first_failed_test: Some(TestName {
                full_name: "com.acme.FooTest.bar".into(),
                short_name: "FooTest.bar".into(),
            }),
            ..BuildStatistics::default()
        });
        assert!(failed_test_example(&build).is_none());

        build.failure_reasons.push(FailureReason::new("TC_FAILED_TESTS", "2 tests failed"));
        assert_eq!(failed_test_example(&build).map(|t| t.short_name.as_str()), Some("FooTest.bar"));
    }
}

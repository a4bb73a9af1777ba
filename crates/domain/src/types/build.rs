//! Build record supplied by the CI host
//!
//! A `BuildRecord` is a read-only snapshot of everything the exporter reads
//! from a running or finished build. The host adapter fills it in once per
//! lifecycle notification; nothing retains it afterwards.
//!
//! Records deserialize from JSON with every field optional, so fixtures and
//! replay files only need to spell out what they care about.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::BRANCH_NOT_AVAILABLE;
use crate::impl_str_enum_conversions;

/// Build lifecycle notification delivered by the CI host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildLifecycleEvent {
    Started,
    Finished,
    Interrupted,
}

impl_str_enum_conversions!(BuildLifecycleEvent {
    Started => "started",
    Finished => "finished",
    Interrupted => "interrupted",
});

/// Read-only view of a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildRecord {
    /// Internal build id (used in log links)
    pub build_id: u64,
    /// User-facing build number, e.g. `"1042"` or `"2.3.1-rc"`
    pub build_number: String,
    /// Full build configuration name, e.g. `"Backend :: Unit Tests"`
    pub full_name: String,
    /// Project external id
    pub project_id: String,
    /// Build configuration external id
    pub build_type_id: String,
    pub branch: Option<String>,
    pub finished: bool,
    pub interrupted: bool,
    pub personal: bool,
    /// Ordered build problems; empty for a green build
    pub failure_reasons: Vec<FailureReason>,
    pub duration_secs: u64,
    pub triggered_by: TriggeredBy,
    pub revisions: Vec<BuildRevision>,
    pub agent: BuildAgent,
    /// Artifact listing as produced by the host, containers included
    pub artifacts: Vec<BuildArtifact>,
    /// Host-side status text, e.g. `"NORMAL"` or `"FAILURE"`
    pub internal_status: String,
    pub log_size_bytes: u64,
    /// Test and compilation statistics, when the host computed them
    pub statistics: Option<BuildStatistics>,
    /// Build features configured on the build's configuration
    pub features: Vec<BuildFeatureDescriptor>,
}

impl BuildRecord {
    /// Branch name, or `"N/A"` when the build has no branch.
    pub fn branch_name(&self) -> &str {
        self.branch.as_deref().unwrap_or(BRANCH_NOT_AVAILABLE)
    }

    /// Whether the build reported any problem
    pub fn has_failures(&self) -> bool {
        !self.failure_reasons.is_empty()
    }

    /// A build succeeded when it finished, was not interrupted and reported
    /// no problems.
    pub fn is_success(&self) -> bool {
        self.finished && !self.interrupted && !self.has_failures()
    }

    /// Build length
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }

    /// Enabled features of the given type, in configuration order.
    pub fn enabled_features_of_type<'a>(
        &'a self,
        feature_type: &'a str,
    ) -> impl Iterator<Item = &'a BuildFeatureDescriptor> + 'a {
        self.features.iter().filter(move |f| f.enabled && f.feature_type == feature_type)
    }
}

/// A build problem that caused failure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailureReason {
    /// Problem type identifier, e.g. `"TC_COMPILATION_ERROR"`
    #[serde(rename = "type")]
    pub problem_type: String,
    pub description: String,
}

impl FailureReason {
    /// Build problem of the given type
    pub fn new(problem_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self { problem_type: problem_type.into(), description: description.into() }
    }
}

/// Who or what triggered the build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggeredBy {
    /// Human-readable form, e.g. `"Git"` or `"Jane Doe"`
    pub description: String,
    /// Raw host encoding, e.g. `"vcsName=jetbrains.git"`
    pub raw: String,
}

/// One VCS root revision the build ran against
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildRevision {
    pub root_name: String,
    /// Longer root description, when the host provides one
    pub root_description: Option<String>,
    pub revision: String,
    /// Short display form of the revision (e.g. abbreviated hash)
    pub revision_display_name: Option<String>,
}

impl BuildRevision {
    /// Revision of a VCS root without a description
    pub fn new(root_name: impl Into<String>, revision: impl Into<String>) -> Self {
        Self { root_name: root_name.into(), revision: revision.into(), ..Self::default() }
    }

    /// Revision as shown in events
    pub fn display_revision(&self) -> &str {
        self.revision_display_name.as_deref().unwrap_or(&self.revision)
    }

    /// Root description, falling back to the root name
    pub fn display_description(&self) -> &str {
        self.root_description.as_deref().unwrap_or(&self.root_name)
    }
}

/// Build agent that ran the build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildAgent {
    pub name: String,
    pub host_name: String,
    pub host_address: String,
}

/// One entry of the build's artifact listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildArtifact {
    pub name: String,
    pub relative_path: String,
    pub size: u64,
    /// Directories and archives browsed as directories
    pub is_container: bool,
}

impl BuildArtifact {
    /// Regular artifact file
    pub fn file(relative_path: impl Into<String>, size: u64) -> Self {
        let relative_path = relative_path.into();
        let name = relative_path.rsplit('/').next().unwrap_or_default().to_string();
        Self { name, relative_path, size, is_container: false }
    }

    /// Only named, non-container artifacts appear in reports.
    pub fn is_reportable(&self) -> bool {
        !self.name.is_empty() && !self.is_container
    }
}

/// Test and compilation statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildStatistics {
    pub compilation_error_count: u64,
    pub test_run_count: u64,
    pub failed_test_count: u64,
    pub all_test_count: u64,
    pub ignored_test_count: u64,
    pub new_failed_test_count: u64,
    pub passed_test_count: u64,
    /// First failed test, used as an example in events
    pub first_failed_test: Option<TestName>,
}

/// Test name in full and short form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestName {
    /// e.g. `"com.example.FooTest.testBar"`
    pub full_name: String,
    /// e.g. `"FooTest.testBar"`
    pub short_name: String,
}

/// A build feature configured on a build configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFeatureDescriptor {
    #[serde(rename = "type")]
    pub feature_type: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

const fn enabled_by_default() -> bool {
    true
}

impl BuildFeatureDescriptor {
    /// Enabled feature of the given type
    pub fn new(feature_type: impl Into<String>, parameters: BTreeMap<String, String>) -> Self {
        Self { feature_type: feature_type.into(), enabled: true, parameters }
    }
}

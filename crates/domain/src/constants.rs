//! Exporter constants
//!
//! Metric names and tag keys form the public contract with dashboards and
//! monitors in Datadog; changing any of them breaks existing queries.

use std::time::Duration;

// Build feature wiring
pub const DATADOG_BUILD_FEATURE_TYPE: &str = "buildhound.datadog-exporter";
pub const DATADOG_AGENT_ADDRESS_PARAMETER: &str = "DATADOG_AGENT_ADDRESS_AND_PORT";

// Agent defaults
pub const DEFAULT_AGENT_HOST: &str = "localhost";
pub const DEFAULT_AGENT_PORT: u16 = 8125;
pub const DEFAULT_CLIENT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_SERVER_ROOT_URL: &str = "http://localhost:8111";

// Counters
pub const METRIC_STARTED_COUNT: &str = "teamcity.build.started_count";
pub const METRIC_FINISHED_COUNT: &str = "teamcity.build.finished_count";
pub const METRIC_SUCCESS_COUNT: &str = "teamcity.build.success_count";
pub const METRIC_FAILED_COUNT: &str = "teamcity.build.failed_count";

// Timers
pub const METRIC_DURATION: &str = "teamcity.build.duration";

// Histograms (extended mode)
pub const METRIC_LOG_SIZE: &str = "teamcity.build.log_size";
pub const METRIC_COMPILATION_ERROR_COUNT: &str = "teamcity.build.compilation_error_count";
pub const METRIC_TESTS_RUN_COUNT: &str = "teamcity.build.tests.run_count";
pub const METRIC_TESTS_FAILED_COUNT: &str = "teamcity.build.tests.failed_count";
pub const METRIC_TESTS_ALL_COUNT: &str = "teamcity.build.tests.all_count";
pub const METRIC_TESTS_IGNORED_COUNT: &str = "teamcity.build.tests.ignored_count";
pub const METRIC_TESTS_NEW_FAILED_COUNT: &str = "teamcity.build.tests.new_failed_count";
pub const METRIC_TESTS_PASSED_COUNT: &str = "teamcity.build.tests.passed_count";
pub const METRIC_ARTIFACTS_COUNT: &str = "teamcity.build.artifacts.count";
pub const METRIC_ARTIFACTS_TOTAL_SIZE: &str = "teamcity.build.artifacts.total_size";

// Base tag keys
pub const TAG_PROJECT_ID: &str = "build_project_id";
pub const TAG_BUILD_TYPE_ID: &str = "build_type_id";
pub const TAG_BRANCH: &str = "build_branch";
pub const TAG_STATUS: &str = "build_status";

// Event tag keys
pub const TAG_BUILD_NUMBER: &str = "build_number";
pub const TAG_BUILD_ID: &str = "build_id";
pub const TAG_INTERNAL_STATUS: &str = "build_internal_status";
pub const TAG_TRIGGERED_BY: &str = "build_triggered_by";
pub const TAG_VCS_ROOT: &str = "vcs_root";
pub const TAG_VCS_REVISION: &str = "vcs_revision";
pub const TAG_AGENT_NAME: &str = "build_agent_name";
pub const TAG_AGENT_IP_ADDRESS: &str = "build_agent_ip_address";
pub const TAG_AGENT_HOSTNAME: &str = "build_agent_hostname";
pub const TAG_FAILURE_REASON: &str = "build_failure_reason";
pub const TAG_ARTIFACT: &str = "build_artifact";
pub const TAG_FAILED_TEST_EXAMPLE: &str = "failed_test_example";

// Flag tags (extended mode)
pub const FLAG_BUILD_STARTED: &str = "build_started";
pub const FLAG_BUILD_FINISHED: &str = "build_finished";
pub const FLAG_BUILD_SUCCESS: &str = "build_success";

/// Branch tag value for builds without a branch
pub const BRANCH_NOT_AVAILABLE: &str = "N/A";

/// Datadog markdown event delimiters
pub const MARKDOWN_EVENT_START: &str = "%%% \n";
pub const MARKDOWN_EVENT_END: &str = "\n %%%";

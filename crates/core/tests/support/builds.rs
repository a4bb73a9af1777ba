//! Build record fixtures

use std::collections::BTreeMap;

use buildhound_domain::constants::{DATADOG_AGENT_ADDRESS_PARAMETER, DATADOG_BUILD_FEATURE_TYPE};
use buildhound_domain::{
    BuildAgent, BuildFeatureDescriptor, BuildRecord, FailureReason, TriggeredBy,
};

/// Exporter feature pointing at the given address.
pub fn exporter_feature(address: &str) -> BuildFeatureDescriptor {
    BuildFeatureDescriptor::new(
        DATADOG_BUILD_FEATURE_TYPE,
        BTreeMap::from([(DATADOG_AGENT_ADDRESS_PARAMETER.to_string(), address.to_string())]),
    )
}

/// A green, finished, non-personal build exporting to `agent:8125`.
pub fn finished_build() -> BuildRecord {
    BuildRecord {
        build_id: 4711,
        build_number: "128".into(),
        full_name: "Payments :: Integration".into(),
        project_id: "Payments".into(),
        build_type_id: "Payments_Integration".into(),
        branch: Some("main".into()),
        finished: true,
        duration_secs: 305,
        triggered_by: TriggeredBy { description: "Git".into(), raw: "vcsName=jetbrains.git".into() },
        agent: BuildAgent {
            name: "linux-agent-3".into(),
            host_name: "ci-agent-3.internal".into(),
            host_address: "10.1.2.3".into(),
        },
        internal_status: "NORMAL".into(),
        log_size_bytes: 48 * 1024,
        features: vec![exporter_feature("agent:8125")],
        ..BuildRecord::default()
    }
}

/// The finished build with a compilation failure.
pub fn failed_build() -> BuildRecord {
    BuildRecord {
        failure_reasons: vec![FailureReason::new("TC_COMPILATION_ERROR", "javac failed")],
        internal_status: "FAILURE".into(),
        ..finished_build()
    }
}

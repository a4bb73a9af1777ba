//! Domain types
//!
//! - `build`: the read-only build record handed over by the CI host
//! - `destination`: Datadog agent addresses and registry keys
//! - `feature`: exporter build feature parameters
//! - `metric`: metrics, events and tags produced for a build

pub mod build;
pub mod destination;
pub mod feature;
pub mod metric;

pub use build::{
    BuildAgent, BuildArtifact, BuildFeatureDescriptor, BuildLifecycleEvent, BuildRecord,
    BuildRevision, BuildStatistics, FailureReason, TestName, TriggeredBy,
};
pub use destination::{ClientKey, Destination};
pub use feature::FeatureParameters;
pub use metric::{Emission, Event, Metric, TagSet};

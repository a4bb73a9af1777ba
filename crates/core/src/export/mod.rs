//! Build export: from a lifecycle notification to metrics and an event
//!
//! - `status` / `tags`: what every metric and the event are tagged with
//! - `render`: the markdown event body
//! - `plan`: which metrics and event a notification produces
//! - `service`: delivery to every configured destination

pub mod plan;
pub mod ports;
pub mod render;
pub mod service;
pub mod status;
pub mod tags;

pub use plan::plan_emission;
pub use ports::BuildLifecycleListener;
pub use service::{BuildExportService, ExportSummary};
pub use status::BuildStatus;
pub use tags::ArtifactSummary;

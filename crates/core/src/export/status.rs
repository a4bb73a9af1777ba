//! Build status derivation

use buildhound_domain::{impl_str_enum_conversions, BuildRecord};

/// Value of the `build_status` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Started,
    Interrupted,
    Success,
    Failed,
}

impl_str_enum_conversions!(BuildStatus {
    Started => "started",
    Interrupted => "interrupted",
    Success => "success",
    Failed => "failed",
});

impl BuildStatus {
    /// Derive the status by precedence: unfinished, then interrupted, then
    /// the presence of failure reasons.
    pub fn of(build: &BuildRecord) -> Self {
        if !build.finished {
            Self::Started
        } else if build.interrupted {
            Self::Interrupted
        } else if build.has_failures() {
            Self::Failed
        } else {
            Self::Success
        }
    }
}

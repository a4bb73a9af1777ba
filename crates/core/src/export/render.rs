//! Markdown rendering of build events
//!
//! The event body is Datadog markdown wrapped in `%%%` delimiters. Sections
//! appear in a fixed order so monitors and saved views can rely on them:
//!
//! 1. link to the build log
//! 2. failures block, or `Build was successful!`
//! 3. build length
//! 4. trigger
//! 5. VCS roots, or `No source code VCS roots`
//! 6. build agent
//! 7. build log size
//! 8. artifacts block with total, or `No build artifacts generated`
//!
//! Started events (extended mode only) carry sections 1, 4, 5 and 6.

use std::fmt::{self, Write};

use buildhound_common::{format_byte_count, format_period};
use buildhound_domain::constants::{MARKDOWN_EVENT_END, MARKDOWN_EVENT_START};
use buildhound_domain::{BuildRecord, EmissionMode};

use super::status::BuildStatus;
use super::tags::{failed_test_example, ArtifactSummary};

const FENCE: &str = "```";

/// `TeamCity build <status>: <full name> #<number>`
pub fn render_title(build: &BuildRecord, status: BuildStatus) -> String {
    format!("TeamCity build {status}: {} #{}", build.full_name, build.build_number)
}

/// Full markdown body, delimiters included.
pub fn render_text(
    build: &BuildRecord,
    server_root: &str,
    mode: EmissionMode,
    artifacts: &ArtifactSummary<'_>,
) -> String {
    let mut text = String::from(MARKDOWN_EVENT_START);
    // Writing into a String is infallible.
    let _ = write_body(&mut text, build, server_root, mode, artifacts);
    text.push_str(MARKDOWN_EVENT_END);
    text
}

fn write_body(
    out: &mut String,
    build: &BuildRecord,
    server_root: &str,
    mode: EmissionMode,
    artifacts: &ArtifactSummary<'_>,
) -> fmt::Result {
    let phase = if build.finished { "finished" } else { "started" };
    writeln!(
        out,
        "TeamCity build {phase}: [{} #{}]({server_root}/viewLog.html?buildId={})",
        build.full_name, build.build_number, build.build_id
    )?;

    if build.finished {
        write_outcome(out, build, mode)?;
        writeln!(out, "Build length: {}", format_period(build.duration()))?;
    }

    writeln!(out, "Triggered by: {}", build.triggered_by.description)?;
    write_revisions(out, build)?;
    writeln!(out, "Build agent: {}", build.agent.name)?;

    if build.finished {
        writeln!(out, "Generated: {} build logs", format_byte_count(build.log_size_bytes))?;
        write_artifacts(out, artifacts)?;
    }
    Ok(())
}

fn write_outcome(out: &mut String, build: &BuildRecord, mode: EmissionMode) -> fmt::Result {
    if !build.has_failures() {
        return writeln!(out, "Build was successful!");
    }

    writeln!(out, "Build failures:\n{FENCE}")?;
    for reason in &build.failure_reasons {
        writeln!(out, "{}", reason.description)?;
    }
    writeln!(out, "{FENCE}")?;

    if mode == EmissionMode::Extended {
        if let (Some(stats), Some(test)) = (&build.statistics, failed_test_example(build)) {
            writeln!(
                out,
                "Failed test(s) {} ({} new) from {}, Example: `{}`",
                stats.failed_test_count,
                stats.new_failed_test_count,
                stats.all_test_count,
                test.full_name
            )?;
        }
    }
    Ok(())
}

fn write_revisions(out: &mut String, build: &BuildRecord) -> fmt::Result {
    if build.revisions.is_empty() {
        return writeln!(out, "No source code VCS roots");
    }

    writeln!(out, "Source code VCS roots:\n{FENCE}")?;
    for revision in &build.revisions {
        writeln!(
            out,
            "VCS root: {}   Revision: {}",
            revision.root_name,
            revision.display_revision()
        )?;
    }
    writeln!(out, "{FENCE}")
}

fn write_artifacts(out: &mut String, artifacts: &ArtifactSummary<'_>) -> fmt::Result {
    if artifacts.is_empty() {
        return writeln!(out, "No build artifacts generated");
    }

    writeln!(out, "Generated build artifacts:\n{FENCE}")?;
    for artifact in &artifacts.artifacts {
        writeln!(out, "{} ({})", artifact.relative_path, format_byte_count(artifact.size))?;
    }
    writeln!(out, "{FENCE}")?;
    writeln!(
        out,
        "Total {} artifacts size: {}",
        artifacts.count,
        format_byte_count(artifacts.total_size)
    )
}

//! buildhound-replay - feed recorded build notifications to the exporter
//!
//! Usage: `buildhound-replay <started|finished|interrupted> <build.json>...`

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use buildhound_domain::{BuildLifecycleEvent, BuildRecord};
use buildhound_infra::config;
use buildhound_lib::{init_tracing, ExporterContext};

const USAGE: &str = "usage: buildhound-replay <started|finished|interrupted> <build.json>...";

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let config = config::load().context("failed to load exporter configuration")?;
    init_tracing(&config.logging);

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(err) => tracing::debug!(error = %err, "No .env file loaded"),
    }

    let (notification, paths) = parse_args(std::env::args().skip(1))?;
    let context = ExporterContext::new_with_config(config)?;

    for path in &paths {
        let build = read_build(path)?;
        let summary = context.export_service.handle_build_event(notification, &build);
        tracing::info!(
            file = %path.display(),
            build_id = build.build_id,
            %notification,
            destinations = summary.destinations,
            delivered = summary.delivered,
            failed = summary.failed,
            "Replayed build notification"
        );
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(BuildLifecycleEvent, Vec<PathBuf>)> {
    let Some(kind) = args.next() else {
        bail!(USAGE);
    };
    let notification = kind
        .parse::<BuildLifecycleEvent>()
        .map_err(|err| anyhow!("unknown notification '{kind}' ({err})\n{USAGE}"))?;

    let paths: Vec<PathBuf> = args.map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!(USAGE);
    }
    Ok((notification, paths))
}

fn read_build(path: &Path) -> Result<BuildRecord> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid build record", path.display()))
}

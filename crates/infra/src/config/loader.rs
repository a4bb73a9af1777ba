//! Configuration loader
//!
//! Loads exporter configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. `BUILDHOUND_CONFIG`, when set, names the file to load
//! 2. Otherwise, when `BUILDHOUND_SERVER_ROOT_URL` is set, loads from
//!    environment variables
//! 3. If it is not set, falls back to a file
//! 4. Searches multiple paths for config files (JSON and TOML)
//! 5. With no file anywhere, uses the built-in defaults
//!
//! ## Environment Variables
//! - `BUILDHOUND_SERVER_ROOT_URL`: CI server root URL (required for env loading)
//! - `BUILDHOUND_MODE`: `canonical` or `extended`
//! - `BUILDHOUND_CACHE_KEY`: `host_and_port` or `host_only`
//! - `BUILDHOUND_CLIENT_IDLE_TIMEOUT`: client idle timeout in seconds
//! - `BUILDHOUND_METRIC_PREFIX`: prefix for every metric name
//! - `BUILDHOUND_CONSTANT_TAGS`: comma-separated tags for every datagram
//! - `BUILDHOUND_LOG_LEVEL`: default log filter directive
//! - `BUILDHOUND_LOG_FORMAT`: `pretty` or `json`
//!
//! ## File Locations
//! The loader checks the following paths (in order):
//! 1. `./buildhound.toml` or `./buildhound.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory only)
//! 3. `buildhound.toml` or `buildhound.json` in the parent and grandparent
//!    directories
//! 4. `buildhound.toml` or `buildhound.json` in the executable's directory
//!    and its parent and grandparent

use std::path::{Path, PathBuf};
use std::str::FromStr;

use buildhound_domain::{
    BuildHoundError, CacheKeyPolicy, EmissionMode, ExporterConfig, LogFormat, LoggingConfig,
    Result,
};

use crate::errors::InfraError;

const CONFIG_PATH_VAR: &str = "BUILDHOUND_CONFIG";
const SERVER_ROOT_URL_VAR: &str = "BUILDHOUND_SERVER_ROOT_URL";
const CONFIG_FILE_NAMES: [&str; 2] = ["buildhound.toml", "buildhound.json"];
/// Generic names, only looked up in the working directory itself
const LOCAL_CONFIG_FILE_NAMES: [&str; 2] = ["config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `BuildHoundError::Config` if:
/// - An environment variable or file has an invalid value
/// - `BUILDHOUND_CONFIG` names a missing or malformed file
/// - The loaded configuration fails validation
pub fn load() -> Result<ExporterConfig> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return load_from_file(Some(PathBuf::from(path)));
    }

    // Only a missing root URL falls through; invalid values are reported.
    if env_optional(SERVER_ROOT_URL_VAR).is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    tracing::debug!("{SERVER_ROOT_URL_VAR} not set, trying file");
    match locate_config_file() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found, using defaults");
            Ok(ExporterConfig::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `BUILDHOUND_SERVER_ROOT_URL` must be present; every other variable is
/// optional and falls back to its default.
///
/// # Errors
/// Returns `BuildHoundError::Config` if the root URL is missing or any
/// variable has an invalid value.
pub fn load_from_env() -> Result<ExporterConfig> {
    let defaults = ExporterConfig::default();

    let server_root_url = env_var(SERVER_ROOT_URL_VAR)?;
    let mode = env_parse::<EmissionMode>("BUILDHOUND_MODE")?.unwrap_or(defaults.mode);
    let cache_key =
        env_parse::<CacheKeyPolicy>("BUILDHOUND_CACHE_KEY")?.unwrap_or(defaults.cache_key);
    let client_idle_timeout_secs = env_parse::<u64>("BUILDHOUND_CLIENT_IDLE_TIMEOUT")?
        .unwrap_or(defaults.client_idle_timeout_secs);
    let metric_prefix = env_optional("BUILDHOUND_METRIC_PREFIX");
    let constant_tags = env_optional("BUILDHOUND_CONSTANT_TAGS")
        .map(|tags| split_list(&tags))
        .unwrap_or_default();

    let logging = LoggingConfig {
        level: env_optional("BUILDHOUND_LOG_LEVEL").unwrap_or(defaults.logging.level),
        format: env_parse::<LogFormat>("BUILDHOUND_LOG_FORMAT")?
            .unwrap_or(defaults.logging.format),
    };

    let config = ExporterConfig {
        server_root_url,
        mode,
        cache_key,
        client_idle_timeout_secs,
        metric_prefix,
        constant_tags,
        logging,
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `BuildHoundError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or the configuration fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<ExporterConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BuildHoundError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => locate_config_file().ok_or_else(|| {
            BuildHoundError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<ExporterConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    let config: ExporterConfig = match extension {
        "toml" => toml::from_str(contents).map_err(InfraError::from)?,
        "json" => serde_json::from_str(contents).map_err(InfraError::from)?,
        _ => {
            return Err(BuildHoundError::Config(format!(
                "Unsupported config format: {extension}"
            )))
        }
    };
    Ok(config)
}

/// Search multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn locate_config_file() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe_path| exe_path.parent().map(Path::to_path_buf));

    // Return first existing candidate
    candidate_paths(cwd.as_deref(), exe_dir.as_deref()).into_iter().find(|path| path.is_file())
}

/// Candidate config files in lookup order
///
/// `config.{toml,json}` is only accepted from the working directory; the
/// ancestors and the executable location must carry the `buildhound` name.
fn candidate_paths(cwd: Option<&Path>, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(cwd) = cwd {
        candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
        candidates.extend(LOCAL_CONFIG_FILE_NAMES.iter().map(|name| cwd.join(name)));
        for ancestor in [cwd.join(".."), cwd.join("../..")] {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| ancestor.join(name)));
        }
    }

    if let Some(exe_dir) = exe_dir {
        for root in [exe_dir.to_path_buf(), exe_dir.join(".."), exe_dir.join("../..")] {
            candidates.extend(CONFIG_FILE_NAMES.iter().map(|name| root.join(name)));
        }
    }

    candidates
}

/// Get required environment variable
///
/// # Errors
/// Returns `BuildHoundError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    env_optional(key).ok_or_else(|| {
        BuildHoundError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Non-empty environment variable, trimmed
fn env_optional(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse an optional environment variable
///
/// # Errors
/// Returns `BuildHoundError::Config` if the variable is set but invalid.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_optional(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| BuildHoundError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
}

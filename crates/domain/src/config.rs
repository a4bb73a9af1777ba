//! Exporter configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CLIENT_IDLE_TIMEOUT, DEFAULT_SERVER_ROOT_URL};
use crate::errors::{BuildHoundError, Result};
use crate::impl_str_enum_conversions;

/// Exporter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Root URL of the CI server, used for build log links in events
    pub server_root_url: String,
    /// Which build notifications produce output, and how much
    pub mode: EmissionMode,
    /// How destinations map onto cached metrics clients
    pub cache_key: CacheKeyPolicy,
    /// Idle period after which a cached client is rebuilt
    pub client_idle_timeout_secs: u64,
    /// Optional prefix prepended to every metric name
    pub metric_prefix: Option<String>,
    /// Tags appended to every metric and event (e.g. `env:prod`)
    pub constant_tags: Vec<String>,
    pub logging: LoggingConfig,
}

impl ExporterConfig {
    /// Idle timeout as a `Duration`
    pub fn client_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.client_idle_timeout_secs)
    }

    /// Check invariants that serde cannot express.
    ///
    /// # Errors
    /// Returns `BuildHoundError::Config` for an empty root URL, a zero idle
    /// timeout or a malformed constant tag.
    pub fn validate(&self) -> Result<()> {
        if self.server_root_url.trim().is_empty() {
            return Err(BuildHoundError::Config("server_root_url must not be empty".into()));
        }
        if self.client_idle_timeout_secs == 0 {
            return Err(BuildHoundError::Config(
                "client_idle_timeout_secs must be greater than zero".into(),
            ));
        }
        if let Some(tag) = self.constant_tags.iter().find(|tag| tag.trim().is_empty()) {
            return Err(BuildHoundError::Config(format!("Invalid constant tag: {tag:?}")));
        }
        Ok(())
    }

    /// Root URL without a trailing slash, ready for path concatenation.
    pub fn server_root(&self) -> &str {
        self.server_root_url.trim_end_matches('/')
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            server_root_url: DEFAULT_SERVER_ROOT_URL.to_string(),
            mode: EmissionMode::default(),
            cache_key: CacheKeyPolicy::default(),
            client_idle_timeout_secs: DEFAULT_CLIENT_IDLE_TIMEOUT.as_secs(),
            metric_prefix: None,
            constant_tags: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Emission mode
///
/// `Canonical` reports terminal builds only. `Extended` also reports build
/// starts and adds log/test/artifact histograms plus flag tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionMode {
    #[default]
    Canonical,
    Extended,
}

impl_str_enum_conversions!(EmissionMode {
    Canonical => "canonical",
    Extended => "extended",
});

/// Cache key policy for the metrics client registry
///
/// `HostOnly` reproduces the legacy behaviour where two destinations that
/// differ only by port share one client (the first one created wins).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyPolicy {
    #[default]
    HostAndPort,
    HostOnly,
}

impl_str_enum_conversions!(CacheKeyPolicy {
    HostAndPort => "host_and_port",
    HostOnly => "host_only",
});

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::default() }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl_str_enum_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExporterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.client_idle_timeout(), Duration::from_secs(60));
        assert_eq!(config.mode, EmissionMode::Canonical);
        assert_eq!(config.cache_key, CacheKeyPolicy::HostAndPort);
    }

    #[test]
    fn test_validate_rejects_zero_idle_timeout() {
        let config = ExporterConfig { client_idle_timeout_secs: 0, ..ExporterConfig::default() };
        assert!(matches!(config.validate(), Err(BuildHoundError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_root_url() {
        let config =
            ExporterConfig { server_root_url: "  ".to_string(), ..ExporterConfig::default() };
        assert!(matches!(config.validate(), Err(BuildHoundError::Config(_))));
    }

    #[test]
    fn test_server_root_trims_trailing_slash() {
        let config = ExporterConfig {
            server_root_url: "https://ci.example.com/".to_string(),
            ..ExporterConfig::default()
        };
        assert_eq!(config.server_root(), "https://ci.example.com");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExporterConfig =
            serde_json::from_str(r#"{"mode": "extended", "cache_key": "host_only"}"#).unwrap();
        assert_eq!(config.mode, EmissionMode::Extended);
        assert_eq!(config.cache_key, CacheKeyPolicy::HostOnly);
        assert_eq!(config.client_idle_timeout_secs, 60);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Extended".parse::<EmissionMode>().unwrap(), EmissionMode::Extended);
        assert_eq!("host_only".parse::<CacheKeyPolicy>().unwrap(), CacheKeyPolicy::HostOnly);
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("verbose".parse::<EmissionMode>().is_err());
    }
}

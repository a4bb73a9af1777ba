//! Datadog agent destinations
//!
//! A destination is written `host[:port]`. The port is optional and defaults
//! to the DogStatsD port (8125). IPv6 literals must be bracketed
//! (`[::1]:8125`) so the port separator stays unambiguous.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::CacheKeyPolicy;
use crate::constants::{DEFAULT_AGENT_HOST, DEFAULT_AGENT_PORT};
use crate::errors::{BuildHoundError, Result};

const MAX_PORT_DIGITS: usize = 5;

/// Address of a Datadog agent
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Destination {
    host: String,
    port: Option<u16>,
}

impl Destination {
    /// Create a destination from parts.
    ///
    /// # Errors
    /// Returns `BuildHoundError::InvalidAddress` when the host is empty,
    /// contains whitespace, or is an unbracketed IPv6 literal, or when the
    /// port is zero.
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Result<Self> {
        let host = host.into();
        validate_host(&host)?;
        if port == Some(0) {
            return Err(invalid(&host, "port must be between 1 and 65535"));
        }
        Ok(Self { host, port })
    }

    /// Agent host name or address
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port as configured, `None` when omitted.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Port to send to, falling back to the DogStatsD default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_AGENT_PORT)
    }

    /// `host:port` with the effective port, suitable for socket resolution.
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.host, self.effective_port())
    }

    /// Registry key for this destination under the given policy.
    pub fn cache_key(&self, policy: CacheKeyPolicy) -> ClientKey {
        let port = match policy {
            CacheKeyPolicy::HostAndPort => Some(self.effective_port()),
            CacheKeyPolicy::HostOnly => None,
        };
        ClientKey { host: self.host.to_ascii_lowercase(), port }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self { host: DEFAULT_AGENT_HOST.to_string(), port: None }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => f.write_str(&self.host),
        }
    }
}

impl FromStr for Destination {
    type Err = BuildHoundError;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();

        let (host, port) = if input.starts_with('[') {
            let close = input.find(']').ok_or_else(|| invalid(input, "unterminated '['"))?;
            let (host, tail) = input.split_at(close + 1);
            let port = match tail {
                "" => None,
                _ => {
                    let digits = tail
                        .strip_prefix(':')
                        .ok_or_else(|| invalid(input, "expected ':' after ']'"))?;
                    Some(parse_port(input, digits)?)
                }
            };
            (host, port)
        } else {
            match input.rsplit_once(':') {
                Some((host, digits)) => (host, Some(parse_port(input, digits)?)),
                None => (input, None),
            }
        };

        Self::new(host, port).map_err(|_| invalid(input, "malformed host"))
    }
}

impl TryFrom<String> for Destination {
    type Error = BuildHoundError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Destination> for String {
    fn from(value: Destination) -> Self {
        value.to_string()
    }
}

/// Identity of a cached metrics client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientKey {
    /// Lowercased host
    pub host: String,
    /// Effective port, or `None` under the host-only policy
    pub port: Option<u16>,
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => write!(f, "{}:*", self.host),
        }
    }
}

fn parse_port(input: &str, digits: &str) -> Result<u16> {
    if digits.is_empty()
        || digits.len() > MAX_PORT_DIGITS
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid(input, "port must be 1 to 5 digits"));
    }
    match digits.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(invalid(input, "port must be between 1 and 65535")),
    }
}

fn validate_host(host: &str) -> Result<()> {
    if host.is_empty() {
        return Err(invalid(host, "host must not be empty"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(invalid(host, "host must not contain whitespace"));
    }
    let bracketed = host.starts_with('[') && host.ends_with(']') && host.len() > 2;
    if host.starts_with('[') && !bracketed {
        return Err(invalid(host, "malformed bracketed host"));
    }
    if host.contains(':') && !bracketed {
        return Err(invalid(host, "IPv6 hosts must be bracketed"));
    }
    Ok(())
}

fn invalid(input: &str, reason: &str) -> BuildHoundError {
    BuildHoundError::InvalidAddress(format!("{input:?}: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_only() {
        let destination: Destination = "agent.example.com".parse().unwrap();
        assert_eq!(destination.host(), "agent.example.com");
        assert_eq!(destination.port(), None);
        assert_eq!(destination.effective_port(), 8125);
        assert_eq!(destination.socket_address(), "agent.example.com:8125");
    }

    #[test]
    fn test_parse_host_and_port() {
        let destination: Destination = "10.0.0.5:9125".parse().unwrap();
        assert_eq!(destination.host(), "10.0.0.5");
        assert_eq!(destination.port(), Some(9125));
        assert_eq!(destination.to_string(), "10.0.0.5:9125");
    }

    #[test]
    fn test_parse_bracketed_ipv6() {
        let destination: Destination = "[::1]:8126".parse().unwrap();
        assert_eq!(destination.host(), "[::1]");
        assert_eq!(destination.effective_port(), 8126);

        let no_port: Destination = "[fe80::1]".parse().unwrap();
        assert_eq!(no_port.port(), None);
    }

    #[test]
    fn test_parse_rejects_malformed_port() {
        for input in ["host:", "host:abc", "host:123456", "host:99999", "host:0", "host:12a"] {
            let result = input.parse::<Destination>();
            assert!(
                matches!(result, Err(BuildHoundError::InvalidAddress(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed_host() {
        for input in ["", ":8125", "a:b:8125", "my host:8125", "[::1", "[::1]8125"] {
            assert!(input.parse::<Destination>().is_err(), "{input} should be rejected");
        }
    }

    #[test]
    fn test_cache_key_policies() {
        let plain: Destination = "A.example.com".parse().unwrap();
        let explicit: Destination = "a.example.com:8125".parse().unwrap();
        let other_port: Destination = "a.example.com:9125".parse().unwrap();

        let by_port = CacheKeyPolicy::HostAndPort;
        assert_eq!(plain.cache_key(by_port), explicit.cache_key(by_port));
        assert_ne!(plain.cache_key(by_port), other_port.cache_key(by_port));

        let by_host = CacheKeyPolicy::HostOnly;
        assert_eq!(plain.cache_key(by_host), other_port.cache_key(by_host));
        assert_eq!(plain.cache_key(by_host).to_string(), "a.example.com:*");
    }

    #[test]
    fn test_serde_as_string() {
        let destination: Destination = serde_json::from_str(r#""statsd:8125""#).unwrap();
        assert_eq!(destination.port(), Some(8125));
        assert_eq!(serde_json::to_string(&destination).unwrap(), r#""statsd:8125""#);
        assert!(serde_json::from_str::<Destination>(r#""statsd:port""#).is_err());
    }
}

//! Datadog DogStatsD exporter
//!
//! Sends build metrics and events to a Datadog agent using raw UDP sockets.
//! Implements the subset of the DogStatsD protocol this exporter needs:
//! counters, timers, histograms and events.
//!
//! ## Design
//! - **Raw UDP sockets** - no client library, one datagram per metric
//! - **Non-blocking** - a full send buffer drops the datagram instead of
//!   stalling the CI host's event dispatch
//! - **Best-effort delivery** - UDP is fire-and-forget, no retry logic
//! - **Bounded events** - event text is cut to Datadog's 4000 characters and
//!   the whole datagram kept within the agent's 8 KB buffer
//! - **Tag support** - DogStatsD tags, sanitised so values cannot break
//!   the datagram framing
//!
//! ## DogStatsD Protocol
//! ```text
//! <METRIC_NAME>:<VALUE>|<TYPE>|#<TAG1>:<VALUE1>,<TAG2>:<VALUE2>
//! _e{<TITLE_LEN>,<TEXT_LEN>}:<TITLE>|<TEXT>|h:<HOSTNAME>|#<TAGS>
//! ```
//!
//! Examples:
//! - Counter: `teamcity.build.finished_count:1|c|#build_status:success`
//! - Timer: `teamcity.build.duration:125000|ms|#build_status:success`
//! - Histogram: `teamcity.build.log_size:49152|h|#build_status:success`
//! - Event: `_e{5,11}:Title|Hello\nworld|h:agent-1|#build_id:7`

use std::borrow::Cow;
use std::fmt::Display;
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use buildhound_core::MetricsClient;
use buildhound_domain::constants::MARKDOWN_EVENT_END;
use buildhound_domain::{Event, Metric, Result as DomainResult, TagSet};

use super::factory::ClientSettings;
use crate::observability::{MetricsError, MetricsResult};

/// Largest datagram the agent reads in full (its default buffer size)
const MAX_DATAGRAM_BYTES: usize = 8192;

/// Datadog's limit on event text length, in characters
const MAX_EVENT_TEXT_CHARS: usize = 4000;

/// Room kept for event tags when sizing the text
const EVENT_TAG_RESERVE_BYTES: usize = 1024;

/// `_e{,}:`, two lengths of up to five digits, `|` and `|h:`
const EVENT_FRAMING_BYTES: usize = 20;

const TRUNCATION_MARKER: &str = "\n... (truncated)";

/// Datadog DogStatsD client using raw UDP sockets
///
/// Thread-safe, non-blocking UDP socket bound to one agent address.
#[derive(Debug)]
pub struct DatadogClient {
    /// UDP socket for sending datagrams
    socket: UdpSocket,
    /// Datadog agent address
    agent_addr: SocketAddr,
    /// Metric prefix (e.g., "ci"), joined to names with a dot
    prefix: Option<String>,
    /// Default tags applied to all metrics and events
    default_tags: Vec<String>,
}

impl DatadogClient {
    /// Resolve `address` (`host:port`) and open a client for it.
    ///
    /// # Errors
    /// `MetricsError::AddressResolution` when the host does not resolve,
    /// `MetricsError::Socket` when the local socket cannot be opened.
    pub fn connect(address: &str, settings: &ClientSettings) -> MetricsResult<Self> {
        let agent_addr = address
            .to_socket_addrs()
            .map_err(|e| MetricsError::AddressResolution {
                address: address.to_string(),
                reason: e.to_string(),
            })?
            .next()
            .ok_or_else(|| MetricsError::AddressResolution {
                address: address.to_string(),
                reason: "no addresses returned".to_string(),
            })?;

        Self::with_config(settings, agent_addr)
    }

    /// Create a client for an already resolved agent address
    pub fn with_config(settings: &ClientSettings, agent_addr: SocketAddr) -> MetricsResult<Self> {
        // Bind to any available port (OS will assign) in the agent's family
        let bind_addr = if agent_addr.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
        let socket = UdpSocket::bind(bind_addr).map_err(|source| MetricsError::Socket { source })?;

        // Set non-blocking to avoid blocking on send
        socket.set_nonblocking(true).map_err(|source| MetricsError::Socket { source })?;

        let prefix = settings
            .metric_prefix
            .as_deref()
            .map(|p| p.trim().trim_end_matches('.'))
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        Ok(Self { socket, agent_addr, prefix, default_tags: settings.constant_tags.clone() })
    }

    /// Resolved agent address datagrams are sent to
    pub fn agent_addr(&self) -> SocketAddr {
        self.agent_addr
    }

    /// Send a counter delta
    pub fn count(&self, name: &str, value: i64, tags: &TagSet) -> MetricsResult<()> {
        self.send_metric(name, value, "c", tags)
    }

    /// Send a timing metric (duration in milliseconds)
    pub fn timing(&self, name: &str, duration_ms: u64, tags: &TagSet) -> MetricsResult<()> {
        self.send_metric(name, duration_ms, "ms", tags)
    }

    /// Send a histogram sample
    ///
    /// Histograms calculate statistics (P50, P95, avg, etc.) on the server side.
    pub fn histogram(&self, name: &str, value: f64, tags: &TagSet) -> MetricsResult<()> {
        self.send_metric(name, value, "h", tags)
    }

    /// Send an event
    ///
    /// Oversized events are shortened to fit one datagram: the text is cut
    /// (keeping the closing markdown delimiter) and trailing tags that do
    /// not fit are left off.
    pub fn event(&self, event: &Event) -> MetricsResult<()> {
        let (datagram, dropped_tags) = format_event(event, &self.default_tags);
        if dropped_tags > 0 {
            tracing::warn!(
                event = %event.title,
                dropped_tags,
                "Event tags exceed the datagram size, trailing tags left off"
            );
        }
        self.send(&datagram, &event.title)
    }

    fn send_metric<V: Display>(
        &self,
        name: &str,
        value: V,
        metric_type: &str,
        tags: &TagSet,
    ) -> MetricsResult<()> {
        let full_name = match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{prefix}.{name}")),
            None => Cow::Borrowed(name),
        };
        let datagram = format_metric(&full_name, value, metric_type, &self.default_tags, tags);
        self.send(&datagram, &full_name)
    }

    fn send(&self, datagram: &str, label: &str) -> MetricsResult<()> {
        // Send via UDP (non-blocking, best-effort)
        match self.socket.send_to(datagram.as_bytes(), self.agent_addr) {
            Ok(_) => {
                tracing::trace!(datagram = label, agent = %self.agent_addr, "Sent datagram to Datadog");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                // Non-blocking socket would block, drop datagram
                tracing::warn!(
                    datagram = label,
                    agent = %self.agent_addr,
                    error = %e,
                    "Dropped datagram: send would block"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    datagram = label,
                    agent = %self.agent_addr,
                    error = %e,
                    "Failed to send datagram to Datadog"
                );
                Err(MetricsError::SendFailed { source: e })
            }
        }
    }
}

impl MetricsClient for DatadogClient {
    fn emit_metric(&self, metric: &Metric) -> DomainResult<()> {
        let sent = match metric {
            Metric::Counter { name, value, tags } => self.count(name, *value, tags),
            Metric::Timer { name, millis, tags } => self.timing(name, *millis, tags),
            Metric::Histogram { name, value, tags } => self.histogram(name, *value, tags),
        };
        sent.map_err(Into::into)
    }

    fn record_event(&self, event: &Event) -> DomainResult<()> {
        self.event(event).map_err(Into::into)
    }
}

/// `name:value|type|#tags`, default tags first
fn format_metric<V: Display>(
    name: &str,
    value: V,
    metric_type: &str,
    default_tags: &[String],
    tags: &TagSet,
) -> String {
    let mut datagram = format!("{name}:{value}|{metric_type}");
    append_tags(&mut datagram, default_tags, tags, usize::MAX);
    datagram
}

/// `_e{title_len,text_len}:title|text|h:host|#tags`
///
/// Line breaks in title and text are escaped as a literal `\n`; lengths are
/// byte lengths after escaping. Text and tags are shortened so the datagram
/// fits in [`MAX_DATAGRAM_BYTES`]; the second value counts tags left off.
fn format_event(event: &Event, default_tags: &[String]) -> (String, usize) {
    let title = escape_event_text(&event.title);
    let hostname = sanitize(&event.hostname);

    let text_budget = MAX_DATAGRAM_BYTES
        .saturating_sub(EVENT_FRAMING_BYTES + EVENT_TAG_RESERVE_BYTES)
        .saturating_sub(title.len() + hostname.len());
    let text =
        escape_event_text(&bound_event_text(&event.text, MAX_EVENT_TEXT_CHARS, text_budget));

    let mut datagram = format!("_e{{{},{}}}:{title}|{text}", title.len(), text.len());
    if !hostname.is_empty() {
        datagram.push_str("|h:");
        datagram.push_str(&hostname);
    }
    let dropped = append_tags(&mut datagram, default_tags, &event.tags, MAX_DATAGRAM_BYTES);
    (datagram, dropped)
}

/// Append `|#tag,tag` while the datagram stays within `limit` bytes.
/// Returns how many tags did not fit.
fn append_tags(
    datagram: &mut String,
    default_tags: &[String],
    tags: &TagSet,
    limit: usize,
) -> usize {
    let all_tags =
        default_tags.iter().map(String::as_str).chain(tags.iter()).filter(|t| !t.is_empty());

    let mut dropped = 0;
    let mut first = true;
    for tag in all_tags {
        let tag = sanitize(tag);
        // separator is `|#` for the first tag, `,` afterwards
        let separator_len = if first { 2 } else { 1 };
        if dropped > 0 || datagram.len() + separator_len + tag.len() > limit {
            dropped += 1;
            continue;
        }
        datagram.push_str(if first { "|#" } else { "," });
        datagram.push_str(&tag);
        first = false;
    }
    dropped
}

/// Shorten `text` to at most `max_chars` characters and `max_bytes` escaped
/// bytes, keeping a trailing markdown delimiter in place.
fn bound_event_text(text: &str, max_chars: usize, max_bytes: usize) -> Cow<'_, str> {
    if text.chars().count() <= max_chars && escaped_len(text) <= max_bytes {
        return Cow::Borrowed(text);
    }

    let (body, closing) = match text.strip_suffix(MARKDOWN_EVENT_END) {
        Some(body) => (body, MARKDOWN_EVENT_END),
        None => (text, ""),
    };
    let reserved_chars = TRUNCATION_MARKER.chars().count() + closing.chars().count();
    let reserved_bytes = escaped_len(TRUNCATION_MARKER) + escaped_len(closing);

    let (mut chars, mut bytes, mut cut) = (0, 0, 0);
    for (index, c) in body.char_indices() {
        let width = if c == '\n' { 2 } else { c.len_utf8() };
        if chars + 1 + reserved_chars > max_chars || bytes + width + reserved_bytes > max_bytes {
            break;
        }
        chars += 1;
        bytes += width;
        cut = index + c.len_utf8();
    }

    Cow::Owned(format!("{}{TRUNCATION_MARKER}{closing}", &body[..cut]))
}

/// Byte length once line breaks are escaped
fn escaped_len(text: &str) -> usize {
    text.len() + text.matches('\n').count()
}

fn escape_event_text(text: &str) -> String {
    text.replace("\r\n", "\\n").replace('\n', "\\n")
}

/// Replace characters that would break datagram framing.
fn sanitize(value: &str) -> Cow<'_, str> {
    if value.contains([',', '|', '\n', '\r']) {
        Cow::Owned(value.replace([',', '|', '\n', '\r'], "_"))
    } else {
        Cow::Borrowed(value)
    }
}

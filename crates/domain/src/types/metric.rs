//! Metrics and events produced for a build
//!
//! An [`Emission`] is everything one build notification sends to one agent:
//! an ordered list of [`Metric`]s and at most one [`Event`]. Tags are plain
//! `key:value` strings (or bare flags) kept in insertion order.

use std::fmt;

use serde::Serialize;

/// Ordered list of DogStatsD tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Empty tag set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a `key:value` tag.
    pub fn push(&mut self, key: &str, value: impl fmt::Display) {
        self.0.push(format!("{key}:{value}"));
    }

    /// Append a bare tag without a value (e.g. `build_success`).
    pub fn push_flag(&mut self, flag: &str) {
        self.0.push(flag.to_string());
    }

    /// Builder form of [`TagSet::push`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    /// Whether the exact tag is present
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Tags in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<String> for TagSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl From<Vec<String>> for TagSet {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

/// A single numeric metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Metric {
    /// Counter delta
    Counter { name: String, value: i64, tags: TagSet },
    /// Timing in milliseconds
    Timer { name: String, millis: u64, tags: TagSet },
    /// Sample of a server-side distribution
    Histogram { name: String, value: f64, tags: TagSet },
}

impl Metric {
    /// Counter delta
    pub fn counter(name: &str, value: i64, tags: &TagSet) -> Self {
        Self::Counter { name: name.to_string(), value, tags: tags.clone() }
    }

    /// Timing in milliseconds
    pub fn timer(name: &str, millis: u64, tags: &TagSet) -> Self {
        Self::Timer { name: name.to_string(), millis, tags: tags.clone() }
    }

    /// Histogram sample
    pub fn histogram(name: &str, value: f64, tags: &TagSet) -> Self {
        Self::Histogram { name: name.to_string(), value, tags: tags.clone() }
    }

    /// Metric name without any client prefix
    pub fn name(&self) -> &str {
        match self {
            Self::Counter { name, .. } | Self::Timer { name, .. } | Self::Histogram { name, .. } => {
                name
            }
        }
    }

    pub fn tags(&self) -> &TagSet {
        match self {
            Self::Counter { tags, .. } | Self::Timer { tags, .. } | Self::Histogram { tags, .. } => {
                tags
            }
        }
    }
}

/// Structured, human-readable event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub title: String,
    /// Markdown body, already wrapped in Datadog's markdown delimiters
    pub text: String,
    /// Host the event is attributed to (the build agent)
    pub hostname: String,
    pub tags: TagSet,
}

/// Everything one build notification sends to one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Emission {
    pub metrics: Vec<Metric>,
    pub event: Option<Event>,
}

impl Emission {
    /// Metrics with the given name, in emission order.
    pub fn metrics_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Metric> + 'a {
        self.metrics.iter().filter(move |m| m.name() == name)
    }

    /// Whether a metric with this name is planned
    pub fn has_metric(&self, name: &str) -> bool {
        self.metrics_named(name).next().is_some()
    }

    /// Nothing to send
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.event.is_none()
    }
}

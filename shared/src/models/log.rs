//! Log data model.
//!
//! Defines the generic `LogEntry` exchanged with callers of the logging
//! provider, and the request used to list entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of entries returned by `list_entries` when no positive limit is given.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Severity strings understood by the logging provider.
///
/// Any other value is coerced to `INFO` on the way to the wire.
pub const SEVERITIES: [&str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// A log entry to be written or as retrieved.
///
/// # Example
///
/// ```
/// use shared::models::LogEntry;
///
/// let entry = LogEntry::new("ERROR", "boom").with_label("service", "checkout");
///
/// assert_eq!(entry.severity, "ERROR");
/// assert_eq!(entry.labels.get("service").map(String::as_str), Some("checkout"));
/// assert!(entry.payload.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// One of [`SEVERITIES`]; unknown values are treated as `INFO`.
    #[serde(default)]
    pub severity: String,

    /// The text message.
    #[serde(default)]
    pub message: String,

    /// Entry labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,

    /// Structured payload. When present it is sent instead of `message`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Map<String, serde_json::Value>>,

    /// When the event occurred.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Creates a text entry stamped with the current time.
    #[must_use]
    pub fn new(severity: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: severity.into(),
            message: message.into(),
            labels: HashMap::new(),
            payload: None,
            timestamp: Utc::now(),
        }
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Sets the structured payload.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Map<String, serde_json::Value>) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Parameters for listing log entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntriesRequest {
    /// Cloud Logging filter expression.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter: String,

    /// Sort order; newest first when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_by: String,

    /// Maximum number of entries; zero or negative means [`DEFAULT_LIST_LIMIT`].
    #[serde(default)]
    pub limit: i64,

    /// Continuation cursor from a previous listing.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl ListEntriesRequest {
    /// Creates a request with the given filter and the default limit.
    #[must_use]
    pub fn with_filter(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Self::default()
        }
    }

    /// Sets the limit.
    #[must_use]
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Returns the limit actually applied.
    #[must_use]
    pub fn effective_limit(&self) -> usize {
        super::effective_page_size(self.limit, DEFAULT_LIST_LIMIT)
    }
}

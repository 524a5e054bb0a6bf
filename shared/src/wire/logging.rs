//! Cloud Logging v2 wire format.

use super::MonitoredResource;
use crate::models::LogEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Resource type attached to written entries.
pub const GLOBAL_RESOURCE: &str = "global";

/// Provider log severity (`google.logging.type.LogSeverity`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSeverity {
    /// No assigned severity.
    Default,
    /// Debug or trace information.
    Debug,
    /// Routine information.
    Info,
    /// Normal but significant events.
    Notice,
    /// Events that might cause problems.
    Warning,
    /// Events likely to cause problems.
    Error,
    /// Events that cause more severe problems or outages.
    Critical,
    /// A person must take action immediately.
    Alert,
    /// One or more systems are unusable.
    Emergency,
}

impl LogSeverity {
    /// Returns the JSON name of the severity.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Notice => "NOTICE",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
            Self::Alert => "ALERT",
            Self::Emergency => "EMERGENCY",
        }
    }

    /// Parses the JSON name of a severity; unknown names are `Default`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "DEBUG" => Self::Debug,
            "INFO" => Self::Info,
            "NOTICE" => Self::Notice,
            "WARNING" => Self::Warning,
            "ERROR" => Self::Error,
            "CRITICAL" => Self::Critical,
            "ALERT" => Self::Alert,
            "EMERGENCY" => Self::Emergency,
            _ => Self::Default,
        }
    }
}

/// Maps a generic severity string to the provider severity. Anything outside
/// the five known values becomes `Info`.
#[must_use]
pub fn severity_to_wire(severity: &str) -> LogSeverity {
    match severity {
        "DEBUG" => LogSeverity::Debug,
        "INFO" => LogSeverity::Info,
        "WARNING" => LogSeverity::Warning,
        "ERROR" => LogSeverity::Error,
        "CRITICAL" => LogSeverity::Critical,
        _ => LogSeverity::Info,
    }
}

/// Maps a provider severity back to a generic severity string. Severities
/// with no generic counterpart become `INFO`.
#[must_use]
pub fn severity_from_wire(severity: LogSeverity) -> &'static str {
    match severity {
        LogSeverity::Debug => "DEBUG",
        LogSeverity::Warning => "WARNING",
        LogSeverity::Error => "ERROR",
        LogSeverity::Critical => "CRITICAL",
        LogSeverity::Info
        | LogSeverity::Default
        | LogSeverity::Notice
        | LogSeverity::Alert
        | LogSeverity::Emergency => "INFO",
    }
}

/// Renders the full resource name of a log: `projects/{project}/logs/{id}`.
///
/// The log id is percent-encoded so that `/` and spaces survive.
#[must_use]
pub fn log_name(project_id: &str, log_id: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(log_id.as_bytes()).collect();
    format!("projects/{project_id}/logs/{}", encoded.replace('+', "%20"))
}

/// A log entry as sent to and returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLogEntry {
    /// Full log resource name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log_name: String,
    /// Monitored resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<MonitoredResource>,
    /// Event time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Severity name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub severity: String,
    /// Entry labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    /// Text payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_payload: Option<String>,
    /// Structured payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_payload: Option<Map<String, Value>>,
    /// Protocol buffer payload, as the provider renders it in JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proto_payload: Option<Value>,
}

/// Body of `entries:write`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteEntriesRequest {
    /// Default log name for the entries.
    pub log_name: String,
    /// Default resource for the entries.
    pub resource: MonitoredResource,
    /// Entries to write.
    pub entries: Vec<WireLogEntry>,
}

/// Body of `entries:list`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesBody {
    /// Parent resources, e.g. `projects/my-project`.
    pub resource_names: Vec<String>,
    /// Filter expression.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filter: String,
    /// Sort order.
    pub order_by: String,
    /// Maximum entries in the page.
    pub page_size: i32,
    /// Continuation cursor.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

/// Response of `entries:list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntriesResponse {
    /// Entries; absent when none match.
    #[serde(default)]
    pub entries: Vec<WireLogEntry>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page_token: String,
}

/// Translates a generic entry for writing to `log_name`.
///
/// A structured payload takes precedence over the message.
#[must_use]
pub fn entry_to_wire(log_name: &str, entry: &LogEntry) -> WireLogEntry {
    let (text_payload, json_payload) = match &entry.payload {
        Some(payload) => (None, Some(payload.clone())),
        None => (Some(entry.message.clone()), None),
    };

    WireLogEntry {
        log_name: log_name.to_string(),
        resource: Some(MonitoredResource::new(GLOBAL_RESOURCE)),
        timestamp: Some(entry.timestamp),
        severity: severity_to_wire(&entry.severity).as_str().to_string(),
        labels: entry.labels.clone(),
        text_payload,
        json_payload,
        proto_payload: None,
    }
}

/// Translates a provider entry back to the generic model.
///
/// Text payloads become the message. Structured payloads are kept as the
/// payload, with a string `message` field also copied to the message. Any
/// other payload is rendered as a string.
#[must_use]
pub fn entry_from_wire(entry: WireLogEntry) -> LogEntry {
    let mut message = String::new();
    let mut payload = None;

    if let Some(text) = entry.text_payload {
        message = text;
    } else if let Some(json) = entry.json_payload {
        if let Some(Value::String(text)) = json.get("message") {
            message.clone_from(text);
        }
        payload = Some(json);
    } else if let Some(proto) = entry.proto_payload {
        message = proto.to_string();
    }

    LogEntry {
        severity: severity_from_wire(LogSeverity::parse(&entry.severity)).to_string(),
        message,
        labels: entry.labels,
        payload,
        timestamp: entry.timestamp.unwrap_or_else(Utc::now),
    }
}

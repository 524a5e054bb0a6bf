//! Trace and span data models.
//!
//! Span ids are strings here; the wire format uses 64-bit integers. See
//! [`crate::wire::trace::encode_span_id`] for the (lossy) conversion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

/// Default page size for `list_traces`.
pub const DEFAULT_TRACE_PAGE_SIZE: usize = 100;

/// A timed unit of work within a trace.
///
/// # Example
///
/// ```
/// use shared::models::Span;
///
/// let span = Span::new("root", "GET /checkout")
///     .with_kind("RPC_SERVER")
///     .with_label("http.method", "GET");
///
/// assert!(span.parent_id.is_none());
/// assert_eq!(span.kind, "RPC_SERVER");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Span identifier.
    pub span_id: String,

    /// Operation name.
    #[serde(default)]
    pub name: String,

    /// Start of the span.
    pub start_time: DateTime<Utc>,

    /// End of the span.
    pub end_time: DateTime<Utc>,

    /// Parent span id; `None` for root spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// `RPC_SERVER`, `RPC_CLIENT` or `UNSPECIFIED`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,

    /// Span labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl Span {
    /// Creates a span starting and ending now.
    #[must_use]
    pub fn new(span_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            span_id: span_id.into(),
            name: name.into(),
            start_time: now,
            end_time: now,
            parent_id: None,
            kind: String::new(),
            labels: HashMap::new(),
        }
    }

    /// Sets the parent span id.
    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the span kind.
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Adds a label.
    #[must_use]
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Sets the start and end times.
    #[must_use]
    pub fn with_times(mut self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }
}

/// A distributed trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// Trace identifier (32 hex digits).
    pub trace_id: String,
    /// Project the trace belongs to.
    pub project_id: String,
    /// Spans in provider order.
    #[serde(default)]
    pub spans: Vec<Span>,
}

/// Request to list traces in a time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTracesRequest {
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
    /// Trace filter, e.g. `root:/checkout latency:500ms`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filter: String,
    /// Sort order, e.g. `start desc`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub order_by: String,
    /// Page size; [`DEFAULT_TRACE_PAGE_SIZE`] when not positive.
    #[serde(default)]
    pub page_size: i64,
    /// Continuation cursor.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl ListTracesRequest {
    /// Creates a request over `[start_time, end_time]`.
    #[must_use]
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            filter: String::new(),
            order_by: String::new(),
            page_size: 0,
            page_token: String::new(),
        }
    }

    /// Returns the page size actually requested.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        super::effective_page_size(self.page_size, DEFAULT_TRACE_PAGE_SIZE)
    }
}

/// Request to fetch one trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct GetTraceRequest {
    /// Trace identifier.
    #[validate(length(min = 1, message = "Trace ID cannot be empty"))]
    pub trace_id: String,
}

/// Request to add or replace spans of a single trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PatchTraceRequest {
    /// Trace identifier. Exactly one trace per call.
    #[validate(length(min = 1, message = "Trace ID cannot be empty"))]
    pub trace_id: String,
    /// Spans to patch.
    pub spans: Vec<Span>,
}

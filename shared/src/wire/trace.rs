//! Cloud Trace v1 wire format and span id conversion.

use crate::models::{Span, Trace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Span kind name for server spans.
pub const RPC_SERVER: &str = "RPC_SERVER";
/// Span kind name for client spans.
pub const RPC_CLIENT: &str = "RPC_CLIENT";
/// Generic span kind name for everything else.
pub const UNSPECIFIED: &str = "UNSPECIFIED";

/// `google.devtools.cloudtrace.v1.TraceSpan.SpanKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// Unspecified.
    Unspecified,
    /// Handling of an incoming request.
    RpcServer,
    /// Issuing of an outgoing request.
    RpcClient,
}

impl SpanKind {
    /// Returns the JSON name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "SPAN_KIND_UNSPECIFIED",
            Self::RpcServer => RPC_SERVER,
            Self::RpcClient => RPC_CLIENT,
        }
    }
}

/// Maps a generic span kind; anything but the two RPC kinds is unspecified.
#[must_use]
pub fn span_kind_to_wire(kind: &str) -> SpanKind {
    match kind {
        RPC_SERVER => SpanKind::RpcServer,
        RPC_CLIENT => SpanKind::RpcClient,
        _ => SpanKind::Unspecified,
    }
}

/// Maps a provider span kind name back to a generic kind.
#[must_use]
pub fn span_kind_from_wire(kind: &str) -> &'static str {
    match kind {
        RPC_SERVER => RPC_SERVER,
        RPC_CLIENT => RPC_CLIENT,
        _ => UNSPECIFIED,
    }
}

/// Converts a generic span id into the provider's 64-bit id.
///
/// The provider expects an integer while callers use free-form strings, so
/// the id is hashed (`h = h * 31 + c` over Unicode scalar values, wrapping).
/// This is lossy: reading the span back yields [`format_span_id`] of the
/// hash, never the original string, and distinct ids may collide. The empty
/// string maps to 0, which the provider treats as "no id".
#[must_use]
pub fn encode_span_id(span_id: &str) -> u64 {
    span_id
        .chars()
        .fold(0u64, |hash, c| hash.wrapping_mul(31).wrapping_add(u64::from(c)))
}

/// Renders a provider span id as 16 lowercase hex digits; 0 renders as "".
#[must_use]
pub fn format_span_id(span_id: u64) -> String {
    if span_id == 0 {
        String::new()
    } else {
        format!("{span_id:016x}")
    }
}

/// `uint64` fields travel as decimal strings in JSON.
mod decimal_u64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Number(u64),
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Text(text) if text.is_empty() => Ok(0),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
            Repr::Number(n) => Ok(n),
        }
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// A span on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSpan {
    /// Span id, unique within the trace.
    #[serde(with = "decimal_u64", default)]
    pub span_id: u64,
    /// Span kind name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    /// Span name.
    #[serde(default)]
    pub name: String,
    /// Start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// End time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Parent span id; 0 for root spans.
    #[serde(with = "decimal_u64", default, skip_serializing_if = "is_zero")]
    pub parent_span_id: u64,
    /// Span labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// A trace on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTrace {
    /// Project id.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project_id: String,
    /// Trace id.
    pub trace_id: String,
    /// Spans.
    #[serde(default)]
    pub spans: Vec<TraceSpan>,
}

/// Body of `traces.patch`.
#[derive(Debug, Clone, Serialize)]
pub struct Traces {
    /// Traces to patch.
    pub traces: Vec<WireTrace>,
}

/// Response of `traces.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTracesResponse {
    /// Traces in the page.
    #[serde(default)]
    pub traces: Vec<WireTrace>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page_token: String,
}

/// Translates a generic span for patching.
#[must_use]
pub fn span_to_wire(span: &Span) -> TraceSpan {
    TraceSpan {
        span_id: encode_span_id(&span.span_id),
        kind: span_kind_to_wire(&span.kind).as_str().to_string(),
        name: span.name.clone(),
        start_time: Some(span.start_time),
        end_time: Some(span.end_time),
        parent_span_id: span.parent_id.as_deref().map_or(0, encode_span_id),
        labels: span.labels.clone(),
    }
}

/// Translates a provider span back to the generic model.
#[must_use]
pub fn span_from_wire(span: TraceSpan) -> Span {
    let parent_id = (span.parent_span_id != 0).then(|| format_span_id(span.parent_span_id));

    Span {
        span_id: format_span_id(span.span_id),
        name: span.name,
        start_time: span.start_time.unwrap_or_default(),
        end_time: span.end_time.unwrap_or_default(),
        parent_id,
        kind: span_kind_from_wire(&span.kind).to_string(),
        labels: span.labels,
    }
}

/// Translates a provider trace, attributing it to `project_id`.
#[must_use]
pub fn trace_from_wire(trace: WireTrace, project_id: &str) -> Trace {
    Trace {
        trace_id: trace.trace_id,
        project_id: project_id.to_string(),
        spans: trace.spans.into_iter().map(span_from_wire).collect(),
    }
}

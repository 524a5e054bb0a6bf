//! The tool catalogue served by `GET /api/v1/tools`.

use serde::Serialize;

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON object.
    Object,
    /// A JSON array.
    Array,
}

/// One parameter of a tool.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ParamSpec {
    /// Argument key.
    pub name: &'static str,
    /// Expected JSON type.
    #[serde(rename = "type")]
    pub kind: ParamType,
    /// Whether the call fails without it.
    pub required: bool,
    /// Human-readable description.
    pub description: &'static str,
}

/// A tool and its parameters.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolSpec {
    /// Tool name, used in `POST /api/v1/tools/{name}`.
    pub name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// Accepted parameters.
    pub parameters: &'static [ParamSpec],
}

const fn required(name: &'static str, kind: ParamType, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: true,
        description,
    }
}

const fn optional(name: &'static str, kind: ParamType, description: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        kind,
        required: false,
        description,
    }
}

const DESCRIPTOR_FILTER: &str = "Monitoring filter over descriptors, e.g. \
    metric.type = starts_with(\"custom.googleapis.com/\"); empty lists all";

const PROFILE_TYPE: &str = "Profile type: CPU, WALL, HEAP, THREADS, CONTENTION, PEAK_HEAP or HEAP_ALLOC";

/// All tools, in catalogue order.
pub const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "write_log_entry",
        description: "Write a log entry to Cloud Logging",
        parameters: &[
            required("log_name", ParamType::String, "Log to write to, e.g. 'app'"),
            required("severity", ParamType::String, "DEBUG, INFO, WARNING, ERROR or CRITICAL; anything else is INFO"),
            required("message", ParamType::String, "Log message"),
            optional("labels", ParamType::Object, "String labels attached to the entry"),
            optional("payload", ParamType::Object, "Structured payload; replaces the message on the wire"),
        ],
    },
    ToolSpec {
        name: "list_log_entries",
        description: "List log entries from Cloud Logging, newest first",
        parameters: &[
            optional("filter", ParamType::String, "Logging filter, e.g. 'severity>=ERROR'"),
            optional("order_by", ParamType::String, "Sort order (default: 'timestamp desc')"),
            optional("limit", ParamType::Number, "Maximum entries to return (default: 50)"),
        ],
    },
    ToolSpec {
        name: "create_metric_descriptor",
        description: "Create a custom metric descriptor in Cloud Monitoring",
        parameters: &[
            required("type", ParamType::String, "Metric type, e.g. 'custom.googleapis.com/queue_depth'"),
            required("metric_kind", ParamType::String, "GAUGE, DELTA or CUMULATIVE; anything else is GAUGE"),
            required("value_type", ParamType::String, "BOOL, INT64, DOUBLE, STRING or DISTRIBUTION; anything else is DOUBLE"),
            required("description", ParamType::String, "Description of the metric"),
            optional("display_name", ParamType::String, "Display name of the metric"),
        ],
    },
    ToolSpec {
        name: "write_time_series",
        description: "Write one data point to Cloud Monitoring",
        parameters: &[
            required("metric_type", ParamType::String, "Metric type to write"),
            required("resource_type", ParamType::String, "Monitored resource type, e.g. 'global'"),
            required("value", ParamType::Number, "Point value"),
            optional("metric_labels", ParamType::Object, "String metric labels"),
            optional("timestamp", ParamType::String, "RFC 3339 point time (default: now)"),
        ],
    },
    ToolSpec {
        name: "list_time_series",
        description: "List one page of time series from Cloud Monitoring",
        parameters: &[
            required("filter", ParamType::String, "Monitoring filter, e.g. 'metric.type=\"custom.googleapis.com/queue_depth\"'"),
            required("start_time", ParamType::String, "RFC 3339 window start"),
            required("end_time", ParamType::String, "RFC 3339 window end"),
            optional("aggregation", ParamType::Object, "alignment_period, per_series_aligner, cross_series_reducer, group_by_fields"),
            optional("page_size", ParamType::Number, "Maximum series to return (default: 100)"),
            optional("page_token", ParamType::String, "Cursor from a previous page"),
        ],
    },
    ToolSpec {
        name: "list_metric_descriptors",
        description: "List one page of metric descriptors from Cloud Monitoring",
        parameters: &[
            optional("filter", ParamType::String, DESCRIPTOR_FILTER),
            optional("page_size", ParamType::Number, "Maximum descriptors to return (default: 5)"),
            optional("page_token", ParamType::String, "Cursor from a previous page"),
        ],
    },
    ToolSpec {
        name: "delete_metric_descriptor",
        description: "Delete a custom metric descriptor from Cloud Monitoring",
        parameters: &[required("metric_type", ParamType::String, "Metric type to delete")],
    },
    ToolSpec {
        name: "list_available_metrics",
        description: "List metrics with their label schema, unit and launch stage",
        parameters: &[
            optional("filter", ParamType::String, DESCRIPTOR_FILTER),
            optional("page_size", ParamType::Number, "Maximum metrics to return (default: 100)"),
            optional("page_token", ParamType::String, "Cursor from a previous page"),
        ],
    },
    ToolSpec {
        name: "list_traces",
        description: "List traces from Cloud Trace",
        parameters: &[
            required("start_time", ParamType::String, "RFC 3339 window start"),
            required("end_time", ParamType::String, "RFC 3339 window end"),
            optional("filter", ParamType::String, "Trace filter, e.g. 'root:/checkout latency:500ms'"),
            optional("order_by", ParamType::String, "Sort order, e.g. 'start desc'"),
            optional("page_size", ParamType::Number, "Maximum traces to return (default: 100)"),
            optional("page_token", ParamType::String, "Cursor from a previous page"),
        ],
    },
    ToolSpec {
        name: "get_trace",
        description: "Get one trace from Cloud Trace",
        parameters: &[required("trace_id", ParamType::String, "Trace id")],
    },
    ToolSpec {
        name: "patch_traces",
        description: "Add or replace spans of one trace in Cloud Trace",
        parameters: &[
            required("trace_id", ParamType::String, "Trace id"),
            required("spans", ParamType::Array, "Span objects: span_id, name, parent_id, kind, start_time, end_time, labels"),
        ],
    },
    ToolSpec {
        name: "create_profile",
        description: "Create an online profile in Cloud Profiler",
        parameters: &[
            required("target", ParamType::String, "Deployment target, usually the service name"),
            required("profile_type", ParamType::String, PROFILE_TYPE),
            optional("duration", ParamType::String, "Profile duration (default: '60s')"),
            optional("labels", ParamType::Object, "String labels for the profile and deployment"),
        ],
    },
    ToolSpec {
        name: "create_offline_profile",
        description: "Upload a profile collected out of band to Cloud Profiler",
        parameters: &[
            required("target", ParamType::String, "Deployment target, usually the service name"),
            required("profile_type", ParamType::String, PROFILE_TYPE),
            required("profile_data", ParamType::String, "Base64-encoded gzip pprof data"),
            optional("duration", ParamType::String, "Profile duration (default: '60s')"),
            optional("labels", ParamType::Object, "String labels for the profile and deployment"),
        ],
    },
    ToolSpec {
        name: "update_profile",
        description: "Update a profile in Cloud Profiler",
        parameters: &[
            required("profile_name", ParamType::String, "Profile resource name"),
            optional("profile_data", ParamType::String, "Replacement base64-encoded profile data"),
            optional("labels", ParamType::Object, "Replacement labels"),
            optional("update_mask", ParamType::String, "Fields to update, e.g. 'labels,profile_bytes'"),
        ],
    },
    ToolSpec {
        name: "list_profiles",
        description: "List profiles from Cloud Profiler",
        parameters: &[
            optional("page_size", ParamType::Number, "Maximum profiles to return (default: 100)"),
            optional("page_token", ParamType::String, "Cursor from a previous page"),
        ],
    },
];

/// Looks up a tool by name.
#[must_use]
pub fn find(name: &str) -> Option<&'static ToolSpec> {
    TOOLS.iter().find(|tool| tool.name == name)
}

//! Trace tools.

use super::args::{string_map, timestamp_or_now};
use super::{Args, ToolError, ToolResult};
use crate::state::AppState;
use serde_json::{Map, Value};
use shared::models::{GetTraceRequest, ListTracesRequest, PatchTraceRequest, Span};

pub(super) async fn list_traces(state: &AppState, args: &Args) -> ToolResult {
    let start_time = args.require_timestamp("start_time")?;
    let end_time = args.require_timestamp("end_time")?;

    let mut request = ListTracesRequest::new(start_time, end_time);
    request.filter = args.str_or_default("filter");
    request.order_by = args.str_or_default("order_by");
    request.page_size = args.positive_i64("page_size");
    request.page_token = args.str_or_default("page_token");

    let traces = state
        .trace()
        .list_traces(request)
        .await
        .map_err(ToolError::failed("list traces"))?;

    tracing::debug!(count = traces.len(), "Listed traces");
    Ok(serde_json::to_value(traces)?)
}

pub(super) async fn get_trace(state: &AppState, args: &Args) -> ToolResult {
    let trace_id = args.require_str("trace_id")?;

    let trace = state
        .trace()
        .get_trace(GetTraceRequest { trace_id })
        .await
        .map_err(ToolError::failed("get trace"))?;

    Ok(serde_json::to_value(trace)?)
}

pub(super) async fn patch_traces(state: &AppState, args: &Args) -> ToolResult {
    let trace_id = args.require_str("trace_id")?;
    let spans = match args.get("spans") {
        None => return Err(ToolError::required("spans")),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_object)
            .map(span)
            .collect(),
        Some(_) => return Err(ToolError::invalid("spans must be an array of span objects")),
    };

    state
        .trace()
        .patch_traces(PatchTraceRequest { trace_id, spans })
        .await
        .map_err(ToolError::failed("patch traces"))?;

    Ok(Value::from("Trace spans updated successfully"))
}

/// Reads one span object. Unparseable times become now.
fn span(obj: &Map<String, Value>) -> Span {
    let text = |key: &str| obj.get(key).and_then(Value::as_str).map(str::to_string);

    Span {
        span_id: text("span_id").unwrap_or_default(),
        name: text("name").unwrap_or_default(),
        start_time: timestamp_or_now(obj.get("start_time")),
        end_time: timestamp_or_now(obj.get("end_time")),
        parent_id: text("parent_id").filter(|p| !p.is_empty()),
        kind: text("kind").unwrap_or_default(),
        labels: string_map(obj.get("labels")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> Args {
        Args::from_value(value).unwrap()
    }

    #[test]
    fn test_span_parsing() {
        let obj = json!({
            "span_id": "abc",
            "name": "GET /cart",
            "parent_id": "",
            "kind": "RPC_SERVER",
            "start_time": "2024-01-01T00:00:00Z",
            "end_time": "2024-01-01T00:00:02Z",
            "labels": {"http.status": "200", "retries": 1}
        });
        let span = span(obj.as_object().unwrap());

        assert_eq!(span.span_id, "abc");
        assert_eq!(span.parent_id, None);
        assert_eq!(span.kind, "RPC_SERVER");
        assert_eq!((span.end_time - span.start_time).num_seconds(), 2);
        assert_eq!(span.labels.len(), 1);
    }

    #[tokio::test]
    async fn test_patch_then_get_shows_hashed_span_id() {
        let state = AppState::default();

        patch_traces(
            &state,
            &args(json!({
                "trace_id": "4bf92f3577b34da6a3ce929d0e0e4736",
                "spans": [{"span_id": "abc", "name": "root"}]
            })),
        )
        .await
        .unwrap();

        let trace = get_trace(
            &state,
            &args(json!({"trace_id": "4bf92f3577b34da6a3ce929d0e0e4736"})),
        )
        .await
        .unwrap();

        assert_eq!(trace["project_id"], "local-project");
        assert_eq!(trace["spans"][0]["span_id"], "0000000000017862");
        assert_eq!(trace["spans"][0]["name"], "root");
    }

    #[tokio::test]
    async fn test_patch_requires_span_array() {
        let state = AppState::default();

        let err = patch_traces(&state, &args(json!({"trace_id": "t1"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "spans is required");

        let err = patch_traces(&state, &args(json!({"trace_id": "t1", "spans": {"span_id": "1"}})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "spans must be an array of span objects");
    }

    #[tokio::test]
    async fn test_list_traces_requires_window() {
        let state = AppState::default();

        let err = list_traces(&state, &args(json!({"start_time": "2024-01-01T00:00:00Z"})))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "end_time is required");

        let listed = list_traces(
            &state,
            &args(json!({
                "start_time": "2024-01-01T00:00:00Z",
                "end_time": "2024-01-02T00:00:00Z"
            })),
        )
        .await
        .unwrap();
        assert!(listed.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_trace() {
        let state = AppState::default();

        let err = get_trace(&state, &args(json!({"trace_id": "missing"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "provider_error");
        assert!(err.to_string().starts_with("Failed to get trace"));
    }
}

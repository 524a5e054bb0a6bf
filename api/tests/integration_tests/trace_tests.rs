//! Integration tests for the trace tools.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{call_tool, test_app, TEST_PROJECT};

const TRACE_ID: &str = "4bf92f3577b34da6a3ce929d0e0e4736";

#[tokio::test]
async fn test_patch_then_get_shows_hashed_span_ids() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app.clone(),
        "patch_traces",
        json!({
            "trace_id": TRACE_ID,
            "spans": [
                {
                    "span_id": "abc",
                    "name": "GET /cart",
                    "kind": "RPC_SERVER",
                    "start_time": "2024-06-01T12:00:00Z",
                    "end_time": "2024-06-01T12:00:01Z"
                },
                {
                    "span_id": "def",
                    "name": "SELECT cart",
                    "parent_id": "abc",
                    "kind": "RPC_CLIENT",
                    "start_time": "2024-06-01T12:00:00Z",
                    "end_time": "2024-06-01T12:00:00.5Z",
                    "labels": {"db.system": "postgres"}
                }
            ]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"], "Trace spans updated successfully");

    let (status, response) = call_tool(app, "get_trace", json!({"trace_id": TRACE_ID})).await;
    assert_eq!(status, StatusCode::OK);

    let trace = &response["result"];
    assert_eq!(trace["trace_id"], TRACE_ID);
    assert_eq!(trace["project_id"], TEST_PROJECT);

    let spans = trace["spans"].as_array().unwrap();
    assert_eq!(spans.len(), 2);
    let root = spans.iter().find(|s| s["name"] == "GET /cart").unwrap();
    assert_eq!(root["span_id"], "0000000000017862");
    assert_ne!(root["span_id"], "abc");

    let child = spans.iter().find(|s| s["name"] == "SELECT cart").unwrap();
    assert_eq!(child["parent_id"], "0000000000017862");
    assert_eq!(child["kind"], "RPC_CLIENT");
    assert_eq!(child["labels"]["db.system"], "postgres");
}

#[tokio::test]
async fn test_list_traces_in_window() {
    let (app, _state) = test_app();

    call_tool(
        app.clone(),
        "patch_traces",
        json!({
            "trace_id": TRACE_ID,
            "spans": [{
                "span_id": "1",
                "name": "root",
                "start_time": "2024-06-01T12:00:00Z",
                "end_time": "2024-06-01T12:00:01Z"
            }]
        }),
    )
    .await;

    let (status, response) = call_tool(
        app.clone(),
        "list_traces",
        json!({"start_time": "2024-06-01T00:00:00Z", "end_time": "2024-06-02T00:00:00Z"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"].as_array().unwrap().len(), 1);

    let (_, response) = call_tool(
        app,
        "list_traces",
        json!({"start_time": "2024-07-01T00:00:00Z", "end_time": "2024-07-02T00:00:00Z"}),
    )
    .await;
    assert!(response["result"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_missing_trace_is_bad_gateway() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(app, "get_trace", json!({"trace_id": TRACE_ID})).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "provider_error");
}

#[tokio::test]
async fn test_patch_rejects_non_array_spans() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app,
        "patch_traces",
        json!({"trace_id": TRACE_ID, "spans": "abc"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "spans must be an array of span objects");
}

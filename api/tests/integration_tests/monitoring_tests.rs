//! Integration tests for the monitoring tools.

use axum::http::StatusCode;
use serde_json::{json, Value};

use super::common::{call_tool, test_app};

const QUEUE_DEPTH: &str = "custom.googleapis.com/queue_depth";

fn descriptor(metric_type: &str) -> Value {
    json!({
        "type": metric_type,
        "metric_kind": "GAUGE",
        "value_type": "DOUBLE",
        "description": "Jobs waiting",
        "display_name": "Queue depth"
    })
}

#[tokio::test]
async fn test_delete_descriptor_then_list_excludes_it() {
    let (app, _state) = test_app();

    let (status, _) = call_tool(app.clone(), "create_metric_descriptor", descriptor(QUEUE_DEPTH)).await;
    assert_eq!(status, StatusCode::OK);
    call_tool(
        app.clone(),
        "create_metric_descriptor",
        descriptor("custom.googleapis.com/latency"),
    )
    .await;

    let (status, response) = call_tool(
        app.clone(),
        "delete_metric_descriptor",
        json!({"metric_type": QUEUE_DEPTH}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"], "Metric descriptor deleted successfully");

    let (_, response) = call_tool(app, "list_metric_descriptors", json!({})).await;
    let types: Vec<&str> = response["result"]["descriptors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["custom.googleapis.com/latency"]);
}

#[tokio::test]
async fn test_descriptor_pages_default_to_five() {
    let (app, _state) = test_app();

    for i in 0..7 {
        call_tool(
            app.clone(),
            "create_metric_descriptor",
            descriptor(&format!("custom.googleapis.com/m{i}")),
        )
        .await;
    }

    let (_, response) = call_tool(app.clone(), "list_metric_descriptors", json!({})).await;
    assert_eq!(response["result"]["descriptors"].as_array().unwrap().len(), 5);
    let token = response["result"]["next_page_token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());

    let (_, response) = call_tool(
        app,
        "list_metric_descriptors",
        json!({"page_token": token}),
    )
    .await;
    assert_eq!(response["result"]["descriptors"].as_array().unwrap().len(), 2);
    assert!(response["result"].get("next_page_token").is_none());
}

#[tokio::test]
async fn test_list_time_series_respects_page_size() {
    let (app, _state) = test_app();

    for env in ["prod", "staging", "dev"] {
        call_tool(
            app.clone(),
            "write_time_series",
            json!({
                "metric_type": QUEUE_DEPTH,
                "resource_type": "global",
                "value": 3,
                "metric_labels": {"env": env},
                "timestamp": "2024-06-01T12:00:00Z"
            }),
        )
        .await;
    }

    let (status, response) = call_tool(
        app,
        "list_time_series",
        json!({
            "filter": format!("metric.type=\"{QUEUE_DEPTH}\""),
            "start_time": "2024-06-01T00:00:00Z",
            "end_time": "2024-06-02T00:00:00Z",
            "page_size": 2
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"]["time_series"].as_array().unwrap().len(), 2);
    assert!(!response["result"]["next_page_token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_alignment_period_is_not_an_error() {
    let (app, _state) = test_app();

    let (status, _) = call_tool(
        app,
        "list_time_series",
        json!({
            "filter": format!("metric.type=\"{QUEUE_DEPTH}\""),
            "start_time": "2024-06-01T00:00:00Z",
            "end_time": "2024-06-02T00:00:00Z",
            "aggregation": {"alignment_period": "not-a-duration", "per_series_aligner": "ALIGN_MEAN"}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_list_time_series_rejects_bad_timestamp() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app,
        "list_time_series",
        json!({
            "filter": "metric.type=\"x\"",
            "start_time": "2024-06-01T00:00:00Z",
            "end_time": "tomorrow"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid end_time format"));
}

#[tokio::test]
async fn test_available_metrics_include_schema() {
    let (app, _state) = test_app();

    call_tool(app.clone(), "create_metric_descriptor", descriptor(QUEUE_DEPTH)).await;

    let (status, response) = call_tool(
        app,
        "list_available_metrics",
        json!({"filter": "metric.type = starts_with(\"custom.googleapis.com/\")"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let metrics = response["result"]["metrics"].as_array().unwrap();
    assert_eq!(metrics.len(), 1);
    assert_eq!(metrics[0]["type"], QUEUE_DEPTH);
    assert_eq!(metrics[0]["display_name"], "Queue depth");
    assert_eq!(metrics[0]["metric_kind"], "GAUGE");
}

#[tokio::test]
async fn test_delete_missing_descriptor_is_bad_gateway() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app,
        "delete_metric_descriptor",
        json!({"metric_type": QUEUE_DEPTH}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "provider_error");
}

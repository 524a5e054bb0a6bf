//! Integration tests for the tool catalogue and the call envelope.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{call_tool, get, post_json, test_app};

#[tokio::test]
async fn test_catalogue_lists_every_tool() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/v1/tools").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = response["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "write_log_entry",
            "list_log_entries",
            "create_metric_descriptor",
            "write_time_series",
            "list_time_series",
            "list_metric_descriptors",
            "delete_metric_descriptor",
            "list_available_metrics",
            "list_traces",
            "get_trace",
            "patch_traces",
            "create_profile",
            "create_offline_profile",
            "update_profile",
            "list_profiles",
        ]
    );
}

#[tokio::test]
async fn test_catalogue_describes_parameters() {
    let (app, _state) = test_app();

    let (_, response) = get(app, "/api/v1/tools").await;
    let write_log = &response["tools"][0];
    let params = write_log["parameters"].as_array().unwrap();

    let log_name = params.iter().find(|p| p["name"] == "log_name").unwrap();
    assert_eq!(log_name["type"], "string");
    assert_eq!(log_name["required"], true);

    let labels = params.iter().find(|p| p["name"] == "labels").unwrap();
    assert_eq!(labels["type"], "object");
    assert_eq!(labels["required"], false);
}

#[tokio::test]
async fn test_unknown_tool_returns_404() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(app, "drop_everything", json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "unknown_tool");
    assert_eq!(response["message"], "Unknown tool: drop_everything");
}

#[tokio::test]
async fn test_missing_required_argument_returns_400() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(app, "get_trace", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_arguments");
    assert_eq!(response["message"], "trace_id is required");
}

#[tokio::test]
async fn test_non_object_arguments_return_400() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, "/api/v1/tools/list_profiles", json!([1, 2])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_arguments");
}

#[tokio::test]
async fn test_null_arguments_mean_no_arguments() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app, "/api/v1/tools/list_profiles", json!(null)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["tool"], "list_profiles");
}

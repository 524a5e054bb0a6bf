//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Empty provider behavior

use axum::http::StatusCode;
use serde_json::json;

use super::common::{call_tool, get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert!(response["version"].is_string());
}

#[tokio::test]
async fn test_empty_providers_return_empty_results() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(app.clone(), "list_log_entries", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["result"].as_array().unwrap().is_empty());

    let (status, response) = call_tool(app.clone(), "list_metric_descriptors", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["result"]["descriptors"].as_array().unwrap().is_empty());

    let (status, response) = call_tool(app, "list_profiles", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(response["result"]["profiles"].as_array().unwrap().is_empty());
}

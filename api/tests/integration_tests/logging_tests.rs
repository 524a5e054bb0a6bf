//! Integration tests for the logging tools.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{call_tool, test_app};

#[tokio::test]
async fn test_write_then_list_by_severity() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app.clone(),
        "write_log_entry",
        json!({"log_name": "checkout", "severity": "ERROR", "message": "boom"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"], "Log entry written successfully");

    call_tool(
        app.clone(),
        "write_log_entry",
        json!({"log_name": "checkout", "severity": "DEBUG", "message": "noise"}),
    )
    .await;

    let (status, response) = call_tool(
        app,
        "list_log_entries",
        json!({"filter": "severity>=ERROR"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entries = response["result"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["severity"], "ERROR");
    assert_eq!(entries[0]["message"], "boom");
}

#[tokio::test]
async fn test_unknown_severity_is_stored_as_info() {
    let (app, _state) = test_app();

    call_tool(
        app.clone(),
        "write_log_entry",
        json!({"log_name": "app", "severity": "LOUD", "message": "hello"}),
    )
    .await;

    let (_, response) = call_tool(app, "list_log_entries", json!({})).await;
    assert_eq!(response["result"][0]["severity"], "INFO");
}

#[tokio::test]
async fn test_payload_round_trips() {
    let (app, _state) = test_app();

    call_tool(
        app.clone(),
        "write_log_entry",
        json!({
            "log_name": "orders",
            "severity": "WARNING",
            "message": "ignored on the wire",
            "payload": {"message": "order delayed", "order_id": 42}
        }),
    )
    .await;

    let (_, response) = call_tool(app, "list_log_entries", json!({})).await;
    let entry = &response["result"][0];
    assert_eq!(entry["message"], "order delayed");
    assert_eq!(entry["payload"]["order_id"], 42);
}

#[tokio::test]
async fn test_list_default_limit_is_fifty() {
    let (app, _state) = test_app();

    for i in 0..60 {
        call_tool(
            app.clone(),
            "write_log_entry",
            json!({"log_name": "bulk", "severity": "INFO", "message": format!("m{i}")}),
        )
        .await;
    }

    let (_, response) = call_tool(app.clone(), "list_log_entries", json!({})).await;
    assert_eq!(response["result"].as_array().unwrap().len(), 50);

    let (_, response) = call_tool(app, "list_log_entries", json!({"limit": 5})).await;
    assert_eq!(response["result"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_write_requires_log_name() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app,
        "write_log_entry",
        json!({"severity": "INFO", "message": "hello"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["message"], "log_name is required");
}

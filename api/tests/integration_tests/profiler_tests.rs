//! Integration tests for the profiler tools.

use axum::http::StatusCode;
use serde_json::json;

use super::common::{call_tool, test_app, TEST_PROJECT};

#[tokio::test]
async fn test_profile_lifecycle() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app.clone(),
        "create_profile",
        json!({"target": "checkout", "profile_type": "CPU"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created = &response["result"];
    assert_eq!(created["profile_type"], "CPU");
    assert_eq!(created["duration"], "60s");
    assert_eq!(created["deployment"]["project_id"], TEST_PROJECT);
    let name = created["name"].as_str().unwrap().to_string();
    assert!(name.starts_with(&format!("projects/{TEST_PROJECT}/profiles/")));

    let (status, response) = call_tool(
        app.clone(),
        "update_profile",
        json!({
            "profile_name": name,
            "profile_data": "aGVhcA==",
            "update_mask": "profile_bytes"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"]["profile_bytes"], "aGVhcA==");

    call_tool(
        app.clone(),
        "create_offline_profile",
        json!({
            "target": "checkout",
            "profile_type": "HEAP",
            "profile_data": "aGVhcA==",
            "labels": {"version": "1.4.2"}
        }),
    )
    .await;

    let (status, response) = call_tool(app.clone(), "list_profiles", json!({"page_size": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["result"]["profiles"].as_array().unwrap().len(), 1);
    let token = response["result"]["next_page_token"].as_str().unwrap().to_string();

    let (_, response) = call_tool(app, "list_profiles", json!({"page_token": token})).await;
    let profiles = response["result"]["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["profile_type"], "HEAP");
    assert_eq!(profiles[0]["labels"]["version"], "1.4.2");
}

#[tokio::test]
async fn test_offline_profile_rejects_bad_base64() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app,
        "create_offline_profile",
        json!({"target": "checkout", "profile_type": "CPU", "profile_data": "not base64!"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_arguments");
}

#[tokio::test]
async fn test_update_unknown_profile_is_bad_gateway() {
    let (app, _state) = test_app();

    let (status, response) = call_tool(
        app,
        "update_profile",
        json!({"profile_name": "projects/test-project/profiles/99"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(response["error"], "provider_error");
}

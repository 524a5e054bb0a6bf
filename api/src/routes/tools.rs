//! Tool catalogue and invocation endpoints.

use crate::state::AppState;
use crate::tools::{self, Args, ToolError, ToolSpec};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;

/// Response for `GET /api/v1/tools`.
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    /// All tools.
    pub tools: &'static [ToolSpec],
}

/// Successful tool call.
#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    /// Tool that ran.
    pub tool: String,
    /// Generic response document, or a confirmation message.
    pub result: Value,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ToolCallError {
    /// Error kind: `invalid_json`, `invalid_arguments`, `unknown_tool`,
    /// `provider_error` or `internal_error`.
    pub error: String,
    /// Detailed error message.
    pub message: String,
}

impl From<ToolError> for (StatusCode, Json<ToolCallError>) {
    fn from(err: ToolError) -> Self {
        (
            err.status(),
            Json(ToolCallError {
                error: err.kind().to_string(),
                message: err.to_string(),
            }),
        )
    }
}

/// Creates the tool routes.
pub fn tools_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/tools", get(list_tools))
        .route("/api/v1/tools/{name}", post(call_tool))
        .with_state(state)
}

async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse { tools: tools::TOOLS })
}

async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ToolCallResponse>, (StatusCode, Json<ToolCallError>)> {
    if tools::find(&name).is_none() {
        return Err(ToolError::UnknownTool(name).into());
    }

    let Json(body) = payload.map_err(|rejection| {
        (
            StatusCode::BAD_REQUEST,
            Json(ToolCallError {
                error: "invalid_json".to_string(),
                message: rejection.body_text(),
            }),
        )
    })?;
    let args = Args::from_value(body)?;

    let result = tools::dispatch(&state, &name, &args).await?;
    tracing::info!(tool = %name, "Tool call completed");

    Ok(Json(ToolCallResponse { tool: name, result }))
}

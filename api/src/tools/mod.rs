//! Tool dispatch.
//!
//! Every provider operation is exposed as a named tool taking a JSON argument
//! object. [`dispatch`] parses the arguments, calls the matching client on
//! [`AppState`] and returns the result as JSON.

mod args;
mod catalogue;
mod logging;
mod monitoring;
mod profiler;
mod trace;

pub use args::Args;
pub use catalogue::{find, ParamSpec, ParamType, ToolSpec, TOOLS};

use crate::state::AppState;
use axum::http::StatusCode;
use serde_json::Value;
use shared::ProviderError;
use thiserror::Error;

/// Result of a tool call: a JSON document or a plain confirmation string.
pub type ToolResult = Result<Value, ToolError>;

/// Errors that can occur while serving a tool call.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool has this name.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// An argument is missing or malformed.
    #[error("{0}")]
    InvalidArguments(String),

    /// The provider call failed.
    #[error("Failed to {action}: {source}")]
    Provider {
        /// What the tool was doing, e.g. `list traces`.
        action: &'static str,
        /// The provider error.
        source: ProviderError,
    },

    /// The result could not be rendered as JSON.
    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ToolError {
    /// Creates an invalid arguments error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Creates the error for a missing required argument.
    #[must_use]
    pub fn required(name: &str) -> Self {
        Self::InvalidArguments(format!("{name} is required"))
    }

    /// Returns a mapper wrapping a provider error with the failed action.
    pub fn failed(action: &'static str) -> impl FnOnce(ProviderError) -> Self {
        move |source| Self::Provider { action, source }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownTool(_) => StatusCode::NOT_FOUND,
            Self::InvalidArguments(_) => StatusCode::BAD_REQUEST,
            Self::Provider { source, .. } if source.is_input_error() => StatusCode::BAD_REQUEST,
            Self::Provider { .. } => StatusCode::BAD_GATEWAY,
            Self::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable error kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool(_) => "unknown_tool",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::Provider { source, .. } if source.is_input_error() => "invalid_arguments",
            Self::Provider { .. } => "provider_error",
            Self::Encode(_) => "internal_error",
        }
    }
}

/// Runs the tool `name` with `args` against the clients in `state`.
///
/// # Errors
///
/// Returns [`ToolError::UnknownTool`] for names outside [`TOOLS`], otherwise
/// whatever the tool itself returns.
pub async fn dispatch(state: &AppState, name: &str, args: &Args) -> ToolResult {
    tracing::debug!(tool = name, "Dispatching tool call");

    let result = match name {
        "write_log_entry" => logging::write_log_entry(state, args).await,
        "list_log_entries" => logging::list_log_entries(state, args).await,
        "create_metric_descriptor" => monitoring::create_metric_descriptor(state, args).await,
        "write_time_series" => monitoring::write_time_series(state, args).await,
        "list_time_series" => monitoring::list_time_series(state, args).await,
        "list_metric_descriptors" => monitoring::list_metric_descriptors(state, args).await,
        "delete_metric_descriptor" => monitoring::delete_metric_descriptor(state, args).await,
        "list_available_metrics" => monitoring::list_available_metrics(state, args).await,
        "list_traces" => trace::list_traces(state, args).await,
        "get_trace" => trace::get_trace(state, args).await,
        "patch_traces" => trace::patch_traces(state, args).await,
        "create_profile" => profiler::create_profile(state, args).await,
        "create_offline_profile" => profiler::create_offline_profile(state, args).await,
        "update_profile" => profiler::update_profile(state, args).await,
        "list_profiles" => profiler::list_profiles(state, args).await,
        _ => Err(ToolError::UnknownTool(name.to_string())),
    };

    if let Err(e @ ToolError::Provider { .. }) = &result {
        tracing::warn!(tool = name, error = %e, "Tool call failed");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_status_and_kind() {
        let err = ToolError::required("log_name");
        assert_eq!(err.to_string(), "log_name is required");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "invalid_arguments");

        let err = ToolError::UnknownTool("nope".to_string());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.kind(), "unknown_tool");
    }

    #[test]
    fn test_provider_error_mapping() {
        let err = ToolError::failed("get trace")(ProviderError::not_found("trace t1 not found"));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.kind(), "provider_error");
        assert!(err.to_string().starts_with("Failed to get trace: "));

        let err = ToolError::failed("write log entry")(ProviderError::invalid_argument("empty"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.kind(), "invalid_arguments");
    }

    #[tokio::test]
    async fn test_every_catalogued_tool_dispatches() {
        let state = AppState::default();
        let args = Args::from_value(json!({})).unwrap();

        for tool in TOOLS {
            let result = dispatch(&state, tool.name, &args).await;
            assert!(
                !matches!(result, Err(ToolError::UnknownTool(_))),
                "{} is not dispatched",
                tool.name
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let state = AppState::default();
        let result = dispatch(&state, "drop_database", &Args::default()).await;
        assert!(matches!(result, Err(ToolError::UnknownTool(name)) if name == "drop_database"));
    }
}

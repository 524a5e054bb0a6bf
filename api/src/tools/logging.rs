//! Logging tools.

use super::{Args, ToolError, ToolResult};
use crate::state::AppState;
use serde_json::Value;
use shared::models::{ListEntriesRequest, LogEntry};

pub(super) async fn write_log_entry(state: &AppState, args: &Args) -> ToolResult {
    let log_name = args.require_str("log_name")?;
    let severity = args.require_str("severity")?;
    let message = args.require_str("message")?;

    let mut entry = LogEntry::new(severity, message);
    entry.labels = args.labels("labels");
    if let Some(payload) = args.object("payload") {
        entry = entry.with_payload(payload.clone());
    }

    state
        .logging()
        .write_entry(&log_name, entry)
        .await
        .map_err(ToolError::failed("write log entry"))?;

    Ok(Value::from("Log entry written successfully"))
}

pub(super) async fn list_log_entries(state: &AppState, args: &Args) -> ToolResult {
    let mut request =
        ListEntriesRequest::with_filter(args.str_or_default("filter")).limit(args.positive_i64("limit"));
    request.order_by = args.str_or_default("order_by");

    let entries = state
        .logging()
        .list_entries(request)
        .await
        .map_err(ToolError::failed("list log entries"))?;

    tracing::debug!(count = entries.len(), "Listed log entries");
    Ok(serde_json::to_value(entries)?)
}

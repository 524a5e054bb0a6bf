//! Logging provider.

use crate::config::GcpConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::models::{ListEntriesRequest, LogEntry};
use crate::transport::{ApiClient, HttpTransport};
use crate::wire::logging::{
    entry_from_wire, entry_to_wire, log_name, ListEntriesBody, ListEntriesResponse,
    WriteEntriesRequest, GLOBAL_RESOURCE,
};
use crate::wire::{Empty, MonitoredResource};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Sort order used when the caller does not supply one.
pub const NEWEST_FIRST: &str = "timestamp desc";

/// Operations of the logging provider.
#[async_trait]
pub trait LoggingClient: Send + Sync {
    /// Writes one entry to the log `log_name` and waits for the provider to
    /// acknowledge it.
    ///
    /// # Errors
    ///
    /// Returns an error if `log_name` is empty or the provider rejects the write.
    async fn write_entry(&self, log_name: &str, entry: LogEntry) -> ProviderResult<()>;

    /// Lists entries matching the request's filter, newest first by default.
    ///
    /// Returns at most the effective limit (50 when not positive).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    async fn list_entries(&self, request: ListEntriesRequest) -> ProviderResult<Vec<LogEntry>>;
}

/// Public logging client.
///
/// Forwards every call to the wrapped implementation.
#[derive(Clone)]
pub struct CloudLogging {
    inner: Arc<dyn LoggingClient>,
}

impl CloudLogging {
    /// Creates a REST-backed client for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_client(Arc::new(RestLoggingClient::new(config, transport)))
    }

    /// Wraps an existing implementation.
    #[must_use]
    pub fn with_client(inner: Arc<dyn LoggingClient>) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for CloudLogging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudLogging").finish_non_exhaustive()
    }
}

#[async_trait]
impl LoggingClient for CloudLogging {
    async fn write_entry(&self, log_name: &str, entry: LogEntry) -> ProviderResult<()> {
        self.inner.write_entry(log_name, entry).await
    }

    async fn list_entries(&self, request: ListEntriesRequest) -> ProviderResult<Vec<LogEntry>> {
        self.inner.list_entries(request).await
    }
}

/// Cloud Logging v2 REST adapter.
#[derive(Debug, Clone)]
pub struct RestLoggingClient {
    api: ApiClient,
    project_id: String,
}

impl RestLoggingClient {
    /// Creates an adapter for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api: ApiClient::new(transport, config.logging_endpoint.clone()),
            project_id: config.project_id.clone(),
        }
    }
}

#[async_trait]
impl LoggingClient for RestLoggingClient {
    async fn write_entry(&self, name: &str, entry: LogEntry) -> ProviderResult<()> {
        if name.trim().is_empty() {
            return Err(ProviderError::invalid_argument("log_name is required"));
        }

        let full_name = log_name(&self.project_id, name);
        tracing::debug!(log_name = %full_name, severity = %entry.severity, "Writing log entry");

        let body = WriteEntriesRequest {
            log_name: full_name.clone(),
            resource: MonitoredResource::new(GLOBAL_RESOURCE),
            entries: vec![entry_to_wire(&full_name, &entry)],
        };
        let _: Empty = self.api.post("v2/entries:write", &[], &body).await?;
        Ok(())
    }

    async fn list_entries(&self, request: ListEntriesRequest) -> ProviderResult<Vec<LogEntry>> {
        let limit = request.effective_limit();
        let order_by = if request.order_by.is_empty() {
            NEWEST_FIRST.to_string()
        } else {
            request.order_by
        };

        tracing::debug!(filter = %request.filter, limit, "Listing log entries");

        let mut entries: Vec<LogEntry> = Vec::with_capacity(limit);
        let mut page_token = request.page_token;
        loop {
            let remaining = limit - entries.len();
            let body = ListEntriesBody {
                resource_names: vec![format!("projects/{}", self.project_id)],
                filter: request.filter.clone(),
                order_by: order_by.clone(),
                page_size: i32::try_from(remaining).unwrap_or(i32::MAX),
                page_token,
            };
            let response: ListEntriesResponse =
                self.api.post("v2/entries:list", &[], &body).await?;

            entries.extend(
                response
                    .entries
                    .into_iter()
                    .take(remaining)
                    .map(entry_from_wire),
            );

            // Pages may come back short, or empty, with a continuation token.
            if entries.len() >= limit || response.next_page_token.is_empty() {
                break;
            }
            page_token = response.next_page_token;
        }

        tracing::debug!(count = entries.len(), "Listed log entries");
        Ok(entries)
    }
}

/// A stored entry together with the log it was written to.
#[derive(Debug, Clone)]
struct StoredEntry {
    log_name: String,
    entry: LogEntry,
}

/// In-memory logging provider.
///
/// Entries go through the same wire translation as the REST adapter, so
/// severities and payloads read back the way the provider returns them.
/// Filters support `severity` comparisons, `logName="..."` and bare text
/// terms (matched against the message), joined with `AND`.
///
/// # Example
///
/// ```
/// use shared::models::{ListEntriesRequest, LogEntry};
/// use shared::providers::{InMemoryLogging, LoggingClient};
///
/// # tokio_test::block_on(async {
/// let logging = InMemoryLogging::new();
/// logging.write_entry("app", LogEntry::new("ERROR", "boom")).await.unwrap();
///
/// let entries = logging
///     .list_entries(ListEntriesRequest::with_filter("severity>=ERROR"))
///     .await
///     .unwrap();
/// assert_eq!(entries[0].message, "boom");
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLogging {
    entries: Arc<RwLock<Vec<StoredEntry>>>,
}

impl InMemoryLogging {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty provider wrapped in an `Arc`.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Returns the number of stored entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn len(&self) -> ProviderResult<usize> {
        Ok(self.entries.read().map_err(|_| ProviderError::LockError)?.len())
    }

    /// Returns `true` if nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn is_empty(&self) -> ProviderResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl LoggingClient for InMemoryLogging {
    async fn write_entry(&self, log_name: &str, entry: LogEntry) -> ProviderResult<()> {
        if log_name.trim().is_empty() {
            return Err(ProviderError::invalid_argument("log_name is required"));
        }

        let stored = StoredEntry {
            log_name: log_name.to_string(),
            entry: entry_from_wire(entry_to_wire(log_name, &entry)),
        };
        self.entries
            .write()
            .map_err(|_| ProviderError::LockError)?
            .push(stored);
        Ok(())
    }

    async fn list_entries(&self, request: ListEntriesRequest) -> ProviderResult<Vec<LogEntry>> {
        let filter = EntryFilter::parse(&request.filter);
        let entries = self.entries.read().map_err(|_| ProviderError::LockError)?;

        let mut matching: Vec<&StoredEntry> = entries.iter().filter(|e| filter.matches(e)).collect();
        if request.order_by.trim().eq_ignore_ascii_case("timestamp asc") {
            matching.sort_by_key(|e| e.entry.timestamp);
        } else {
            matching.sort_by_key(|e| std::cmp::Reverse(e.entry.timestamp));
        }

        Ok(matching
            .into_iter()
            .take(request.effective_limit())
            .map(|e| e.entry.clone())
            .collect())
    }
}

/// Numeric severity levels as the provider orders them.
fn severity_rank(severity: &str) -> u16 {
    match severity.to_ascii_uppercase().as_str() {
        "DEBUG" => 100,
        "INFO" => 200,
        "NOTICE" => 300,
        "WARNING" => 400,
        "ERROR" => 500,
        "CRITICAL" => 600,
        "ALERT" => 700,
        "EMERGENCY" => 800,
        _ => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Clause {
    Severity { op: &'static str, rank: u16 },
    LogName(String),
    Text(String),
}

#[derive(Debug, Default)]
struct EntryFilter {
    clauses: Vec<Clause>,
}

impl EntryFilter {
    const OPERATORS: [&'static str; 6] = [">=", "<=", "!=", "=", ">", "<"];

    fn parse(filter: &str) -> Self {
        let clauses = filter
            .split(" AND ")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(Self::parse_clause)
            .collect();
        Self { clauses }
    }

    fn parse_clause(clause: &str) -> Clause {
        for op in Self::OPERATORS {
            if let Some((field, value)) = clause.split_once(op) {
                let value = value.trim().trim_matches('"');
                match field.trim() {
                    "severity" => {
                        return Clause::Severity {
                            op,
                            rank: severity_rank(value),
                        }
                    }
                    "logName" => return Clause::LogName(value.to_string()),
                    _ => {}
                }
            }
        }
        Clause::Text(clause.trim_matches('"').to_string())
    }

    fn matches(&self, stored: &StoredEntry) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Severity { op, rank } => {
                let actual = severity_rank(&stored.entry.severity);
                match *op {
                    ">=" => actual >= *rank,
                    "<=" => actual <= *rank,
                    "!=" => actual != *rank,
                    ">" => actual > *rank,
                    "<" => actual < *rank,
                    _ => actual == *rank,
                }
            }
            Clause::LogName(name) => {
                name == &stored.log_name || name.ends_with(&format!("/logs/{}", stored.log_name))
            }
            Clause::Text(text) => stored.entry.message.contains(text.as_str()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;
    use crate::transport::HttpMethod;
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn rest_client() -> (Arc<ScriptedTransport>, RestLoggingClient) {
        let transport = Arc::new(ScriptedTransport::new());
        let config = GcpConfig::new("test-project").with_endpoint("https://logging.test");
        let client = RestLoggingClient::new(&config, transport.clone());
        (transport, client)
    }

    #[tokio::test]
    async fn test_write_entry_sends_text_payload() {
        let (transport, client) = rest_client();
        transport.push_json(200, &json!({}));

        client
            .write_entry("app", LogEntry::new("ERROR", "boom").with_label("svc", "api"))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url.as_str(), "https://logging.test/v2/entries:write");

        let body = request.body.unwrap();
        assert_eq!(body["logName"], "projects/test-project/logs/app");
        assert_eq!(body["resource"]["type"], "global");
        assert_eq!(body["entries"][0]["severity"], "ERROR");
        assert_eq!(body["entries"][0]["textPayload"], "boom");
        assert_eq!(body["entries"][0]["labels"]["svc"], "api");
    }

    #[tokio::test]
    async fn test_write_entry_unknown_severity_is_info() {
        let (transport, client) = rest_client();
        transport.push_empty(200);

        client
            .write_entry("app", LogEntry::new("FATAL", "x"))
            .await
            .unwrap();

        let body = transport.last_request().body.unwrap();
        assert_eq!(body["entries"][0]["severity"], "INFO");
    }

    #[tokio::test]
    async fn test_write_entry_requires_log_name() {
        let (transport, client) = rest_client();

        let err = client
            .write_entry(" ", LogEntry::new("INFO", "x"))
            .await
            .unwrap_err();

        assert!(err.is_input_error());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_write_entry_propagates_provider_error() {
        let (transport, client) = rest_client();
        transport.push_json(
            403,
            &json!({"error": {"code": 403, "message": "denied", "status": "PERMISSION_DENIED"}}),
        );

        let err = client
            .write_entry("app", LogEntry::new("INFO", "x"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 403, .. }));
        assert!(err.to_string().contains("denied"));
    }

    #[tokio::test]
    async fn test_list_entries_defaults() {
        let (transport, client) = rest_client();
        transport.push_json(200, &json!({}));

        let entries = client
            .list_entries(ListEntriesRequest::default().limit(0))
            .await
            .unwrap();
        assert!(entries.is_empty());

        let body = transport.last_request().body.unwrap();
        assert_eq!(body["pageSize"], 50);
        assert_eq!(body["orderBy"], "timestamp desc");
        assert_eq!(body["resourceNames"], json!(["projects/test-project"]));
        assert!(body.get("filter").is_none());
    }

    #[tokio::test]
    async fn test_list_entries_never_exceeds_limit() {
        let (transport, client) = rest_client();
        let entries: Vec<_> = (0..5)
            .map(|i| json!({"severity": "INFO", "textPayload": format!("m{i}")}))
            .collect();
        transport.push_json(200, &json!({"entries": entries, "nextPageToken": "more"}));

        let result = client
            .list_entries(ListEntriesRequest::with_filter("severity>=INFO").limit(3))
            .await
            .unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].message, "m0");
        assert_eq!(transport.last_request().body.unwrap()["pageSize"], 3);
    }

    #[tokio::test]
    async fn test_list_entries_follows_page_tokens_until_limit() {
        let (transport, client) = rest_client();
        transport.push_json(
            200,
            &json!({"entries": [{"severity": "INFO", "textPayload": "m0"}], "nextPageToken": "t"}),
        );
        transport.push_json(
            200,
            &json!({"entries": [
                {"severity": "INFO", "textPayload": "m1"},
                {"severity": "INFO", "textPayload": "m2"}
            ]}),
        );

        let result = client
            .list_entries(ListEntriesRequest::default().limit(3))
            .await
            .unwrap();

        let messages: Vec<_> = result.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["m0", "m1", "m2"]);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        let first = requests[0].body.clone().unwrap();
        assert_eq!(first["pageSize"], 3);
        assert!(first.get("pageToken").is_none());
        let second = requests[1].body.clone().unwrap();
        assert_eq!(second["pageSize"], 2);
        assert_eq!(second["pageToken"], "t");
    }

    #[tokio::test]
    async fn test_list_entries_skips_empty_pages_with_token() {
        let (transport, client) = rest_client();
        transport.push_json(200, &json!({"nextPageToken": "a"}));
        transport.push_json(
            200,
            &json!({"entries": [{"severity": "WARNING", "textPayload": "late"}], "nextPageToken": "b"}),
        );
        transport.push_json(200, &json!({}));

        let result = client
            .list_entries(ListEntriesRequest::default().limit(5))
            .await
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].message, "late");
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(transport.last_request().body.unwrap()["pageToken"], "b");
    }

    #[tokio::test]
    async fn test_list_entries_maps_payloads_and_severities() {
        let (transport, client) = rest_client();
        transport.push_json(
            200,
            &json!({"entries": [
                {"severity": "ERROR", "textPayload": "boom", "timestamp": "2024-01-01T00:00:00Z"},
                {"severity": "EMERGENCY", "jsonPayload": {"message": "structured", "code": 7}}
            ]}),
        );

        let result = client
            .list_entries(ListEntriesRequest::with_filter("severity>=ERROR"))
            .await
            .unwrap();

        assert_eq!(result[0].severity, "ERROR");
        assert_eq!(result[0].message, "boom");
        assert_eq!(result[1].severity, "INFO");
        assert_eq!(result[1].message, "structured");
        assert_eq!(result[1].payload.as_ref().unwrap()["code"], 7);
    }

    #[tokio::test]
    async fn test_cloud_logging_forwards_to_inner() {
        let inner = InMemoryLogging::new_shared();
        let client = CloudLogging::with_client(inner.clone());

        client
            .write_entry("app", LogEntry::new("DEBUG", "hello"))
            .await
            .unwrap();

        assert_eq!(inner.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_write_then_list_by_severity() {
        let logging = InMemoryLogging::new();
        logging
            .write_entry("app", LogEntry::new("INFO", "fine"))
            .await
            .unwrap();
        logging
            .write_entry("app", LogEntry::new("ERROR", "boom"))
            .await
            .unwrap();

        let entries = logging
            .list_entries(ListEntriesRequest::with_filter("severity>=ERROR"))
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].severity, "ERROR");
        assert_eq!(entries[0].message, "boom");
    }

    #[tokio::test]
    async fn test_in_memory_newest_first_and_limit() {
        let logging = InMemoryLogging::new();
        let base = Utc::now();
        for i in 0..60 {
            let entry = LogEntry::new("INFO", format!("m{i}")).with_timestamp(base + Duration::seconds(i));
            logging.write_entry("app", entry).await.unwrap();
        }

        let entries = logging.list_entries(ListEntriesRequest::default()).await.unwrap();

        assert_eq!(entries.len(), 50);
        assert_eq!(entries[0].message, "m59");
        assert_eq!(entries[49].message, "m10");
    }

    #[tokio::test]
    async fn test_in_memory_filter_by_log_name_and_text() {
        let logging = InMemoryLogging::new();
        logging
            .write_entry("app", LogEntry::new("INFO", "user login"))
            .await
            .unwrap();
        logging
            .write_entry("audit", LogEntry::new("INFO", "user login"))
            .await
            .unwrap();

        let entries = logging
            .list_entries(ListEntriesRequest::with_filter(
                r#"logName="projects/p/logs/audit" AND "login""#,
            ))
            .await
            .unwrap();

        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_filter_parsing() {
        let filter = EntryFilter::parse("severity>=WARNING AND timeout");
        assert_eq!(
            filter.clauses,
            vec![
                Clause::Severity { op: ">=", rank: 400 },
                Clause::Text("timeout".to_string())
            ]
        );
    }
}

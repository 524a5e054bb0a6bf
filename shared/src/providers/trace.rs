//! Trace provider.

use crate::config::GcpConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::models::{GetTraceRequest, ListTracesRequest, PatchTraceRequest, Trace};
use crate::transport::{ApiClient, HttpTransport};
use crate::wire::trace::{
    span_from_wire, span_to_wire, trace_from_wire, ListTracesResponse, TraceSpan, Traces,
    WireTrace,
};
use crate::wire::{page_size_param, Empty};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use validator::Validate;

/// View requested from `traces.list` so that spans are included.
const COMPLETE_VIEW: &str = "COMPLETE";

/// Operations of the trace provider.
#[async_trait]
pub trait TraceClient: Send + Sync {
    /// Lists traces in a time window, at most `page_size` (default 100).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    async fn list_traces(&self, request: ListTracesRequest) -> ProviderResult<Vec<Trace>>;

    /// Fetches one trace with all its spans.
    ///
    /// # Errors
    ///
    /// Returns an error if the trace id is empty or the provider call fails.
    async fn get_trace(&self, request: GetTraceRequest) -> ProviderResult<Trace>;

    /// Adds or replaces spans of one trace.
    ///
    /// Span ids are hashed to the provider's 64-bit ids; see
    /// [`crate::wire::trace::encode_span_id`].
    ///
    /// # Errors
    ///
    /// Returns an error if the trace id is empty or the provider call fails.
    async fn patch_traces(&self, request: PatchTraceRequest) -> ProviderResult<()>;
}

/// Public trace client.
#[derive(Clone)]
pub struct CloudTrace {
    inner: Arc<dyn TraceClient>,
}

impl CloudTrace {
    /// Creates a REST-backed client for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_client(Arc::new(RestTraceClient::new(config, transport)))
    }

    /// Wraps an existing implementation.
    #[must_use]
    pub fn with_client(inner: Arc<dyn TraceClient>) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for CloudTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudTrace").finish_non_exhaustive()
    }
}

#[async_trait]
impl TraceClient for CloudTrace {
    async fn list_traces(&self, request: ListTracesRequest) -> ProviderResult<Vec<Trace>> {
        self.inner.list_traces(request).await
    }

    async fn get_trace(&self, request: GetTraceRequest) -> ProviderResult<Trace> {
        self.inner.get_trace(request).await
    }

    async fn patch_traces(&self, request: PatchTraceRequest) -> ProviderResult<()> {
        self.inner.patch_traces(request).await
    }
}

/// Cloud Trace v1 REST adapter.
#[derive(Debug, Clone)]
pub struct RestTraceClient {
    api: ApiClient,
    project_id: String,
}

impl RestTraceClient {
    /// Creates an adapter for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api: ApiClient::new(transport, config.trace_endpoint.clone()),
            project_id: config.project_id.clone(),
        }
    }

    fn traces_path(&self) -> String {
        format!("v1/projects/{}/traces", self.project_id)
    }
}

#[async_trait]
impl TraceClient for RestTraceClient {
    async fn list_traces(&self, request: ListTracesRequest) -> ProviderResult<Vec<Trace>> {
        let page_size = request.effective_page_size();

        let mut query = vec![
            ("view", COMPLETE_VIEW.to_string()),
            ("pageSize", page_size_param(page_size)),
            ("startTime", request.start_time.to_rfc3339()),
            ("endTime", request.end_time.to_rfc3339()),
        ];
        if !request.filter.is_empty() {
            query.push(("filter", request.filter.clone()));
        }
        if !request.order_by.is_empty() {
            query.push(("orderBy", request.order_by.clone()));
        }
        if !request.page_token.is_empty() {
            query.push(("pageToken", request.page_token.clone()));
        }

        tracing::debug!(filter = %request.filter, page_size, "Listing traces");

        let page: ListTracesResponse = self.api.get(&self.traces_path(), &query).await?;
        let traces: Vec<Trace> = page
            .traces
            .into_iter()
            .take(page_size)
            .map(|t| trace_from_wire(t, &self.project_id))
            .collect();

        tracing::debug!(count = traces.len(), "Listed traces");
        Ok(traces)
    }

    async fn get_trace(&self, request: GetTraceRequest) -> ProviderResult<Trace> {
        request.validate()?;
        tracing::debug!(trace_id = %request.trace_id, "Fetching trace");

        let path = format!("{}/{}", self.traces_path(), request.trace_id);
        let trace: WireTrace = self.api.get(&path, &[]).await?;
        Ok(trace_from_wire(trace, &self.project_id))
    }

    async fn patch_traces(&self, request: PatchTraceRequest) -> ProviderResult<()> {
        request.validate()?;
        tracing::debug!(
            trace_id = %request.trace_id,
            spans = request.spans.len(),
            "Patching trace"
        );

        let body = Traces {
            traces: vec![WireTrace {
                project_id: self.project_id.clone(),
                trace_id: request.trace_id,
                spans: request.spans.iter().map(span_to_wire).collect(),
            }],
        };
        let _: Empty = self.api.patch(&self.traces_path(), &[], &body).await?;
        Ok(())
    }
}

/// In-memory trace provider.
///
/// Spans are stored in wire form, so ids read back hashed exactly as the
/// REST adapter reports them. A trace is listed when any of its spans
/// starts inside the window. Filters and sort order are ignored; traces are
/// listed by id.
#[derive(Debug, Default)]
pub struct InMemoryTrace {
    project_id: String,
    traces: Arc<RwLock<BTreeMap<String, Vec<TraceSpan>>>>,
}

impl InMemoryTrace {
    /// Creates an empty provider for `project_id`.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            traces: Arc::default(),
        }
    }

    fn to_trace(&self, trace_id: &str, spans: &[TraceSpan]) -> Trace {
        Trace {
            trace_id: trace_id.to_string(),
            project_id: self.project_id.clone(),
            spans: spans.iter().cloned().map(span_from_wire).collect(),
        }
    }
}

#[async_trait]
impl TraceClient for InMemoryTrace {
    async fn list_traces(&self, request: ListTracesRequest) -> ProviderResult<Vec<Trace>> {
        let traces = self.traces.read().map_err(|_| ProviderError::LockError)?;

        Ok(traces
            .iter()
            .filter(|(_, spans)| {
                spans.iter().any(|s| {
                    s.start_time
                        .is_some_and(|t| t >= request.start_time && t <= request.end_time)
                })
            })
            .take(request.effective_page_size())
            .map(|(id, spans)| self.to_trace(id, spans))
            .collect())
    }

    async fn get_trace(&self, request: GetTraceRequest) -> ProviderResult<Trace> {
        request.validate()?;
        let traces = self.traces.read().map_err(|_| ProviderError::LockError)?;

        traces
            .get(&request.trace_id)
            .map(|spans| self.to_trace(&request.trace_id, spans))
            .ok_or_else(|| ProviderError::not_found(format!("Trace {} not found", request.trace_id)))
    }

    async fn patch_traces(&self, request: PatchTraceRequest) -> ProviderResult<()> {
        request.validate()?;
        let mut traces = self.traces.write().map_err(|_| ProviderError::LockError)?;
        let stored = traces.entry(request.trace_id).or_default();

        for span in request.spans.iter().map(span_to_wire) {
            match stored.iter_mut().find(|s| s.span_id == span.span_id) {
                Some(existing) => *existing = span,
                None => stored.push(span),
            }
        }
        Ok(())
    }
}

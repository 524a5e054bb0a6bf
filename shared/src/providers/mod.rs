//! Telemetry provider clients.
//!
//! Each provider module follows the same layout:
//!
//! - a client trait with one async method per operation,
//! - a public client (`Cloud*`) forwarding every call to an injected
//!   implementation of that trait,
//! - a REST adapter (`Rest*Client`) that translates through [`crate::wire`],
//! - an in-memory implementation (`InMemory*`) for offline use and tests.

pub mod logging;
pub mod monitoring;
pub mod profiler;
pub mod trace;

pub use logging::{CloudLogging, InMemoryLogging, LoggingClient, RestLoggingClient};
pub use monitoring::{CloudMonitoring, InMemoryMonitoring, MonitoringClient, RestMonitoringClient};
pub use profiler::{CloudProfiler, InMemoryProfiler, ProfilerClient, RestProfilerClient};
pub use trace::{CloudTrace, InMemoryTrace, RestTraceClient, TraceClient};

use crate::config::GcpConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::transport::{GoogleTransport, HttpTransport};
use std::sync::Arc;

/// The four public clients, sharing one transport.
#[derive(Clone)]
pub struct TelemetryClients {
    /// Logging client.
    pub logging: CloudLogging,
    /// Monitoring client.
    pub monitoring: CloudMonitoring,
    /// Trace client.
    pub trace: CloudTrace,
    /// Profiler client.
    pub profiler: CloudProfiler,
}

impl TelemetryClients {
    /// Creates REST-backed clients over `transport`.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            logging: CloudLogging::new(config, transport.clone()),
            monitoring: CloudMonitoring::new(config, transport.clone()),
            trace: CloudTrace::new(config, transport.clone()),
            profiler: CloudProfiler::new(config, transport),
        }
    }

    /// Creates REST-backed clients authenticated with Application Default
    /// Credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials can be discovered.
    pub async fn connect(config: &GcpConfig) -> ProviderResult<Self> {
        let transport = GoogleTransport::from_adc(config).await?;
        tracing::info!(project_id = %config.project_id, "Connected telemetry clients");
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Creates clients backed by in-memory providers scoped to `project_id`.
    #[must_use]
    pub fn in_memory(project_id: &str) -> Self {
        Self {
            logging: CloudLogging::with_client(Arc::new(InMemoryLogging::new())),
            monitoring: CloudMonitoring::with_client(Arc::new(InMemoryMonitoring::new())),
            trace: CloudTrace::with_client(Arc::new(InMemoryTrace::new(project_id))),
            profiler: CloudProfiler::with_client(Arc::new(InMemoryProfiler::new(project_id))),
        }
    }
}

impl std::fmt::Debug for TelemetryClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryClients").finish_non_exhaustive()
    }
}

/// Slices one page out of `items` for the in-memory providers.
///
/// Page tokens are decimal offsets; the returned token is empty when no
/// items remain.
pub(crate) fn paginate<T: Clone>(
    items: &[T],
    page_token: &str,
    page_size: usize,
) -> ProviderResult<(Vec<T>, String)> {
    let offset = if page_token.is_empty() {
        0
    } else {
        page_token
            .parse::<usize>()
            .map_err(|_| ProviderError::invalid_argument(format!("invalid page token: {page_token}")))?
    };

    let page: Vec<T> = items.iter().skip(offset).take(page_size).cloned().collect();
    let next = offset + page.len();
    let next_page_token = if next < items.len() {
        next.to_string()
    } else {
        String::new()
    };

    Ok((page, next_page_token))
}

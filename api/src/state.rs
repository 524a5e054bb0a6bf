//! Application state module.
//!
//! Defines the shared application state that is passed to tool handlers.

use crate::config::{Backend, Config};
use anyhow::Result;
use shared::providers::{
    LoggingClient, MonitoringClient, ProfilerClient, TelemetryClients, TraceClient,
};
use shared::GcpConfig;
use std::sync::Arc;

/// Project id used by the in-memory backend when none is configured.
pub const LOCAL_PROJECT: &str = "local-project";

/// Application state shared across all request handlers.
///
/// Holds one client per provider plus the project every call is scoped to.
#[derive(Clone)]
pub struct AppState {
    project_id: String,
    logging: Arc<dyn LoggingClient>,
    monitoring: Arc<dyn MonitoringClient>,
    trace: Arc<dyn TraceClient>,
    profiler: Arc<dyn ProfilerClient>,
}

impl AppState {
    /// Creates a new application state from the given clients.
    pub fn new(
        project_id: impl Into<String>,
        logging: Arc<dyn LoggingClient>,
        monitoring: Arc<dyn MonitoringClient>,
        trace: Arc<dyn TraceClient>,
        profiler: Arc<dyn ProfilerClient>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            logging,
            monitoring,
            trace,
            profiler,
        }
    }

    /// Creates application state from a set of public clients.
    pub fn from_clients(project_id: impl Into<String>, clients: TelemetryClients) -> Self {
        Self::new(
            project_id,
            Arc::new(clients.logging),
            Arc::new(clients.monitoring),
            Arc::new(clients.trace),
            Arc::new(clients.profiler),
        )
    }

    /// Creates application state backed by in-memory providers.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory(project_id: &str) -> Self {
        Self::from_clients(project_id, TelemetryClients::in_memory(project_id))
    }

    /// Builds the state for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the `gcp` backend is selected and the project id or
    /// credentials cannot be found.
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.backend {
            Backend::Memory => {
                let project_id = GcpConfig::from_env()
                    .map_or_else(|_| LOCAL_PROJECT.to_string(), |gcp| gcp.project_id);
                tracing::info!(%project_id, "Using in-memory providers");
                Ok(Self::with_in_memory(&project_id))
            }
            Backend::Gcp => {
                let gcp = GcpConfig::from_env()?;
                let clients = TelemetryClients::connect(&gcp).await?;
                Ok(Self::from_clients(gcp.project_id, clients))
            }
        }
    }

    /// Returns the project every call is scoped to.
    #[must_use]
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the logging client.
    #[must_use]
    pub fn logging(&self) -> &dyn LoggingClient {
        self.logging.as_ref()
    }

    /// Returns the monitoring client.
    #[must_use]
    pub fn monitoring(&self) -> &dyn MonitoringClient {
        self.monitoring.as_ref()
    }

    /// Returns the trace client.
    #[must_use]
    pub fn trace(&self) -> &dyn TraceClient {
        self.trace.as_ref()
    }

    /// Returns the profiler client.
    #[must_use]
    pub fn profiler(&self) -> &dyn ProfilerClient {
        self.profiler.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory(LOCAL_PROJECT)
    }
}

//! Provider configuration.
//!
//! Holds the project id and the REST endpoints used by the wire adapters.

use std::time::Duration;
use thiserror::Error;

/// Default Cloud Logging endpoint.
pub const DEFAULT_LOGGING_ENDPOINT: &str = "https://logging.googleapis.com";
/// Default Cloud Monitoring endpoint.
pub const DEFAULT_MONITORING_ENDPOINT: &str = "https://monitoring.googleapis.com";
/// Default Cloud Trace endpoint.
pub const DEFAULT_TRACE_ENDPOINT: &str = "https://cloudtrace.googleapis.com";
/// Default Cloud Profiler endpoint.
pub const DEFAULT_PROFILER_ENDPOINT: &str = "https://cloudprofiler.googleapis.com";
/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variables consulted for the project id, in priority order.
pub const PROJECT_ENV_VARS: [&str; 3] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT", "GCP_PROJECT"];

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No project id environment variable is set.
    #[error("GOOGLE_CLOUD_PROJECT environment variable not set")]
    MissingProject,

    /// The request timeout is not a positive integer.
    #[error("Invalid request timeout: {0}")]
    InvalidTimeout(String),
}

/// Project-scoped settings shared by all four providers.
///
/// Values can be set via environment variables:
/// - `GOOGLE_CLOUD_PROJECT` / `GCLOUD_PROJECT` / `GCP_PROJECT`: project id (required)
/// - `TELEMETRY_LOGGING_ENDPOINT`, `TELEMETRY_MONITORING_ENDPOINT`,
///   `TELEMETRY_TRACE_ENDPOINT`, `TELEMETRY_PROFILER_ENDPOINT`: endpoint overrides
/// - `TELEMETRY_REQUEST_TIMEOUT_SECS`: per-request timeout (default: 30)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcpConfig {
    /// The Google Cloud project every operation is scoped to.
    pub project_id: String,
    /// Base URL of the Cloud Logging API.
    pub logging_endpoint: String,
    /// Base URL of the Cloud Monitoring API.
    pub monitoring_endpoint: String,
    /// Base URL of the Cloud Trace API.
    pub trace_endpoint: String,
    /// Base URL of the Cloud Profiler API.
    pub profiler_endpoint: String,
    /// Timeout applied to each provider round trip.
    pub request_timeout: Duration,
}

impl GcpConfig {
    /// Creates a configuration for `project_id` with the public Google endpoints.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            logging_endpoint: DEFAULT_LOGGING_ENDPOINT.to_string(),
            monitoring_endpoint: DEFAULT_MONITORING_ENDPOINT.to_string(),
            trace_endpoint: DEFAULT_TRACE_ENDPOINT.to_string(),
            profiler_endpoint: DEFAULT_PROFILER_ENDPOINT.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Points every provider at the same base URL.
    ///
    /// Handy for local emulators and test servers.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        self.logging_endpoint.clone_from(&endpoint);
        self.monitoring_endpoint.clone_from(&endpoint);
        self.trace_endpoint.clone_from(&endpoint);
        self.profiler_endpoint = endpoint;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No project id variable is set
    /// - `TELEMETRY_REQUEST_TIMEOUT_SECS` is set but is not a positive integer
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same conditions as [`GcpConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = PROJECT_ENV_VARS
            .iter()
            .find_map(|key| lookup(key).filter(|value| !value.is_empty()))
            .ok_or(ConfigError::MissingProject)?;

        let mut config = Self::new(project_id);

        if let Some(endpoint) = lookup("TELEMETRY_LOGGING_ENDPOINT") {
            config.logging_endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("TELEMETRY_MONITORING_ENDPOINT") {
            config.monitoring_endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("TELEMETRY_TRACE_ENDPOINT") {
            config.trace_endpoint = endpoint;
        }
        if let Some(endpoint) = lookup("TELEMETRY_PROFILER_ENDPOINT") {
            config.profiler_endpoint = endpoint;
        }

        if let Some(raw) = lookup("TELEMETRY_REQUEST_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidTimeout(raw))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Returns the `projects/{id}` resource prefix.
    #[must_use]
    pub fn project_resource(&self) -> String {
        format!("projects/{}", self.project_id)
    }
}

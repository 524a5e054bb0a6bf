//! Server configuration module.
//!
//! Handles loading configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Which provider implementation backs the tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Google Cloud REST APIs with Application Default Credentials.
    #[default]
    Gcp,
    /// In-process fakes; nothing leaves the process.
    Memory,
}

impl FromStr for Backend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gcp" => Ok(Self::Gcp),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("Unknown backend '{other}', expected 'gcp' or 'memory'"),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gcp => "gcp",
            Self::Memory => "memory",
        })
    }
}

/// Server configuration.
///
/// Configuration values can be set via environment variables:
/// - `TELEMETRY_HOST`: The host address to bind to (default: "0.0.0.0")
/// - `TELEMETRY_PORT`: The port to listen on (default: 8080)
/// - `TELEMETRY_BACKEND`: `gcp` or `memory` (default: `gcp`)
#[derive(Debug, Clone)]
pub struct Config {
    /// The host address to bind to.
    pub host: String,
    /// The port to listen on.
    pub port: u16,
    /// Provider backend.
    pub backend: Backend,
}

impl Config {
    /// Creates a new configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `TELEMETRY_PORT` is set but cannot be parsed as a valid port number
    /// - `TELEMETRY_BACKEND` is set to an unknown value
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("TELEMETRY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = std::env::var("TELEMETRY_PORT")
            .ok()
            .map(|p| p.parse::<u16>())
            .transpose()
            .context("TELEMETRY_PORT is not a valid port")?
            .unwrap_or(8080);

        let backend = std::env::var("TELEMETRY_BACKEND")
            .ok()
            .map(|b| b.parse::<Backend>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            backend,
        })
    }

    /// Returns the socket address for binding.
    ///
    /// # Errors
    ///
    /// Returns an error if the host and port do not form a valid socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend: Backend::default(),
        }
    }
}

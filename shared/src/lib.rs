//! Telemetry Provider Abstraction Layer
//!
//! This crate exposes Google Cloud Logging, Monitoring, Trace and Profiler
//! behind provider-neutral models and client traits.
//!
//! # Modules
//!
//! - [`models`] - Generic request/response models
//! - [`providers`] - Client traits, public clients, REST adapters and in-memory providers
//! - [`wire`] - Provider wire formats and the translation to and from [`models`]
//! - [`transport`] - Authenticated HTTP transport
//! - [`config`] - Project and endpoint configuration
//! - [`error`] - Error taxonomy
//!
//! # Example
//!
//! ```
//! use shared::models::{ListEntriesRequest, LogEntry};
//! use shared::providers::{LoggingClient, TelemetryClients};
//!
//! # tokio_test::block_on(async {
//! let clients = TelemetryClients::in_memory("my-project");
//!
//! clients
//!     .logging
//!     .write_entry("app", LogEntry::new("WARNING", "disk almost full"))
//!     .await
//!     .unwrap();
//!
//! let entries = clients
//!     .logging
//!     .list_entries(ListEntriesRequest::default())
//!     .await
//!     .unwrap();
//! assert_eq!(entries.len(), 1);
//! # });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod transport;
pub mod wire;

pub use config::{ConfigError, GcpConfig};
pub use error::{ProviderError, ProviderResult};

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;

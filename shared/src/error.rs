//! Error taxonomy for provider operations.
//!
//! Every operation in this crate returns [`ProviderResult`]. Errors are scoped
//! to the single call that produced them; nothing here is fatal to the process.

use thiserror::Error;

/// Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors that can occur while serving a provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A required field is missing or has the wrong shape.
    ///
    /// Raised before the provider is contacted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Request validation failed.
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Credentials could not be obtained or were rejected locally.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The request never produced a provider response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered with an error status.
    ///
    /// `code` is the provider's canonical status string (e.g. `NOT_FOUND`)
    /// and `message` its error text, both passed through verbatim.
    #[error("Provider error ({status} {code}): {message}")]
    Api {
        /// HTTP status returned by the provider.
        status: u16,
        /// Canonical status code reported by the provider.
        code: String,
        /// Provider error message.
        message: String,
    },

    /// The provider response could not be decoded.
    #[error("Failed to decode provider response: {0}")]
    Decode(String),

    /// Failed to acquire the lock of an in-memory provider.
    #[error("Failed to acquire lock on in-memory provider")]
    LockError,
}

impl ProviderError {
    /// Creates an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Returns `true` if the error was raised before contacting the provider.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::Validation(_))
    }

    /// Returns `true` if the provider reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Creates the error a provider returns for a missing resource.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::Api {
            status: 404,
            code: "NOT_FOUND".to_string(),
            message: msg.into(),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<gcp_auth::Error> for ProviderError {
    fn from(err: gcp_auth::Error) -> Self {
        Self::Auth(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

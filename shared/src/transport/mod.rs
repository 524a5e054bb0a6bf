//! HTTP transport used by the wire adapters.
//!
//! The adapters never talk to `reqwest` directly. They build an [`HttpRequest`],
//! hand it to an [`HttpTransport`] and decode the [`HttpResponse`] through
//! [`ApiClient`], which also turns Google error envelopes into
//! [`ProviderError::Api`].

mod google;
#[cfg(test)]
pub(crate) mod testing;

pub use google::{GoogleTransport, CLOUD_PLATFORM_SCOPE};

use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET method.
    Get,
    /// POST method.
    Post,
    /// PATCH method.
    Patch,
    /// DELETE method.
    Delete,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request ready to be sent to a provider.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Fully resolved URL, query string included.
    pub url: Url,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

/// A raw provider response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport abstraction for testability.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and returns the provider's raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials cannot be obtained or the request does
    /// not complete. Non-2xx responses are *not* errors at this level.
    async fn send(&self, request: HttpRequest) -> ProviderResult<HttpResponse>;
}

/// Google API error envelope.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// JSON client for one provider API.
///
/// Cheap to clone; holds only the shared transport and the base URL.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url`.
    pub fn new(transport: Arc<dyn HttpTransport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `path` against the base URL and appends `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting URL is malformed.
    pub fn url(&self, path: &str, query: &[(&str, String)]) -> ProviderResult<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, path.trim_start_matches('/')))
            .map_err(|e| ProviderError::invalid_argument(format!("invalid request URL: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a GET request and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails, the provider reports an error,
    /// or the body cannot be decoded.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<T> {
        let url = self.url(path, query)?;
        self.execute(HttpMethod::Get, url, None).await
    }

    /// Issues a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get`], plus body serialization failures.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> ProviderResult<T> {
        let url = self.url(path, query)?;
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Post, url, Some(body)).await
    }

    /// Issues a PATCH request with a JSON body.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::post`].
    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> ProviderResult<T> {
        let url = self.url(path, query)?;
        let body = serde_json::to_value(body)?;
        self.execute(HttpMethod::Patch, url, Some(body)).await
    }

    /// Issues a DELETE request.
    ///
    /// # Errors
    ///
    /// Same conditions as [`ApiClient::get`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        let url = self.url(path, &[])?;
        self.execute(HttpMethod::Delete, url, None).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> ProviderResult<T> {
        tracing::trace!(?method, %url, "Sending provider request");

        let response = self
            .transport
            .send(HttpRequest { method, url, body })
            .await?;

        decode_response(&response)
    }
}

/// Decodes a provider response, mapping error statuses to [`ProviderError::Api`].
///
/// An empty success body decodes as `{}` so that `Empty` responses work.
///
/// # Errors
///
/// Returns an error for non-2xx statuses and undecodable bodies.
pub fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> ProviderResult<T> {
    if !response.is_success() {
        let (code, message) = match serde_json::from_slice::<ErrorEnvelope>(&response.body) {
            Ok(envelope) => (envelope.error.status, envelope.error.message),
            Err(_) => (
                String::new(),
                String::from_utf8_lossy(&response.body).into_owned(),
            ),
        };
        tracing::warn!(status = response.status, code = %code, "Provider returned an error");
        return Err(ProviderError::Api {
            status: response.status,
            code,
            message,
        });
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"{}")?);
    }

    Ok(serde_json::from_slice(&response.body)?)
}

//! `reqwest` transport authenticated with Application Default Credentials.

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::config::GcpConfig;
use crate::error::ProviderResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// OAuth scope covering Logging, Monitoring, Trace and Profiler.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Transport that signs every request with a bearer token from `gcp_auth`.
///
/// Token caching and refresh are handled by the `gcp_auth` provider.
pub struct GoogleTransport {
    client: reqwest::Client,
    auth: Arc<dyn gcp_auth::TokenProvider>,
    quota_project: Option<String>,
    timeout: Duration,
}

impl std::fmt::Debug for GoogleTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleTransport")
            .field("quota_project", &self.quota_project)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GoogleTransport {
    /// Creates a transport from Application Default Credentials.
    ///
    /// The configured project is sent as the quota project
    /// (`x-goog-user-project`).
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials can be discovered.
    pub async fn from_adc(config: &GcpConfig) -> ProviderResult<Self> {
        let auth = gcp_auth::provider().await?;
        Ok(Self::with_token_provider(auth, config))
    }

    /// Creates a transport around an existing token provider.
    #[must_use]
    pub fn with_token_provider(auth: Arc<dyn gcp_auth::TokenProvider>, config: &GcpConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth,
            quota_project: Some(config.project_id.clone()).filter(|p| !p.is_empty()),
            timeout: config.request_timeout,
        }
    }
}

#[async_trait]
impl HttpTransport for GoogleTransport {
    async fn send(&self, request: HttpRequest) -> ProviderResult<HttpResponse> {
        let token = self.auth.token(&[CLOUD_PLATFORM_SCOPE]).await?;

        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .bearer_auth(token.as_str())
            .timeout(self.timeout);

        if let Some(project) = &self.quota_project {
            builder = builder.header("x-goog-user-project", project);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

//! Scripted transport for adapter tests.

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses in order and records every request it receives.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_json(&self, status: u16, body: &serde_json::Value) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: serde_json::to_vec(body).unwrap(),
        });
    }

    pub(crate) fn push_empty(&self, status: u16) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: Vec::new(),
        });
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> ProviderResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ProviderError::Transport("no scripted response left".to_string()))
    }
}

/// Returns the value of query parameter `key`, if present.
pub(crate) fn query_param(request: &HttpRequest, key: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Returns every value of a repeated query parameter.
pub(crate) fn query_params(request: &HttpRequest, key: &str) -> Vec<String> {
    request
        .url
        .query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

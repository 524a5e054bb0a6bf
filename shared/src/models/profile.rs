//! Profiler data models.

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ProviderError, ProviderResult};

/// Default page size for `list_profiles`.
pub const DEFAULT_PROFILE_PAGE_SIZE: usize = 100;

/// Kind of profile.
///
/// Unrecognised strings parse as [`ProfileType::Unspecified`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    /// Unknown or unset.
    #[default]
    Unspecified,
    /// Thread CPU time sampling.
    Cpu,
    /// Wallclock time sampling.
    Wall,
    /// In-use heap sampling.
    Heap,
    /// Single-shot collection of all thread stacks.
    Threads,
    /// Synchronization contention.
    Contention,
    /// Peak heap profile.
    PeakHeap,
    /// Heap allocation profile.
    HeapAlloc,
}

impl ProfileType {
    /// Returns the canonical upper-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Cpu => "CPU",
            Self::Wall => "WALL",
            Self::Heap => "HEAP",
            Self::Threads => "THREADS",
            Self::Contention => "CONTENTION",
            Self::PeakHeap => "PEAK_HEAP",
            Self::HeapAlloc => "HEAP_ALLOC",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "CPU" => Self::Cpu,
            "WALL" => Self::Wall,
            "HEAP" => Self::Heap,
            "THREADS" => Self::Threads,
            "CONTENTION" => Self::Contention,
            "PEAK_HEAP" => Self::PeakHeap,
            "HEAP_ALLOC" => Self::HeapAlloc,
            _ => Self::Unspecified,
        })
    }
}

/// Where a profile was collected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Project id. Always replaced by the client's own project on create.
    #[serde(default)]
    pub project_id: String,
    /// Deployment target, usually the service name.
    pub target: String,
    /// Deployment labels, e.g. `zone` or `version`.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// A profile as stored by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Resource name assigned by the provider.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Profile kind.
    pub profile_type: ProfileType,
    /// Collection duration, e.g. `60s`.
    #[serde(default)]
    pub duration: String,
    /// Profile labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    /// Collection start; the local clock when the provider does not report it.
    #[serde(default = "Utc::now")]
    pub start_time: DateTime<Utc>,
    /// Base64-encoded gzip pprof bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_bytes: Option<String>,
    /// Collection deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<Deployment>,
}

impl Profile {
    /// Creates a profile of the given type with the current start time.
    #[must_use]
    pub fn new(profile_type: ProfileType, duration: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            profile_type,
            duration: duration.into(),
            labels: HashMap::new(),
            start_time: Utc::now(),
            profile_bytes: None,
            deployment: None,
        }
    }

    /// Sets the base64 profile bytes.
    #[must_use]
    pub fn with_profile_bytes(mut self, profile_bytes: impl Into<String>) -> Self {
        self.profile_bytes = Some(profile_bytes.into());
        self
    }

    /// Sets the deployment.
    #[must_use]
    pub fn with_deployment(mut self, deployment: Deployment) -> Self {
        self.deployment = Some(deployment);
        self
    }

    /// Checks that `profile_bytes`, when present, is valid standard base64.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArgument`] on malformed input.
    pub fn validate_bytes(&self) -> ProviderResult<()> {
        if let Some(bytes) = &self.profile_bytes {
            validate_base64(bytes)?;
        }
        Ok(())
    }
}

/// Checks that `data` is valid standard base64.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidArgument`] on malformed input.
pub fn validate_base64(data: &str) -> ProviderResult<()> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map(|_| ())
        .map_err(|e| ProviderError::invalid_argument(format!("profile bytes are not valid base64: {e}")))
}

/// Request to create an online profile; the provider picks the type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProfileRequest {
    /// Deployment the profile is for.
    pub deployment: Deployment,
    /// Types the agent can collect.
    pub profile_types: Vec<ProfileType>,
    /// Requested duration, e.g. `60s`.
    #[serde(default)]
    pub duration: String,
    /// Profile labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

/// Request to upload a profile collected out of band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOfflineProfileRequest {
    /// Profile to upload.
    pub profile: Profile,
}

/// Request to update an existing profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    /// Profile with `name` set.
    pub profile: Profile,
    /// Field mask, passed through uninterpreted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub update_mask: String,
    /// Replacement base64 profile bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_bytes: Option<String>,
}

/// Request to list profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProfilesRequest {
    /// Page size; [`DEFAULT_PROFILE_PAGE_SIZE`] when not positive.
    #[serde(default)]
    pub page_size: i64,
    /// Continuation cursor.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub page_token: String,
}

impl ListProfilesRequest {
    /// Returns the page size actually requested.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        super::effective_page_size(self.page_size, DEFAULT_PROFILE_PAGE_SIZE)
    }
}

/// One page of profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListProfilesResponse {
    /// Profiles in provider order.
    pub profiles: Vec<Profile>,
    /// Cursor for the next page.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_page_token: String,
}

//! Cloud Profiler v2 wire format.

use crate::models::{Deployment, Profile, ProfileType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps a profile type to the provider's name.
#[must_use]
pub fn profile_type_to_wire(profile_type: ProfileType) -> &'static str {
    match profile_type {
        ProfileType::Unspecified => "PROFILE_TYPE_UNSPECIFIED",
        other => other.as_str(),
    }
}

/// Maps a provider profile type name; unknown names are `Unspecified`.
#[must_use]
pub fn profile_type_from_wire(name: &str) -> ProfileType {
    name.parse().unwrap_or_default()
}

/// A deployment on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireDeployment {
    /// Project id.
    #[serde(default)]
    pub project_id: String,
    /// Deployment target.
    #[serde(default)]
    pub target: String,
    /// Deployment labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
}

impl From<&Deployment> for WireDeployment {
    fn from(deployment: &Deployment) -> Self {
        Self {
            project_id: deployment.project_id.clone(),
            target: deployment.target.clone(),
            labels: deployment.labels.clone(),
        }
    }
}

impl From<WireDeployment> for Deployment {
    fn from(deployment: WireDeployment) -> Self {
        Self {
            project_id: deployment.project_id,
            target: deployment.target,
            labels: deployment.labels,
        }
    }
}

/// A profile on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProfile {
    /// Resource name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Profile type name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile_type: String,
    /// Deployment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<WireDeployment>,
    /// Duration, e.g. `60s`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub duration: String,
    /// Base64 gzip pprof bytes.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub profile_bytes: String,
    /// Labels.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    /// Collection start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
}

/// Body of `profiles.create`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileBody {
    /// Deployment to profile.
    pub deployment: WireDeployment,
    /// Profile types the agent can collect.
    pub profile_type: Vec<String>,
}

/// Response of `profiles.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProfilesResponse {
    /// Profiles in the page.
    #[serde(default)]
    pub profiles: Vec<WireProfile>,
    /// Cursor for the next page.
    #[serde(default)]
    pub next_page_token: String,
}

/// Translates a generic profile for upload. `profile_bytes` overrides the
/// profile's own bytes when given.
///
/// An unspecified type is left out of the body so a patch without an update
/// mask keeps the stored type.
#[must_use]
pub fn profile_to_wire(profile: &Profile, profile_bytes: Option<&str>) -> WireProfile {
    let profile_type = match profile.profile_type {
        ProfileType::Unspecified => String::new(),
        other => profile_type_to_wire(other).to_string(),
    };

    WireProfile {
        name: profile.name.clone(),
        profile_type,
        deployment: profile.deployment.as_ref().map(WireDeployment::from),
        duration: profile.duration.clone(),
        profile_bytes: profile_bytes
            .or(profile.profile_bytes.as_deref())
            .unwrap_or_default()
            .to_string(),
        labels: profile.labels.clone(),
        start_time: None,
    }
}

/// Translates a provider profile back to the generic model.
///
/// When the provider does not report a start time, `now` is used instead.
#[must_use]
pub fn profile_from_wire(profile: WireProfile, now: DateTime<Utc>) -> Profile {
    Profile {
        name: profile.name,
        profile_type: profile_type_from_wire(&profile.profile_type),
        duration: profile.duration,
        labels: profile.labels,
        start_time: profile.start_time.unwrap_or(now),
        profile_bytes: Some(profile.profile_bytes).filter(|b| !b.is_empty()),
        deployment: profile.deployment.map(Deployment::from),
    }
}

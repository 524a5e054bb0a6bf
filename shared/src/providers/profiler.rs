//! Profiler provider.

use crate::config::GcpConfig;
use crate::error::{ProviderError, ProviderResult};
use crate::models::profile::validate_base64;
use crate::models::{
    CreateOfflineProfileRequest, CreateProfileRequest, Deployment, ListProfilesRequest,
    ListProfilesResponse, Profile, UpdateProfileRequest,
};
use crate::providers::paginate;
use crate::transport::{ApiClient, HttpTransport};
use crate::wire::page_size_param;
use crate::wire::profiler::{
    profile_from_wire, profile_to_wire, profile_type_to_wire, CreateProfileBody,
    ListProfilesResponse as WireProfilePage, WireDeployment, WireProfile,
};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};

/// Operations of the profiler provider.
#[async_trait]
pub trait ProfilerClient: Send + Sync {
    /// Asks the provider to schedule a profile for the deployment. The
    /// provider picks one of the requested types.
    ///
    /// # Errors
    ///
    /// Returns an error if no target or type is given, or the provider call fails.
    async fn create_profile(&self, request: CreateProfileRequest) -> ProviderResult<Profile>;

    /// Uploads a profile collected out of band.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile bytes are not base64 or the provider
    /// call fails.
    async fn create_offline_profile(
        &self,
        request: CreateOfflineProfileRequest,
    ) -> ProviderResult<Profile>;

    /// Updates a profile. The update mask is passed through uninterpreted.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile name is empty, the bytes are not
    /// base64, or the provider call fails.
    async fn update_profile(&self, request: UpdateProfileRequest) -> ProviderResult<Profile>;

    /// Lists one page of profiles, at most `page_size` (default 100).
    ///
    /// # Errors
    ///
    /// Returns an error if the provider call fails.
    async fn list_profiles(&self, request: ListProfilesRequest)
        -> ProviderResult<ListProfilesResponse>;
}

/// Public profiler client.
#[derive(Clone)]
pub struct CloudProfiler {
    inner: Arc<dyn ProfilerClient>,
}

impl CloudProfiler {
    /// Creates a REST-backed client for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self::with_client(Arc::new(RestProfilerClient::new(config, transport)))
    }

    /// Wraps an existing implementation.
    #[must_use]
    pub fn with_client(inner: Arc<dyn ProfilerClient>) -> Self {
        Self { inner }
    }
}

impl std::fmt::Debug for CloudProfiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudProfiler").finish_non_exhaustive()
    }
}

#[async_trait]
impl ProfilerClient for CloudProfiler {
    async fn create_profile(&self, request: CreateProfileRequest) -> ProviderResult<Profile> {
        self.inner.create_profile(request).await
    }

    async fn create_offline_profile(
        &self,
        request: CreateOfflineProfileRequest,
    ) -> ProviderResult<Profile> {
        self.inner.create_offline_profile(request).await
    }

    async fn update_profile(&self, request: UpdateProfileRequest) -> ProviderResult<Profile> {
        self.inner.update_profile(request).await
    }

    async fn list_profiles(
        &self,
        request: ListProfilesRequest,
    ) -> ProviderResult<ListProfilesResponse> {
        self.inner.list_profiles(request).await
    }
}

fn check_create(request: &CreateProfileRequest) -> ProviderResult<()> {
    if request.deployment.target.trim().is_empty() {
        return Err(ProviderError::invalid_argument("deployment target is required"));
    }
    if request.profile_types.is_empty() {
        return Err(ProviderError::invalid_argument(
            "at least one profile type is required",
        ));
    }
    Ok(())
}

fn check_update(request: &UpdateProfileRequest) -> ProviderResult<()> {
    if request.profile.name.trim().is_empty() {
        return Err(ProviderError::invalid_argument("profile name is required"));
    }
    if let Some(bytes) = &request.profile_bytes {
        validate_base64(bytes)?;
    }
    request.profile.validate_bytes()
}

/// Cloud Profiler v2 REST adapter.
#[derive(Debug, Clone)]
pub struct RestProfilerClient {
    api: ApiClient,
    project_id: String,
}

impl RestProfilerClient {
    /// Creates an adapter for the configured project.
    #[must_use]
    pub fn new(config: &GcpConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api: ApiClient::new(transport, config.profiler_endpoint.clone()),
            project_id: config.project_id.clone(),
        }
    }

    fn profiles_path(&self) -> String {
        format!("v2/projects/{}/profiles", self.project_id)
    }
}

#[async_trait]
impl ProfilerClient for RestProfilerClient {
    async fn create_profile(&self, request: CreateProfileRequest) -> ProviderResult<Profile> {
        check_create(&request)?;

        let body = CreateProfileBody {
            deployment: WireDeployment {
                project_id: self.project_id.clone(),
                target: request.deployment.target,
                labels: request.deployment.labels,
            },
            profile_type: request
                .profile_types
                .iter()
                .map(|t| profile_type_to_wire(*t).to_string())
                .collect(),
        };
        tracing::debug!(
            deployment_target = %body.deployment.target,
            profile_types = ?body.profile_type,
            "Creating profile"
        );

        let profile: WireProfile = self.api.post(&self.profiles_path(), &[], &body).await?;
        Ok(profile_from_wire(profile, Utc::now()))
    }

    async fn create_offline_profile(
        &self,
        request: CreateOfflineProfileRequest,
    ) -> ProviderResult<Profile> {
        request.profile.validate_bytes()?;
        tracing::debug!(profile_type = %request.profile.profile_type, "Uploading offline profile");

        let path = format!("{}:createOffline", self.profiles_path());
        let body = profile_to_wire(&request.profile, None);
        let profile: WireProfile = self.api.post(&path, &[], &body).await?;
        Ok(profile_from_wire(profile, Utc::now()))
    }

    async fn update_profile(&self, request: UpdateProfileRequest) -> ProviderResult<Profile> {
        check_update(&request)?;
        tracing::debug!(
            name = %request.profile.name,
            update_mask = %request.update_mask,
            "Updating profile"
        );

        let mut query = Vec::new();
        if !request.update_mask.is_empty() {
            query.push(("updateMask", request.update_mask.clone()));
        }
        let path = format!("v2/{}", request.profile.name);
        let body = profile_to_wire(&request.profile, request.profile_bytes.as_deref());

        let profile: WireProfile = self.api.patch(&path, &query, &body).await?;
        Ok(profile_from_wire(profile, Utc::now()))
    }

    async fn list_profiles(
        &self,
        request: ListProfilesRequest,
    ) -> ProviderResult<ListProfilesResponse> {
        let page_size = request.effective_page_size();
        let mut query = vec![("pageSize", page_size_param(page_size))];
        if !request.page_token.is_empty() {
            query.push(("pageToken", request.page_token));
        }
        tracing::debug!(page_size, "Listing profiles");

        let page: WireProfilePage = self.api.get(&self.profiles_path(), &query).await?;
        let now = Utc::now();
        Ok(ListProfilesResponse {
            profiles: page
                .profiles
                .into_iter()
                .take(page_size)
                .map(|p| profile_from_wire(p, now))
                .collect(),
            next_page_token: page.next_page_token,
        })
    }
}

#[derive(Debug, Default)]
struct ProfilerState {
    next_id: u64,
    profiles: Vec<Profile>,
}

/// In-memory profiler provider.
///
/// `create_profile` picks the first requested type. `update_profile`
/// understands the mask fields `labels`, `duration`, `profile_bytes` and
/// `deployment` (snake or camel case); an empty mask updates labels,
/// duration and bytes.
#[derive(Debug, Default)]
pub struct InMemoryProfiler {
    project_id: String,
    state: Arc<RwLock<ProfilerState>>,
}

impl InMemoryProfiler {
    /// Creates an empty provider for `project_id`.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            state: Arc::default(),
        }
    }

    fn store(&self, mut profile: Profile) -> ProviderResult<Profile> {
        let mut state = self.state.write().map_err(|_| ProviderError::LockError)?;
        state.next_id += 1;
        profile.name = format!("projects/{}/profiles/{}", self.project_id, state.next_id);
        state.profiles.push(profile.clone());
        Ok(profile)
    }
}

fn mask_fields(mask: &str) -> Vec<String> {
    mask.split(',')
        .map(|f| f.trim().replace("profileBytes", "profile_bytes"))
        .filter(|f| !f.is_empty())
        .collect()
}

#[async_trait]
impl ProfilerClient for InMemoryProfiler {
    async fn create_profile(&self, request: CreateProfileRequest) -> ProviderResult<Profile> {
        check_create(&request)?;

        let mut profile = Profile::new(request.profile_types[0], request.duration);
        profile.labels = request.labels;
        profile.deployment = Some(Deployment {
            project_id: self.project_id.clone(),
            ..request.deployment
        });
        self.store(profile)
    }

    async fn create_offline_profile(
        &self,
        request: CreateOfflineProfileRequest,
    ) -> ProviderResult<Profile> {
        request.profile.validate_bytes()?;
        self.store(request.profile)
    }

    async fn update_profile(&self, request: UpdateProfileRequest) -> ProviderResult<Profile> {
        check_update(&request)?;

        let mut state = self.state.write().map_err(|_| ProviderError::LockError)?;
        let stored = state
            .profiles
            .iter_mut()
            .find(|p| p.name == request.profile.name)
            .ok_or_else(|| {
                ProviderError::not_found(format!("Profile {} not found", request.profile.name))
            })?;

        let fields = mask_fields(&request.update_mask);
        let wants = |field: &str| fields.is_empty() || fields.iter().any(|f| f == field);
        let update = request.profile;

        if wants("labels") {
            stored.labels = update.labels;
        }
        if wants("duration") && !update.duration.is_empty() {
            stored.duration = update.duration;
        }
        if wants("profile_bytes") {
            if let Some(bytes) = request.profile_bytes.or(update.profile_bytes) {
                stored.profile_bytes = Some(bytes);
            }
        }
        if !fields.is_empty() && wants("deployment") {
            stored.deployment = update.deployment;
        }

        Ok(stored.clone())
    }

    async fn list_profiles(
        &self,
        request: ListProfilesRequest,
    ) -> ProviderResult<ListProfilesResponse> {
        let state = self.state.read().map_err(|_| ProviderError::LockError)?;
        let (profiles, next_page_token) = paginate(
            &state.profiles,
            &request.page_token,
            request.effective_page_size(),
        )?;
        Ok(ListProfilesResponse {
            profiles,
            next_page_token,
        })
    }
}

//! Profiler tools. Every profile is scoped to the configured project.

use super::{Args, ToolError, ToolResult};
use crate::state::AppState;
use shared::models::{
    CreateOfflineProfileRequest, CreateProfileRequest, Deployment, ListProfilesRequest, Profile,
    ProfileType, UpdateProfileRequest,
};

const DEFAULT_DURATION: &str = "60s";

pub(super) async fn create_profile(state: &AppState, args: &Args) -> ToolResult {
    let deployment = deployment(state, args)?;
    let profile_type = profile_type(args)?;

    let request = CreateProfileRequest {
        deployment,
        profile_types: vec![profile_type],
        duration: duration(args),
        labels: args.labels("labels"),
    };

    let profile = state
        .profiler()
        .create_profile(request)
        .await
        .map_err(ToolError::failed("create profile"))?;

    tracing::debug!(name = %profile.name, "Created profile");
    Ok(serde_json::to_value(profile)?)
}

pub(super) async fn create_offline_profile(state: &AppState, args: &Args) -> ToolResult {
    let deployment = deployment(state, args)?;
    let profile_type = profile_type(args)?;
    let profile_data = args.require_str("profile_data")?;

    let mut profile = Profile::new(profile_type, duration(args))
        .with_profile_bytes(profile_data)
        .with_deployment(deployment);
    profile.labels = args.labels("labels");

    let profile = state
        .profiler()
        .create_offline_profile(CreateOfflineProfileRequest { profile })
        .await
        .map_err(ToolError::failed("create offline profile"))?;

    Ok(serde_json::to_value(profile)?)
}

pub(super) async fn update_profile(state: &AppState, args: &Args) -> ToolResult {
    let mut profile = Profile::new(ProfileType::Unspecified, "");
    profile.name = args.require_str("profile_name")?;
    profile.labels = args.labels("labels");

    let request = UpdateProfileRequest {
        profile,
        update_mask: args.str_or_default("update_mask"),
        profile_bytes: args.non_empty_str("profile_data"),
    };

    let profile = state
        .profiler()
        .update_profile(request)
        .await
        .map_err(ToolError::failed("update profile"))?;

    Ok(serde_json::to_value(profile)?)
}

pub(super) async fn list_profiles(state: &AppState, args: &Args) -> ToolResult {
    let request = ListProfilesRequest {
        page_size: args.positive_i64("page_size"),
        page_token: args.str_or_default("page_token"),
    };

    let response = state
        .profiler()
        .list_profiles(request)
        .await
        .map_err(ToolError::failed("list profiles"))?;

    Ok(serde_json::to_value(response)?)
}

fn deployment(state: &AppState, args: &Args) -> Result<Deployment, ToolError> {
    Ok(Deployment {
        project_id: state.project_id().to_string(),
        target: args.require_str("target")?,
        labels: args.labels("labels"),
    })
}

fn profile_type(args: &Args) -> Result<ProfileType, ToolError> {
    let raw = args.require_str("profile_type")?;
    Ok(raw.parse().unwrap_or_default())
}

fn duration(args: &Args) -> String {
    args.non_empty_str("duration")
        .unwrap_or_else(|| DEFAULT_DURATION.to_string())
}

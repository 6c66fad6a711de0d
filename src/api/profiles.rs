//! Profile endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Profile, ProfileShort},
    AppState,
};

use super::AuthenticatedUser;

/// List all profiles (employee selector)
#[utoipa::path(
    get,
    path = "/profiles",
    tag = "profiles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profiles ordered by username", body = Vec<ProfileShort>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_profiles(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
) -> AppResult<Json<Vec<ProfileShort>>> {
    Ok(Json(state.services.profiles.list().await?))
}

/// Get a profile by ID
#[utoipa::path(
    get,
    path = "/profiles/{id}",
    tag = "profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.services.profiles.get(id).await?))
}

//! Session endpoints: sign-up, sign-in, sign-out and current user

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        profile::{SignInRequest, SignUpRequest},
        Profile, SessionContext,
    },
    AppState,
};

use super::AuthenticatedUser;

/// Sign-in response with the bearer token
#[derive(Serialize, ToSchema)]
pub struct SignInResponse {
    pub token: String,
    pub token_type: String,
    pub user: SessionContext,
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> AppResult<(StatusCode, Json<Profile>)> {
    let profile = state.services.auth.sign_up(&request).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Sign in with email and password
#[utoipa::path(
    post,
    path = "/auth/signin",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> AppResult<Json<SignInResponse>> {
    let (token, user) = state
        .services
        .auth
        .sign_in(&request.email, &request.password)
        .await?;

    Ok(Json(SignInResponse {
        token,
        token_type: "Bearer".to_string(),
        user,
    }))
}

/// Close the current session
#[utoipa::path(
    post,
    path = "/auth/signout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_out(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
) -> AppResult<StatusCode> {
    state.services.auth.sign_out(&ctx).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = Profile),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
) -> AppResult<Json<Profile>> {
    let profile = state.services.auth.current_user(&ctx).await?;
    Ok(Json(profile))
}

//! Check-out / check-in endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{transaction::CheckInAllOutcome, Transaction},
    AppState,
};

use super::AuthenticatedUser;

/// Result of a bulk self check-in
#[derive(Serialize, ToSchema)]
pub struct CheckInAllResponse {
    pub message: String,
    /// Equipment checked in by this request
    pub equipment_ids: Vec<i32>,
}

impl From<CheckInAllOutcome> for CheckInAllResponse {
    fn from(outcome: CheckInAllOutcome) -> Self {
        match outcome {
            CheckInAllOutcome::NothingToCheckIn => Self {
                message: "Nothing to check in".to_string(),
                equipment_ids: Vec::new(),
            },
            CheckInAllOutcome::CheckedIn(ids) => Self {
                message: format!("Checked in {} equipment(s)", ids.len()),
                equipment_ids: ids,
            },
        }
    }
}

/// Check out equipment to the current user
#[utoipa::path(
    post,
    path = "/equipments/{id}/check-out",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 201, description = "Equipment checked out", body = Transaction),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Equipment already checked out", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_out(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let transaction = state.services.transactions.check_out(&ctx, id).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Check equipment back in
#[utoipa::path(
    post,
    path = "/equipments/{id}/check-in",
    tag = "transactions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 201, description = "Equipment checked in", body = Transaction),
        (status = 404, description = "Equipment not found"),
        (status = 422, description = "Equipment is not checked out", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<(StatusCode, Json<Transaction>)> {
    let transaction = state.services.transactions.check_in(&ctx, id).await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// Check in everything the current user holds
#[utoipa::path(
    post,
    path = "/equipments/check-in-all",
    tag = "transactions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Held equipment checked in", body = CheckInAllResponse),
        (status = 500, description = "Some equipments failed to check in", body = crate::error::ErrorResponse)
    )
)]
pub async fn check_in_all(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
) -> AppResult<Json<CheckInAllResponse>> {
    let outcome = state.services.transactions.check_in_all(&ctx).await?;
    Ok(Json(outcome.into()))
}

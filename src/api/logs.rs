//! Audit log endpoint

use axum::{extract::State, Json};

use crate::{error::AppResult, models::LogEntry, AppState};

use super::AuthenticatedUser;

/// List the audit trail, newest first
#[utoipa::path(
    get,
    path = "/logs",
    tag = "logs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Log entries", body = Vec<LogEntry>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
) -> AppResult<Json<Vec<LogEntry>>> {
    Ok(Json(state.services.logs.list().await?))
}

//! Dashboard endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::equipment::{Dashboard, DashboardQuery},
    AppState,
};

use super::AuthenticatedUser;

/// Filtered equipment, employee selector and availability counters
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<DashboardQuery>,
) -> AppResult<Json<Dashboard>> {
    Ok(Json(state.services.equipment.dashboard(query).await?))
}

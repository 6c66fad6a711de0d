//! Equipment API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        equipment::{CreateEquipment, EquipmentQuery, UpdateEquipment},
        Equipment, EquipmentView, Transaction,
    },
    AppState,
};

use super::AuthenticatedUser;

/// List equipment with their current holder
#[utoipa::path(
    get,
    path = "/equipments",
    tag = "equipments",
    security(("bearer_auth" = [])),
    params(EquipmentQuery),
    responses(
        (status = 200, description = "Equipment list", body = Vec<EquipmentView>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_equipments(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Query(query): Query<EquipmentQuery>,
) -> AppResult<Json<Vec<EquipmentView>>> {
    let equipments = state.services.equipment.list(&query).await?;
    Ok(Json(equipments))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipments/{id}",
    tag = "equipments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = EquipmentView),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EquipmentView>> {
    let equipment = state.services.equipment.get(id).await?;
    Ok(Json(equipment))
}

/// Add equipment
#[utoipa::path(
    post,
    path = "/equipments",
    tag = "equipments",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Json(data): Json<CreateEquipment>,
) -> AppResult<(StatusCode, Json<Equipment>)> {
    let equipment = state.services.equipment.create(&ctx, &data).await?;
    Ok((StatusCode::CREATED, Json(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipments/{id}",
    tag = "equipments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<UpdateEquipment>,
) -> AppResult<Json<Equipment>> {
    let equipment = state.services.equipment.update(&ctx, id, &data).await?;
    Ok(Json(equipment))
}

/// Delete equipment and its transactions
#[utoipa::path(
    delete,
    path = "/equipments/{id}",
    tag = "equipments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.equipment.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Transaction history of one equipment, newest first
#[utoipa::path(
    get,
    path = "/equipments/{id}/transactions",
    tag = "equipments",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Transactions", body = Vec<Transaction>),
        (status = 404, description = "Equipment not found")
    )
)]
pub async fn list_transactions(
    State(state): State<AppState>,
    AuthenticatedUser(_ctx): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<Transaction>>> {
    let transactions = state.services.equipment.history(id).await?;
    Ok(Json(transactions))
}

//! API handlers for Eqtrack REST endpoints

pub mod auth;
pub mod dashboard;
pub mod equipment;
pub mod health;
pub mod logs;
pub mod openapi;
pub mod profiles;
pub mod transactions;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::SessionContext, AppState};

/// Extractor for the acting user's session, from the bearer token
pub struct AuthenticatedUser(pub SessionContext);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        let ctx = state.services.auth.authenticate(bearer.token()).await?;
        Ok(AuthenticatedUser(ctx))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Session
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/signout", post(auth::sign_out))
        .route("/auth/me", get(auth::me))
        // Profiles
        .route("/profiles", get(profiles::list_profiles))
        .route("/profiles/:id", get(profiles::get_profile))
        // Equipment
        .route(
            "/equipments",
            get(equipment::list_equipments).post(equipment::create_equipment),
        )
        .route("/equipments/check-in-all", post(transactions::check_in_all))
        .route(
            "/equipments/:id",
            get(equipment::get_equipment)
                .put(equipment::update_equipment)
                .delete(equipment::delete_equipment),
        )
        .route("/equipments/:id/transactions", get(equipment::list_transactions))
        .route("/equipments/:id/check-out", post(transactions::check_out))
        .route("/equipments/:id/check-in", post(transactions::check_in))
        // Dashboard & audit trail
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/logs", get(logs::list_logs))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, dashboard, equipment, health, logs, profiles, transactions};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Eqtrack API",
        version = "1.0.0",
        description = "Equipment check-out / check-in tracker REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::sign_up,
        auth::sign_in,
        auth::sign_out,
        auth::me,
        // Profiles
        profiles::list_profiles,
        profiles::get_profile,
        // Equipments
        equipment::list_equipments,
        equipment::get_equipment,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        equipment::list_transactions,
        // Transactions
        transactions::check_out,
        transactions::check_in,
        transactions::check_in_all,
        // Dashboard & logs
        dashboard::get_dashboard,
        logs::list_logs,
    ),
    components(
        schemas(
            // Auth
            auth::SignInResponse,
            crate::models::profile::SignUpRequest,
            crate::models::profile::SignInRequest,
            crate::models::SessionContext,
            // Profiles
            crate::models::Profile,
            crate::models::ProfileShort,
            // Equipments
            crate::models::Equipment,
            crate::models::EquipmentView,
            crate::models::EquipmentStatus,
            crate::models::EquipmentAction,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            crate::models::equipment::Dashboard,
            crate::holder::HolderRef,
            // Transactions
            crate::models::Transaction,
            crate::models::TransactionType,
            transactions::CheckInAllResponse,
            // Logs
            crate::models::LogEntry,
            // Health
            health::HealthResponse,
            health::ReadinessResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sign-up, sign-in and sessions"),
        (name = "profiles", description = "User profiles"),
        (name = "equipments", description = "Equipment management"),
        (name = "transactions", description = "Check-out and check-in"),
        (name = "dashboard", description = "Dashboard"),
        (name = "logs", description = "Audit trail")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

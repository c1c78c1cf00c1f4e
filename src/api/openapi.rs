//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, equipment, health, requests, teams, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "GearGuard API",
        version = "1.0.0",
        description = "Equipment maintenance tracking REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        // Users
        users::list_users,
        // Teams
        teams::list_teams,
        teams::get_team,
        teams::create_team,
        teams::update_team,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::list_by_department,
        equipment::list_by_employee,
        equipment::create_equipment,
        equipment::update_equipment,
        equipment::delete_equipment,
        // Requests
        requests::create_request,
        requests::update_status,
        requests::assign_technician,
        requests::kanban,
        requests::calendar,
        requests::reports,
        requests::statuses,
        requests::equipment_requests,
    ),
    components(
        schemas(
            // Enums
            crate::models::enums::Role,
            crate::models::enums::RequestStatus,
            crate::models::enums::RequestCategory,
            crate::models::enums::EquipmentStatus,
            crate::models::enums::Specialization,
            // Users
            crate::models::user::User,
            crate::models::user::UserSummary,
            crate::models::user::RegisterRequest,
            crate::models::user::LoginRequest,
            crate::models::user::AuthResponse,
            // Teams
            crate::models::team::MaintenanceTeam,
            crate::models::team::TeamSummary,
            crate::models::team::CreateTeam,
            crate::models::team::UpdateTeam,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::EquipmentSummary,
            crate::models::equipment::Warranty,
            crate::models::equipment::CreateEquipment,
            crate::models::equipment::UpdateEquipment,
            // Requests
            crate::models::request::MaintenanceRequest,
            crate::models::request::RequestDetails,
            crate::models::request::CreateMaintenanceRequest,
            crate::models::request::UpdateStatusRequest,
            crate::models::request::AssignTechnicianRequest,
            crate::models::request::EquipmentRequests,
            crate::maintenance::lifecycle::TransitionRule,
            crate::maintenance::reports::Reports,
            crate::maintenance::reports::TeamReport,
            crate::maintenance::reports::DepartmentReport,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Users"),
        (name = "teams", description = "Maintenance teams"),
        (name = "equipment", description = "Equipment management"),
        (name = "requests", description = "Maintenance requests, board, calendar and reports")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by secured paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

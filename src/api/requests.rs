//! Maintenance request endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    maintenance::{
        access::Operation,
        kanban::KanbanBoard,
        lifecycle::TransitionRule,
        reports::Reports,
    },
    models::request::{
        AssignTechnicianRequest, CreateMaintenanceRequest, EquipmentRequests, MaintenanceRequest,
        RequestDetails, UpdateStatusRequest,
    },
};

use super::{ApiResponse, AppJson, AppPath, AuthenticatedUser};

/// Create a maintenance request
///
/// Team and technician are copied from the equipment; a scheduled date makes the
/// request Preventive.
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    request_body = CreateMaintenanceRequest,
    responses(
        (status = 201, description = "Request created", body = MaintenanceRequest),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateMaintenanceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MaintenanceRequest>>)> {
    claims.require(Operation::CreateRequest)?;
    let request = state.services.requests.create(claims.user_id, data).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(request)))
}

/// Change request status
#[utoipa::path(
    put,
    path = "/requests/{id}/status",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = MaintenanceRequest),
        (status = 400, description = "Transition not allowed", body = crate::error::ErrorResponse),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<UpdateStatusRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceRequest>>> {
    claims.require(Operation::UpdateRequestStatus)?;
    let request = state
        .services
        .requests
        .update_status(id, &data.status, data.duration_hours)
        .await?;
    Ok(ApiResponse::ok(request))
}

/// Assign or clear the technician
#[utoipa::path(
    put,
    path = "/requests/{id}/assign",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = AssignTechnicianRequest,
    responses(
        (status = 200, description = "Technician assigned", body = MaintenanceRequest),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Request or user not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_technician(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<AssignTechnicianRequest>,
) -> AppResult<Json<ApiResponse<MaintenanceRequest>>> {
    claims.require(Operation::AssignTechnician)?;
    let request = state
        .services
        .requests
        .assign_technician(id, data.technician_id)
        .await?;
    Ok(ApiResponse::ok(request))
}

/// Requests grouped by status
#[utoipa::path(
    get,
    path = "/requests/kanban",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Object keyed by status label, each holding requests newest first")
    )
)]
pub async fn kanban(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<KanbanBoard<RequestDetails>>>> {
    claims.require(Operation::ViewKanban)?;
    let board = state.services.requests.kanban().await?;
    Ok(ApiResponse::ok(board))
}

/// Scheduled preventive requests
#[utoipa::path(
    get,
    path = "/requests/calendar",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Preventive requests, earliest first", body = Vec<RequestDetails>)
    )
)]
pub async fn calendar(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<RequestDetails>>>> {
    claims.require(Operation::ViewCalendar)?;
    let requests = state.services.requests.calendar().await?;
    Ok(ApiResponse::ok(requests))
}

/// Per-team and per-department statistics
#[utoipa::path(
    get,
    path = "/requests/reports",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reports", body = Reports),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn reports(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Reports>>> {
    claims.require(Operation::ViewReports)?;
    let reports = state.services.requests.reports().await?;
    Ok(ApiResponse::ok(reports))
}

/// The status transition table
#[utoipa::path(
    get,
    path = "/requests/statuses",
    tag = "requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Allowed moves per status", body = Vec<TransitionRule>)
    )
)]
pub async fn statuses(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<TransitionRule>>>> {
    claims.require(Operation::ViewTransitionTable)?;
    Ok(ApiResponse::ok(state.services.requests.transition_table()))
}

/// Requests raised against one piece of equipment
#[utoipa::path(
    get,
    path = "/equipment/{id}/requests",
    tag = "requests",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Requests newest first with open count", body = EquipmentRequests),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn equipment_requests(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<EquipmentRequests>>> {
    claims.require(Operation::ViewEquipmentRequests)?;
    let view = state.services.requests.for_equipment(id).await?;
    Ok(ApiResponse::ok(view))
}

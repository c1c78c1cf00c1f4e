//! Equipment API endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    maintenance::access::Operation,
    models::equipment::{CreateEquipment, Equipment, UpdateEquipment},
    AppState,
};

use super::{ApiResponse, AppJson, AppPath, AuthenticatedUser};

/// List all equipment
#[utoipa::path(
    get,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<Equipment>>>> {
    claims.require(Operation::ListEquipment)?;
    let equipment = state.services.equipment.list().await?;
    Ok(ApiResponse::ok(equipment))
}

/// Get equipment by ID
#[utoipa::path(
    get,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment details", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    claims.require(Operation::ListEquipment)?;
    let equipment = state.services.equipment.get_by_id(id).await?;
    Ok(ApiResponse::ok(equipment))
}

/// Equipment of one department
#[utoipa::path(
    get,
    path = "/equipment/department/{department}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("department" = String, Path, description = "Department name")),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_by_department(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(department): AppPath<String>,
) -> AppResult<Json<ApiResponse<Vec<Equipment>>>> {
    claims.require(Operation::ViewEquipmentByDepartment)?;
    let equipment = state.services.equipment.list_by_department(&department).await?;
    Ok(ApiResponse::ok(equipment))
}

/// Equipment assigned to one employee
#[utoipa::path(
    get,
    path = "/equipment/employee/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Employee user ID")),
    responses(
        (status = 200, description = "Equipment list", body = Vec<Equipment>)
    )
)]
pub async fn list_by_employee(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Equipment>>>> {
    claims.require(Operation::ViewEquipmentByEmployee)?;
    let equipment = state.services.equipment.list_by_employee(id).await?;
    Ok(ApiResponse::ok(equipment))
}

/// Create equipment
#[utoipa::path(
    post,
    path = "/equipment",
    tag = "equipment",
    security(("bearer_auth" = [])),
    request_body = CreateEquipment,
    responses(
        (status = 201, description = "Equipment created", body = Equipment),
        (status = 400, description = "Invalid input or duplicate serial number", body = crate::error::ErrorResponse),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateEquipment>,
) -> AppResult<(StatusCode, Json<ApiResponse<Equipment>>)> {
    claims.require(Operation::CreateEquipment)?;
    let equipment = state.services.equipment.create(data).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(equipment)))
}

/// Update equipment
#[utoipa::path(
    put,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    request_body = UpdateEquipment,
    responses(
        (status = 200, description = "Equipment updated", body = Equipment),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<UpdateEquipment>,
) -> AppResult<Json<ApiResponse<Equipment>>> {
    claims.require(Operation::UpdateEquipment)?;
    let equipment = state.services.equipment.update(id, data).await?;
    Ok(ApiResponse::ok(equipment))
}

/// Delete equipment
#[utoipa::path(
    delete,
    path = "/equipment/{id}",
    tag = "equipment",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Equipment ID")),
    responses(
        (status = 204, description = "Equipment deleted"),
        (status = 400, description = "Equipment still has requests", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    claims.require(Operation::DeleteEquipment)?;
    state.services.equipment.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

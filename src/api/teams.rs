//! Maintenance team endpoints

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::{
    error::AppResult,
    maintenance::access::Operation,
    models::team::{CreateTeam, MaintenanceTeam, UpdateTeam},
};

use super::{ApiResponse, AppJson, AppPath, AuthenticatedUser};

/// List teams
#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Team list", body = Vec<MaintenanceTeam>)
    )
)]
pub async fn list_teams(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<MaintenanceTeam>>>> {
    claims.require(Operation::ListTeams)?;
    let teams = state.services.teams.list().await?;
    Ok(ApiResponse::ok(teams))
}

/// Get a team by ID
#[utoipa::path(
    get,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team details", body = MaintenanceTeam),
        (status = 404, description = "Team not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<MaintenanceTeam>>> {
    claims.require(Operation::ListTeams)?;
    let team = state.services.teams.get_by_id(id).await?;
    Ok(ApiResponse::ok(team))
}

/// Create a team
#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    security(("bearer_auth" = [])),
    request_body = CreateTeam,
    responses(
        (status = 201, description = "Team created", body = MaintenanceTeam),
        (status = 403, description = "Role not allowed", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppJson(data): AppJson<CreateTeam>,
) -> AppResult<(StatusCode, Json<ApiResponse<MaintenanceTeam>>)> {
    claims.require(Operation::CreateTeam)?;
    let team = state.services.teams.create(data).await?;
    Ok((StatusCode::CREATED, ApiResponse::ok(team)))
}

/// Update a team
#[utoipa::path(
    put,
    path = "/teams/{id}",
    tag = "teams",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = UpdateTeam,
    responses(
        (status = 200, description = "Team updated", body = MaintenanceTeam),
        (status = 404, description = "Team not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_team(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(data): AppJson<UpdateTeam>,
) -> AppResult<Json<ApiResponse<MaintenanceTeam>>> {
    claims.require(Operation::UpdateTeam)?;
    let team = state.services.teams.update(id, data).await?;
    Ok(ApiResponse::ok(team))
}

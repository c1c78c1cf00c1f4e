//! User endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, maintenance::access::Operation, models::user::User};

use super::{ApiResponse, AuthenticatedUser};

/// List users (password hashes are never serialized)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    claims.require(Operation::ListUsers)?;
    let users = state.services.users.list().await?;
    Ok(ApiResponse::ok(users))
}

//! Admin-only handlers: dashboard statistics, user management, audit log.
//!
//! Every mutation writes an ADMIN_ACTION row to the system log.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use gather_core::error::CoreError;
use gather_core::roles::is_valid_role;
use gather_core::types::DbId;
use gather_db::models::system_log::LogListQuery;
use gather_db::models::user::{UserListQuery, UserResponse};
use gather_db::repositories::{StatsRepo, SystemLogRepo, UserRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::venue::log_admin_action;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: String,
}

/// GET /api/v1/admin/stats
///
/// Headline counts plus role and category distributions.
pub async fn stats(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let overview = StatsRepo::overview(&state.pool).await?;
    let roles = StatsRepo::role_distribution(&state.pool).await?;
    let categories = StatsRepo::category_distribution(&state.pool).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "overview": overview,
            "role_distribution": roles,
            "category_distribution": categories,
        }
    })))
}

/// GET /api/v1/admin/users?page=&limit=&search=&role=
///
/// Paginated user listing with registration counts.
pub async fn list_users(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let (users, total) = UserRepo::list_admin(&state.pool, &params).await?;
    Ok(Json(serde_json::json!({
        "data": { "users": users, "total": total }
    })))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change a user's role.
pub async fn update_user_role(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateRoleRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    if !is_valid_role(&input.role) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "unknown role: {}",
            input.role
        ))));
    }

    let user = UserRepo::update_role(&state.pool, user_id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    log_admin_action(
        &state,
        auth.user_id,
        format!("Changed role of user {user_id} to {}", input.role),
    )
    .await;

    Ok(Json(DataResponse { data: user.into() }))
}

/// DELETE /api/v1/admin/users/{id}
///
/// Delete a user. Admins cannot delete their own account, so the system
/// always retains at least the acting admin. Returns 204 No Content.
pub async fn delete_user(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if user_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot delete your own account".into(),
        )));
    }

    let deleted = UserRepo::delete(&state.pool, user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }

    log_admin_action(&state, auth.user_id, format!("Deleted user {user_id}")).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/logs?page=&limit=&type=
///
/// Paginated system log, newest first.
pub async fn list_logs(
    RequireAdmin(_auth): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LogListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let logs = SystemLogRepo::list(&state.pool, &params).await?;
    Ok(Json(serde_json::json!({ "data": logs })))
}

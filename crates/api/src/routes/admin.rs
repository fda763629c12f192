//! Route definitions for the `/admin` resource. All admin-only.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /admin/stats            -> stats
/// GET    /admin/users            -> list_users
/// PUT    /admin/users/{id}/role  -> update_user_role
/// DELETE /admin/users/{id}       -> delete_user
/// GET    /admin/logs             -> list_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/stats", get(admin::stats))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/{id}/role", put(admin::update_user_role))
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/logs", get(admin::list_logs))
}

//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication and operate on the caller's own
//! notifications.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /notifications            -> list
/// PUT    /notifications/{id}/read  -> mark_read
/// DELETE /notifications/{id}       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(notification::list))
        .route("/notifications/{id}/read", put(notification::mark_read))
        .route("/notifications/{id}", delete(notification::delete))
}

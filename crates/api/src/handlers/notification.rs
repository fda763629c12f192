//! Handlers for the `/notifications` resource.
//!
//! All endpoints operate on the authenticated user's own notifications.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gather_core::error::CoreError;
use gather_core::types::DbId;
use gather_db::models::notification::{Notification, NotificationWithEvent};
use gather_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// The authenticated user's notifications with event titles, newest first.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<NotificationWithEvent>>>> {
    let notifications = NotificationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: notifications,
    }))
}

/// PUT /api/v1/notifications/{id}/read
///
/// Mark one of the user's notifications as read. 404 when the notification
/// does not exist or belongs to someone else.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = NotificationRepo::mark_read(&state.pool, notification_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }))?;
    Ok(Json(DataResponse { data: notification }))
}

/// DELETE /api/v1/notifications/{id}
///
/// Delete one of the user's notifications. Returns 204 No Content.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = NotificationRepo::delete(&state.pool, notification_id, auth.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id: notification_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}

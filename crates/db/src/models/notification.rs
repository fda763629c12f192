//! Notification entity model and DTOs.

use gather_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A notification row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// A notification joined with its event's title, for the user listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationWithEvent {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub kind: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub event_title: Option<String>,
}

/// DTO for creating a notification.
pub struct CreateNotification {
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub kind: String,
    pub message: String,
}

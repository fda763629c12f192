//! Repository for the `notifications` table.

use gather_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::notification::{CreateNotification, Notification, NotificationWithEvent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, event_id, kind, message, is_read, created_at";

/// Provides CRUD operations for in-app notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification inside the caller's transaction.
    ///
    /// The dispatcher pairs this with an outbox enqueue so the notification
    /// row and its email intent commit or roll back together.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (user_id, event_id, kind, message)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(input.event_id)
            .bind(&input.kind)
            .bind(&input.message)
            .fetch_one(&mut **tx)
            .await
    }

    /// A user's notifications with event titles, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<NotificationWithEvent>, sqlx::Error> {
        sqlx::query_as::<_, NotificationWithEvent>(
            "SELECT n.id, n.user_id, n.event_id, n.kind, n.message, n.is_read, n.created_at,
                    e.title AS event_title
             FROM notifications n
             LEFT JOIN events e ON n.event_id = e.id
             WHERE n.user_id = $1
             ORDER BY n.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Mark one of the user's notifications as read.
    ///
    /// Returns `None` when the notification does not exist or belongs to
    /// someone else.
    pub async fn mark_read(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "UPDATE notifications SET is_read = true
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete one of the user's notifications. Returns `true` if a row was
    /// deleted.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

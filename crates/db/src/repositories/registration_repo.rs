//! Repository for the `registrations` table.
//!
//! Registration and cancellation are multi-step workflows (capacity check +
//! insert, delete + waitlist promotion). Each runs in a single transaction
//! that locks the parent event row, so concurrent requests against the same
//! event serialize instead of racing the capacity check.

use gather_core::capacity::CapacitySnapshot;
use gather_core::registration::RegistrationStatus;
use gather_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::registration::{
    CancelOutcome, RegisterOutcome, Registration, RegistrationWithEvent, RegistrationWithUser,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, user_id, status, registered_at";

/// Provides registration lifecycle operations.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Register a user for an event, atomically.
    ///
    /// Locks the event row, rejects duplicates, counts confirmed seats under
    /// the lock, and inserts the row as `confirmed` or `waitlist`. Two
    /// concurrent registrations can no longer both observe a free seat.
    pub async fn register(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<RegisterOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let max_participants: Option<i32> =
            sqlx::query_scalar("SELECT max_participants FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(max_participants) = max_participants else {
            return Ok(RegisterOutcome::EventNotFound);
        };

        let existing: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM registrations WHERE event_id = $1 AND user_id = $2")
                .bind(event_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        if existing.is_some() {
            return Ok(RegisterOutcome::AlreadyRegistered);
        }

        let confirmed: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let status = CapacitySnapshot::new(max_participants as i64, confirmed).placement();

        let insert_query = format!(
            "INSERT INTO registrations (event_id, user_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let registration = sqlx::query_as::<_, Registration>(&insert_query)
            .bind(event_id)
            .bind(user_id)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(RegisterOutcome::Registered(registration))
    }

    /// Cancel a user's registration, atomically.
    ///
    /// Deletes the row; when the deleted registration held a confirmed seat,
    /// promotes the oldest waitlisted registration inside the same
    /// transaction, so a crash can never leave the freed seat unfilled.
    pub async fn cancel(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<CancelOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Same lock the register path takes. A promotion must not race a
        // concurrent registration's capacity count.
        sqlx::query("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let delete_query = format!(
            "DELETE FROM registrations WHERE event_id = $1 AND user_id = $2 RETURNING {COLUMNS}"
        );
        let deleted = sqlx::query_as::<_, Registration>(&delete_query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(deleted) = deleted else {
            return Ok(CancelOutcome::NotRegistered);
        };

        let mut promoted = None;
        if deleted.status == RegistrationStatus::Confirmed.as_str() {
            promoted = Self::promote_in_tx(&mut tx, event_id).await?;
        }

        tx.commit().await?;
        Ok(CancelOutcome::Cancelled { promoted })
    }

    /// Flip the oldest waitlisted registration for the event to confirmed.
    ///
    /// No-op returning `None` when the waitlist is empty.
    async fn promote_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!(
            "UPDATE registrations SET status = $2
             WHERE id = (
                 SELECT id FROM registrations
                 WHERE event_id = $1 AND status = $3
                 ORDER BY registered_at
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(event_id)
            .bind(RegistrationStatus::Confirmed.as_str())
            .bind(RegistrationStatus::Waitlist.as_str())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find a user's registration for an event.
    pub async fn find_for_user(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM registrations WHERE event_id = $1 AND user_id = $2");
        sqlx::query_as::<_, Registration>(&query)
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// A user's registrations joined with event and venue details, ordered
    /// by event start.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RegistrationWithEvent>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationWithEvent>(
            "SELECT r.id, r.event_id, r.user_id, r.status, r.registered_at,
                    e.title, e.start_time, e.category, v.name AS venue_name
             FROM registrations r
             JOIN events e ON r.event_id = e.id
             JOIN venues v ON e.venue_id = v.id
             WHERE r.user_id = $1
             ORDER BY e.start_time",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// An event's registrations joined with attendee emails, oldest first.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<RegistrationWithUser>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationWithUser>(
            "SELECT r.id, r.event_id, r.user_id, r.status, r.registered_at, u.email
             FROM registrations r
             JOIN users u ON r.user_id = u.id
             WHERE r.event_id = $1
             ORDER BY r.registered_at",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }

    /// User ids holding a confirmed seat for the event, for notification
    /// fan-out.
    pub async fn confirmed_user_ids(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM registrations WHERE event_id = $1 AND status = $2",
        )
        .bind(event_id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .fetch_all(pool)
        .await
    }
}

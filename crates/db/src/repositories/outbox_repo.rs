//! Repository for the `email_outbox` table.

use gather_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::outbox::{EnqueueEmail, OutboxEmail, STATUS_FAILED, STATUS_PENDING, STATUS_SENT};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, notification_id, recipient, subject, body, status, \
                        attempts, last_error, next_attempt_at, created_at, sent_at";

/// Provides queue operations for outbound email.
pub struct OutboxRepo;

impl OutboxRepo {
    /// Enqueue an email inside the caller's transaction.
    pub async fn enqueue_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &EnqueueEmail,
    ) -> Result<OutboxEmail, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_outbox (notification_id, recipient, subject, body)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxEmail>(&query)
            .bind(input.notification_id)
            .bind(&input.recipient)
            .bind(&input.subject)
            .bind(&input.body)
            .fetch_one(&mut **tx)
            .await
    }

    /// Atomically claim the next due email for delivery.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// double-send. Claiming increments `attempts` and pushes
    /// `next_attempt_at` out by `lease_secs`, which re-exposes the row to
    /// other workers if this one dies mid-send.
    pub async fn claim_next(
        pool: &PgPool,
        lease_secs: i64,
    ) -> Result<Option<OutboxEmail>, sqlx::Error> {
        let query = format!(
            "UPDATE email_outbox
             SET attempts = attempts + 1,
                 next_attempt_at = NOW() + make_interval(secs => $2)
             WHERE id = (
                 SELECT id FROM email_outbox
                 WHERE status = $1 AND next_attempt_at <= NOW()
                 ORDER BY next_attempt_at
                 LIMIT 1
                 FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxEmail>(&query)
            .bind(STATUS_PENDING)
            .bind(lease_secs as f64)
            .fetch_optional(pool)
            .await
    }

    /// Mark a claimed email as delivered.
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE email_outbox
             SET status = $2, sent_at = NOW(), last_error = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(STATUS_SENT)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a delivery failure.
    ///
    /// With `retry_at` set the row stays pending and becomes due again at
    /// that time; without it the row is marked failed for good.
    pub async fn record_failure(
        pool: &PgPool,
        id: DbId,
        error: &str,
        retry_at: Option<Timestamp>,
    ) -> Result<(), sqlx::Error> {
        match retry_at {
            Some(retry_at) => {
                sqlx::query(
                    "UPDATE email_outbox
                     SET last_error = $2, next_attempt_at = $3
                     WHERE id = $1",
                )
                .bind(id)
                .bind(error)
                .bind(retry_at)
                .execute(pool)
                .await?;
            }
            None => {
                sqlx::query(
                    "UPDATE email_outbox
                     SET status = $2, last_error = $3
                     WHERE id = $1",
                )
                .bind(id)
                .bind(STATUS_FAILED)
                .bind(error)
                .execute(pool)
                .await?;
            }
        }
        Ok(())
    }

    /// Find an outbox row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OutboxEmail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_outbox WHERE id = $1");
        sqlx::query_as::<_, OutboxEmail>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All queued emails addressed to a recipient, oldest first.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient: &str,
    ) -> Result<Vec<OutboxEmail>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_outbox WHERE recipient = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, OutboxEmail>(&query)
            .bind(recipient)
            .fetch_all(pool)
            .await
    }
}

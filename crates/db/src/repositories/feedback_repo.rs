//! Repository for the `feedback` table.
//!
//! Every write recomputes the owning event's `average_rating` in the same
//! transaction, so the stored mean never drifts from the feedback rows.

use gather_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::feedback::{Feedback, FeedbackStats, FeedbackWithAuthor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, event_id, user_id, rating, comment, created_at";

/// Maximum page size for the event listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for the event listing.
const DEFAULT_LIMIT: i64 = 10;

/// Provides feedback operations.
pub struct FeedbackRepo;

impl FeedbackRepo {
    /// Insert feedback and refresh the event's average rating, atomically.
    ///
    /// A duplicate (event, user) pair surfaces as a unique-constraint
    /// violation from the insert.
    pub async fn create_and_recompute(
        pool: &PgPool,
        event_id: DbId,
        user_id: DbId,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Feedback, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert_query = format!(
            "INSERT INTO feedback (event_id, user_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let feedback = sqlx::query_as::<_, Feedback>(&insert_query)
            .bind(event_id)
            .bind(user_id)
            .bind(rating)
            .bind(comment)
            .fetch_one(&mut *tx)
            .await?;

        Self::recompute_average_in_tx(&mut tx, event_id).await?;

        tx.commit().await?;
        Ok(feedback)
    }

    /// Update a user's own feedback and refresh the event's average rating,
    /// atomically. The comment is replaced, not merged.
    ///
    /// Returns `None` when no feedback with this id belongs to the user.
    pub async fn update_and_recompute(
        pool: &PgPool,
        feedback_id: DbId,
        user_id: DbId,
        rating: i32,
        comment: Option<&str>,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let update_query = format!(
            "UPDATE feedback SET rating = $3, comment = $4
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Feedback>(&update_query)
            .bind(feedback_id)
            .bind(user_id)
            .bind(rating)
            .bind(comment)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(updated) = updated else {
            return Ok(None);
        };

        Self::recompute_average_in_tx(&mut tx, updated.event_id).await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Persist the mean of all ratings for the event, rounded to two
    /// decimals, onto `events.average_rating`.
    async fn recompute_average_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE events
             SET average_rating = (
                 SELECT ROUND(AVG(rating), 2)::float8
                 FROM feedback
                 WHERE event_id = $1
             )
             WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Find feedback by id, scoped to its author.
    pub async fn find_by_id_for_user(
        pool: &PgPool,
        feedback_id: DbId,
        user_id: DbId,
    ) -> Result<Option<Feedback>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM feedback WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Feedback>(&query)
            .bind(feedback_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Paginated feedback for an event with author emails, newest first.
    ///
    /// Returns the page of rows plus the total count for the event.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<(Vec<FeedbackWithAuthor>, i64), sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let rows = sqlx::query_as::<_, FeedbackWithAuthor>(
            "SELECT f.id, f.event_id, f.user_id, f.rating, f.comment, f.created_at,
                    u.email AS user_email
             FROM feedback f
             JOIN users u ON f.user_id = u.id
             WHERE f.event_id = $1
             ORDER BY f.created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }

    /// Aggregate rating statistics for an event.
    pub async fn stats(pool: &PgPool, event_id: DbId) -> Result<FeedbackStats, sqlx::Error> {
        sqlx::query_as::<_, FeedbackStats>(
            "SELECT
                COUNT(*) AS total_feedback,
                ROUND(AVG(rating), 2)::float8 AS average_rating,
                COUNT(*) FILTER (WHERE rating = 5) AS five_star,
                COUNT(*) FILTER (WHERE rating = 4) AS four_star,
                COUNT(*) FILTER (WHERE rating = 3) AS three_star,
                COUNT(*) FILTER (WHERE rating = 2) AS two_star,
                COUNT(*) FILTER (WHERE rating = 1) AS one_star
             FROM feedback
             WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_one(pool)
        .await
    }
}

//! Repository for the `venues` table.

use chrono::NaiveDate;
use gather_core::types::DbId;
use sqlx::PgPool;

use crate::models::venue::{CreateVenue, UpdateVenue, Venue, VenueWithEventCount};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, capacity, location, facilities, created_at";

/// Provides CRUD operations for venues.
pub struct VenueRepo;

impl VenueRepo {
    /// Insert a new venue, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVenue) -> Result<Venue, sqlx::Error> {
        let query = format!(
            "INSERT INTO venues (name, capacity, location, facilities)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(&input.name)
            .bind(input.capacity)
            .bind(&input.location)
            .bind(&input.facilities)
            .fetch_one(pool)
            .await
    }

    /// Find a venue by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM venues WHERE id = $1");
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all venues with each one's event count for the given date
    /// (today when `None`).
    pub async fn list_with_event_counts(
        pool: &PgPool,
        date: Option<NaiveDate>,
    ) -> Result<Vec<VenueWithEventCount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS},
                (SELECT COUNT(*) FROM events e
                 WHERE e.venue_id = venues.id
                   AND e.start_time::date = COALESCE($1, CURRENT_DATE)
                ) AS events_count
             FROM venues
             ORDER BY name"
        );
        sqlx::query_as::<_, VenueWithEventCount>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    /// Update a venue. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVenue,
    ) -> Result<Option<Venue>, sqlx::Error> {
        let query = format!(
            "UPDATE venues SET
                name = COALESCE($2, name),
                capacity = COALESCE($3, capacity),
                location = COALESCE($4, location),
                facilities = COALESCE($5, facilities)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Venue>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.capacity)
            .bind(&input.location)
            .bind(&input.facilities)
            .fetch_optional(pool)
            .await
    }

    /// True when the venue hosts at least one event with a future start.
    ///
    /// Such venues must not be deleted.
    pub async fn has_future_events(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM events WHERE venue_id = $1 AND start_time > NOW()",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(count > 0)
    }

    /// Delete a venue. Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

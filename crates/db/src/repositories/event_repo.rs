//! Repository for the `events` table.

use gather_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::event::{CapacityRow, CreateEvent, Event, UpdateEvent, VenueBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, category, organizer_id, venue_id, \
                        start_time, duration_mins, max_participants, average_rating, \
                        created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        organizer_id: DbId,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (title, description, category, organizer_id, venue_id,
                 start_time, duration_mins, max_participants)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(organizer_id)
            .bind(input.venue_id)
            .bind(input.start_time)
            .bind(input.duration_mins)
            .bind(input.max_participants)
            .fetch_one(pool)
            .await
    }

    /// Find an event by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all events ordered by start time.
    pub async fn list(pool: &PgPool) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events ORDER BY start_time");
        sqlx::query_as::<_, Event>(&query).fetch_all(pool).await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                venue_id = COALESCE($5, venue_id),
                start_time = COALESCE($6, start_time),
                duration_mins = COALESCE($7, duration_mins),
                max_participants = COALESCE($8, max_participants),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(input.venue_id)
            .bind(input.start_time)
            .bind(input.duration_mins)
            .bind(input.max_participants)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event. Registrations, feedback and notifications cascade.
    ///
    /// Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Seats taken vs `max_participants` for one event.
    ///
    /// Only `confirmed` registrations count. Returns `None` when the event
    /// id does not resolve.
    pub async fn capacity(pool: &PgPool, id: DbId) -> Result<Option<CapacityRow>, sqlx::Error> {
        sqlx::query_as::<_, CapacityRow>(
            "SELECT e.max_participants,
                    COUNT(r.id) AS confirmed_count
             FROM events e
             LEFT JOIN registrations r ON e.id = r.event_id AND r.status = 'confirmed'
             WHERE e.id = $1
             GROUP BY e.id, e.max_participants",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Check whether a venue is free for the half-open interval
    /// `[start, end)`.
    ///
    /// Conflict rule: an existing event at the venue conflicts iff
    /// `existing_start < candidate_end AND existing_end > candidate_start`.
    /// Touching endpoints (one event ending exactly when another begins) do
    /// not conflict. `exclude_event_id` skips the event being updated.
    pub async fn is_venue_available(
        pool: &PgPool,
        venue_id: DbId,
        start: Timestamp,
        end: Timestamp,
        exclude_event_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM events
             WHERE venue_id = $1
               AND id != COALESCE($4, 0)
               AND start_time < $3
               AND start_time + make_interval(mins => duration_mins) > $2",
        )
        .bind(venue_id)
        .bind(start)
        .bind(end)
        .bind(exclude_event_id)
        .fetch_one(pool)
        .await?;
        Ok(conflicts == 0)
    }

    /// Events booked at a venue within `[from, to]`, oldest first, with the
    /// computed end time.
    pub async fn venue_schedule(
        pool: &PgPool,
        venue_id: DbId,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<VenueBooking>, sqlx::Error> {
        sqlx::query_as::<_, VenueBooking>(
            "SELECT id, title, start_time, duration_mins,
                    start_time + make_interval(mins => duration_mins) AS end_time
             FROM events
             WHERE venue_id = $1
               AND start_time BETWEEN $2 AND $3
             ORDER BY start_time",
        )
        .bind(venue_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Events whose start time falls within `[from, to]`.
    ///
    /// The reminder scheduler calls this with a 23-24 hour lookahead window.
    pub async fn starting_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE start_time BETWEEN $1 AND $2
             ORDER BY start_time"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }
}

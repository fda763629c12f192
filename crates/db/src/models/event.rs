//! Event entity model and DTOs.

use gather_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An event row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub organizer_id: DbId,
    pub venue_id: DbId,
    pub start_time: Timestamp,
    pub duration_mins: i32,
    pub max_participants: i32,
    pub average_rating: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new event. The organizer comes from the caller.
#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub venue_id: DbId,
    pub start_time: Timestamp,
    pub duration_mins: i32,
    pub max_participants: i32,
}

/// DTO for updating an event. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub venue_id: Option<DbId>,
    pub start_time: Option<Timestamp>,
    pub duration_mins: Option<i32>,
    pub max_participants: Option<i32>,
}

/// Seats taken vs seats available, straight from the capacity query.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CapacityRow {
    pub max_participants: i32,
    pub confirmed_count: i64,
}

/// One booked slot in a venue's schedule, with the computed end time.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VenueBooking {
    pub id: DbId,
    pub title: String,
    pub start_time: Timestamp,
    pub duration_mins: i32,
    pub end_time: Timestamp,
}

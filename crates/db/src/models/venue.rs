//! Venue entity model and DTOs.

use gather_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A venue row from the `venues` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Venue {
    pub id: DbId,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub facilities: Vec<String>,
    pub created_at: Timestamp,
}

/// A venue plus how many events it hosts on a given date.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VenueWithEventCount {
    pub id: DbId,
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub facilities: Vec<String>,
    pub created_at: Timestamp,
    pub events_count: i64,
}

/// DTO for creating a new venue.
#[derive(Debug, Deserialize)]
pub struct CreateVenue {
    pub name: String,
    pub capacity: i32,
    pub location: String,
    pub facilities: Vec<String>,
}

/// DTO for updating a venue. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateVenue {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub location: Option<String>,
    pub facilities: Option<Vec<String>>,
}

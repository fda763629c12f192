//! Registration entity model and read models.

use gather_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A registration row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub registered_at: Timestamp,
}

/// A user's registration joined with its event and venue, for the
/// "my registrations" listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegistrationWithEvent {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub registered_at: Timestamp,
    pub title: String,
    pub start_time: Timestamp,
    pub category: String,
    pub venue_name: String,
}

/// An event's registration joined with the attendee's email, for the
/// organizer-facing listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RegistrationWithUser {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub status: String,
    pub registered_at: Timestamp,
    pub email: String,
}

/// Result of an atomic registration attempt.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// A new row was inserted with the contained status.
    Registered(Registration),
    /// A registration for this (event, user) pair already exists.
    AlreadyRegistered,
    /// The event id did not resolve.
    EventNotFound,
}

/// Result of an atomic cancellation.
#[derive(Debug)]
pub enum CancelOutcome {
    /// The registration was deleted. When cancelling a confirmed seat with a
    /// non-empty waitlist, `promoted` holds the registration that took it.
    Cancelled { promoted: Option<Registration> },
    /// No registration existed for this (event, user) pair.
    NotRegistered,
}

//! Handlers for the `/events` resource.
//!
//! Creating or rescheduling an event always goes through the venue
//! availability check; updates that touch the schedule re-check with the
//! event itself excluded, and fan an EVENT_UPDATE notification out to every
//! confirmed attendee after the row is written.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gather_core::capacity::validate_max_participants;
use gather_core::categories::is_valid_category;
use gather_core::error::CoreError;
use gather_core::schedule::TimeSlot;
use gather_core::types::{DbId, Timestamp};
use gather_db::models::event::{CreateEvent, Event, UpdateEvent};
use gather_db::repositories::{EventRepo, VenueRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireOrganizer;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Read endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/events
///
/// List all events ordered by start time.
pub async fn list_events(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = EventRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: events }))
}

/// GET /api/v1/events/{id}
pub async fn get_event(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;
    Ok(Json(DataResponse { data: event }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/events
///
/// Create an event (admin or organizer). Rejected with 409 when the venue is
/// already booked for an overlapping interval.
pub async fn create_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    validate_event_fields(&input.category, input.duration_mins, input.max_participants)?;

    if VenueRepo::find_by_id(&state.pool, input.venue_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id: input.venue_id,
        }));
    }

    let slot = event_slot(input.start_time, input.duration_mins)?;
    ensure_venue_free(&state, input.venue_id, slot, None).await?;

    let event = EventRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(event_id = event.id, organizer_id = auth.user_id, "Event created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: event })))
}

/// PUT /api/v1/events/{id}
///
/// Update an event (admin or the owning organizer). When the venue or the
/// schedule changes, availability is re-checked with this event excluded.
/// Confirmed attendees are notified of what changed.
pub async fn update_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<DataResponse<Event>>> {
    let existing = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;
    ensure_owner_or_admin(&auth, &existing)?;

    if let Some(category) = &input.category {
        if !is_valid_category(category) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "unknown category: {category}"
            ))));
        }
    }
    if let Some(duration_mins) = input.duration_mins {
        validate_duration(duration_mins)?;
    }
    if let Some(max_participants) = input.max_participants {
        validate_max_participants(max_participants)?;
    }

    let schedule_changed =
        input.venue_id.is_some() || input.start_time.is_some() || input.duration_mins.is_some();
    if schedule_changed {
        let venue_id = input.venue_id.unwrap_or(existing.venue_id);
        if input.venue_id.is_some()
            && VenueRepo::find_by_id(&state.pool, venue_id).await?.is_none()
        {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Venue",
                id: venue_id,
            }));
        }
        let start = input.start_time.unwrap_or(existing.start_time);
        let duration_mins = input.duration_mins.unwrap_or(existing.duration_mins);
        let slot = event_slot(start, duration_mins)?;
        ensure_venue_free(&state, venue_id, slot, Some(event_id)).await?;
    }

    let changes = change_summary(&input);
    let event = EventRepo::update(&state.pool, event_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    // Fan-out happens after the row is committed. A dispatch failure must not
    // undo the update, so it is logged and swallowed.
    if !changes.is_empty() {
        if let Err(e) = state
            .dispatcher
            .notify_event_update(event.id, &event.title, &changes)
            .await
        {
            tracing::error!(event_id = event.id, error = %e, "Failed to notify attendees of update");
        }
    }

    Ok(Json(DataResponse { data: event }))
}

/// DELETE /api/v1/events/{id}
///
/// Delete an event (admin or the owning organizer). Registrations, feedback
/// and notifications cascade. Returns 204 No Content.
pub async fn delete_event(
    RequireOrganizer(auth): RequireOrganizer,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;
    ensure_owner_or_admin(&auth, &existing)?;

    EventRepo::delete(&state.pool, event_id).await?;
    tracing::info!(event_id, user_id = auth.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Admins may touch any event; organizers only their own.
fn ensure_owner_or_admin(auth: &AuthUser, event: &Event) -> AppResult<()> {
    if auth.role != gather_core::roles::ROLE_ADMIN && event.organizer_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the organizer of this event or an admin may modify it".into(),
        )));
    }
    Ok(())
}

fn validate_event_fields(
    category: &str,
    duration_mins: i32,
    max_participants: i32,
) -> AppResult<()> {
    if !is_valid_category(category) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "unknown category: {category}"
        ))));
    }
    validate_duration(duration_mins)?;
    validate_max_participants(max_participants)?;
    Ok(())
}

fn validate_duration(duration_mins: i32) -> AppResult<()> {
    if duration_mins < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "duration_mins must be at least 1".into(),
        )));
    }
    Ok(())
}

/// The half-open interval an event occupies at its venue.
fn event_slot(start: Timestamp, duration_mins: i32) -> AppResult<TimeSlot> {
    let end = start + chrono::Duration::minutes(duration_mins as i64);
    Ok(TimeSlot::new(start, end)?)
}

async fn ensure_venue_free(
    state: &AppState,
    venue_id: DbId,
    slot: TimeSlot,
    exclude_event_id: Option<DbId>,
) -> AppResult<()> {
    let available =
        EventRepo::is_venue_available(&state.pool, venue_id, slot.start, slot.end, exclude_event_id)
            .await?;
    if !available {
        return Err(AppError::Core(CoreError::Conflict(
            "Venue is already booked for an overlapping time slot".into(),
        )));
    }
    Ok(())
}

/// Human-readable list of the fields an update touches, e.g. `"venue, time"`.
fn change_summary(input: &UpdateEvent) -> String {
    let mut changes = Vec::new();
    if input.title.is_some() {
        changes.push("title");
    }
    if input.description.is_some() {
        changes.push("description");
    }
    if input.category.is_some() {
        changes.push("category");
    }
    if input.venue_id.is_some() {
        changes.push("venue");
    }
    if input.start_time.is_some() || input.duration_mins.is_some() {
        changes.push("time");
    }
    if input.max_participants.is_some() {
        changes.push("capacity");
    }
    changes.join(", ")
}

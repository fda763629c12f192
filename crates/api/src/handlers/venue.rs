//! Handlers for the `/venues` resource.
//!
//! Venue CRUD is admin-only; the listing and the availability view are open
//! to any authenticated user. A venue hosting future events refuses
//! deletion with 409.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use gather_core::error::CoreError;
use gather_core::types::{DbId, Timestamp};
use gather_db::models::event::VenueBooking;
use gather_db::models::system_log::{CreateSystemLog, LOG_TYPE_ADMIN_ACTION};
use gather_db::models::venue::{CreateVenue, UpdateVenue, Venue, VenueWithEventCount};
use gather_db::repositories::{EventRepo, SystemLogRepo, VenueRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /venues`.
#[derive(Debug, Deserialize)]
pub struct VenueListQuery {
    /// Date for the per-venue event count (defaults to today).
    pub date: Option<NaiveDate>,
}

/// Query parameters for the availability view.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Response body for `GET /venues/{id}/availability`.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub venue_id: DbId,
    /// Bookings within the requested window, oldest first.
    pub bookings: Vec<VenueBooking>,
    /// True when nothing is booked in the window.
    pub available: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/venues
///
/// All venues with each one's event count for the requested date.
pub async fn list_venues(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<VenueListQuery>,
) -> AppResult<Json<DataResponse<Vec<VenueWithEventCount>>>> {
    let venues = VenueRepo::list_with_event_counts(&state.pool, params.date).await?;
    Ok(Json(DataResponse { data: venues }))
}

/// GET /api/v1/venues/{id}/availability?start=&end=
///
/// The venue's bookings within `[start, end]`, with computed end times.
pub async fn availability(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
    Query(params): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    ensure_venue_exists(&state, venue_id).await?;

    if params.start >= params.end {
        return Err(AppError::Core(CoreError::Validation(
            "end must be after start".into(),
        )));
    }

    let bookings = EventRepo::venue_schedule(&state.pool, venue_id, params.start, params.end).await?;
    Ok(Json(AvailabilityResponse {
        venue_id,
        available: bookings.is_empty(),
        bookings,
    }))
}

/// POST /api/v1/venues
///
/// Create a venue (admin only).
pub async fn create_venue(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateVenue>,
) -> AppResult<(StatusCode, Json<DataResponse<Venue>>)> {
    if input.capacity < 1 {
        return Err(AppError::Core(CoreError::Validation(
            "capacity must be at least 1".into(),
        )));
    }

    let venue = VenueRepo::create(&state.pool, &input).await?;
    log_admin_action(&state, auth.user_id, format!("Created venue {}", venue.id)).await;

    Ok((StatusCode::CREATED, Json(DataResponse { data: venue })))
}

/// PUT /api/v1/venues/{id}
///
/// Update a venue (admin only).
pub async fn update_venue(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
    Json(input): Json<UpdateVenue>,
) -> AppResult<Json<DataResponse<Venue>>> {
    if input.capacity.is_some_and(|c| c < 1) {
        return Err(AppError::Core(CoreError::Validation(
            "capacity must be at least 1".into(),
        )));
    }

    let venue = VenueRepo::update(&state.pool, venue_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id: venue_id,
        }))?;
    log_admin_action(&state, auth.user_id, format!("Updated venue {venue_id}")).await;

    Ok(Json(DataResponse { data: venue }))
}

/// DELETE /api/v1/venues/{id}
///
/// Delete a venue (admin only). Refused with 409 while any event at the
/// venue has a future start time.
pub async fn delete_venue(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(venue_id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_venue_exists(&state, venue_id).await?;

    if VenueRepo::has_future_events(&state.pool, venue_id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Venue has upcoming events and cannot be deleted".into(),
        )));
    }

    VenueRepo::delete(&state.pool, venue_id).await?;
    log_admin_action(&state, auth.user_id, format!("Deleted venue {venue_id}")).await;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_venue_exists(state: &AppState, venue_id: DbId) -> AppResult<()> {
    if VenueRepo::find_by_id(&state.pool, venue_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Venue",
            id: venue_id,
        }));
    }
    Ok(())
}

/// Record an admin mutation in the system log. Best-effort: a logging
/// failure is itself logged, never surfaced.
pub(crate) async fn log_admin_action(state: &AppState, user_id: DbId, description: String) {
    let input = CreateSystemLog {
        log_type: LOG_TYPE_ADMIN_ACTION.to_string(),
        description,
        user_id: Some(user_id),
        ip_address: None,
    };
    if let Err(e) = SystemLogRepo::create(&state.pool, &input).await {
        tracing::error!(user_id, error = %e, "Failed to record admin action");
    }
}

//! Handlers for event registrations.
//!
//! Registration and cancellation are atomic inside the repository; the
//! handlers here only translate outcomes into HTTP and queue the follow-up
//! notifications. A notification failure never fails the request -- the seat
//! change has already committed.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gather_core::error::CoreError;
use gather_core::registration::{registration_message, RegistrationStatus};
use gather_core::types::DbId;
use gather_db::models::registration::{
    CancelOutcome, RegisterOutcome, Registration, RegistrationWithEvent, RegistrationWithUser,
};
use gather_db::repositories::{EventRepo, RegistrationRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for a successful registration.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub registration: Registration,
    pub message: &'static str,
}

/// POST /api/v1/events/{id}/registrations
///
/// Register the authenticated user for an event. Returns 201 with the row
/// and a status-specific message; 409 when already registered.
pub async fn register(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    let registration = match RegistrationRepo::register(&state.pool, event_id, auth.user_id).await?
    {
        RegisterOutcome::Registered(registration) => registration,
        RegisterOutcome::AlreadyRegistered => {
            return Err(AppError::Core(CoreError::Conflict(
                "Already registered for this event".into(),
            )));
        }
        RegisterOutcome::EventNotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Event",
                id: event_id,
            }));
        }
    };

    let status = RegistrationStatus::parse(&registration.status)?;
    notify_registered(&state, event_id, auth.user_id, status).await;

    tracing::info!(
        event_id,
        user_id = auth.user_id,
        status = registration.status,
        "Registration created"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            registration,
            message: registration_message(status),
        }),
    ))
}

/// DELETE /api/v1/events/{id}/registrations
///
/// Cancel the authenticated user's registration. When a confirmed seat is
/// vacated and the waitlist is non-empty, the oldest waitlisted attendee is
/// promoted in the same transaction and then notified.
pub async fn cancel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let promoted = match RegistrationRepo::cancel(&state.pool, event_id, auth.user_id).await? {
        CancelOutcome::Cancelled { promoted } => promoted,
        CancelOutcome::NotRegistered => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Registration",
                id: event_id,
            }));
        }
    };

    if let Some(promoted) = &promoted {
        notify_registered(
            &state,
            event_id,
            promoted.user_id,
            RegistrationStatus::Confirmed,
        )
        .await;
        tracing::info!(
            event_id,
            promoted_user_id = promoted.user_id,
            "Waitlisted registration promoted"
        );
    }

    Ok(Json(serde_json::json!({
        "message": "Registration cancelled",
        "promoted_user_id": promoted.map(|p| p.user_id),
    })))
}

/// GET /api/v1/registrations/mine
///
/// The authenticated user's registrations with event and venue details.
pub async fn my_registrations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<RegistrationWithEvent>>>> {
    let registrations = RegistrationRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: registrations,
    }))
}

/// GET /api/v1/events/{id}/registrations
///
/// An event's registrations with attendee emails. Restricted to admins and
/// the owning organizer.
pub async fn list_for_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RegistrationWithUser>>>> {
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    if auth.role != gather_core::roles::ROLE_ADMIN && event.organizer_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the organizer of this event or an admin may view its registrations".into(),
        )));
    }

    let registrations = RegistrationRepo::list_for_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse {
        data: registrations,
    }))
}

/// Queue the status-specific registration notification; log and move on if
/// that fails.
async fn notify_registered(
    state: &AppState,
    event_id: DbId,
    user_id: DbId,
    status: RegistrationStatus,
) {
    let title = match EventRepo::find_by_id(&state.pool, event_id).await {
        Ok(Some(event)) => event.title,
        Ok(None) => return,
        Err(e) => {
            tracing::error!(event_id, error = %e, "Failed to load event for notification");
            return;
        }
    };

    if let Err(e) = state
        .dispatcher
        .notify_registration(user_id, event_id, &title, status)
        .await
    {
        tracing::error!(
            event_id,
            user_id,
            error = %e,
            "Failed to queue registration notification"
        );
    }
}

//! Handlers for event feedback.
//!
//! Submission gates, in order: the caller holds a confirmed registration
//! (403), the event has started (400 INVALID_STATE), and no feedback exists
//! yet for this (event, user) pair (409, enforced by the unique constraint
//! at insert time so concurrent submissions cannot both pass a pre-check).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use gather_core::error::CoreError;
use gather_core::feedback::{validate_edit_window, validate_event_started};
use gather_core::registration::RegistrationStatus;
use gather_core::types::DbId;
use gather_db::models::feedback::{Feedback, FeedbackStats, FeedbackWithAuthor};
use gather_db::repositories::{EventRepo, FeedbackRepo, RegistrationRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for submitting or editing feedback.
#[derive(Debug, Deserialize, Validate)]
pub struct FeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(min = 1, message = "must not be empty when present"))]
    pub comment: Option<String>,
}

/// Query parameters for the paginated event-feedback listing.
#[derive(Debug, Deserialize)]
pub struct FeedbackListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Response body for the paginated event-feedback listing.
#[derive(Debug, Serialize)]
pub struct FeedbackPage {
    pub feedback: Vec<FeedbackWithAuthor>,
    pub total: i64,
    pub pages: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{id}/feedback
///
/// Submit feedback for an attended, already-started event. Recomputes the
/// event's average rating in the same transaction as the insert.
pub async fn submit(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Feedback>>)> {
    input.validate()?;

    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    let attended = RegistrationRepo::find_for_user(&state.pool, event_id, auth.user_id)
        .await?
        .is_some_and(|r| r.status == RegistrationStatus::Confirmed.as_str());
    if !attended {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only confirmed attendees may leave feedback".into(),
        )));
    }

    validate_event_started(event.start_time, Utc::now())?;

    let feedback = FeedbackRepo::create_and_recompute(
        &state.pool,
        event_id,
        auth.user_id,
        input.rating,
        input.comment.as_deref(),
    )
    .await
    .map_err(duplicate_to_conflict)?;

    tracing::info!(event_id, user_id = auth.user_id, rating = input.rating, "Feedback submitted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: feedback })))
}

/// PUT /api/v1/feedback/{id}
///
/// Edit the caller's own feedback within 24 hours of submission. Recomputes
/// the event's average rating in the same transaction as the update.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(feedback_id): Path<DbId>,
    Json(input): Json<FeedbackRequest>,
) -> AppResult<Json<DataResponse<Feedback>>> {
    input.validate()?;

    let existing = FeedbackRepo::find_by_id_for_user(&state.pool, feedback_id, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Feedback",
            id: feedback_id,
        }))?;

    validate_edit_window(existing.created_at, Utc::now())?;

    let feedback = FeedbackRepo::update_and_recompute(
        &state.pool,
        feedback_id,
        auth.user_id,
        input.rating,
        input.comment.as_deref(),
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "Feedback",
        id: feedback_id,
    }))?;

    Ok(Json(DataResponse { data: feedback }))
}

/// GET /api/v1/events/{id}/feedback
///
/// Paginated feedback for an event with author emails, newest first.
pub async fn list_for_event(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<FeedbackListQuery>,
) -> AppResult<Json<FeedbackPage>> {
    ensure_event_exists(&state, event_id).await?;

    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let (feedback, total) =
        FeedbackRepo::list_for_event(&state.pool, event_id, params.page, Some(limit)).await?;
    let pages = (total + limit - 1) / limit;

    Ok(Json(FeedbackPage {
        feedback,
        total,
        pages,
    }))
}

/// GET /api/v1/events/{id}/feedback/stats
///
/// Total count, mean rating and per-star counts for an event.
pub async fn stats(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<FeedbackStats>>> {
    ensure_event_exists(&state, event_id).await?;

    let stats = FeedbackRepo::stats(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn ensure_event_exists(state: &AppState, event_id: DbId) -> AppResult<()> {
    if EventRepo::find_by_id(&state.pool, event_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }));
    }
    Ok(())
}

/// Rewrite the duplicate-feedback unique violation into a domain message;
/// every other error passes through for the generic classifier.
fn duplicate_to_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some("uq_feedback_event_user") {
            return AppError::Core(CoreError::Conflict(
                "Feedback already submitted for this event".into(),
            ));
        }
    }
    AppError::Database(err)
}

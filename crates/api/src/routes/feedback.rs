//! Route definitions for event feedback.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::feedback;
use crate::state::AppState;

/// Feedback routes.
///
/// ```text
/// POST /events/{id}/feedback        -> submit (confirmed attendee)
/// GET  /events/{id}/feedback        -> list_for_event (auth, paginated)
/// GET  /events/{id}/feedback/stats  -> stats (auth)
/// PUT  /feedback/{id}               -> update own, within 24h
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{id}/feedback",
            get(feedback::list_for_event).post(feedback::submit),
        )
        .route("/events/{id}/feedback/stats", get(feedback::stats))
        .route("/feedback/{id}", put(feedback::update))
}

//! Route definitions for the `/events` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::event;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /events       -> list_events (auth)
/// POST   /events       -> create_event (organizer|admin)
/// GET    /events/{id}  -> get_event (auth)
/// PUT    /events/{id}  -> update_event (owner|admin)
/// DELETE /events/{id}  -> delete_event (owner|admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(event::list_events).post(event::create_event))
        .route(
            "/events/{id}",
            get(event::get_event)
                .put(event::update_event)
                .delete(event::delete_event),
        )
}

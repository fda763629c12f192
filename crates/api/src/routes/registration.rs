//! Route definitions for event registrations.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::registration;
use crate::state::AppState;

/// Registration routes.
///
/// ```text
/// POST   /events/{id}/registrations  -> register (auth)
/// DELETE /events/{id}/registrations  -> cancel own (auth)
/// GET    /events/{id}/registrations  -> list_for_event (owner|admin)
/// GET    /registrations/mine         -> my_registrations (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/events/{id}/registrations",
            post(registration::register)
                .delete(registration::cancel)
                .get(registration::list_for_event),
        )
        .route("/registrations/mine", get(registration::my_registrations))
}

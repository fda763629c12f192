//! Route definitions for the `/venues` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::venue;
use crate::state::AppState;

/// Routes mounted at `/venues`.
///
/// ```text
/// GET    /venues                    -> list_venues (auth)
/// POST   /venues                    -> create_venue (admin)
/// PUT    /venues/{id}               -> update_venue (admin)
/// DELETE /venues/{id}               -> delete_venue (admin)
/// GET    /venues/{id}/availability  -> availability (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/venues", get(venue::list_venues).post(venue::create_venue))
        .route(
            "/venues/{id}",
            axum::routing::put(venue::update_venue).delete(venue::delete_venue),
        )
        .route("/venues/{id}/availability", get(venue::availability))
}

pub mod admin;
pub mod auth;
pub mod event;
pub mod feedback;
pub mod health;
pub mod notification;
pub mod registration;
pub mod venue;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (requires auth)
///
/// /events                              list (auth), create (organizer|admin)
/// /events/{id}                         get (auth), update/delete (owner|admin)
/// /events/{id}/registrations           register/cancel own (auth),
///                                      list (owner|admin)
/// /events/{id}/feedback                submit (confirmed attendee), list (auth)
/// /events/{id}/feedback/stats          rating stats (auth)
/// /feedback/{id}                       edit own, within 24h
/// /registrations/mine                  own registrations (auth)
///
/// /venues                              list (auth), create (admin)
/// /venues/{id}                         update, delete (admin)
/// /venues/{id}/availability            bookings in a window (auth)
///
/// /notifications                       list own (auth)
/// /notifications/{id}/read             mark read (auth)
/// /notifications/{id}                  delete (auth)
///
/// /admin/stats                         dashboard numbers (admin)
/// /admin/users                         user listing (admin)
/// /admin/users/{id}/role               change role (admin)
/// /admin/users/{id}                    delete user (admin)
/// /admin/logs                          audit log (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(event::router())
        .merge(registration::router())
        .merge(feedback::router())
        .merge(venue::router())
        .merge(notification::router())
        .merge(admin::router())
}

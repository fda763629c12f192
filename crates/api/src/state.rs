use std::sync::Arc;

use gather_notify::Dispatcher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gather_db::DbPool,
    /// Server configuration (JWT secrets, timeouts, CORS origins).
    pub config: Arc<ServerConfig>,
    /// Notification dispatcher: writes notification rows and queues their
    /// emails. Delivery happens in the outbox worker, never on the request
    /// path.
    pub dispatcher: Dispatcher,
}

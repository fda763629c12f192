use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::state::AppState;

/// GET /health
///
/// Liveness plus a database round-trip. A reachable server with an
/// unreachable database answers 200 with `"degraded"` so load balancers
/// keep it out of rotation without treating it as dead.
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_healthy = gather_db::health_check(&state.pool).await.is_ok();

    Json(serde_json::json!({
        "status": if db_healthy { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "db_healthy": db_healthy,
    }))
}

/// Health route, mounted at the root rather than under `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

//! Shared fixtures for HTTP-level integration tests.
//!
//! `build_test_app` mirrors the router construction in `main.rs` so tests
//! exercise the same middleware stack (CORS, request ID, timeout, tracing,
//! panic recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use gather_api::auth::jwt::{generate_access_token, JwtConfig};
use gather_api::auth::password::hash_password;
use gather_api::config::ServerConfig;
use gather_api::routes;
use gather_api::state::AppState;
use gather_core::types::DbId;
use gather_db::models::event::CreateEvent;
use gather_db::models::user::{CreateUser, User};
use gather_db::models::venue::CreateVenue;
use gather_db::repositories::{EventRepo, UserRepo, VenueRepo};
use gather_notify::Dispatcher;

/// Plaintext password used for every seeded test user.
pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults and a known JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-that-is-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let dispatcher = Dispatcher::new(pool.clone());

    let state = AppState {
        pool,
        config: Arc::new(config),
        dispatcher,
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a user directly in the database with [`TEST_PASSWORD`].
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        name: email.split('@').next().unwrap().to_string(),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Mint an access token for a seeded user with the test JWT secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a venue with generous capacity.
pub async fn seed_venue(pool: &PgPool, name: &str) -> DbId {
    VenueRepo::create(
        pool,
        &CreateVenue {
            name: name.to_string(),
            capacity: 500,
            location: "Building A".to_string(),
            facilities: vec!["projector".to_string()],
        },
    )
    .await
    .expect("venue creation should succeed")
    .id
}

/// Create an event starting `start_offset_hours` from now (negative for a
/// past event) with the given seat count.
pub async fn seed_event(
    pool: &PgPool,
    organizer_id: DbId,
    venue_id: DbId,
    start_offset_hours: i64,
    max_participants: i32,
) -> DbId {
    EventRepo::create(
        pool,
        organizer_id,
        &CreateEvent {
            title: "Intro to Databases".to_string(),
            description: None,
            category: "workshops".to_string(),
            venue_id,
            start_time: Utc::now() + chrono::Duration::hours(start_offset_hours),
            duration_mins: 90,
            max_participants,
        },
    )
    .await
    .expect("event creation should succeed")
    .id
}

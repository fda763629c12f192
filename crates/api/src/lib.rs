//! HTTP API for the Gather event-management platform.
//!
//! Everything is exported so integration tests can build the exact router
//! and middleware stack the binary runs.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

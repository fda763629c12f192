//! Admin dashboard read models.

use serde::Serialize;
use sqlx::FromRow;

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminOverview {
    pub total_users: i64,
    pub upcoming_events: i64,
    pub total_registrations: i64,
    pub total_venues: i64,
    pub past_events: i64,
    pub average_event_rating: Option<f64>,
}

/// User count for one role.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RoleCount {
    pub role: String,
    pub count: i64,
}

/// Event count for one category.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

//! Feedback entity model and read models.

use gather_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A feedback row from the `feedback` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Feedback {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// Feedback joined with the author's email, for the event listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackWithAuthor {
    pub id: DbId,
    pub event_id: DbId,
    pub user_id: DbId,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Timestamp,
    pub user_email: String,
}

/// Aggregate rating statistics for one event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FeedbackStats {
    pub total_feedback: i64,
    pub average_rating: Option<f64>,
    pub five_star: i64,
    pub four_star: i64,
    pub three_star: i64,
    pub two_star: i64,
    pub one_star: i64,
}

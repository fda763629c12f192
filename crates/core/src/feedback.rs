//! Feedback rules: rating bounds, the edit window, and rating aggregation.

use chrono::Duration;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Lowest rating an attendee can give.
pub const MIN_RATING: i32 = 1;

/// Highest rating an attendee can give.
pub const MAX_RATING: i32 = 5;

/// How long after submission feedback stays editable.
pub const EDIT_WINDOW_HOURS: i64 = 24;

/// Validate a star rating.
pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(())
}

/// Feedback opens once the event has begun.
pub fn validate_event_started(event_start: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if event_start >= now {
        return Err(CoreError::InvalidState(
            "feedback can only be given after the event has taken place".into(),
        ));
    }
    Ok(())
}

/// Edits are allowed for a fixed window after the original submission.
pub fn validate_edit_window(submitted_at: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if now - submitted_at > Duration::hours(EDIT_WINDOW_HOURS) {
        return Err(CoreError::InvalidState(format!(
            "feedback can only be edited within {EDIT_WINDOW_HOURS} hours of submission"
        )));
    }
    Ok(())
}

/// Mean of the given ratings rounded to two decimals, `None` when empty.
///
/// Matches the `ROUND(AVG(rating), 2)` the event repository persists so
/// in-process callers and the database agree on the stored value.
pub fn mean_rating(ratings: &[i32]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    let mean = sum as f64 / ratings.len() as f64;
    Some((mean * 100.0).round() / 100.0)
}

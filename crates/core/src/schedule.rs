//! Venue scheduling rules.
//!
//! Events occupy half-open time intervals `[start, end)`. Two bookings at the
//! same venue conflict exactly when their intervals overlap, which for
//! half-open intervals reduces to `a.start < b.end && b.start < a.end`.
//! Back-to-back bookings (one ending the instant the next starts) do not
//! conflict.

use crate::error::CoreError;
use crate::types::Timestamp;

/// A half-open time interval `[start, end)` occupied by an event at a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeSlot {
    /// Build a slot, rejecting empty and inverted intervals.
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, CoreError> {
        if start >= end {
            return Err(CoreError::Validation(
                "event end time must be after its start time".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// True when the two half-open intervals share at least one instant.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Find the first slot in `booked` that conflicts with `candidate`, if any.
pub fn find_conflict<'a>(candidate: &TimeSlot, booked: &'a [TimeSlot]) -> Option<&'a TimeSlot> {
    booked.iter().find(|slot| slot.overlaps(candidate))
}

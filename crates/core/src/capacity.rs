//! Event capacity rules.
//!
//! Only registrations with status `confirmed` consume seats. When every seat
//! is taken, new registrations are placed on the waitlist instead of being
//! rejected.

use crate::error::CoreError;
use crate::registration::RegistrationStatus;

/// Seats taken vs seats available for one event, as of one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacitySnapshot {
    pub max_participants: i64,
    pub confirmed: i64,
}

impl CapacitySnapshot {
    pub fn new(max_participants: i64, confirmed: i64) -> Self {
        Self {
            max_participants,
            confirmed,
        }
    }

    /// Seats still open. Negative when the event is overbooked, which can
    /// happen after an organizer lowers `max_participants`.
    pub fn available(&self) -> i64 {
        self.max_participants - self.confirmed
    }

    pub fn is_full(&self) -> bool {
        self.available() <= 0
    }

    /// Status a brand-new registration receives under this snapshot.
    pub fn placement(&self) -> RegistrationStatus {
        if self.is_full() {
            RegistrationStatus::Waitlist
        } else {
            RegistrationStatus::Confirmed
        }
    }
}

/// Validate a requested participant limit.
pub fn validate_max_participants(max_participants: i32) -> Result<(), CoreError> {
    if max_participants < 1 {
        return Err(CoreError::Validation(
            "max_participants must be at least 1".into(),
        ));
    }
    Ok(())
}

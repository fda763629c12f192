//! Registration lifecycle rules.
//!
//! A registration is `confirmed` while it holds a seat and `waitlist` while
//! it waits for one. Cancellation deletes the row outright; a cancelled
//! attendee re-registers from scratch. The only in-place transition is
//! promotion, which flips the oldest waitlisted row to confirmed when a seat
//! frees up. A confirmed registration never returns to the waitlist.

use crate::error::CoreError;

/// Registration status matching the `registrations.status` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Confirmed,
    Waitlist,
}

impl RegistrationStatus {
    /// The column value stored for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Waitlist => "waitlist",
        }
    }

    /// Parse a column value back into a status.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "confirmed" => Ok(Self::Confirmed),
            "waitlist" => Ok(Self::Waitlist),
            other => Err(CoreError::Internal(format!(
                "unknown registration status: {other}"
            ))),
        }
    }
}

/// Check whether an in-place status transition is valid.
///
/// Promotion (`waitlist -> confirmed`) is the only one.
pub fn can_transition(from: RegistrationStatus, to: RegistrationStatus) -> bool {
    matches!(
        (from, to),
        (RegistrationStatus::Waitlist, RegistrationStatus::Confirmed)
    )
}

/// Validate a status transition, returning an error for invalid ones.
pub fn validate_transition(
    from: RegistrationStatus,
    to: RegistrationStatus,
) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "cannot move a registration from {} to {}",
            from.as_str(),
            to.as_str()
        )))
    }
}

/// Message returned with a successful registration response.
pub fn registration_message(status: RegistrationStatus) -> &'static str {
    match status {
        RegistrationStatus::Confirmed => "Registration successful",
        RegistrationStatus::Waitlist => "Added to waitlist due to full capacity",
    }
}

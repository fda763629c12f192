//! Outbound email queue model and DTOs.

use gather_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Queue states matching the `email_outbox.status` CHECK constraint.
pub const STATUS_PENDING: &str = "pending";
pub const STATUS_SENT: &str = "sent";
pub const STATUS_FAILED: &str = "failed";

/// A queued email from the `email_outbox` table.
///
/// Rows are self-contained: recipient, subject and body are captured at
/// enqueue time so the delivery worker never joins back to other tables.
#[derive(Debug, Clone, FromRow)]
pub struct OutboxEmail {
    pub id: DbId,
    pub notification_id: Option<DbId>,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub next_attempt_at: Timestamp,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
}

/// DTO for enqueueing an email.
pub struct EnqueueEmail {
    pub notification_id: Option<DbId>,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

//! Email outbox worker.
//!
//! [`OutboxWorker`] runs as a background task, draining the `email_outbox`
//! queue on a short poll interval. Rows are claimed with `FOR UPDATE SKIP
//! LOCKED` and a delivery lease, so multiple workers can run without
//! double-sending and a worker that dies mid-send only delays the email by
//! one lease. Failed sends retry with exponential backoff until
//! [`MAX_ATTEMPTS`], after which the row is marked failed and left for
//! inspection.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use gather_db::models::outbox::OutboxEmail;
use gather_db::repositories::OutboxRepo;
use gather_db::DbPool;

use crate::mailer::Mailer;

/// How often the worker polls for due emails.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// How long a claimed row stays invisible to other workers.
const CLAIM_LEASE_SECS: i64 = 60;

/// Delivery attempts before a row is marked failed for good.
const MAX_ATTEMPTS: i32 = 5;

/// First retry delay; doubles per attempt.
const BACKOFF_BASE_SECS: i64 = 30;

// ---------------------------------------------------------------------------
// OutboxWorker
// ---------------------------------------------------------------------------

/// Background service that delivers queued emails.
pub struct OutboxWorker {
    pool: DbPool,
    mailer: Mailer,
}

impl OutboxWorker {
    /// Create a new worker with the given pool and mailer.
    pub fn new(pool: DbPool, mailer: Mailer) -> Self {
        Self { pool, mailer }
    }

    /// Run the delivery loop.
    ///
    /// Polls for due emails every few seconds and drains everything due on
    /// each tick. The loop exits gracefully when the provided
    /// [`CancellationToken`] is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            poll_secs = POLL_INTERVAL.as_secs(),
            max_attempts = MAX_ATTEMPTS,
            "Email outbox worker started"
        );

        let mut interval = tokio::time::interval(POLL_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Email outbox worker stopping");
                    break;
                }
                _ = interval.tick() => {
                    self.drain_due().await;
                }
            }
        }
    }

    /// Claim and deliver every email that is currently due.
    async fn drain_due(&self) {
        loop {
            match OutboxRepo::claim_next(&self.pool, CLAIM_LEASE_SECS).await {
                Ok(Some(email)) => self.deliver(&email).await,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to claim outbox email");
                    break;
                }
            }
        }
    }

    /// Attempt delivery of one claimed email and record the outcome.
    async fn deliver(&self, email: &OutboxEmail) {
        match self
            .mailer
            .send(&email.recipient, &email.subject, &email.body)
            .await
        {
            Ok(()) => {
                if let Err(e) = OutboxRepo::mark_sent(&self.pool, email.id).await {
                    tracing::error!(id = email.id, error = %e, "Failed to mark email sent");
                }
            }
            Err(send_err) => {
                let retry_at = if email.attempts < MAX_ATTEMPTS {
                    let retry_at = Utc::now() + backoff_delay(email.attempts);
                    tracing::warn!(
                        id = email.id,
                        attempts = email.attempts,
                        error = %send_err,
                        "Email delivery failed, will retry"
                    );
                    Some(retry_at)
                } else {
                    tracing::error!(
                        id = email.id,
                        attempts = email.attempts,
                        error = %send_err,
                        "Email delivery failed permanently"
                    );
                    None
                };

                if let Err(e) =
                    OutboxRepo::record_failure(&self.pool, email.id, &send_err.to_string(), retry_at)
                        .await
                {
                    tracing::error!(id = email.id, error = %e, "Failed to record email failure");
                }
            }
        }
    }
}

/// Retry delay for a row that has failed `attempts` times.
fn backoff_delay(attempts: i32) -> chrono::Duration {
    let exponent = (attempts - 1).clamp(0, 6) as u32;
    chrono::Duration::seconds(BACKOFF_BASE_SECS << exponent)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

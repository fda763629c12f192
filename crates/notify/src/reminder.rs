//! Event reminder scheduler.
//!
//! [`ReminderScheduler`] runs as a background task, sweeping once an hour for
//! events that start 23 to 24 hours from now and fanning a reminder out to
//! each event's confirmed attendees. With hourly ticks every event falls into
//! exactly one sweep window, so attendees are reminded once.

use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use gather_db::repositories::EventRepo;
use gather_db::DbPool;

use crate::dispatch::Dispatcher;

/// How often the scheduler sweeps for upcoming events.
const REMINDER_CHECK_INTERVAL: Duration = Duration::from_secs(3600);

// ---------------------------------------------------------------------------
// ReminderScheduler
// ---------------------------------------------------------------------------

/// Background service that sends 24-hour event reminders.
pub struct ReminderScheduler {
    pool: DbPool,
    dispatcher: Dispatcher,
}

impl ReminderScheduler {
    /// Create a new scheduler with the given pool and dispatcher.
    pub fn new(pool: DbPool, dispatcher: Dispatcher) -> Self {
        Self { pool, dispatcher }
    }

    /// Run the reminder loop.
    ///
    /// Sweeps every hour. The loop exits gracefully when the provided
    /// [`CancellationToken`] is cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = REMINDER_CHECK_INTERVAL.as_secs(),
            "Event reminder scheduler started"
        );

        let mut interval = tokio::time::interval(REMINDER_CHECK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Event reminder scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.process_reminders().await {
                        tracing::error!(error = %e, "Failed to process event reminders");
                    }
                }
            }
        }
    }

    /// Find events starting in the next sweep window and remind attendees.
    async fn process_reminders(&self) -> Result<(), sqlx::Error> {
        let now = Utc::now();
        let events = EventRepo::starting_between(
            &self.pool,
            now + chrono::Duration::hours(23),
            now + chrono::Duration::hours(24),
        )
        .await?;

        let mut queued = 0;
        for event in &events {
            match self.dispatcher.notify_event_reminder(event).await {
                Ok(count) => queued += count,
                Err(e) => tracing::error!(
                    event_id = event.id,
                    error = %e,
                    "Failed to send reminders for event"
                ),
            }
        }

        if !events.is_empty() {
            tracing::info!(
                events = events.len(),
                notifications = queued,
                "Processed event reminders"
            );
        }

        Ok(())
    }
}

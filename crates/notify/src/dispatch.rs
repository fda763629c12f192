//! Notification dispatch.
//!
//! [`Dispatcher`] is the single entry point for creating notifications. The
//! notification row and its outbound email are written in one transaction, so
//! a crash between the two cannot leave a notification without its email or
//! an email without its notification. Actual delivery happens later, when the
//! [`OutboxWorker`](crate::outbox::OutboxWorker) picks the queued email up.

use gather_core::notify::{render_email, NotificationKind};
use gather_core::registration::RegistrationStatus;
use gather_core::types::DbId;
use gather_db::models::event::Event;
use gather_db::models::notification::{CreateNotification, Notification};
use gather_db::models::outbox::EnqueueEmail;
use gather_db::repositories::{NotificationRepo, OutboxRepo, RegistrationRepo, UserRepo};
use gather_db::DbPool;

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Creates notifications and queues their emails.
#[derive(Clone)]
pub struct Dispatcher {
    pool: DbPool,
}

impl Dispatcher {
    /// Create a new dispatcher with the given database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create one notification and queue its email, in a single transaction.
    pub async fn notify(
        &self,
        user_id: DbId,
        event_id: Option<DbId>,
        kind: NotificationKind,
        message: &str,
    ) -> Result<Notification, sqlx::Error> {
        let user = UserRepo::find_by_id(&self.pool, user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let rendered = render_email(Some(kind), message);

        let mut tx = self.pool.begin().await?;
        let notification = NotificationRepo::create_in_tx(
            &mut tx,
            &CreateNotification {
                user_id,
                event_id,
                kind: kind.as_str().to_string(),
                message: message.to_string(),
            },
        )
        .await?;
        OutboxRepo::enqueue_in_tx(
            &mut tx,
            &EnqueueEmail {
                notification_id: Some(notification.id),
                recipient: user.email,
                subject: rendered.subject,
                body: rendered.html_body,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::debug!(
            notification_id = notification.id,
            user_id,
            kind = kind.as_str(),
            "Notification queued"
        );
        Ok(notification)
    }

    /// Notify a user that their registration landed, with wording matching
    /// the status they received. Also used when a waitlisted user is promoted
    /// into a freed seat.
    pub async fn notify_registration(
        &self,
        user_id: DbId,
        event_id: DbId,
        event_title: &str,
        status: RegistrationStatus,
    ) -> Result<Notification, sqlx::Error> {
        let kind = match status {
            RegistrationStatus::Confirmed => NotificationKind::RegistrationConfirmation,
            RegistrationStatus::Waitlist => NotificationKind::WaitlistUpdate,
        };
        let message = registration_message(status, event_title);
        self.notify(user_id, Some(event_id), kind, &message).await
    }

    /// Tell every confirmed attendee what changed about an event.
    ///
    /// `changes` is a short human-readable summary such as `"time, venue"`.
    /// Returns the number of notifications queued.
    pub async fn notify_event_update(
        &self,
        event_id: DbId,
        event_title: &str,
        changes: &str,
    ) -> Result<usize, sqlx::Error> {
        let message = event_update_message(event_title, changes);
        self.fan_out(event_id, NotificationKind::EventUpdate, &message)
            .await
    }

    /// Remind every confirmed attendee that an event starts in 24 hours.
    pub async fn notify_event_reminder(&self, event: &Event) -> Result<usize, sqlx::Error> {
        let message = reminder_message(&event.title);
        self.fan_out(event.id, NotificationKind::EventReminder, &message)
            .await
    }

    /// Send the same notification to every confirmed attendee of an event.
    ///
    /// Individual failures are logged and skipped so one bad row cannot block
    /// the rest of the audience. Returns the number queued.
    async fn fan_out(
        &self,
        event_id: DbId,
        kind: NotificationKind,
        message: &str,
    ) -> Result<usize, sqlx::Error> {
        let user_ids = RegistrationRepo::confirmed_user_ids(&self.pool, event_id).await?;
        let results = futures::future::join_all(
            user_ids
                .iter()
                .map(|&user_id| self.notify(user_id, Some(event_id), kind, message)),
        )
        .await;

        let mut queued = 0;
        for (&user_id, result) in user_ids.iter().zip(&results) {
            match result {
                Ok(_) => queued += 1,
                Err(e) => tracing::error!(
                    user_id,
                    event_id,
                    kind = kind.as_str(),
                    error = %e,
                    "Failed to queue notification"
                ),
            }
        }
        Ok(queued)
    }
}

// ---------------------------------------------------------------------------
// Message wording
// ---------------------------------------------------------------------------

fn registration_message(status: RegistrationStatus, event_title: &str) -> String {
    match status {
        RegistrationStatus::Confirmed => {
            format!("Your registration for {event_title} has been confirmed.")
        }
        RegistrationStatus::Waitlist => {
            format!("You have been added to the waitlist for {event_title}.")
        }
    }
}

fn event_update_message(event_title: &str, changes: &str) -> String {
    format!("Event \"{event_title}\" has been updated. Changes: {changes}")
}

fn reminder_message(event_title: &str) -> String {
    format!("Reminder: Event \"{event_title}\" is starting in 24 hours.")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

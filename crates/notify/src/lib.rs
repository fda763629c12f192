//! Gather notification pipeline.
//!
//! This crate provides everything between "something happened" and "the user
//! got an email about it":
//!
//! - [`Dispatcher`] — creates notification rows and queues their emails,
//!   both in one transaction.
//! - [`Mailer`] — SMTP delivery via the `lettre` async transport.
//! - [`OutboxWorker`] — background task that drains the email outbox with
//!   retries and backoff.
//! - [`ReminderScheduler`] — hourly sweep that reminds confirmed attendees
//!   of events starting in roughly 24 hours.

pub mod dispatch;
pub mod mailer;
pub mod outbox;
pub mod reminder;

pub use dispatch::Dispatcher;
pub use mailer::{EmailConfig, EmailError, Mailer};
pub use outbox::OutboxWorker;
pub use reminder::ReminderScheduler;

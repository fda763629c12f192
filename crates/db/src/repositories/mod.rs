//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-step workflows
//! (registration, cancellation with promotion, feedback recompute,
//! notification + outbox enqueue) run inside a single transaction.

pub mod event_repo;
pub mod feedback_repo;
pub mod notification_repo;
pub mod outbox_repo;
pub mod registration_repo;
pub mod session_repo;
pub mod stats_repo;
pub mod system_log_repo;
pub mod user_repo;
pub mod venue_repo;

pub use event_repo::EventRepo;
pub use feedback_repo::FeedbackRepo;
pub use notification_repo::NotificationRepo;
pub use outbox_repo::OutboxRepo;
pub use registration_repo::RegistrationRepo;
pub use session_repo::SessionRepo;
pub use stats_repo::StatsRepo;
pub use system_log_repo::SystemLogRepo;
pub use user_repo::UserRepo;
pub use venue_repo::VenueRepo;

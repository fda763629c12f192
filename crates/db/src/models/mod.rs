//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches where the entity
//!   supports partial updates
//! - Read-model structs for joined listing queries

pub mod event;
pub mod feedback;
pub mod notification;
pub mod outbox;
pub mod registration;
pub mod session;
pub mod stats;
pub mod system_log;
pub mod user;
pub mod venue;

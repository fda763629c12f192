//! Domain logic for the Gather event-management platform.
//!
//! This crate has no database or HTTP dependencies so the rules it encodes
//! (venue scheduling, capacity, registration lifecycle, feedback gating,
//! notification templating) can be used by the API, the delivery workers,
//! and any future CLI tooling alike.

pub mod capacity;
pub mod categories;
pub mod error;
pub mod feedback;
pub mod notify;
pub mod registration;
pub mod roles;
pub mod schedule;
pub mod types;

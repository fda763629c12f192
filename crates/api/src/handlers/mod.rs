//! Request handlers, one module per resource.
//!
//! Handlers stay thin: extract and validate input, call into the repository
//! or dispatcher layer, wrap the result in the response envelope. Domain
//! rules live in `gather_core`; SQL lives in `gather_db`.

pub mod admin;
pub mod auth;
pub mod event;
pub mod feedback;
pub mod notification;
pub mod registration;
pub mod venue;

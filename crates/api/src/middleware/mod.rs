//! Request extractors enforcing authentication and role-based access.

pub mod auth;
pub mod rbac;

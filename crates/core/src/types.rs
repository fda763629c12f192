//! Shared scalar aliases used across every crate in the workspace.

/// Primary key type; every table uses BIGSERIAL.
pub type DbId = i64;

/// Timestamps are always UTC; conversion to local time is a client concern.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

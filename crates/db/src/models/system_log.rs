//! System log entity model and DTOs.

use gather_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Log type recorded for administrative mutations.
pub const LOG_TYPE_ADMIN_ACTION: &str = "ADMIN_ACTION";

/// A row from the `system_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemLog {
    pub id: DbId,
    pub log_type: String,
    pub description: String,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording a system event.
pub struct CreateSystemLog {
    pub log_type: String,
    pub description: String,
    pub user_id: Option<DbId>,
    pub ip_address: Option<String>,
}

/// Filters for the admin log listing.
#[derive(Debug, Default, Deserialize)]
pub struct LogListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Exact match on `log_type`.
    pub r#type: Option<String>,
}

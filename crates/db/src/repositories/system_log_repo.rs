//! Repository for the `system_logs` table.

use sqlx::PgPool;

use crate::models::system_log::{CreateSystemLog, LogListQuery, SystemLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, log_type, description, user_id, ip_address, created_at";

/// Maximum page size for the admin listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for the admin listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides operations for the audit log.
pub struct SystemLogRepo;

impl SystemLogRepo {
    /// Record a system event, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSystemLog) -> Result<SystemLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_logs (log_type, description, user_id, ip_address)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemLog>(&query)
            .bind(&input.log_type)
            .bind(&input.description)
            .bind(input.user_id)
            .bind(&input.ip_address)
            .fetch_one(pool)
            .await
    }

    /// Paginated listing with an optional exact `log_type` filter, newest
    /// first.
    pub async fn list(pool: &PgPool, params: &LogListQuery) -> Result<Vec<SystemLog>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = params.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if params.r#type.is_some() {
            conditions.push(format!("log_type = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {COLUMNS} FROM system_logs
             {where_clause}
             ORDER BY created_at DESC
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, SystemLog>(&query);
        if let Some(log_type) = &params.r#type {
            q = q.bind(log_type);
        }
        q.bind(limit).bind(offset).fetch_all(pool).await
    }
}

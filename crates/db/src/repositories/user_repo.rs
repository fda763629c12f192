//! Repository for the `users` table.

use gather_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{AdminUserRow, CreateUser, User, UserListQuery};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

/// Maximum page size for the admin listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for the admin listing.
const DEFAULT_LIMIT: i64 = 10;

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-sensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Paginated admin listing with optional email search and role filter.
    ///
    /// Returns the page of rows plus the unfiltered total count.
    pub async fn list_admin(
        pool: &PgPool,
        params: &UserListQuery,
    ) -> Result<(Vec<AdminUserRow>, i64), sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = params.page.unwrap_or(1).max(1);
        let offset = (page - 1) * limit;

        // Build the WHERE clause and track the next bind parameter index.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_idx: u32 = 1;

        if params.search.is_some() {
            conditions.push(format!("email ILIKE ${bind_idx}"));
            bind_idx += 1;
        }
        if params.role.is_some() {
            conditions.push(format!("role = ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT id, name, email, role, created_at,
                (SELECT COUNT(*) FROM registrations WHERE user_id = users.id) AS total_registrations
             FROM users
             {where_clause}
             ORDER BY created_at DESC
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, AdminUserRow>(&query);
        if let Some(search) = &params.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(role) = &params.role {
            q = q.bind(role);
        }
        let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok((rows, total))
    }

    /// Update a user's role. Returns `None` if no row with the given `id`
    /// exists.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET role = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
    }

    /// Delete a user. Returns `true` if the row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

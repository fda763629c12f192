//! Read-only queries backing the admin dashboard.

use sqlx::PgPool;

use crate::models::stats::{AdminOverview, CategoryCount, RoleCount};

/// Provides aggregate queries for the admin dashboard.
pub struct StatsRepo;

impl StatsRepo {
    /// Headline counts across the whole system.
    pub async fn overview(pool: &PgPool) -> Result<AdminOverview, sqlx::Error> {
        sqlx::query_as::<_, AdminOverview>(
            "SELECT
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM events WHERE start_time >= NOW()) AS upcoming_events,
                (SELECT COUNT(*) FROM registrations WHERE status = 'confirmed') AS total_registrations,
                (SELECT COUNT(*) FROM venues) AS total_venues,
                (SELECT COUNT(*) FROM events WHERE start_time < NOW()) AS past_events,
                (SELECT ROUND(AVG(average_rating)::numeric, 2)::float8 FROM events
                 WHERE average_rating IS NOT NULL) AS average_event_rating",
        )
        .fetch_one(pool)
        .await
    }

    /// User counts grouped by role.
    pub async fn role_distribution(pool: &PgPool) -> Result<Vec<RoleCount>, sqlx::Error> {
        sqlx::query_as::<_, RoleCount>(
            "SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
        )
        .fetch_all(pool)
        .await
    }

    /// Event counts grouped by category.
    pub async fn category_distribution(pool: &PgPool) -> Result<Vec<CategoryCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS count FROM events GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await
    }
}

//! Aggregate reporting queries. Read-only.

use async_trait::async_trait;
use chrono::NaiveDate;
use openhouse_core::ServiceError;
use openhouse_models::dashboard::{
    AttendedCount, FacultyCount, FacultyInterest, SourceCount, StatusCount,
};
use sqlx::PgPool;

use crate::utils::db::internal;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Interest counts per faculty, most picked first.
    async fn faculty_interests(&self) -> Result<Vec<FacultyInterest>, ServiceError>;
    async fn source_counts(&self) -> Result<Vec<SourceCount>, ServiceError>;
    async fn status_counts(&self) -> Result<Vec<StatusCount>, ServiceError>;
    /// Faculty check-ins recorded on `day`.
    async fn faculty_counts_on(&self, day: NaiveDate) -> Result<Vec<FacultyCount>, ServiceError>;
    async fn attended_count(&self) -> Result<AttendedCount, ServiceError>;
}

pub struct PgDashboardRepository {
    pool: PgPool,
}

impl PgDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DashboardRepository for PgDashboardRepository {
    async fn faculty_interests(&self) -> Result<Vec<FacultyInterest>, ServiceError> {
        sqlx::query_as::<_, FacultyInterest>(
            r#"
            SELECT
                t.faculty,
                SUM(t.first_count)::BIGINT AS first_interest,
                SUM(t.second_count)::BIGINT AS second_interest,
                SUM(t.third_count)::BIGINT AS third_interest
            FROM users
            CROSS JOIN LATERAL (
                VALUES
                    (users.first_interest, 1, 0, 0),
                    (users.second_interest, 0, 1, 0),
                    (users.third_interest, 0, 0, 1)
            ) AS t(faculty, first_count, second_count, third_count)
            WHERE t.faculty IS NOT NULL
            GROUP BY t.faculty
            ORDER BY SUM(t.first_count + t.second_count + t.third_count) DESC, t.faculty
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to count faculty interests"))
    }

    async fn source_counts(&self) -> Result<Vec<SourceCount>, ServiceError> {
        sqlx::query_as::<_, SourceCount>(
            r#"
            SELECT source, COUNT(*) AS count
            FROM (SELECT unnest(selected_sources) AS source FROM users) AS sources
            GROUP BY source
            ORDER BY count DESC, source
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to count awareness sources"))
    }

    async fn status_counts(&self) -> Result<Vec<StatusCount>, ServiceError> {
        sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM users
            WHERE status IS NOT NULL AND role = 'student'
            GROUP BY status
            ORDER BY count DESC, status
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to count education statuses"))
    }

    async fn faculty_counts_on(&self, day: NaiveDate) -> Result<Vec<FacultyCount>, ServiceError> {
        sqlx::query_as::<_, FacultyCount>(
            r#"
            SELECT faculty, COUNT(*) AS count
            FROM student_transactions
            WHERE attended_on = $1
            GROUP BY faculty
            ORDER BY count DESC, faculty
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to count faculty check-ins"))
    }

    async fn attended_count(&self) -> Result<AttendedCount, ServiceError> {
        let (attended, registered) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE last_entered IS NOT NULL),
                COUNT(*)
            FROM users
            WHERE role = 'student'
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to count attendance"))?;

        Ok(AttendedCount {
            attended,
            registered,
        })
    }
}

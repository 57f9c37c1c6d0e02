//! Student evaluation persistence.

use async_trait::async_trait;
use openhouse_core::ServiceError;
use openhouse_models::{CreateEvaluationDto, StudentEvaluation, UpdateEvaluationDto};
use sqlx::PgPool;

use crate::utils::db::internal;

#[async_trait]
pub trait StudentEvaluationRepository: Send + Sync {
    /// Stores the evaluation of `student_id`. A second evaluation for the
    /// same student fails with `EvaluationAlreadyExists`.
    async fn create(
        &self,
        student_id: &str,
        dto: &CreateEvaluationDto,
    ) -> Result<StudentEvaluation, ServiceError>;
    async fn find_by_student(
        &self,
        student_id: &str,
    ) -> Result<Option<StudentEvaluation>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<StudentEvaluation>, ServiceError>;
    async fn count(&self) -> Result<i64, ServiceError>;
    async fn update(
        &self,
        student_id: &str,
        dto: &UpdateEvaluationDto,
    ) -> Result<Option<StudentEvaluation>, ServiceError>;
    async fn delete(&self, student_id: &str) -> Result<bool, ServiceError>;
}

const EVALUATION_COLUMNS: &str = "id, student_id, new_sources, overall_activity, \
    interest_activity, received_faculty_info_clearly, would_recommend_cu_open_house_next_time, \
    favorite_booth, activity_diversity, perceived_crowd_density, has_full_booth_access, \
    facility_convenience_rating, campus_navigation_rating, hesitation_level_after_disaster, \
    line_oa_signup_rating, design_beauty_rating, website_improvement_suggestions";

const EVALUATION_INSERT_COLUMNS: &str = "student_id, new_sources, overall_activity, \
    interest_activity, received_faculty_info_clearly, would_recommend_cu_open_house_next_time, \
    favorite_booth, activity_diversity, perceived_crowd_density, has_full_booth_access, \
    facility_convenience_rating, campus_navigation_rating, hesitation_level_after_disaster, \
    line_oa_signup_rating, design_beauty_rating, website_improvement_suggestions";

pub struct PgStudentEvaluationRepository {
    pool: PgPool,
}

impl PgStudentEvaluationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentEvaluationRepository for PgStudentEvaluationRepository {
    async fn create(
        &self,
        student_id: &str,
        dto: &CreateEvaluationDto,
    ) -> Result<StudentEvaluation, ServiceError> {
        let sql = format!(
            "INSERT INTO student_evaluations ({EVALUATION_INSERT_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {EVALUATION_COLUMNS}"
        );

        sqlx::query_as::<_, StudentEvaluation>(&sql)
            .bind(student_id)
            .bind(&dto.new_sources)
            .bind(dto.overall_activity)
            .bind(dto.interest_activity)
            .bind(dto.received_faculty_info_clearly)
            .bind(dto.would_recommend_cu_open_house_next_time)
            .bind(&dto.favorite_booth)
            .bind(dto.activity_diversity)
            .bind(dto.perceived_crowd_density)
            .bind(dto.has_full_booth_access)
            .bind(dto.facility_convenience_rating)
            .bind(dto.campus_navigation_rating)
            .bind(dto.hesitation_level_after_disaster)
            .bind(dto.line_oa_signup_rating)
            .bind(dto.design_beauty_rating)
            .bind(&dto.website_improvement_suggestions)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                let (unique, foreign_key) = e
                    .as_database_error()
                    .map(|d| (d.is_unique_violation(), d.is_foreign_key_violation()))
                    .unwrap_or_default();
                if unique {
                    ServiceError::EvaluationAlreadyExists
                } else if foreign_key {
                    ServiceError::UserNotFound
                } else {
                    internal(e, "Failed to insert student evaluation")
                }
            })
    }

    async fn find_by_student(
        &self,
        student_id: &str,
    ) -> Result<Option<StudentEvaluation>, ServiceError> {
        let sql =
            format!("SELECT {EVALUATION_COLUMNS} FROM student_evaluations WHERE student_id = $1");
        sqlx::query_as::<_, StudentEvaluation>(&sql)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch student evaluation"))
    }

    async fn find_all(&self) -> Result<Vec<StudentEvaluation>, ServiceError> {
        let sql = format!("SELECT {EVALUATION_COLUMNS} FROM student_evaluations ORDER BY id");
        sqlx::query_as::<_, StudentEvaluation>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch student evaluations"))
    }

    async fn count(&self) -> Result<i64, ServiceError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student_evaluations")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to count student evaluations"))
    }

    async fn update(
        &self,
        student_id: &str,
        dto: &UpdateEvaluationDto,
    ) -> Result<Option<StudentEvaluation>, ServiceError> {
        let sql = format!(
            "UPDATE student_evaluations SET \
                new_sources = COALESCE($2, new_sources), \
                overall_activity = COALESCE($3, overall_activity), \
                interest_activity = COALESCE($4, interest_activity), \
                received_faculty_info_clearly = COALESCE($5, received_faculty_info_clearly), \
                would_recommend_cu_open_house_next_time = \
                    COALESCE($6, would_recommend_cu_open_house_next_time), \
                favorite_booth = COALESCE($7, favorite_booth), \
                activity_diversity = COALESCE($8, activity_diversity), \
                perceived_crowd_density = COALESCE($9, perceived_crowd_density), \
                has_full_booth_access = COALESCE($10, has_full_booth_access), \
                facility_convenience_rating = COALESCE($11, facility_convenience_rating), \
                campus_navigation_rating = COALESCE($12, campus_navigation_rating), \
                hesitation_level_after_disaster = COALESCE($13, hesitation_level_after_disaster), \
                line_oa_signup_rating = COALESCE($14, line_oa_signup_rating), \
                design_beauty_rating = COALESCE($15, design_beauty_rating), \
                website_improvement_suggestions = \
                    COALESCE($16, website_improvement_suggestions) \
             WHERE student_id = $1 RETURNING {EVALUATION_COLUMNS}"
        );

        sqlx::query_as::<_, StudentEvaluation>(&sql)
            .bind(student_id)
            .bind(&dto.new_sources)
            .bind(dto.overall_activity)
            .bind(dto.interest_activity)
            .bind(dto.received_faculty_info_clearly)
            .bind(dto.would_recommend_cu_open_house_next_time)
            .bind(&dto.favorite_booth)
            .bind(dto.activity_diversity)
            .bind(dto.perceived_crowd_density)
            .bind(dto.has_full_booth_access)
            .bind(dto.facility_convenience_rating)
            .bind(dto.campus_navigation_rating)
            .bind(dto.hesitation_level_after_disaster)
            .bind(dto.line_oa_signup_rating)
            .bind(dto.design_beauty_rating)
            .bind(&dto.website_improvement_suggestions)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to update student evaluation"))
    }

    async fn delete(&self, student_id: &str) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM student_evaluations WHERE student_id = $1")
            .bind(student_id)
            .execute(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to delete student evaluation"))?;

        Ok(result.rows_affected() > 0)
    }
}

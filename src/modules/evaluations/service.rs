use openhouse_core::ServiceError;
use openhouse_models::{CreateEvaluationDto, StudentEvaluation, UpdateEvaluationDto};
use tracing::instrument;
use validator::Validate;

use crate::state::AppState;

pub struct EvaluationService;

impl EvaluationService {
    /// Stores the one evaluation a student may submit.
    #[instrument(skip(state, dto))]
    pub async fn create(
        state: &AppState,
        student_id: &str,
        dto: CreateEvaluationDto,
    ) -> Result<StudentEvaluation, ServiceError> {
        dto.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if state.users.find_by_id(student_id).await?.is_none() {
            return Err(ServiceError::UserNotFound);
        }
        if state.evaluations.find_by_student(student_id).await?.is_some() {
            return Err(ServiceError::EvaluationAlreadyExists);
        }

        let evaluation = state.evaluations.create(student_id, &dto).await?;
        tracing::info!(student_id = %student_id, "Student evaluation submitted");
        Ok(evaluation)
    }

    #[instrument(skip(state))]
    pub async fn get(state: &AppState, student_id: &str) -> Result<StudentEvaluation, ServiceError> {
        state
            .evaluations
            .find_by_student(student_id)
            .await?
            .ok_or(ServiceError::EvaluationNotFound)
    }

    #[instrument(skip(state))]
    pub async fn list(state: &AppState) -> Result<Vec<StudentEvaluation>, ServiceError> {
        state.evaluations.find_all().await
    }

    #[instrument(skip(state))]
    pub async fn count(state: &AppState) -> Result<i64, ServiceError> {
        state.evaluations.count().await
    }

    #[instrument(skip(state, dto))]
    pub async fn update(
        state: &AppState,
        student_id: &str,
        dto: UpdateEvaluationDto,
    ) -> Result<StudentEvaluation, ServiceError> {
        dto.validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        state
            .evaluations
            .update(student_id, &dto)
            .await?
            .ok_or(ServiceError::EvaluationNotFound)
    }

    #[instrument(skip(state))]
    pub async fn delete(state: &AppState, student_id: &str) -> Result<(), ServiceError> {
        if !state.evaluations.delete(student_id).await? {
            return Err(ServiceError::EvaluationNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use openhouse_models::Role;

    use super::*;
    use crate::test_support::TestContext;

    const STUDENT: &str = "6530000021";

    fn ratings(score: i32) -> CreateEvaluationDto {
        CreateEvaluationDto {
            new_sources: vec!["TikTok".to_string()],
            overall_activity: score,
            interest_activity: score,
            received_faculty_info_clearly: score,
            would_recommend_cu_open_house_next_time: score,
            favorite_booth: Some("Robotics".to_string()),
            activity_diversity: score,
            perceived_crowd_density: score,
            has_full_booth_access: score,
            facility_convenience_rating: score,
            campus_navigation_rating: score,
            hesitation_level_after_disaster: score,
            line_oa_signup_rating: score,
            design_beauty_rating: score,
            website_improvement_suggestions: None,
        }
    }

    async fn with_student() -> TestContext {
        let ctx = TestContext::new();
        ctx.seed_user(STUDENT, "0812345678", Role::Student, None).await;
        ctx
    }

    #[tokio::test]
    async fn test_second_evaluation_is_rejected() {
        let ctx = with_student().await;

        let first = EvaluationService::create(&ctx.state, STUDENT, ratings(8))
            .await
            .unwrap();
        let second = EvaluationService::create(&ctx.state, STUDENT, ratings(2)).await;
        assert!(matches!(second, Err(ServiceError::EvaluationAlreadyExists)));

        let stored = EvaluationService::get(&ctx.state, STUDENT).await.unwrap();
        assert_eq!(stored, first);
        assert_eq!(EvaluationService::count(&ctx.state).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_rejected() {
        let ctx = with_student().await;
        let result = EvaluationService::create(&ctx.state, STUDENT, ratings(11)).await;
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_unknown_student_is_rejected() {
        let ctx = TestContext::new();
        let result = EvaluationService::create(&ctx.state, "ghost", ratings(5)).await;
        assert!(matches!(result, Err(ServiceError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_update_merges_provided_fields() {
        let ctx = with_student().await;
        EvaluationService::create(&ctx.state, STUDENT, ratings(6))
            .await
            .unwrap();

        let updated = EvaluationService::update(
            &ctx.state,
            STUDENT,
            UpdateEvaluationDto {
                overall_activity: Some(10),
                ..UpdateEvaluationDto::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.overall_activity, 10);
        assert_eq!(updated.interest_activity, 6);
        assert_eq!(updated.favorite_booth.as_deref(), Some("Robotics"));
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let ctx = with_student().await;
        EvaluationService::create(&ctx.state, STUDENT, ratings(7))
            .await
            .unwrap();

        EvaluationService::delete(&ctx.state, STUDENT).await.unwrap();

        let result = EvaluationService::get(&ctx.state, STUDENT).await;
        assert!(matches!(result, Err(ServiceError::EvaluationNotFound)));
        let again = EvaluationService::delete(&ctx.state, STUDENT).await;
        assert!(matches!(again, Err(ServiceError::EvaluationNotFound)));
    }
}

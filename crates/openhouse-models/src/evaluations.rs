//! Post-event student evaluation models.
//!
//! Each student may submit exactly one evaluation. Ratings are on a `0..=10`
//! scale.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentEvaluation {
    pub id: i64,
    pub student_id: String,
    pub new_sources: Vec<String>,
    pub overall_activity: i32,
    pub interest_activity: i32,
    pub received_faculty_info_clearly: i32,
    #[serde(rename = "wouldRecommendCUOpenHouseNextTime")]
    pub would_recommend_cu_open_house_next_time: i32,
    pub favorite_booth: Option<String>,
    pub activity_diversity: i32,
    pub perceived_crowd_density: i32,
    pub has_full_booth_access: i32,
    pub facility_convenience_rating: i32,
    pub campus_navigation_rating: i32,
    pub hesitation_level_after_disaster: i32,
    #[serde(rename = "lineOASignupRating")]
    pub line_oa_signup_rating: i32,
    pub design_beauty_rating: i32,
    pub website_improvement_suggestions: Option<String>,
}

/// Body of `POST /api/student-evaluation`. The student is taken from the
/// caller's token.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEvaluationDto {
    #[serde(default)]
    pub new_sources: Vec<String>,
    #[validate(range(min = 0, max = 10))]
    pub overall_activity: i32,
    #[validate(range(min = 0, max = 10))]
    pub interest_activity: i32,
    #[validate(range(min = 0, max = 10))]
    pub received_faculty_info_clearly: i32,
    #[serde(rename = "wouldRecommendCUOpenHouseNextTime")]
    #[validate(range(min = 0, max = 10))]
    pub would_recommend_cu_open_house_next_time: i32,
    pub favorite_booth: Option<String>,
    #[validate(range(min = 0, max = 10))]
    pub activity_diversity: i32,
    #[validate(range(min = 0, max = 10))]
    pub perceived_crowd_density: i32,
    #[validate(range(min = 0, max = 10))]
    pub has_full_booth_access: i32,
    #[validate(range(min = 0, max = 10))]
    pub facility_convenience_rating: i32,
    #[validate(range(min = 0, max = 10))]
    pub campus_navigation_rating: i32,
    #[validate(range(min = 0, max = 10))]
    pub hesitation_level_after_disaster: i32,
    #[serde(rename = "lineOASignupRating")]
    #[validate(range(min = 0, max = 10))]
    pub line_oa_signup_rating: i32,
    #[validate(range(min = 0, max = 10))]
    pub design_beauty_rating: i32,
    #[validate(length(max = 2000))]
    pub website_improvement_suggestions: Option<String>,
}

impl CreateEvaluationDto {
    /// Builds the stored record. `id` is assigned by the store.
    pub fn into_evaluation(self, id: i64, student_id: String) -> StudentEvaluation {
        StudentEvaluation {
            id,
            student_id,
            new_sources: self.new_sources,
            overall_activity: self.overall_activity,
            interest_activity: self.interest_activity,
            received_faculty_info_clearly: self.received_faculty_info_clearly,
            would_recommend_cu_open_house_next_time: self.would_recommend_cu_open_house_next_time,
            favorite_booth: self.favorite_booth,
            activity_diversity: self.activity_diversity,
            perceived_crowd_density: self.perceived_crowd_density,
            has_full_booth_access: self.has_full_booth_access,
            facility_convenience_rating: self.facility_convenience_rating,
            campus_navigation_rating: self.campus_navigation_rating,
            hesitation_level_after_disaster: self.hesitation_level_after_disaster,
            line_oa_signup_rating: self.line_oa_signup_rating,
            design_beauty_rating: self.design_beauty_rating,
            website_improvement_suggestions: self.website_improvement_suggestions,
        }
    }
}

/// Partial update; absent fields keep their stored value.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvaluationDto {
    pub new_sources: Option<Vec<String>>,
    #[validate(range(min = 0, max = 10))]
    pub overall_activity: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub interest_activity: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub received_faculty_info_clearly: Option<i32>,
    #[serde(rename = "wouldRecommendCUOpenHouseNextTime")]
    #[validate(range(min = 0, max = 10))]
    pub would_recommend_cu_open_house_next_time: Option<i32>,
    pub favorite_booth: Option<String>,
    #[validate(range(min = 0, max = 10))]
    pub activity_diversity: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub perceived_crowd_density: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub has_full_booth_access: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub facility_convenience_rating: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub campus_navigation_rating: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub hesitation_level_after_disaster: Option<i32>,
    #[serde(rename = "lineOASignupRating")]
    #[validate(range(min = 0, max = 10))]
    pub line_oa_signup_rating: Option<i32>,
    #[validate(range(min = 0, max = 10))]
    pub design_beauty_rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub website_improvement_suggestions: Option<String>,
}

impl UpdateEvaluationDto {
    pub fn apply_to(&self, evaluation: &mut StudentEvaluation) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &self.$field {
                        evaluation.$field = value.clone();
                    }
                )*
            };
        }
        macro_rules! merge_opt {
            ($($field:ident),* $(,)?) => {
                $(
                    if self.$field.is_some() {
                        evaluation.$field = self.$field.clone();
                    }
                )*
            };
        }

        merge!(
            new_sources,
            overall_activity,
            interest_activity,
            received_faculty_info_clearly,
            would_recommend_cu_open_house_next_time,
            activity_diversity,
            perceived_crowd_density,
            has_full_booth_access,
            facility_convenience_rating,
            campus_navigation_rating,
            hesitation_level_after_disaster,
            line_oa_signup_rating,
            design_beauty_rating,
        );
        merge_opt!(favorite_booth, website_improvement_suggestions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CreateEvaluationDto {
        CreateEvaluationDto {
            new_sources: vec!["Facebook".to_string()],
            overall_activity: 9,
            interest_activity: 8,
            received_faculty_info_clearly: 7,
            would_recommend_cu_open_house_next_time: 10,
            favorite_booth: Some("Robotics".to_string()),
            activity_diversity: 6,
            perceived_crowd_density: 5,
            has_full_booth_access: 4,
            facility_convenience_rating: 3,
            campus_navigation_rating: 2,
            hesitation_level_after_disaster: 1,
            line_oa_signup_rating: 0,
            design_beauty_rating: 9,
            website_improvement_suggestions: None,
        }
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        assert!(sample().validate().is_ok());

        let invalid = CreateEvaluationDto {
            overall_activity: 11,
            ..sample()
        };
        assert!(invalid.validate().is_err());

        let negative = UpdateEvaluationDto {
            design_beauty_rating: Some(-1),
            ..UpdateEvaluationDto::default()
        };
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_json_keeps_legacy_field_names() {
        let evaluation = sample().into_evaluation(1, "6530000021".to_string());
        let json = serde_json::to_value(&evaluation).unwrap();

        assert_eq!(json["wouldRecommendCUOpenHouseNextTime"], 10);
        assert_eq!(json["lineOASignupRating"], 0);
        assert_eq!(json["studentId"], "6530000021");
    }

    #[test]
    fn test_update_merges_only_provided_fields() {
        let mut evaluation = sample().into_evaluation(1, "6530000021".to_string());
        let patch = UpdateEvaluationDto {
            overall_activity: Some(3),
            website_improvement_suggestions: Some("Bigger map".to_string()),
            ..UpdateEvaluationDto::default()
        };

        patch.apply_to(&mut evaluation);

        assert_eq!(evaluation.overall_activity, 3);
        assert_eq!(evaluation.interest_activity, 8);
        assert_eq!(evaluation.favorite_booth.as_deref(), Some("Robotics"));
        assert_eq!(
            evaluation.website_improvement_suggestions.as_deref(),
            Some("Bigger map")
        );
    }
}

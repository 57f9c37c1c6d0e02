//! Registration forms arrive as `multipart/form-data`.

use axum::extract::Multipart;
use chrono::NaiveDate;
use openhouse_core::AppError;
use openhouse_core::serde::split_comma_list;
use openhouse_models::UserDraft;
use utoipa::ToSchema;

/// Fields accepted by the registration forms. Documentation only; the form
/// is read field by field into a [`UserDraft`].
#[allow(dead_code)]
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RegistrationForm {
    id: String,
    name: String,
    email: String,
    phone: String,
    /// `YYYY-MM-DD`
    birth_date: Option<String>,
    status: Option<String>,
    other_status: Option<String>,
    province: Option<String>,
    school: Option<String>,
    /// Comma separated list
    selected_sources: Option<String>,
    other_source: Option<String>,
    first_interest: Option<String>,
    second_interest: Option<String>,
    third_interest: Option<String>,
    objective: Option<String>,
    nickname: Option<String>,
    student_id: Option<String>,
    year: Option<i32>,
    faculty: Option<String>,
    is_central_staff: Option<bool>,
}

/// Reads every text field of the form into a [`UserDraft`]. Unknown fields
/// are ignored; required ones are checked later by validation.
pub async fn read_user_draft(mut multipart: Multipart) -> Result<UserDraft, AppError> {
    let mut draft = UserDraft::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid form data: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid field {}: {}", name, e)))?;

        apply_field(&mut draft, &name, value)?;
    }

    Ok(draft)
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn invalid(name: &str, value: &str) -> AppError {
    AppError::bad_request(anyhow::anyhow!("Invalid value for {}: {}", name, value))
}

pub(crate) fn apply_field(
    draft: &mut UserDraft,
    name: &str,
    value: String,
) -> Result<(), AppError> {
    match name {
        "id" => draft.id = value.trim().to_string(),
        "name" => draft.name = value.trim().to_string(),
        "email" => draft.email = value.trim().to_string(),
        "phone" => draft.phone = value.trim().to_string(),
        "birthDate" => {
            draft.birth_date = match non_empty(value) {
                Some(raw) => Some(
                    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| invalid(name, &raw))?,
                ),
                None => None,
            };
        }
        "status" => draft.status = non_empty(value),
        "otherStatus" => draft.other_status = non_empty(value),
        "province" => draft.province = non_empty(value),
        "school" => draft.school = non_empty(value),
        "selectedSources" => draft.selected_sources.extend(split_comma_list(&value)),
        "otherSource" => draft.other_source = non_empty(value),
        "firstInterest" => draft.first_interest = non_empty(value),
        "secondInterest" => draft.second_interest = non_empty(value),
        "thirdInterest" => draft.third_interest = non_empty(value),
        "objective" => draft.objective = non_empty(value),
        "nickname" => draft.nickname = non_empty(value),
        "studentId" => draft.student_id = non_empty(value),
        "year" => {
            draft.year = match non_empty(value) {
                Some(raw) => Some(raw.parse().map_err(|_| invalid(name, &raw))?),
                None => None,
            };
        }
        "faculty" => draft.faculty = non_empty(value),
        "isCentralStaff" => {
            draft.is_central_staff = match non_empty(value) {
                Some(raw) => Some(
                    raw.to_ascii_lowercase()
                        .parse()
                        .map_err(|_| invalid(name, &raw))?,
                ),
                None => None,
            };
        }
        _ => {}
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn fill(fields: &[(&str, &str)]) -> Result<UserDraft, AppError> {
        let mut draft = UserDraft::default();
        for (name, value) in fields {
            apply_field(&mut draft, name, value.to_string())?;
        }
        Ok(draft)
    }

    #[test]
    fn test_student_fields() {
        let draft = fill(&[
            ("id", "6530000021"),
            ("name", " Somchai "),
            ("birthDate", "2007-03-14"),
            ("selectedSources", "Facebook, Instagram"),
            ("firstInterest", "Engineering"),
            ("secondInterest", ""),
            ("unknown", "ignored"),
        ])
        .unwrap();

        assert_eq!(draft.id, "6530000021");
        assert_eq!(draft.name, "Somchai");
        assert_eq!(draft.birth_date, NaiveDate::from_ymd_opt(2007, 3, 14));
        assert_eq!(draft.selected_sources, vec!["Facebook", "Instagram"]);
        assert_eq!(draft.first_interest.as_deref(), Some("Engineering"));
        assert!(draft.second_interest.is_none());
    }

    #[test]
    fn test_staff_fields() {
        let draft = fill(&[("year", "3"), ("isCentralStaff", "TRUE"), ("faculty", "Science")])
            .unwrap();

        assert_eq!(draft.year, Some(3));
        assert_eq!(draft.is_central_staff, Some(true));
        assert_eq!(draft.faculty.as_deref(), Some("Science"));
    }

    #[test]
    fn test_malformed_values_are_bad_requests() {
        let err = fill(&[("birthDate", "14/03/2007")]).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = fill(&[("year", "third")]).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = fill(&[("isCentralStaff", "maybe")]).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}

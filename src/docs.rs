use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::evaluations::controller::CountResponse;
use crate::modules::users::multipart::RegistrationForm;
use openhouse_core::ErrorResponse;
use openhouse_models::dashboard::{
    AttendedCount, FacultyCount, FacultyInterest, SourceCount, StatusCount,
};
use openhouse_models::{
    CreateEvaluationDto, QrResponse, Role, RoleRequest, SignInRequest, StudentEvaluation,
    StudentTransaction, TokenResponse, UpdateEvaluationDto, User, UserPatch,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::users::controller::sign_in,
        crate::modules::users::controller::register_student,
        crate::modules::users::controller::register_staff,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::update_me,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::scan_qr,
        crate::modules::users::controller::get_qr,
        crate::modules::users::controller::update_role,
        crate::modules::users::controller::add_staff,
        crate::modules::users::controller::remove_staff,
        crate::modules::users::controller::get_user_transactions,
        crate::modules::users::controller::get_transactions,
        crate::modules::users::controller::delete_transaction,
        crate::modules::evaluations::controller::create_evaluation,
        crate::modules::evaluations::controller::get_evaluations,
        crate::modules::evaluations::controller::count_evaluations,
        crate::modules::evaluations::controller::get_evaluation,
        crate::modules::evaluations::controller::update_evaluation,
        crate::modules::evaluations::controller::delete_evaluation,
        crate::modules::dashboard::controller::get_faculty_interests,
        crate::modules::dashboard::controller::get_source_counts,
        crate::modules::dashboard::controller::get_status_counts,
        crate::modules::dashboard::controller::get_faculty_counts_today,
        crate::modules::dashboard::controller::get_attended_count,
    ),
    components(
        schemas(
            User,
            Role,
            UserPatch,
            RegistrationForm,
            SignInRequest,
            TokenResponse,
            QrResponse,
            RoleRequest,
            StudentTransaction,
            StudentEvaluation,
            CreateEvaluationDto,
            UpdateEvaluationDto,
            CountResponse,
            FacultyInterest,
            SourceCount,
            StatusCount,
            FacultyCount,
            AttendedCount,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Registration", description = "Student and staff sign-up"),
        (name = "Users", description = "User management endpoints"),
        (name = "Check-in", description = "QR scanning and attendance records"),
        (name = "Staff", description = "Staff and role management"),
        (name = "Evaluations", description = "Post-event student evaluations"),
        (name = "Dashboard", description = "Aggregate reporting for organisers")
    ),
    info(
        title = "Open House API",
        version = "0.1.0",
        description = "Registration, QR check-in and evaluation backend for a university open house.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_check_in_route() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/users/{id}"));
        assert!(doc.paths.paths.contains_key("/api/dashboard/attended"));
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}

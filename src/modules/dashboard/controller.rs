use axum::{Json, extract::State};
use openhouse_core::{AppError, ErrorResponse};
use openhouse_models::dashboard::{
    AttendedCount, FacultyCount, FacultyInterest, SourceCount, StatusCount,
};

use crate::modules::dashboard::service::DashboardService;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/dashboard/faculties",
    responses(
        (status = 200, description = "Interest counts per faculty, most picked first", body = Vec<FacultyInterest>),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_faculty_interests(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacultyInterest>>, AppError> {
    Ok(Json(DashboardService::faculty_interests(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/sources",
    responses(
        (status = 200, description = "How attendees heard about the event", body = Vec<SourceCount>),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_source_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<SourceCount>>, AppError> {
    Ok(Json(DashboardService::source_counts(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/status",
    responses(
        (status = 200, description = "Registered students per education status", body = Vec<StatusCount>),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_status_counts(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCount>>, AppError> {
    Ok(Json(DashboardService::status_counts(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/faculty-today",
    responses(
        (status = 200, description = "Faculty check-ins today", body = Vec<FacultyCount>),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_faculty_counts_today(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacultyCount>>, AppError> {
    Ok(Json(DashboardService::faculty_counts_today(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/attended",
    responses(
        (status = 200, description = "Students who entered versus registered", body = AttendedCount),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn get_attended_count(
    State(state): State<AppState>,
) -> Result<Json<AttendedCount>, AppError> {
    Ok(Json(DashboardService::attended_count(&state).await?))
}

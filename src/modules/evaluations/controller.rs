use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use openhouse_core::{AppError, ErrorResponse};
use openhouse_models::{CreateEvaluationDto, StudentEvaluation, UpdateEvaluationDto};
use serde::Serialize;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::CurrentUser;
use crate::middleware::role::{RequireStaff, check_self_or_staff};
use crate::modules::evaluations::service::EvaluationService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(Serialize, ToSchema)]
pub struct CountResponse {
    pub count: i64,
}

#[utoipa::path(
    post,
    path = "/api/student-evaluation",
    request_body = CreateEvaluationDto,
    responses(
        (status = 201, description = "Evaluation stored", body = StudentEvaluation),
        (status = 400, description = "Invalid rating or already submitted", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, caller, dto))]
pub async fn create_evaluation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(dto): ValidatedJson<CreateEvaluationDto>,
) -> Result<(StatusCode, Json<StudentEvaluation>), AppError> {
    let evaluation = EvaluationService::create(&state, &caller.id, dto).await?;
    Ok((StatusCode::CREATED, Json(evaluation)))
}

#[utoipa::path(
    get,
    path = "/api/student-evaluation",
    responses(
        (status = 200, description = "Every evaluation", body = Vec<StudentEvaluation>),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _caller))]
pub async fn get_evaluations(
    State(state): State<AppState>,
    RequireStaff(_caller): RequireStaff,
) -> Result<Json<Vec<StudentEvaluation>>, AppError> {
    let evaluations = EvaluationService::list(&state).await?;
    Ok(Json(evaluations))
}

#[utoipa::path(
    get,
    path = "/api/student-evaluation/count",
    responses(
        (status = 200, description = "Number of evaluations", body = CountResponse),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _caller))]
pub async fn count_evaluations(
    State(state): State<AppState>,
    RequireStaff(_caller): RequireStaff,
) -> Result<Json<CountResponse>, AppError> {
    let count = EvaluationService::count(&state).await?;
    Ok(Json(CountResponse { count }))
}

#[utoipa::path(
    get,
    path = "/api/student-evaluation/{student_id}",
    params(("student_id" = String, Path, description = "Registration id of the student")),
    responses(
        (status = 200, description = "Evaluation", body = StudentEvaluation),
        (status = 403, description = "Forbidden - own evaluation or staff", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, caller))]
pub async fn get_evaluation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(student_id): Path<String>,
) -> Result<Json<StudentEvaluation>, AppError> {
    check_self_or_staff(&caller, &student_id)?;
    let evaluation = EvaluationService::get(&state, &student_id).await?;
    Ok(Json(evaluation))
}

#[utoipa::path(
    patch,
    path = "/api/student-evaluation/{student_id}",
    params(("student_id" = String, Path, description = "Registration id of the student")),
    request_body = UpdateEvaluationDto,
    responses(
        (status = 200, description = "Evaluation updated", body = StudentEvaluation),
        (status = 400, description = "Invalid rating", body = ErrorResponse),
        (status = 403, description = "Forbidden - own evaluation or staff", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, caller, dto))]
pub async fn update_evaluation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(student_id): Path<String>,
    ValidatedJson(dto): ValidatedJson<UpdateEvaluationDto>,
) -> Result<Json<StudentEvaluation>, AppError> {
    check_self_or_staff(&caller, &student_id)?;
    let evaluation = EvaluationService::update(&state, &student_id, dto).await?;
    Ok(Json(evaluation))
}

#[utoipa::path(
    delete,
    path = "/api/student-evaluation/{student_id}",
    params(("student_id" = String, Path, description = "Registration id of the student")),
    responses(
        (status = 204, description = "Evaluation deleted"),
        (status = 403, description = "Forbidden - own evaluation or staff", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, caller))]
pub async fn delete_evaluation(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(student_id): Path<String>,
) -> Result<StatusCode, AppError> {
    check_self_or_staff(&caller, &student_id)?;
    EvaluationService::delete(&state, &student_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

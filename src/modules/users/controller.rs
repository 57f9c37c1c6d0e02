use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use openhouse_core::{AppError, ErrorResponse};
use openhouse_models::{
    QrResponse, RegistrationChannel, Role, RoleRequest, SignInRequest, StudentTransaction,
    TokenResponse, User, UserFilterParams, UserPatch,
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::CurrentUser;
use crate::middleware::role::{
    RequireAdmin, RequireStaff, check_self_or_admin, check_self_or_staff,
};
use crate::modules::users::multipart::{RegistrationForm, read_user_draft};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/users/signin",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = TokenResponse),
        (status = 404, description = "Unknown user", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Users"
)]
#[instrument(skip(state, request))]
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let response = UserService::sign_in(&state, &request.id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/student/register",
    request_body(content = RegistrationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Student registered", body = TokenResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Phone already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Registration"
)]
#[instrument(skip(state, multipart))]
pub async fn register_student(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    register(&state, multipart, RegistrationChannel::Student).await
}

#[utoipa::path(
    post,
    path = "/api/staff/register",
    request_body(content = RegistrationForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Staff registered", body = TokenResponse),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 409, description = "Phone already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Registration"
)]
#[instrument(skip(state, multipart))]
pub async fn register_staff(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    register(&state, multipart, RegistrationChannel::Staff).await
}

async fn register(
    state: &AppState,
    multipart: Multipart,
    channel: RegistrationChannel,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let draft = read_user_draft(multipart).await?;
    let response = UserService::register(state, draft, channel).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(UserFilterParams),
    responses(
        (status = 200, description = "Matching users", body = Vec<User>),
        (status = 400, description = "Unknown role", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _caller))]
pub async fn get_users(
    State(state): State<AppState>,
    RequireStaff(_caller): RequireStaff,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<Vec<User>>, AppError> {
    let role = params
        .role
        .as_deref()
        .filter(|r| !r.trim().is_empty())
        .map(str::parse::<Role>)
        .transpose()
        .map_err(|e| AppError::bad_request(anyhow::anyhow!(e)))?;
    let name = params.name.as_deref().filter(|n| !n.trim().is_empty());

    let users = UserService::get_all(&state, name, role).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User registration id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_by_id(&state, &id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User registration id")),
    request_body = UserPatch,
    responses(
        (status = 204, description = "User updated"),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - own record or admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, caller, patch))]
pub async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
    ValidatedJson(patch): ValidatedJson<UserPatch>,
) -> Result<StatusCode, AppError> {
    check_self_or_admin(&caller, &id)?;
    UserService::update(&state, &id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/users",
    request_body = UserPatch,
    responses(
        (status = 204, description = "Profile updated"),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, caller, patch))]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ValidatedJson(patch): ValidatedJson<UserPatch>,
) -> Result<StatusCode, AppError> {
    UserService::update(&state, &caller.id, patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User registration id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    UserService::delete(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/users/qr/{id}",
    params(("id" = String, Path, description = "Registration id of the user being checked in")),
    responses(
        (status = 200, description = "Check-in recorded", body = User),
        (status = 400, description = "Already entered today", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Staff only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Check-in"
)]
#[instrument(skip(state, staff), fields(staff_id = %staff.id))]
pub async fn scan_qr(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let student = UserService::scan_qr(&state, &id, &staff.id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/users/qr/{id}",
    params(("id" = String, Path, description = "User registration id")),
    responses(
        (status = 200, description = "Check-in URL to embed in a QR code", body = QrResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - own record or staff", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Check-in"
)]
#[instrument(skip(state, caller))]
pub async fn get_qr(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<QrResponse>, AppError> {
    check_self_or_staff(&caller, &id)?;
    let qr_url = UserService::get_qr_url(&state, &id).await?;
    Ok(Json(QrResponse { qr_url }))
}

#[utoipa::path(
    patch,
    path = "/api/users/role/{id}",
    params(("id" = String, Path, description = "User registration id")),
    request_body = RoleRequest,
    responses(
        (status = 204, description = "Role updated"),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
#[instrument(skip(state, _admin))]
pub async fn update_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(request): Json<RoleRequest>,
) -> Result<StatusCode, AppError> {
    UserService::update_role(&state, &id, request.role).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/addstaff/{phone}",
    params(("phone" = String, Path, description = "Phone number the user registered with")),
    responses(
        (status = 204, description = "User is now staff"),
        (status = 400, description = "Already staff", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
#[instrument(skip(state, _admin))]
pub async fn add_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(phone): Path<String>,
) -> Result<StatusCode, AppError> {
    UserService::add_staff(&state, &phone).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/removestaff/{id}",
    params(("id" = String, Path, description = "User registration id")),
    responses(
        (status = 204, description = "User is now a member"),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Staff"
)]
#[instrument(skip(state, _admin))]
pub async fn remove_staff(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    UserService::remove_staff(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/transactions",
    params(("id" = String, Path, description = "User registration id")),
    responses(
        (status = 200, description = "Faculty check-ins of the user", body = Vec<StudentTransaction>),
        (status = 403, description = "Forbidden - own record or staff", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Check-in"
)]
#[instrument(skip(state, caller))]
pub async fn get_user_transactions(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<StudentTransaction>>, AppError> {
    check_self_or_staff(&caller, &id)?;
    let transactions = UserService::get_transactions(&state, &id).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    responses(
        (status = 200, description = "Every faculty check-in", body = Vec<StudentTransaction>),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Check-in"
)]
#[instrument(skip(state, _admin))]
pub async fn get_transactions(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<StudentTransaction>>, AppError> {
    let transactions = UserService::get_all_transactions(&state).await?;
    Ok(Json(transactions))
}

#[utoipa::path(
    delete,
    path = "/api/transactions/{id}",
    params(("id" = Uuid, Path, description = "Transaction id")),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Check-in"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_transaction(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    UserService::delete_transaction(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

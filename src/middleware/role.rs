//! Role-based authorization for Axum.
//!
//! Two ways to guard a route:
//! 1. Layer-based, with [`require_staff`] through
//!    `axum::middleware::from_fn_with_state`
//! 2. Extractor-based, with [`RequireStaff`] or [`RequireAdmin`] in the
//!    handler signature
//!
//! Roles are read from the store on every request.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use openhouse_core::AppError;
use openhouse_models::{Role, User};

use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Runs `next` only if the caller holds one of `allowed_roles`.
pub async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed_roles: &[Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &state).await?;
    check_any_role(&user, allowed_roles)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// Layer for routes open to staff and admins.
///
/// ```rust,ignore
/// let dashboard = init_dashboard_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_staff));
/// ```
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(state, req, next, &[Role::Staff, Role::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Extractor for staff-level access (Staff or Admin).
#[derive(Debug, Clone)]
pub struct RequireStaff(pub User);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.can_scan() {
            return Err(AppError::forbidden(
                "Access denied. Staff privileges required.".to_string(),
            ));
        }

        Ok(RequireStaff(user))
    }
}

/// Extractor for admin-only access.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            return Err(AppError::forbidden(
                "Access denied. Administrator privileges required.".to_string(),
            ));
        }

        Ok(RequireAdmin(user))
    }
}

pub fn check_any_role(user: &User, allowed_roles: &[Role]) -> Result<(), AppError> {
    if !allowed_roles.contains(&user.role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {}",
            allowed_roles, user.role
        )));
    }

    Ok(())
}

/// Lets a user act on their own record, and staff act on anyone's.
pub fn check_self_or_staff(caller: &User, target_id: &str) -> Result<(), AppError> {
    if caller.id == target_id || caller.role.can_scan() {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Access denied. You can only access your own record.".to_string(),
    ))
}

/// Lets a user act on their own record, and admins act on anyone's.
pub fn check_self_or_admin(caller: &User, target_id: &str) -> Result<(), AppError> {
    if caller.id == target_id || caller.role == Role::Admin {
        return Ok(());
    }
    Err(AppError::forbidden(
        "Access denied. You can only modify your own record.".to_string(),
    ))
}

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use openhouse_auth::verify_token;
use openhouse_core::AppError;
use openhouse_models::User;

use crate::state::AppState;

/// Extractor that validates the bearer token and yields the user id it
/// carries. The user is not looked up.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl AuthUser {
    pub fn user_id(&self) -> &str {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let user_id = verify_token(token.trim(), &state.jwt_config)?;

        Ok(AuthUser(user_id))
    }
}

/// The authenticated caller, loaded from the store so that role checks see
/// the current role rather than the one at token issue time.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;

        let user = state
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists".to_string()))?;

        tracing::Span::current().record("user_id", user.id.as_str());
        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};
    use openhouse_models::Role;

    use super::*;
    use crate::test_support::TestContext;

    fn parts_with(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/users/me");
        if let Some(value) = header {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let ctx = TestContext::new();
        let mut parts = parts_with(None);

        let err = AuthUser::from_request_parts(&mut parts, &ctx.state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        let ctx = TestContext::new();
        let mut parts = parts_with(Some("Basic dXNlcjpwYXNz"));

        let err = AuthUser::from_request_parts(&mut parts, &ctx.state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_yields_user_id() {
        let ctx = TestContext::new();
        let token = ctx.token_for("6530000021");
        let mut parts = parts_with(Some(&format!("Bearer {}", token)));

        let auth_user = AuthUser::from_request_parts(&mut parts, &ctx.state)
            .await
            .unwrap();
        assert_eq!(auth_user.user_id(), "6530000021");
    }

    #[tokio::test]
    async fn test_current_user_requires_existing_user() {
        let ctx = TestContext::new();
        let token = ctx.token_for("ghost");
        let mut parts = parts_with(Some(&format!("Bearer {}", token)));

        let err = CurrentUser::from_request_parts(&mut parts, &ctx.state)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_current_user_loads_role() {
        let ctx = TestContext::new();
        ctx.seed_user("STAFF-1", "0811111111", Role::Staff, None).await;
        let token = ctx.token_for("STAFF-1");
        let mut parts = parts_with(Some(&format!("Bearer {}", token)));

        let CurrentUser(user) = CurrentUser::from_request_parts(&mut parts, &ctx.state)
            .await
            .unwrap();
        assert_eq!(user.role, Role::Staff);
    }
}

//! JWT utilities for authentication.
//!
//! Tokens are signed with HS256 using the shared secret from [`JwtConfig`].
//! Verification rejects any other algorithm, a bad signature, an expired
//! token (when it carries `exp`), and a claim set without `userId`.

use std::collections::HashSet;

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use openhouse_config::JwtConfig;
use openhouse_core::ServiceError;

use crate::claims::Claims;

/// Issues a signed access token embedding `user_id`.
///
/// # Errors
///
/// Returns an internal error if encoding fails.
pub fn issue_token(user_id: &str, jwt_config: &JwtConfig) -> Result<String, ServiceError> {
    let now = Utc::now().timestamp() as usize;
    let exp = jwt_config
        .access_token_expiry
        .map(|seconds| now + seconds as usize);

    let claims = Claims {
        user_id: user_id.to_string(),
        iat: now,
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| ServiceError::internal(anyhow!("Failed to create token: {}", e)))
}

/// Verifies a token and returns the embedded user id.
///
/// # Errors
///
/// Returns [`ServiceError::InvalidToken`] if the signature is invalid, the
/// algorithm is not HS256, the token expired, or `userId` is missing or empty.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<String, ServiceError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| ServiceError::InvalidToken)?;

    if claims.user_id.trim().is_empty() {
        return Err(ServiceError::InvalidToken);
    }

    Ok(claims.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: None,
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let config = get_test_jwt_config();

        let token = issue_token("6530000021", &config).unwrap();
        assert!(!token.is_empty());

        let user_id = verify_token(&token, &config).unwrap();
        assert_eq!(user_id, "6530000021");
    }

    #[test]
    fn test_verify_token_invalid() {
        let config = get_test_jwt_config();
        let result = verify_token("invalid-token", &config);
        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = issue_token("6530000021", &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: None,
        };

        let result = verify_token(&token, &wrong_config);
        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn test_verify_token_rejects_other_algorithm() {
        let config = get_test_jwt_config();
        let claims = Claims {
            user_id: "6530000021".to_string(),
            iat: Utc::now().timestamp() as usize,
            exp: None,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn test_verify_token_rejects_missing_user_id() {
        #[derive(Serialize)]
        struct Foreign {
            sub: String,
            iat: usize,
        }

        let config = get_test_jwt_config();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Foreign {
                sub: "6530000021".to_string(),
                iat: 0,
            },
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }

    #[test]
    fn test_token_with_expiry() {
        let config = JwtConfig {
            access_token_expiry: Some(3600),
            ..get_test_jwt_config()
        };

        let token = issue_token("6530000021", &config).unwrap();
        assert_eq!(verify_token(&token, &config).unwrap(), "6530000021");
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = get_test_jwt_config();
        let claims = Claims {
            user_id: "6530000021".to_string(),
            iat: 1_000,
            exp: Some(2_000),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let result = verify_token(&token, &config);
        assert!(matches!(result, Err(ServiceError::InvalidToken)));
    }
}

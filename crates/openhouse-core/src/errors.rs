//! Error types for the Open House API.
//!
//! Use cases return [`ServiceError`], a closed set of business outcomes.
//! Handlers convert it into [`AppError`], which owns the HTTP status and the
//! JSON body shape `{"error": "...", "message": "..."}`.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use utoipa::ToSchema;

/// Business-level failures produced by the use cases and repositories.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid phone number format: {0}")]
    InvalidPhone(String),

    #[error("User not found")]
    UserNotFound,

    #[error("Student evaluation not found")]
    EvaluationNotFound,

    #[error("Student transaction not found")]
    TransactionNotFound,

    /// The student was already checked in during the current calendar day.
    /// `at` is the instant of the earlier check-in.
    #[error("User has already entered")]
    AlreadyEntered { at: DateTime<FixedOffset> },

    #[error("User is already a staff")]
    AlreadyStaff,

    #[error("Student evaluation already exists")]
    EvaluationAlreadyExists,

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Could not allocate a unique UID after {attempts} attempts")]
    UidAllocationExhausted { attempts: u32 },

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Internal(#[from] Error),
}

impl ServiceError {
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::Internal(err.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidPhone(_)
            | Self::AlreadyEntered { .. }
            | Self::AlreadyStaff
            | Self::EvaluationAlreadyExists => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::EvaluationNotFound | Self::TransactionNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::DuplicateUser(_) => StatusCode::CONFLICT,
            Self::InvalidToken | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UidAllocationExhausted { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub detail: Option<String>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        let status = err.status();
        match err {
            ServiceError::AlreadyEntered { at } => {
                let detail = at.to_rfc3339();
                AppError::new(status, anyhow::anyhow!("User has already entered"))
                    .with_detail(detail)
            }
            ServiceError::Internal(cause) => {
                tracing::error!(error = ?cause, "Internal error");
                AppError::new(status, cause)
            }
            ServiceError::UidAllocationExhausted { .. } => {
                tracing::error!(error = %err, "UID allocation exhausted");
                AppError::new(status, err)
            }
            other => AppError::new(status, other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Server faults never leak their cause to the client.
        let error = if self.status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(ErrorResponse {
            error,
            message: self.detail,
        });

        (self.status, body).into_response()
    }
}

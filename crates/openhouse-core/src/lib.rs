//! # Open House Core
//!
//! Core types shared by every Open House crate:
//!
//! - [`errors`]: the business error taxonomy ([`ServiceError`]) and the HTTP
//!   facing [`AppError`] it is rendered through
//! - [`serde`]: deserialization helpers for loosely typed client input
//! - [`uid`]: the two-letter, eight-digit user identifier generator
//!
//! # Example
//!
//! ```ignore
//! use openhouse_core::errors::{AppError, ServiceError};
//!
//! fn lookup() -> Result<(), ServiceError> {
//!     Err(ServiceError::UserNotFound)
//! }
//!
//! let response_error: AppError = lookup().unwrap_err().into();
//! assert_eq!(response_error.status, axum::http::StatusCode::NOT_FOUND);
//! ```

pub mod errors;
pub mod serde;
pub mod uid;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse, ServiceError};

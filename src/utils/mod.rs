//! Shared utilities for the Open House API.
//!
//! - [`clock`]: the time source and event-local calendar day helpers
//! - [`db`]: mapping of `sqlx` failures onto [`ServiceError`](openhouse_core::ServiceError)
//! - [`phone`]: national mobile number validation

pub mod clock;
pub mod db;
pub mod phone;

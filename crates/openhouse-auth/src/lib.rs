//! # Open House Auth
//!
//! Bearer token utilities for the Open House API.
//!
//! - [`claims`]: the claim set embedded in every token
//! - [`jwt`]: issuing and verifying HS256 tokens
//!
//! A token carries only the user's external registration id. Authorization
//! decisions are made by looking up the user's current role after the token
//! is verified, so a role change takes effect without re-issuing tokens.
//!
//! # Example
//!
//! ```ignore
//! use openhouse_auth::{issue_token, verify_token};
//! use openhouse_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = issue_token("6530000021", &config)?;
//! let user_id = verify_token(&token, &config)?;
//! assert_eq!(user_id, "6530000021");
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{issue_token, verify_token};

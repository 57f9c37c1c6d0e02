//! Middleware modules for request processing.
//!
//! # Modules
//!
//! - [`auth`]: bearer token extractors
//! - [`role`]: role checks, as route layers and as extractors
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` verifies the token and extracts the user id
//! 3. `CurrentUser` loads that user, so role checks see the stored role
//! 4. Handler executes if all checks pass
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::role::RequireStaff;
//!
//! async fn list_users(RequireStaff(caller): RequireStaff) -> impl IntoResponse {
//!     // Only executes for staff and admins
//! }
//! ```

pub mod auth;
pub mod role;

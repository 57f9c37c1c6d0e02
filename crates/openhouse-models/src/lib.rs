//! # Open House Models
//!
//! Domain models and DTOs for the Open House API.
//!
//! # Modules
//!
//! - [`users`]: users, roles, staff kinds, registration drafts and patches
//! - [`transactions`]: per-faculty attendance ledger entries
//! - [`evaluations`]: post-event student evaluations
//! - [`dashboard`]: read-only aggregate rows
//!
//! # Example
//!
//! ```ignore
//! use openhouse_models::users::{Role, StaffKind, User};
//!
//! if let Some(StaffKind::Faculty(faculty)) = user.staff_kind() {
//!     println!("{} scans for {}", user.name, faculty);
//! }
//! ```

pub mod dashboard;
pub mod evaluations;
pub mod transactions;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use evaluations::{CreateEvaluationDto, StudentEvaluation, UpdateEvaluationDto};
pub use transactions::StudentTransaction;
pub use users::{
    QrResponse, RegistrationChannel, Role, RoleRequest, SignInRequest, StaffKind, TokenResponse,
    User, UserDraft, UserFilterParams, UserPatch,
};

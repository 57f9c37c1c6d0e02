//! User domain models and DTOs.
//!
//! A single `users` table holds attendees, staff and admins. The [`Role`]
//! decides which optional fields are meaningful: staff-only attributes are
//! ignored for students and members.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use openhouse_core::serde::empty_string_as_none;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// System roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Student,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Student => "student",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }

    /// Staff and admins may scan QR codes and read other users.
    pub fn can_scan(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Role::Member),
            "student" => Ok(Role::Student),
            "staff" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// How a staff member's scans are recorded.
///
/// Central staff mark the site-wide entry on the student record; faculty
/// staff append to the per-faculty attendance ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaffKind {
    Central,
    Faculty(String),
}

impl StaffKind {
    /// Resolves the kind from the raw registration fields.
    ///
    /// `is_central_staff = true` wins over a faculty. A blank or missing
    /// faculty also means central.
    pub fn from_fields(faculty: Option<&str>, is_central_staff: Option<bool>) -> Self {
        if is_central_staff == Some(true) {
            return StaffKind::Central;
        }

        match faculty.map(str::trim).filter(|f| !f.is_empty()) {
            Some(faculty) => StaffKind::Faculty(faculty.to_string()),
            None => StaffKind::Central,
        }
    }

    /// The `(faculty, is_central_staff)` column pair this kind persists as.
    pub fn into_fields(self) -> (Option<String>, Option<bool>) {
        match self {
            StaffKind::Central => (None, Some(true)),
            StaffKind::Faculty(faculty) => (Some(faculty), Some(false)),
        }
    }
}

/// A person known to the system.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// External registration id supplied at sign-up
    pub id: String,
    /// System generated identifier, two letters and eight digits
    pub uid: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub role: Role,
    pub status: Option<String>,
    pub other_status: Option<String>,
    pub province: Option<String>,
    pub school: Option<String>,
    pub selected_sources: Vec<String>,
    pub other_source: Option<String>,
    pub first_interest: Option<String>,
    pub second_interest: Option<String>,
    pub third_interest: Option<String>,
    pub objective: Option<String>,
    pub nickname: Option<String>,
    pub student_id: Option<String>,
    pub year: Option<i32>,
    pub faculty: Option<String>,
    pub is_central_staff: Option<bool>,
    pub registered_at: Option<DateTime<Utc>>,
    /// Last successful central check-in
    pub last_entered: Option<DateTime<Utc>>,
}

impl User {
    /// The scanning behaviour of this user, `None` for non-staff roles.
    ///
    /// An admin without a faculty scans as central staff.
    pub fn staff_kind(&self) -> Option<StaffKind> {
        if !self.role.can_scan() {
            return None;
        }
        Some(StaffKind::from_fields(
            self.faculty.as_deref(),
            self.is_central_staff,
        ))
    }
}

/// Which public endpoint a registration came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationChannel {
    Student,
    Staff,
}

impl RegistrationChannel {
    pub fn default_role(&self) -> Role {
        match self {
            RegistrationChannel::Student => Role::Student,
            RegistrationChannel::Staff => Role::Staff,
        }
    }
}

/// A registration candidate, built from the submitted form.
#[derive(Debug, Clone, Default, Validate)]
pub struct UserDraft {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub other_status: Option<String>,
    pub province: Option<String>,
    pub school: Option<String>,
    pub selected_sources: Vec<String>,
    pub other_source: Option<String>,
    pub first_interest: Option<String>,
    pub second_interest: Option<String>,
    pub third_interest: Option<String>,
    pub objective: Option<String>,
    pub nickname: Option<String>,
    pub student_id: Option<String>,
    pub year: Option<i32>,
    pub faculty: Option<String>,
    pub is_central_staff: Option<bool>,
}

impl UserDraft {
    /// Turns the draft into a user record with the given role and uid.
    ///
    /// Staff fields are resolved into a [`StaffKind`] once here and dropped
    /// for roles that cannot scan.
    pub fn into_user(self, role: Role, uid: String, registered_at: DateTime<Utc>) -> User {
        let (faculty, is_central_staff) = if role.can_scan() {
            StaffKind::from_fields(self.faculty.as_deref(), self.is_central_staff).into_fields()
        } else {
            (None, None)
        };
        let staff = role.can_scan();

        User {
            id: self.id,
            uid,
            name: self.name,
            email: Some(self.email),
            phone: self.phone,
            birth_date: self.birth_date,
            role,
            status: self.status,
            other_status: self.other_status,
            province: self.province,
            school: self.school,
            selected_sources: self.selected_sources,
            other_source: self.other_source,
            first_interest: self.first_interest,
            second_interest: self.second_interest,
            third_interest: self.third_interest,
            objective: self.objective,
            nickname: self.nickname.filter(|_| staff),
            student_id: self.student_id.filter(|_| staff),
            year: self.year.filter(|_| staff),
            faculty,
            is_central_staff,
            registered_at: Some(registered_at),
            last_entered: None,
        }
    }
}

/// Partial update of a user. Only provided fields are written.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub other_status: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub school: Option<String>,
    pub selected_sources: Option<Vec<String>>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub other_source: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub first_interest: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub second_interest: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub third_interest: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub objective: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub nickname: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub student_id: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub faculty: Option<String>,
    pub is_central_staff: Option<bool>,
    /// Set only by role management, never from a request body.
    #[serde(skip)]
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Self::default()
        }
    }

    /// Merges the provided fields into `user`.
    pub fn apply_to(&self, user: &mut User) {
        fn merge<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn merge_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        merge(&mut user.name, &self.name);
        merge_opt(&mut user.email, &self.email);
        merge(&mut user.phone, &self.phone);
        merge_opt(&mut user.birth_date, &self.birth_date);
        merge_opt(&mut user.status, &self.status);
        merge_opt(&mut user.other_status, &self.other_status);
        merge_opt(&mut user.province, &self.province);
        merge_opt(&mut user.school, &self.school);
        merge(&mut user.selected_sources, &self.selected_sources);
        merge_opt(&mut user.other_source, &self.other_source);
        merge_opt(&mut user.first_interest, &self.first_interest);
        merge_opt(&mut user.second_interest, &self.second_interest);
        merge_opt(&mut user.third_interest, &self.third_interest);
        merge_opt(&mut user.objective, &self.objective);
        merge_opt(&mut user.nickname, &self.nickname);
        merge_opt(&mut user.student_id, &self.student_id);
        merge_opt(&mut user.year, &self.year);
        merge_opt(&mut user.faculty, &self.faculty);
        merge_opt(&mut user.is_central_staff, &self.is_central_staff);
        merge(&mut user.role, &self.role);
    }
}

/// Response returned by registration and sign-in.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrResponse {
    pub qr_url: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "id is required"))]
    pub id: String,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct RoleRequest {
    pub role: Role,
}

/// Query parameters for listing users.
#[derive(Deserialize, Debug, Default, IntoParams)]
pub struct UserFilterParams {
    /// Case-insensitive substring of the user's name
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub name: Option<String>,
    /// Exact role match
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,
}

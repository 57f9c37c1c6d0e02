//! Registration, check-in and staff management.
//!
//! A check-in is recorded one of two ways, picked by the scanner's
//! [`StaffKind`]:
//!
//! - central staff stamp `last_entered` on the student, once per local day
//! - faculty staff append a [`StudentTransaction`], once per student, faculty
//!   and local day
//!
//! Both writes are conditional in the store, so two scans racing for the same
//! slot produce exactly one success and one `AlreadyEntered`.

use chrono::{DateTime, Utc};
use openhouse_core::ServiceError;
use openhouse_core::uid::generate_uid;
use openhouse_models::{
    RegistrationChannel, Role, StaffKind, StudentTransaction, TokenResponse, User, UserDraft,
    UserPatch,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::state::AppState;
use crate::utils::clock::{Clock, local_day, local_day_start, same_local_day};
use crate::utils::phone::is_valid_phone;

/// Upper bound on UID generation attempts per registration.
pub const MAX_UID_ATTEMPTS: u32 = 10;

pub struct UserService;

impl UserService {
    /// Registers a user, or re-issues a token if the id is already known.
    ///
    /// A member re-registering through the staff channel is promoted to staff.
    #[instrument(skip(state, draft), fields(user_id = %draft.id))]
    pub async fn register(
        state: &AppState,
        draft: UserDraft,
        channel: RegistrationChannel,
    ) -> Result<TokenResponse, ServiceError> {
        draft
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if !is_valid_phone(&draft.phone) {
            return Err(ServiceError::InvalidPhone(draft.phone));
        }

        let role = if state.event_config.is_admin_phone(&draft.phone) {
            Role::Admin
        } else {
            channel.default_role()
        };

        if let Some(existing) = state.users.find_by_id(&draft.id).await? {
            if channel == RegistrationChannel::Staff && existing.role == Role::Member {
                let (faculty, is_central_staff) =
                    StaffKind::from_fields(draft.faculty.as_deref(), draft.is_central_staff)
                        .into_fields();
                let patch = UserPatch {
                    role: Some(Role::Staff),
                    faculty,
                    is_central_staff,
                    nickname: draft.nickname,
                    student_id: draft.student_id,
                    year: draft.year,
                    ..UserPatch::default()
                };
                state.users.apply_patch(&existing.id, &patch).await?;
                tracing::info!(user_id = %existing.id, "Member promoted to staff on re-registration");
            }
            return Self::token_for(state, existing.id);
        }

        let uid = Self::allocate_uid(state).await?;
        let user = draft.into_user(role, uid, state.clock.now());
        let user = state.users.create(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Self::token_for(state, user.id)
    }

    #[instrument(skip(state))]
    pub async fn sign_in(state: &AppState, id: &str) -> Result<TokenResponse, ServiceError> {
        let user = Self::get_by_id(state, id).await?;
        Self::token_for(state, user.id)
    }

    /// Lists users, optionally narrowed by a name substring and a role.
    #[instrument(skip(state))]
    pub async fn get_all(
        state: &AppState,
        name: Option<&str>,
        role: Option<Role>,
    ) -> Result<Vec<User>, ServiceError> {
        let users = match name {
            Some(name) => state.users.find_by_name(name).await?,
            None => state.users.find_all().await?,
        };

        Ok(match role {
            Some(role) => users.into_iter().filter(|u| u.role == role).collect(),
            None => users,
        })
    }

    #[instrument(skip(state))]
    pub async fn get_by_id(state: &AppState, id: &str) -> Result<User, ServiceError> {
        state
            .users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    /// Applies a profile patch. Staff fields are normalised through
    /// [`StaffKind`] when either of them is present.
    #[instrument(skip(state, patch))]
    pub async fn update(
        state: &AppState,
        id: &str,
        mut patch: UserPatch,
    ) -> Result<User, ServiceError> {
        patch
            .validate()
            .map_err(|e| ServiceError::Validation(e.to_string()))?;

        if let Some(phone) = &patch.phone {
            if !is_valid_phone(phone) {
                return Err(ServiceError::InvalidPhone(phone.clone()));
            }
        }

        if patch.faculty.is_some() || patch.is_central_staff.is_some() {
            let (faculty, is_central_staff) =
                StaffKind::from_fields(patch.faculty.as_deref(), patch.is_central_staff)
                    .into_fields();
            patch.faculty = faculty;
            patch.is_central_staff = is_central_staff;
        }

        state
            .users
            .apply_patch(id, &patch)
            .await?
            .ok_or(ServiceError::UserNotFound)
    }

    #[instrument(skip(state))]
    pub async fn update_role(state: &AppState, id: &str, role: Role) -> Result<User, ServiceError> {
        let user = state
            .users
            .apply_patch(id, &UserPatch::role(role))
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        tracing::info!(user_id = %id, role = %role, "User role updated");
        Ok(user)
    }

    /// The URL a staff scanner posts to when checking this user in.
    #[instrument(skip(state))]
    pub async fn get_qr_url(state: &AppState, id: &str) -> Result<String, ServiceError> {
        let user = Self::get_by_id(state, id).await?;
        Ok(format!(
            "{}/api/users/qr/{}",
            state.event_config.public_base_url, user.id
        ))
    }

    #[instrument(skip(state))]
    pub async fn delete(state: &AppState, id: &str) -> Result<(), ServiceError> {
        if !state.users.delete(id).await? {
            return Err(ServiceError::UserNotFound);
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Records that `staff_id` scanned `student_id`'s QR code.
    #[instrument(skip(state))]
    pub async fn scan_qr(
        state: &AppState,
        student_id: &str,
        staff_id: &str,
    ) -> Result<User, ServiceError> {
        let student = Self::get_by_id(state, student_id).await?;
        let staff = Self::get_by_id(state, staff_id).await?;

        let kind = staff.staff_kind().ok_or_else(|| {
            ServiceError::Forbidden("Only staff can check users in".to_string())
        })?;

        let now = state.clock.now();
        match kind {
            StaffKind::Central => Self::enter_central(state, student, now).await,
            StaffKind::Faculty(faculty) => {
                Self::enter_faculty(state, student, faculty, now).await
            }
        }
    }

    async fn enter_central(
        state: &AppState,
        mut student: User,
        now: DateTime<Utc>,
    ) -> Result<User, ServiceError> {
        let offset = state.event_config.utc_offset;

        if let Some(prev) = student.last_entered {
            if same_local_day(prev, now, offset) {
                return Err(Self::already_entered(state, prev));
            }
        }

        let written = state
            .users
            .mark_entered(&student.id, now, local_day_start(now, offset))
            .await?;

        if !written {
            // Another scanner got there first.
            let winner = Self::get_by_id(state, &student.id).await?;
            let at = winner.last_entered.unwrap_or(now);
            return Err(Self::already_entered(state, at));
        }

        tracing::info!(user_id = %student.id, "Central check-in recorded");
        student.last_entered = Some(now);
        if !student.role.can_scan() {
            student.faculty = None;
        }
        Ok(student)
    }

    async fn enter_faculty(
        state: &AppState,
        student: User,
        faculty: String,
        now: DateTime<Utc>,
    ) -> Result<User, ServiceError> {
        let offset = state.event_config.utc_offset;

        let earlier = state
            .transactions
            .find_by_student_and_faculty(&student.id, &faculty)
            .await?;
        if let Some(tx) = earlier
            .iter()
            .find(|tx| same_local_day(tx.registered_at, now, offset))
        {
            return Err(Self::already_entered(state, tx.registered_at));
        }

        let transaction =
            StudentTransaction::new(student.id.clone(), faculty, now, local_day(now, offset));
        if !state.transactions.insert_for_day(&transaction).await? {
            let today = local_day(now, offset);
            let at = state
                .transactions
                .find_by_student_and_faculty(&student.id, &transaction.faculty)
                .await?
                .into_iter()
                .find(|tx| tx.attended_on == today)
                .map(|tx| tx.registered_at)
                .unwrap_or(now);
            return Err(Self::already_entered(state, at));
        }

        tracing::info!(
            user_id = %student.id,
            faculty = %transaction.faculty,
            "Faculty check-in recorded"
        );
        Ok(student)
    }

    /// Grants the staff role to the user registered with `phone`.
    #[instrument(skip(state))]
    pub async fn add_staff(state: &AppState, phone: &str) -> Result<User, ServiceError> {
        let user = state
            .users
            .find_by_phone(phone)
            .await?
            .ok_or(ServiceError::UserNotFound)?;

        if user.role == Role::Staff {
            return Err(ServiceError::AlreadyStaff);
        }

        Self::update_role(state, &user.id, Role::Staff).await
    }

    /// Returns a staff member to the member role. Other fields are kept.
    #[instrument(skip(state))]
    pub async fn remove_staff(state: &AppState, id: &str) -> Result<User, ServiceError> {
        Self::update_role(state, id, Role::Member).await
    }

    #[instrument(skip(state))]
    pub async fn get_transactions(
        state: &AppState,
        student_id: &str,
    ) -> Result<Vec<StudentTransaction>, ServiceError> {
        Self::get_by_id(state, student_id).await?;
        state.transactions.find_by_student(student_id).await
    }

    #[instrument(skip(state))]
    pub async fn get_all_transactions(
        state: &AppState,
    ) -> Result<Vec<StudentTransaction>, ServiceError> {
        state.transactions.find_all().await
    }

    #[instrument(skip(state))]
    pub async fn delete_transaction(state: &AppState, id: Uuid) -> Result<(), ServiceError> {
        if !state.transactions.delete(id).await? {
            return Err(ServiceError::TransactionNotFound);
        }
        Ok(())
    }

    async fn allocate_uid(state: &AppState) -> Result<String, ServiceError> {
        for _ in 0..MAX_UID_ATTEMPTS {
            let candidate = generate_uid();
            if !state.users.uid_exists(&candidate).await? {
                return Ok(candidate);
            }
        }
        Err(ServiceError::UidAllocationExhausted {
            attempts: MAX_UID_ATTEMPTS,
        })
    }

    fn token_for(state: &AppState, user_id: String) -> Result<TokenResponse, ServiceError> {
        let access_token = openhouse_auth::issue_token(&user_id, &state.jwt_config)?;
        Ok(TokenResponse {
            user_id,
            access_token,
        })
    }

    fn already_entered(state: &AppState, at: DateTime<Utc>) -> ServiceError {
        ServiceError::AlreadyEntered {
            at: at.with_timezone(&state.event_config.utc_offset),
        }
    }
}

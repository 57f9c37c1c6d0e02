//! In-memory repositories and fixtures for tests.
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests under `tests/`.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use openhouse_config::{CorsConfig, EventConfig, JwtConfig};
use openhouse_core::ServiceError;
use openhouse_models::dashboard::{
    AttendedCount, FacultyCount, FacultyInterest, SourceCount, StatusCount,
};
use openhouse_models::{
    CreateEvaluationDto, Role, StaffKind, StudentEvaluation, StudentTransaction,
    UpdateEvaluationDto, User, UserDraft, UserPatch,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::dashboard::repository::DashboardRepository;
use crate::modules::evaluations::repository::StudentEvaluationRepository;
use crate::modules::users::repository::UserRepository;
use crate::modules::users::transaction_repository::StudentTransactionRepository;
use crate::state::AppState;
use crate::utils::clock::{Clock, FixedClock};

pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const TEST_BASE_URL: &str = "https://openhouse.test";

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub async fn snapshot(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        users
    }
}

fn conflicting_field(existing: &User, candidate: &User) -> Option<&'static str> {
    if existing.id == candidate.id {
        Some("id")
    } else if existing.phone == candidate.phone {
        Some("phone")
    } else if existing.uid == candidate.uid {
        Some("uid")
    } else {
        None
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> Result<User, ServiceError> {
        let mut users = self.users.write().await;
        if let Some(field) = users.values().find_map(|u| conflicting_field(u, user)) {
            return Err(ServiceError::DuplicateUser(field.to_string()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.snapshot().await)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ServiceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<User>, ServiceError> {
        let needle = name.to_lowercase();
        Ok(self
            .snapshot()
            .await
            .into_iter()
            .filter(|u| u.name.to_lowercase().contains(&needle))
            .collect())
    }

    async fn uid_exists(&self, uid: &str) -> Result<bool, ServiceError> {
        Ok(self.users.read().await.values().any(|u| u.uid == uid))
    }

    async fn apply_patch(
        &self,
        id: &str,
        patch: &UserPatch,
    ) -> Result<Option<User>, ServiceError> {
        let mut users = self.users.write().await;
        if let Some(phone) = &patch.phone {
            if users.values().any(|u| u.id != id && &u.phone == phone) {
                return Err(ServiceError::DuplicateUser("phone".to_string()));
            }
        }

        Ok(users.get_mut(id).map(|user| {
            patch.apply_to(user);
            user.clone()
        }))
    }

    async fn mark_entered(
        &self,
        id: &str,
        now: DateTime<Utc>,
        day_start: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let mut users = self.users.write().await;
        let Some(user) = users.get_mut(id) else {
            return Ok(false);
        };
        if user.last_entered.is_some_and(|at| at >= day_start) {
            return Ok(false);
        }
        user.last_entered = Some(now);
        if !user.role.can_scan() {
            user.faculty = None;
        }
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        Ok(self.users.write().await.remove(id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryTransactionRepository {
    rows: RwLock<Vec<StudentTransaction>>,
}

#[async_trait]
impl StudentTransactionRepository for InMemoryTransactionRepository {
    async fn insert_for_day(
        &self,
        transaction: &StudentTransaction,
    ) -> Result<bool, ServiceError> {
        let mut rows = self.rows.write().await;
        let taken = rows.iter().any(|t| {
            t.student_registration_id == transaction.student_registration_id
                && t.faculty == transaction.faculty
                && t.attended_on == transaction.attended_on
        });
        if taken {
            return Ok(false);
        }
        rows.push(transaction.clone());
        Ok(true)
    }

    async fn find_by_student_and_faculty(
        &self,
        student_id: &str,
        faculty: &str,
    ) -> Result<Vec<StudentTransaction>, ServiceError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|t| t.student_registration_id == student_id && t.faculty == faculty)
            .cloned()
            .collect())
    }

    async fn find_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentTransaction>, ServiceError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|t| t.student_registration_id == student_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<StudentTransaction>, ServiceError> {
        Ok(self.rows.read().await.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|t| t.id != id);
        Ok(rows.len() != before)
    }
}

#[derive(Default)]
pub struct InMemoryEvaluationRepository {
    rows: RwLock<Vec<StudentEvaluation>>,
    next_id: AtomicI64,
}

#[async_trait]
impl StudentEvaluationRepository for InMemoryEvaluationRepository {
    async fn create(
        &self,
        student_id: &str,
        dto: &CreateEvaluationDto,
    ) -> Result<StudentEvaluation, ServiceError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|e| e.student_id == student_id) {
            return Err(ServiceError::EvaluationAlreadyExists);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let evaluation = dto.clone().into_evaluation(id, student_id.to_string());
        rows.push(evaluation.clone());
        Ok(evaluation)
    }

    async fn find_by_student(
        &self,
        student_id: &str,
    ) -> Result<Option<StudentEvaluation>, ServiceError> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .find(|e| e.student_id == student_id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<StudentEvaluation>, ServiceError> {
        Ok(self.rows.read().await.clone())
    }

    async fn count(&self) -> Result<i64, ServiceError> {
        Ok(self.rows.read().await.len() as i64)
    }

    async fn update(
        &self,
        student_id: &str,
        dto: &UpdateEvaluationDto,
    ) -> Result<Option<StudentEvaluation>, ServiceError> {
        let mut rows = self.rows.write().await;
        Ok(rows
            .iter_mut()
            .find(|e| e.student_id == student_id)
            .map(|evaluation| {
                dto.apply_to(evaluation);
                evaluation.clone()
            }))
    }

    async fn delete(&self, student_id: &str) -> Result<bool, ServiceError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|e| e.student_id != student_id);
        Ok(rows.len() != before)
    }
}

/// Computes the dashboard aggregates from the other in-memory stores.
pub struct InMemoryDashboardRepository {
    users: Arc<InMemoryUserRepository>,
    transactions: Arc<InMemoryTransactionRepository>,
}

fn sorted_counts(counts: HashMap<String, i64>) -> Vec<(String, i64)> {
    let mut counts: Vec<(String, i64)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[async_trait]
impl DashboardRepository for InMemoryDashboardRepository {
    async fn faculty_interests(&self) -> Result<Vec<FacultyInterest>, ServiceError> {
        let mut by_faculty: HashMap<String, FacultyInterest> = HashMap::new();
        for user in self.users.snapshot().await {
            let picks = [
                (user.first_interest, 0),
                (user.second_interest, 1),
                (user.third_interest, 2),
            ];
            for (faculty, rank) in picks {
                let Some(faculty) = faculty else { continue };
                let entry = by_faculty
                    .entry(faculty.clone())
                    .or_insert_with(|| FacultyInterest {
                        faculty,
                        first_interest: 0,
                        second_interest: 0,
                        third_interest: 0,
                    });
                match rank {
                    0 => entry.first_interest += 1,
                    1 => entry.second_interest += 1,
                    _ => entry.third_interest += 1,
                }
            }
        }

        let mut rows: Vec<FacultyInterest> = by_faculty.into_values().collect();
        rows.sort_by(|a, b| {
            b.total()
                .cmp(&a.total())
                .then_with(|| a.faculty.cmp(&b.faculty))
        });
        Ok(rows)
    }

    async fn source_counts(&self) -> Result<Vec<SourceCount>, ServiceError> {
        let mut counts = HashMap::new();
        for user in self.users.snapshot().await {
            for source in user.selected_sources {
                *counts.entry(source).or_insert(0) += 1;
            }
        }
        Ok(sorted_counts(counts)
            .into_iter()
            .map(|(source, count)| SourceCount { source, count })
            .collect())
    }

    async fn status_counts(&self) -> Result<Vec<StatusCount>, ServiceError> {
        let mut counts = HashMap::new();
        for user in self.users.snapshot().await {
            if user.role != Role::Student {
                continue;
            }
            if let Some(status) = user.status {
                *counts.entry(status).or_insert(0) += 1;
            }
        }
        Ok(sorted_counts(counts)
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn faculty_counts_on(&self, day: NaiveDate) -> Result<Vec<FacultyCount>, ServiceError> {
        let mut counts = HashMap::new();
        for transaction in self.transactions.find_all().await? {
            if transaction.attended_on == day {
                *counts.entry(transaction.faculty).or_insert(0) += 1;
            }
        }
        Ok(sorted_counts(counts)
            .into_iter()
            .map(|(faculty, count)| FacultyCount { faculty, count })
            .collect())
    }

    async fn attended_count(&self) -> Result<AttendedCount, ServiceError> {
        let students: Vec<User> = self
            .users
            .snapshot()
            .await
            .into_iter()
            .filter(|u| u.role == Role::Student)
            .collect();
        Ok(AttendedCount {
            attended: students.iter().filter(|u| u.last_entered.is_some()).count() as i64,
            registered: students.len() as i64,
        })
    }
}

/// Application state wired to in-memory stores and a pinned clock.
pub struct TestContext {
    pub state: AppState,
    pub clock: Arc<FixedClock>,
    pub users: Arc<InMemoryUserRepository>,
    pub transactions: Arc<InMemoryTransactionRepository>,
    pub evaluations: Arc<InMemoryEvaluationRepository>,
}

/// 2025-01-11 09:00 in Bangkok.
pub fn event_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 11, 2, 0, 0).unwrap()
}

pub fn bangkok() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap()
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_event_config(EventConfig {
            public_base_url: TEST_BASE_URL.to_string(),
            admin_phones: vec!["0949823195".to_string()],
            utc_offset: bangkok(),
        })
    }

    pub fn with_event_config(event_config: EventConfig) -> Self {
        let clock = Arc::new(FixedClock::new(event_morning()));
        let users = Arc::new(InMemoryUserRepository::default());
        let transactions = Arc::new(InMemoryTransactionRepository::default());
        let evaluations = Arc::new(InMemoryEvaluationRepository::default());
        let dashboard = Arc::new(InMemoryDashboardRepository {
            users: users.clone(),
            transactions: transactions.clone(),
        });

        let state = AppState {
            users: users.clone(),
            transactions: transactions.clone(),
            evaluations: evaluations.clone(),
            dashboard,
            jwt_config: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                access_token_expiry: None,
            },
            event_config,
            cors_config: CorsConfig {
                allowed_origins: vec!["http://localhost:5173".to_string()],
            },
            clock: clock.clone(),
        };

        Self {
            state,
            clock,
            users,
            transactions,
            evaluations,
        }
    }

    /// Inserts a user directly, bypassing registration.
    pub async fn seed_user(
        &self,
        id: &str,
        phone: &str,
        role: Role,
        kind: Option<StaffKind>,
    ) -> User {
        let draft = UserDraft {
            id: id.to_string(),
            name: format!("User {}", id),
            email: format!("{}@example.com", id.to_lowercase()),
            phone: phone.to_string(),
            ..UserDraft::default()
        };
        let uid = format!("TS{:0>8}", &phone[phone.len().saturating_sub(8)..]);
        let mut user = draft.into_user(role, uid, self.clock.now());
        if let Some(kind) = kind {
            let (faculty, is_central_staff) = kind.into_fields();
            user.faculty = faculty;
            user.is_central_staff = is_central_staff;
        }
        self.users.create(&user).await.unwrap()
    }

    pub fn token_for(&self, user_id: &str) -> String {
        openhouse_auth::issue_token(user_id, &self.state.jwt_config).unwrap()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

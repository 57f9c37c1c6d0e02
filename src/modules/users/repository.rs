//! User persistence.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use openhouse_core::ServiceError;
use openhouse_models::{Role, User, UserPatch};
use sqlx::{FromRow, PgPool};

use crate::utils::db::{internal, user_write_error};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Unique violations surface as `DuplicateUser`.
    async fn create(&self, user: &User) -> Result<User, ServiceError>;
    async fn find_all(&self) -> Result<Vec<User>, ServiceError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ServiceError>;
    /// Case-insensitive substring match on the name.
    async fn find_by_name(&self, name: &str) -> Result<Vec<User>, ServiceError>;
    async fn uid_exists(&self, uid: &str) -> Result<bool, ServiceError>;
    /// Writes the provided fields only. Returns `None` if the user is absent.
    async fn apply_patch(&self, id: &str, patch: &UserPatch)
    -> Result<Option<User>, ServiceError>;
    /// Sets `last_entered = now` unless the user already entered on or after
    /// `day_start`. Returns whether the write happened.
    async fn mark_entered(
        &self,
        id: &str,
        now: DateTime<Utc>,
        day_start: DateTime<Utc>,
    ) -> Result<bool, ServiceError>;
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;
}

const USER_COLUMNS: &str = "id, uid, name, email, phone, birth_date, role, status, other_status, \
    province, school, selected_sources, other_source, first_interest, second_interest, \
    third_interest, objective, nickname, student_id, year, faculty, is_central_staff, \
    registered_at, last_entered";

#[derive(FromRow)]
struct UserRow {
    id: String,
    uid: String,
    name: String,
    email: Option<String>,
    phone: String,
    birth_date: Option<NaiveDate>,
    role: String,
    status: Option<String>,
    other_status: Option<String>,
    province: Option<String>,
    school: Option<String>,
    selected_sources: Vec<String>,
    other_source: Option<String>,
    first_interest: Option<String>,
    second_interest: Option<String>,
    third_interest: Option<String>,
    objective: Option<String>,
    nickname: Option<String>,
    student_id: Option<String>,
    year: Option<i32>,
    faculty: Option<String>,
    is_central_staff: Option<bool>,
    registered_at: Option<DateTime<Utc>>,
    last_entered: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for User {
    type Error = ServiceError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|e: String| ServiceError::internal(anyhow::anyhow!(e)))?;

        Ok(User {
            id: row.id,
            uid: row.uid,
            name: row.name,
            email: row.email,
            phone: row.phone,
            birth_date: row.birth_date,
            role,
            status: row.status,
            other_status: row.other_status,
            province: row.province,
            school: row.school,
            selected_sources: row.selected_sources,
            other_source: row.other_source,
            first_interest: row.first_interest,
            second_interest: row.second_interest,
            third_interest: row.third_interest,
            objective: row.objective,
            nickname: row.nickname,
            student_id: row.student_id,
            year: row.year,
            faculty: row.faculty,
            is_central_staff: row.is_central_staff,
            registered_at: row.registered_at,
            last_entered: row.last_entered,
        })
    }
}

fn into_users(rows: Vec<UserRow>) -> Result<Vec<User>, ServiceError> {
    rows.into_iter().map(User::try_from).collect()
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<User, ServiceError> {
        let sql = format!(
            "INSERT INTO users ({USER_COLUMNS}) VALUES \
             ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19, $20, $21, $22, $23, $24) RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.id)
            .bind(&user.uid)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(user.birth_date)
            .bind(user.role.as_str())
            .bind(&user.status)
            .bind(&user.other_status)
            .bind(&user.province)
            .bind(&user.school)
            .bind(&user.selected_sources)
            .bind(&user.other_source)
            .bind(&user.first_interest)
            .bind(&user.second_interest)
            .bind(&user.third_interest)
            .bind(&user.objective)
            .bind(&user.nickname)
            .bind(&user.student_id)
            .bind(user.year)
            .bind(&user.faculty)
            .bind(user.is_central_staff)
            .bind(user.registered_at)
            .bind(user.last_entered)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| user_write_error(e, "Failed to insert user"))?;

        row.try_into()
    }

    async fn find_all(&self) -> Result<Vec<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY registered_at, id");
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch users"))?;

        into_users(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch user by id"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, ServiceError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE phone = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch user by phone"))?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<User>, ServiceError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE name ILIKE '%' || $1 || '%' ORDER BY registered_at, id"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to search users by name"))?;

        into_users(rows)
    }

    async fn uid_exists(&self, uid: &str) -> Result<bool, ServiceError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE uid = $1)")
            .bind(uid)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to check uid"))
    }

    async fn apply_patch(
        &self,
        id: &str,
        patch: &UserPatch,
    ) -> Result<Option<User>, ServiceError> {
        let sql = format!(
            "UPDATE users SET \
                name = COALESCE($2, name), \
                email = COALESCE($3, email), \
                phone = COALESCE($4, phone), \
                birth_date = COALESCE($5, birth_date), \
                status = COALESCE($6, status), \
                other_status = COALESCE($7, other_status), \
                province = COALESCE($8, province), \
                school = COALESCE($9, school), \
                selected_sources = COALESCE($10, selected_sources), \
                other_source = COALESCE($11, other_source), \
                first_interest = COALESCE($12, first_interest), \
                second_interest = COALESCE($13, second_interest), \
                third_interest = COALESCE($14, third_interest), \
                objective = COALESCE($15, objective), \
                nickname = COALESCE($16, nickname), \
                student_id = COALESCE($17, student_id), \
                year = COALESCE($18, year), \
                faculty = COALESCE($19, faculty), \
                is_central_staff = COALESCE($20, is_central_staff), \
                role = COALESCE($21, role) \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(&patch.name)
            .bind(&patch.email)
            .bind(&patch.phone)
            .bind(patch.birth_date)
            .bind(&patch.status)
            .bind(&patch.other_status)
            .bind(&patch.province)
            .bind(&patch.school)
            .bind(&patch.selected_sources)
            .bind(&patch.other_source)
            .bind(&patch.first_interest)
            .bind(&patch.second_interest)
            .bind(&patch.third_interest)
            .bind(&patch.objective)
            .bind(&patch.nickname)
            .bind(&patch.student_id)
            .bind(patch.year)
            .bind(&patch.faculty)
            .bind(patch.is_central_staff)
            .bind(patch.role.map(|r| r.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| user_write_error(e, "Failed to update user"))?
            .map(User::try_from)
            .transpose()
    }

    async fn mark_entered(
        &self,
        id: &str,
        now: DateTime<Utc>,
        day_start: DateTime<Utc>,
    ) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            "UPDATE users SET last_entered = $2, \
                faculty = CASE WHEN role IN ('staff', 'admin') THEN faculty ELSE NULL END \
             WHERE id = $1 AND (last_entered IS NULL OR last_entered < $3)",
        )
        .bind(id)
        .bind(now)
        .bind(day_start)
        .execute(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to record entry"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to delete user"))?;

        Ok(result.rows_affected() > 0)
    }
}

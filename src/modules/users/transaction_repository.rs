//! Faculty attendance ledger persistence.

use async_trait::async_trait;
use openhouse_core::ServiceError;
use openhouse_models::StudentTransaction;
use sqlx::PgPool;
use uuid::Uuid;

use crate::utils::db::internal;

#[async_trait]
pub trait StudentTransactionRepository: Send + Sync {
    /// Inserts `transaction` unless the student already has one for the same
    /// faculty on `attended_on`. Returns whether a row was written.
    async fn insert_for_day(&self, transaction: &StudentTransaction)
    -> Result<bool, ServiceError>;
    async fn find_by_student_and_faculty(
        &self,
        student_id: &str,
        faculty: &str,
    ) -> Result<Vec<StudentTransaction>, ServiceError>;
    async fn find_by_student(&self, student_id: &str)
    -> Result<Vec<StudentTransaction>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<StudentTransaction>, ServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

const TRANSACTION_COLUMNS: &str =
    "id, student_registration_id, faculty, registered_at, attended_on";

pub struct PgStudentTransactionRepository {
    pool: PgPool,
}

impl PgStudentTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentTransactionRepository for PgStudentTransactionRepository {
    async fn insert_for_day(
        &self,
        transaction: &StudentTransaction,
    ) -> Result<bool, ServiceError> {
        let result = sqlx::query(
            "INSERT INTO student_transactions \
                (id, student_registration_id, faculty, registered_at, attended_on) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (student_registration_id, faculty, attended_on) DO NOTHING",
        )
        .bind(transaction.id)
        .bind(&transaction.student_registration_id)
        .bind(&transaction.faculty)
        .bind(transaction.registered_at)
        .bind(transaction.attended_on)
        .execute(&self.pool)
        .await
        .map_err(|e| internal(e, "Failed to insert student transaction"))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_by_student_and_faculty(
        &self,
        student_id: &str,
        faculty: &str,
    ) -> Result<Vec<StudentTransaction>, ServiceError> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM student_transactions \
             WHERE student_registration_id = $1 AND faculty = $2 ORDER BY registered_at"
        );
        sqlx::query_as::<_, StudentTransaction>(&sql)
            .bind(student_id)
            .bind(faculty)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch student transactions"))
    }

    async fn find_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentTransaction>, ServiceError> {
        let sql = format!(
            "SELECT {TRANSACTION_COLUMNS} FROM student_transactions \
             WHERE student_registration_id = $1 ORDER BY registered_at"
        );
        sqlx::query_as::<_, StudentTransaction>(&sql)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch student transactions"))
    }

    async fn find_all(&self) -> Result<Vec<StudentTransaction>, ServiceError> {
        let sql =
            format!("SELECT {TRANSACTION_COLUMNS} FROM student_transactions ORDER BY registered_at");
        sqlx::query_as::<_, StudentTransaction>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to fetch student transactions"))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let result = sqlx::query("DELETE FROM student_transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| internal(e, "Failed to delete student transaction"))?;

        Ok(result.rows_affected() > 0)
    }
}

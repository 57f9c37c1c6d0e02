//! Faculty attendance ledger.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// One attendance event of a student at one faculty.
///
/// `attended_on` is the event-local calendar day of `registered_at`. At most
/// one row exists per `(student_registration_id, faculty, attended_on)`.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentTransaction {
    pub id: Uuid,
    pub student_registration_id: String,
    pub faculty: String,
    pub registered_at: DateTime<Utc>,
    pub attended_on: NaiveDate,
}

impl StudentTransaction {
    pub fn new(
        student_registration_id: impl Into<String>,
        faculty: impl Into<String>,
        registered_at: DateTime<Utc>,
        attended_on: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_registration_id: student_registration_id.into(),
            faculty: faculty.into(),
            registered_at,
            attended_on,
        }
    }
}

//! Read-only aggregate rows served by the dashboard.

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// How often a faculty was picked as first, second or third interest.
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacultyInterest {
    pub faculty: String,
    pub first_interest: i64,
    pub second_interest: i64,
    pub third_interest: i64,
}

impl FacultyInterest {
    pub fn total(&self) -> i64 {
        self.first_interest + self.second_interest + self.third_interest
    }
}

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct SourceCount {
    pub source: String,
    pub count: i64,
}

#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Faculty check-ins recorded on one calendar day.
#[derive(Serialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct FacultyCount {
    pub faculty: String,
    pub count: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct AttendedCount {
    /// Users that passed the central check-in at least once
    pub attended: i64,
    pub registered: i64,
}

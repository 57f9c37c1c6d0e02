//! Read-only aggregates for the organiser dashboard.

use openhouse_core::ServiceError;
use openhouse_models::dashboard::{
    AttendedCount, FacultyCount, FacultyInterest, SourceCount, StatusCount,
};
use tracing::instrument;

use crate::state::AppState;
use crate::utils::clock::{Clock, local_day};

pub struct DashboardService;

impl DashboardService {
    #[instrument(skip(state))]
    pub async fn faculty_interests(state: &AppState) -> Result<Vec<FacultyInterest>, ServiceError> {
        state.dashboard.faculty_interests().await
    }

    #[instrument(skip(state))]
    pub async fn source_counts(state: &AppState) -> Result<Vec<SourceCount>, ServiceError> {
        state.dashboard.source_counts().await
    }

    #[instrument(skip(state))]
    pub async fn status_counts(state: &AppState) -> Result<Vec<StatusCount>, ServiceError> {
        state.dashboard.status_counts().await
    }

    /// Faculty check-ins on the current event-local day.
    #[instrument(skip(state))]
    pub async fn faculty_counts_today(state: &AppState) -> Result<Vec<FacultyCount>, ServiceError> {
        let today = local_day(state.clock.now(), state.event_config.utc_offset);
        state.dashboard.faculty_counts_on(today).await
    }

    #[instrument(skip(state))]
    pub async fn attended_count(state: &AppState) -> Result<AttendedCount, ServiceError> {
        state.dashboard.attended_count().await
    }
}

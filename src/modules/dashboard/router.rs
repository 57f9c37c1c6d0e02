use crate::modules::dashboard::controller::{
    get_attended_count, get_faculty_counts_today, get_faculty_interests, get_source_counts,
    get_status_counts,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Read-only routes. The caller guards them with a staff layer.
pub fn init_dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/faculties", get(get_faculty_interests))
        .route("/sources", get(get_source_counts))
        .route("/status", get(get_status_counts))
        .route("/faculty-today", get(get_faculty_counts_today))
        .route("/attended", get(get_attended_count))
}

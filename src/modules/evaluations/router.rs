use crate::modules::evaluations::controller::{
    count_evaluations, create_evaluation, delete_evaluation, get_evaluation, get_evaluations,
    update_evaluation,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn init_evaluations_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_evaluation).get(get_evaluations))
        .route("/count", get(count_evaluations))
        .route(
            "/{student_id}",
            get(get_evaluation)
                .patch(update_evaluation)
                .delete(delete_evaluation),
        )
}

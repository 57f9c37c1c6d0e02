use crate::modules::users::controller::{
    add_staff, delete_transaction, delete_user, get_qr, get_transactions, get_user,
    get_user_transactions, get_users, register_staff, register_student, remove_staff, scan_qr,
    sign_in, update_me, update_role, update_user,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

/// User, registration, staff and check-in routes, mounted under `/api`.
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).patch(update_me))
        .route("/users/signin", post(sign_in))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/{id}/transactions", get(get_user_transactions))
        .route("/users/qr/{id}", get(get_qr).post(scan_qr))
        .route("/users/role/{id}", patch(update_role))
        .route("/student/register", post(register_student))
        .route("/staff/register", post(register_staff))
        .route("/addstaff/{phone}", patch(add_staff))
        .route("/removestaff/{id}", patch(remove_staff))
        .route("/transactions", get(get_transactions))
        .route("/transactions/{id}", delete(delete_transaction))
}

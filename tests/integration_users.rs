mod common;

use axum::http::StatusCode;
use common::{TestApp, student_form};
use openhouse::modules::users::repository::UserRepository;
use openhouse::openhouse_models::{Role, StaffKind};
use serde_json::json;

#[tokio::test]
async fn test_staff_registration_with_faculty() {
    let app = TestApp::new();

    let (status, body) = app
        .multipart(
            "/api/staff/register",
            &[
                ("id", "ST01"),
                ("name", "Nok Staff"),
                ("email", "nok@example.com"),
                ("phone", "0891112222"),
                ("faculty", "Engineering"),
                ("isCentralStaff", "false"),
            ],
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], "ST01");

    let user = app.ctx.users.find_by_id("ST01").await.unwrap().unwrap();
    assert_eq!(user.role, Role::Staff);
    assert_eq!(
        user.staff_kind(),
        Some(StaffKind::Faculty("Engineering".to_string()))
    );
}

#[tokio::test]
async fn test_registration_rejects_bad_input() {
    let app = TestApp::new();

    let (status, _) = app
        .multipart("/api/student/register", &student_form("S1", "12345"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .multipart(
            "/api/student/register",
            &[("id", "S2"), ("phone", "0812345678"), ("birthDate", "11/01/2008")],
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_phone_conflicts() {
    let app = TestApp::new();
    let (status, _) = app
        .multipart("/api/student/register", &student_form("S1", "0812345678"))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .multipart("/api/student/register", &student_form("S2", "0812345678"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_sign_in() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;

    let (status, body) = app
        .json("POST", "/api/users/signin", None, &json!({ "id": "S1" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["accessToken"].as_str().unwrap().to_string();

    let (status, body) = app.get("/api/users/S1", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "S1");

    let (status, _) = app
        .json("POST", "/api/users/signin", None, &json!({ "id": "missing" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/users", Some("not-a-jwt")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_of_deleted_user_is_rejected() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    let token = app.ctx.token_for("S1");
    app.ctx.users.delete("S1").await.unwrap();

    let (status, _) = app.get("/api/users/S1", Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_listing_users_requires_staff() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    app.ctx
        .seed_user("C1", "0820000001", Role::Staff, Some(StaffKind::Central))
        .await;

    let (status, _) = app.get("/api/users", Some(&app.ctx.token_for("S1"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let staff = app.ctx.token_for("C1");
    let (status, body) = app.get("/api/users?role=student", Some(&staff)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app.get("/api/users?role=janitor", Some(&staff)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_student_cannot_read_other_profile() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    app.ctx
        .seed_user("S2", "0810000002", Role::Student, None)
        .await;

    let (status, _) = app.get("/api/users/S2", Some(&app.ctx.token_for("S1"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_me_patches_only_given_fields() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    let token = app.ctx.token_for("S1");

    let (status, _) = app
        .json(
            "PATCH",
            "/api/users",
            Some(&token),
            &json!({ "nickname": "Chai", "school": "" }),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let user = app.ctx.users.find_by_id("S1").await.unwrap().unwrap();
    assert_eq!(user.nickname.as_deref(), Some("Chai"));
    assert_eq!(user.name, "User S1");
    assert_eq!(user.role, Role::Student);
}

#[tokio::test]
async fn test_admin_manages_staff() {
    let app = TestApp::new();
    app.ctx
        .seed_user("A1", "0949823195", Role::Admin, None)
        .await;
    app.ctx
        .seed_user("U1", "0810000001", Role::Member, None)
        .await;
    let admin = app.ctx.token_for("A1");

    let (status, _) = app
        .json("PATCH", "/api/addstaff/0810000001", Some(&admin), &json!({}))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let user = app.ctx.users.find_by_id("U1").await.unwrap().unwrap();
    assert_eq!(user.role, Role::Staff);

    let (status, body) = app
        .json("PATCH", "/api/addstaff/0810000001", Some(&admin), &json!({}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User is already a staff");

    let (status, _) = app
        .json("PATCH", "/api/removestaff/U1", Some(&admin), &json!({}))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let user = app.ctx.users.find_by_id("U1").await.unwrap().unwrap();
    assert_eq!(user.role, Role::Member);

    let (status, _) = app
        .json(
            "PATCH",
            "/api/users/role/U1",
            Some(&admin),
            &json!({ "role": "admin" }),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_staff_cannot_manage_roles() {
    let app = TestApp::new();
    app.ctx
        .seed_user("C1", "0820000001", Role::Staff, Some(StaffKind::Central))
        .await;
    app.ctx
        .seed_user("U1", "0810000001", Role::Member, None)
        .await;
    let staff = app.ctx.token_for("C1");

    let (status, _) = app
        .json("PATCH", "/api/addstaff/0810000001", Some(&staff), &json!({}))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.delete("/api/users/U1", Some(&staff)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

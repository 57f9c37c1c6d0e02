mod common;

use axum::http::StatusCode;
use chrono::TimeDelta;
use common::{TestApp, student_form};
use openhouse::modules::users::repository::UserRepository;
use openhouse::openhouse_models::{Role, StaffKind};

#[tokio::test]
async fn test_register_then_central_check_in_once_per_day() {
    let app = TestApp::new();
    let central = app
        .ctx
        .seed_user("C1", "0820000001", Role::Staff, Some(StaffKind::Central))
        .await;
    let staff_token = app.ctx.token_for(&central.id);

    let (status, body) = app
        .multipart("/api/student/register", &student_form("6530000021", "0812345678"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["userId"], "6530000021");
    let student_token = body["accessToken"].as_str().unwrap().to_string();

    let (status, body) = app
        .get("/api/users/qr/6530000021", Some(&student_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["qrUrl"],
        "https://openhouse.test/api/users/qr/6530000021"
    );

    let (status, body) = app
        .post_empty("/api/users/qr/6530000021", Some(&staff_token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["lastEntered"].is_string());

    app.ctx.clock.advance(TimeDelta::hours(3));
    let (status, body) = app
        .post_empty("/api/users/qr/6530000021", Some(&staff_token))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User has already entered");
    // First check-in at 09:00 event time
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("2025-01-11T09:00:00+07:00")
    );

    app.ctx.clock.advance(TimeDelta::days(1));
    let (status, _) = app
        .post_empty("/api/users/qr/6530000021", Some(&staff_token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_faculty_scan_records_transaction() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    let scanner = app
        .ctx
        .seed_user(
            "F1",
            "0820000002",
            Role::Staff,
            Some(StaffKind::Faculty("Engineering".to_string())),
        )
        .await;
    let token = app.ctx.token_for(&scanner.id);

    let (status, _) = app.post_empty("/api/users/qr/S1", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.post_empty("/api/users/qr/S1", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.get("/api/users/S1/transactions", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["faculty"], "Engineering");

    // Faculty visits never touch the central entry stamp
    let student = app.ctx.users.find_by_id("S1").await.unwrap().unwrap();
    assert!(student.last_entered.is_none());
}

#[tokio::test]
async fn test_student_cannot_scan() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    app.ctx
        .seed_user("S2", "0810000002", Role::Student, None)
        .await;
    let token = app.ctx.token_for("S2");

    let (status, _) = app.post_empty("/api/users/qr/S1", Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_scan_unknown_student() {
    let app = TestApp::new();
    app.ctx
        .seed_user("C1", "0820000001", Role::Staff, Some(StaffKind::Central))
        .await;
    let token = app.ctx.token_for("C1");

    let (status, body) = app.post_empty("/api/users/qr/NOPE", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn test_admin_deletes_transaction() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;
    app.ctx
        .seed_user(
            "F1",
            "0820000002",
            Role::Staff,
            Some(StaffKind::Faculty("Science".to_string())),
        )
        .await;
    app.ctx
        .seed_user("A1", "0949823195", Role::Admin, None)
        .await;
    let admin = app.ctx.token_for("A1");

    app.post_empty("/api/users/qr/S1", Some(&app.ctx.token_for("F1")))
        .await;
    let (status, body) = app.get("/api/transactions", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let id = body[0]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .delete(&format!("/api/transactions/{}", id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .delete(&format!("/api/transactions/{}", id), Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

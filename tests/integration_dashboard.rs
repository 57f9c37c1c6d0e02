mod common;

use axum::http::StatusCode;
use common::{TestApp, student_form};
use openhouse::openhouse_models::{Role, StaffKind};

#[tokio::test]
async fn test_dashboard_is_staff_only() {
    let app = TestApp::new();
    app.ctx
        .seed_user("S1", "0810000001", Role::Student, None)
        .await;

    let (status, _) = app.get("/api/dashboard/attended", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .get("/api/dashboard/attended", Some(&app.ctx.token_for("S1")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_dashboard_reflects_registrations_and_scans() {
    let app = TestApp::new();
    app.ctx
        .seed_user("C1", "0820000001", Role::Staff, Some(StaffKind::Central))
        .await;
    let staff = app.ctx.token_for("C1");

    for (id, phone) in [("S1", "0810000001"), ("S2", "0810000002")] {
        let (status, _) = app
            .multipart("/api/student/register", &student_form(id, phone))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app.post_empty("/api/users/qr/S1", Some(&staff)).await;

    let (status, body) = app.get("/api/dashboard/attended", Some(&staff)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["attended"], 1);
    assert_eq!(body["registered"], 2);

    let (_, body) = app.get("/api/dashboard/sources", Some(&staff)).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["count"], 2);

    let (_, body) = app.get("/api/dashboard/faculties", Some(&staff)).await;
    assert_eq!(body[0]["faculty"], "Engineering");
    assert_eq!(body[0]["firstInterest"], 2);

    let (_, body) = app.get("/api/dashboard/status", Some(&staff)).await;
    assert_eq!(body[0]["status"], "M6");

    let (status, body) = app.get("/api/dashboard/faculty-today", Some(&staff)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::new();

    let (status, body) = app.get("/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Open House API");
}

async fn preflight_origin(state: openhouse::state::AppState, origin: &str) -> Option<String> {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/dashboard/attended")
        .header("origin", origin)
        .header("access-control-request-method", "GET")
        .body(Body::empty())
        .unwrap();
    let response = openhouse::router::init_router(state)
        .oneshot(request)
        .await
        .unwrap();
    response
        .headers()
        .get("access-control-allow-origin")
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_cors_allows_configured_frontend_only() {
    let app = TestApp::new();

    let allowed = preflight_origin(app.ctx.state.clone(), "http://localhost:5173").await;
    assert_eq!(allowed.as_deref(), Some("http://localhost:5173"));

    let other = preflight_origin(app.ctx.state.clone(), "https://evil.example.com").await;
    assert!(other.is_none());
}

#[tokio::test]
async fn test_cors_wildcard_accepts_any_origin() {
    let app = TestApp::new();
    let mut state = app.ctx.state.clone();
    state.cors_config = openhouse::openhouse_config::CorsConfig::parse("*");

    let allowed = preflight_origin(state, "https://evil.example.com").await;
    assert_eq!(allowed.as_deref(), Some("*"));
}

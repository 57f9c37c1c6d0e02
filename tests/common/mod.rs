use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use openhouse::router::init_router;
use openhouse::test_support::TestContext;
use serde_json::Value;
use tower::ServiceExt;

pub const BOUNDARY: &str = "openhouse-test-boundary";

#[allow(dead_code)]
pub struct TestApp {
    pub ctx: TestContext,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        Self {
            ctx: TestContext::new(),
        }
    }

    /// A fresh router over the shared in-memory state.
    pub fn router(&self) -> Router {
        init_router(self.ctx.state.clone())
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router().oneshot(request).await.unwrap();
        read_json(response).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(with_auth(Request::builder().method("GET").uri(uri), token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(with_auth(Request::builder().method("DELETE").uri(uri), token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_empty(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(with_auth(Request::builder().method("POST").uri(uri), token).body(Body::empty()).unwrap())
            .await
    }

    pub async fn json(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &Value,
    ) -> (StatusCode, Value) {
        let request = with_auth(Request::builder().method(method).uri(uri), token)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    pub async fn multipart(&self, uri: &str, fields: &[(&str, &str)]) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(fields)))
            .unwrap();
        self.send(request).await
    }
}

fn with_auth(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {}", token)),
        None => builder,
    }
}

pub fn multipart_body(fields: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value
        ));
    }
    body.push_str(&format!("--{}--\r\n", BOUNDARY));
    body
}

async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[allow(dead_code)]
pub fn student_form<'a>(id: &'a str, phone: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("id", id),
        ("name", "Somchai Jaidee"),
        ("email", "somchai@example.com"),
        ("phone", phone),
        ("status", "M6"),
        ("selectedSources", "Facebook,Instagram"),
        ("firstInterest", "Engineering"),
    ]
}

#[allow(dead_code)]
pub fn evaluation_body(overall: i32) -> Value {
    serde_json::json!({
        "newSources": ["Friends"],
        "overallActivity": overall,
        "interestActivity": 8,
        "receivedFacultyInfoClearly": 7,
        "wouldRecommendCUOpenHouseNextTime": 9,
        "favoriteBooth": "Robotics",
        "activityDiversity": 8,
        "perceivedCrowdDensity": 6,
        "hasFullBoothAccess": 7,
        "facilityConvenienceRating": 8,
        "campusNavigationRating": 5,
        "hesitationLevelAfterDisaster": 2,
        "lineOASignupRating": 9,
        "designBeautyRating": 10,
        "websiteImprovementSuggestions": null
    })
}

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::middleware::role::require_staff;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::evaluations::router::init_evaluations_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .merge(init_users_router())
                .nest("/student-evaluation", init_evaluations_router())
                .nest(
                    "/dashboard",
                    init_dashboard_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_staff)),
                ),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(state: &AppState) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ]);

    // tower-http rejects credentials combined with a wildcard origin
    if state.cors_config.allows_any_origin() {
        return layer.allow_origin(AllowOrigin::any());
    }

    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(allowed_origins)
        .allow_credentials(true)
}

use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::ServerConfig, docs::ApiDoc, handlers, middleware, state::AppState};

pub fn build_router(state: AppState) -> Router {
    let live_routes = Router::new()
        .route(
            "/api/live/sessions",
            post(handlers::live_sessions::create_live_session),
        )
        .route(
            "/api/live/sessions/{id}",
            get(handlers::live_sessions::get_live_session),
        )
        .route(
            "/api/live/sessions/{id}/start",
            post(handlers::live_sessions::start_live_session),
        )
        .route(
            "/api/live/sessions/{id}/end",
            post(handlers::live_sessions::end_live_session),
        )
        .route(
            "/api/live/status",
            post(handlers::stream_status::stream_status_callback),
        );

    let quiz_routes = Router::new()
        .route(
            "/api/question/create",
            post(handlers::questions::create_question),
        )
        .route(
            "/api/question/push/{course_id}/{question_id}",
            get(handlers::questions::push_question),
        )
        .route(
            "/api/question/submit",
            post(handlers::questions::submit_answer),
        )
        .route(
            "/api/question/result/{question_id}",
            get(handlers::questions::question_result),
        );

    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(live_routes)
        .merge(quiz_routes)
        .route("/api/health", get(handlers::health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(middleware::log_error_responses))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(24 * 60 * 60));

    if config.cors_allow_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allow_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

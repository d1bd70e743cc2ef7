pub mod city_services;
pub mod products;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;

use common::types::Health;

use crate::{graphql, openapi, state::AppState, ws};

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router: API routes under `state.api_prefix`,
/// plus unprefixed `/health` and `/openapi.json`.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/city_services", get(city_services::list).post(city_services::create))
        .route(
            "/city_services/:key",
            get(city_services::get_by_name).put(city_services::update).delete(city_services::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route("/products/:id", get(products::get).put(products::update).delete(products::delete))
        .route("/graphql", get(graphql::graphiql).post(graphql::graphql_handler))
        .route("/ws", get(ws::ws_handler));

    let root = if state.api_prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&state.api_prefix, api)
    };

    root.route("/health", get(health))
        .route("/openapi.json", get(openapi::openapi_json))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}

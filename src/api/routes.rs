//! HTTP API route definitions.

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{get_flower, health, metrics, naver_shopping, AppState};

/// Build the CORS policy for a single allowed origin.
///
/// Pre-flight requests are answered for every route.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, axum::http::header::InvalidHeaderValue> {
    let origin = HeaderValue::from_str(origin)?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true))
}

/// Create the API router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // Gateway endpoints
        .route("/flowers", get(get_flower))
        .route("/naver-shopping", get(naver_shopping))
        // Operational endpoints
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

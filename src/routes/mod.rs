pub mod auth;
pub mod notifications;
pub mod recs;
pub mod users;

use crate::{state::AppState, utils::middleware::request_logging_middleware};
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::Layer;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Full HTTP surface with its middleware stack. Trailing slashes are trimmed
/// before routing, so `/recs/` and `/recs` reach the same handler.
pub fn app(state: Arc<AppState>) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/recs", recs::router())
        .nest("/notifications", notifications::router())
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(cors_layer(&state.config.cors_allowed_origins))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePathLayer::trim_trailing_slash().layer(router)
}

/// Origins that fail to parse are skipped with a warning.
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .allow_origin(origins)
}

async fn health_check() -> &'static str {
    "recs is running"
}

// API module - HTTP surface over the log registry

mod handlers;

use crate::config::ServiceConfig;
use crate::logs::LogRegistry;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use handlers::TailQuery;

/// Shared, read-only state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LogRegistry>,
}

impl AppState {
    pub fn new(registry: LogRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

/// Build the application router
pub fn build_router(state: AppState, config: &ServiceConfig) -> Router {
    // Credentials rule out literal wildcards, so `*` and the method/header
    // lists mirror the request instead
    let allow_origin = if config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        config
            .cors_origins
            .iter()
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect::<Vec<_>>()
            .into()
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/hello/{name}", get(handlers::hello))
        .route("/logs", get(handlers::list_logs))
        .route("/logs/{identifier}", get(handlers::tail_log))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

//! Cross-cutting layers applied to every route.

use std::time::Duration;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Wraps the routes in request tracing and CORS.
pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_policy())
}

// The frontend is served from another origin.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(3600))
}

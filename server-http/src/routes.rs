use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

/// The router wrapped so `/cache/` and `/cache` reach the same handler
pub type App = NormalizePath<Router>;

/// Build and configure the application router
pub fn build_router(state: AppState) -> App {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/stats", get(handlers::memo_stats))
        // Counter routes
        .route("/cache", get(handlers::cached_count))
        .route("/raw", get(handlers::raw_count))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Path rewriting has to happen before routing, so it wraps the router
    NormalizePath::trim_trailing_slash(router)
}

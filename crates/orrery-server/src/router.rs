//! Router construction for the ephemeris server.

use axum::routing::get;
use axum::{Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::handlers;

/// Build the axum router with routes and middleware.
pub fn build_router(config: ServerConfig) -> Router {
    Router::new()
        .route("/ephemeris", get(handlers::ephemeris::get_batch))
        .layer(Extension(config))
        // The explorer page is usually served from another origin.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

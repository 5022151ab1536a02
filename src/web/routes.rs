//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(&state.settings.server.allowed_origin))
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // API routes
        .route("/research", post(handlers::research))
        .route("/history", get(handlers::history))
        .route("/history/:id", get(handlers::history_item))
        // Add middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

/// A single trusted origin, or `*` for any
fn allowed_origin(origin: &str) -> AllowOrigin {
    let origin = origin.trim();
    if origin == "*" {
        return AllowOrigin::any();
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            warn!("Invalid allowed origin {:?}, cross-origin requests disabled", origin);
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}

//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, dump_handler, fetch_handler, flush_handler, health_handler, rm_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /add` - Store a value with optional TTL
/// - `GET /fetch/:key` - Retrieve a value and mark it recently used
/// - `DELETE /rm/:key` - Remove a key
/// - `GET /dump` - List all entries, most recently used first
/// - `DELETE /flush` - Remove every entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/add", put(add_handler))
        .route("/fetch/:key", get(fetch_handler))
        .route("/rm/:key", delete(rm_handler))
        .route("/dump", get(dump_handler))
        .route("/flush", delete(flush_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

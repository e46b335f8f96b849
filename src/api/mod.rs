//! API Module
//!
//! HTTP handlers and routing that expose the cache over a REST API.
//!
//! # Endpoints
//! - `PUT /add` - Store a value with optional TTL (milliseconds)
//! - `GET /fetch/:key` - Retrieve a value by key
//! - `DELETE /rm/:key` - Remove a key
//! - `GET /dump` - List entries in recency order
//! - `DELETE /flush` - Remove every entry
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

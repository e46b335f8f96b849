//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. Each handler maps
//! one cache operation onto a status code and a JSON body.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::cache::Cache;
use crate::error::{CacheError, Result};
use crate::models::{
    AddRequest, DumpEntry, DumpResponse, EntryResponse, FlushResponse, HealthResponse,
};

/// Cache instantiation served over HTTP: string keys, arbitrary JSON values.
pub type JsonCache = Cache<String, Value>;

/// Application state shared across all handlers.
///
/// The cache is not synchronized itself, so every handler goes through the
/// lock. Fetch promotes entries and therefore needs the write half.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<JsonCache>>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: JsonCache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(Cache::new(config.max_entries))
    }
}

/// Handler for PUT /add
///
/// Stores a value with optional TTL and echoes what was stored.
pub async fn add_handler(
    State(state): State<AppState>,
    Json(req): Json<AddRequest>,
) -> Result<Json<EntryResponse>> {
    let ttl = req.ttl();
    let key = req.key.clone();

    let mut cache = state.cache.write().await;
    let stored = cache.add(req.key, req.value, ttl).cloned();

    match (key, stored) {
        (Some(key), Some(value)) => {
            debug!(%key, ?ttl, "Stored entry");
            Ok(Json(EntryResponse::new(key, value)))
        }
        _ => Err(CacheError::InvalidRequest("Key is required".to_string())),
    }
}

/// Handler for GET /fetch/:key
///
/// Missing and expired keys are both reported as not found.
pub async fn fetch_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    // Write lock: a hit promotes the entry, a stale hit purges it
    let mut cache = state.cache.write().await;
    match cache.fetch(&key).cloned() {
        Some(value) => Ok(Json(EntryResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /rm/:key
///
/// Returns the removed value.
pub async fn rm_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let mut cache = state.cache.write().await;
    match cache.rm(&key) {
        Some(value) => Ok(Json(EntryResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for GET /dump
///
/// Lists every entry from most to least recently used without promoting
/// or purging anything.
pub async fn dump_handler(State(state): State<AppState>) -> Json<DumpResponse> {
    let cache = state.cache.read().await;
    let entries: Vec<DumpEntry> = cache.snapshot().into_iter().map(DumpEntry::from).collect();

    Json(DumpResponse {
        count: entries.len(),
        capacity: cache.capacity(),
        entries,
    })
}

/// Handler for DELETE /flush
pub async fn flush_handler(State(state): State<AppState>) -> Json<FlushResponse> {
    let removed = state.cache.write().await.clear();
    debug!(removed, "Flushed cache");
    Json(FlushResponse { removed })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

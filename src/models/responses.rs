//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::SnapshotEntry;

/// Response body for the ADD, FETCH and RM operations
///
/// Carries the stored, fetched or removed value respectively.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub value: Value,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// One record of the dump, in recency order
#[derive(Debug, Clone, Serialize)]
pub struct DumpEntry {
    pub key: String,
    pub value: Value,
    /// Expiration timestamp (Unix milliseconds), null = no expiration
    pub expires_at: Option<u64>,
}

impl From<SnapshotEntry<'_, String, Value>> for DumpEntry {
    fn from(entry: SnapshotEntry<'_, String, Value>) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            expires_at: entry.expires_at,
        }
    }
}

/// Response body for the dump endpoint (GET /dump)
#[derive(Debug, Clone, Serialize)]
pub struct DumpResponse {
    /// Number of entries, including expired ones not yet fetched
    pub count: usize,
    pub capacity: usize,
    /// Entries from most to least recently used
    pub entries: Vec<DumpEntry>,
}

/// Response body for the flush endpoint (DELETE /flush)
#[derive(Debug, Clone, Serialize)]
pub struct FlushResponse {
    pub removed: usize,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

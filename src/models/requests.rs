//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

/// Request body for the ADD operation (PUT /add)
///
/// # Fields
/// - `key`: The cache key; a missing or null key is rejected by the cache
/// - `value`: Any JSON value, stored as-is (missing means `null`)
/// - `ttl`: Optional TTL in milliseconds; non-positive means no expiry
#[derive(Debug, Clone, Deserialize)]
pub struct AddRequest {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<i64>,
}

impl AddRequest {
    /// Converts the millisecond TTL into a duration, if it is positive.
    pub fn ttl(&self) -> Option<Duration> {
        match self.ttl {
            Some(ms) if ms > 0 => Some(Duration::from_millis(ms.unsigned_abs())),
            _ => None,
        }
    }
}

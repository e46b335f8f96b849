//! Cache Entry Module
//!
//! Defines the record stored in each arena slot, plus the expiry arithmetic.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached record.
///
/// `prev` and `next` are slot handles into the owning
/// [`RecencyList`](super::RecencyList) and are only touched by the list.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored payload
    pub value: V,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
    pub(super) prev: Option<usize>,
    pub(super) next: Option<usize>,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates an unlinked entry.
    pub fn new(key: K, value: V, expires_at: Option<u64>) -> Self {
        Self {
            key,
            value,
            expires_at,
            prev: None,
            next: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired relative to `now_ms`.
    ///
    /// Boundary condition: an entry is expired once `now_ms >= expires_at`,
    /// so a TTL that has fully elapsed is never served.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => expires <= now_ms,
            None => false,
        }
    }
}

// == Utility Functions ==
/// Computes the absolute expiry for an entry inserted at `now_ms`.
///
/// Only a strictly positive `ttl` produces an expiry; `None` and a zero
/// duration both mean the entry never expires. Sub-millisecond remainders
/// round up, so a positive TTL always outlives the insertion instant.
pub fn expires_at_from(ttl: Option<Duration>, now_ms: u64) -> Option<u64> {
    match ttl {
        Some(ttl) if ttl > Duration::ZERO => {
            let ttl_ms = u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
            Some(now_ms.saturating_add(ttl_ms))
        }
        _ => None,
    }
}

/// Returns the cache's notion of "now" as Unix milliseconds.
///
/// The wall clock is read once, on first use, and later readings advance
/// by a monotonic [`Instant`]. Timestamps stay comparable with epoch time
/// but never step backwards when the system clock is adjusted; the cost is
/// that they drift from wall time by however much the system clock is
/// corrected while the process runs.
pub fn current_timestamp_ms() -> u64 {
    static ANCHOR: OnceLock<(Instant, u64)> = OnceLock::new();

    let (started, epoch_ms) = *ANCHOR.get_or_init(|| {
        let epoch_ms = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        (Instant::now(), epoch_ms)
    });
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    epoch_ms.saturating_add(elapsed_ms)
}

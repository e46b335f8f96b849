//! Cache Module
//!
//! Provides an in-memory LRU cache with lazy TTL expiration.

mod entry;
mod lru;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, Entry};
pub use lru::RecencyList;
pub use store::{Cache, SnapshotEntry};

// == Public Constants ==
/// Capacity used when a cache is constructed with a capacity of 0
pub const DEFAULT_CAPACITY: usize = 5;

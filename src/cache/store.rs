//! Cache Store Module
//!
//! Main cache engine combining a key index with an arena-backed recency list
//! and lazy TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, expires_at_from};
use crate::cache::{Entry, RecencyList, DEFAULT_CAPACITY};

// == Snapshot Entry ==
/// One record of a [`Cache::snapshot`], borrowed from the cache.
#[derive(Debug, PartialEq)]
pub struct SnapshotEntry<'a, K, V> {
    pub key: &'a K,
    pub value: &'a V,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

// == Cache ==
/// Bounded LRU cache with optional per-entry TTL.
///
/// Every operation except [`snapshot`](Cache::snapshot) is O(1) amortized.
/// Expired entries are only purged when [`fetch`](Cache::fetch) finds them;
/// there is no background sweep.
///
/// The cache is not synchronized. Hosts sharing it between tasks must
/// serialize access themselves.
#[derive(Debug)]
pub struct Cache<K, V> {
    /// Key to slot handle in `list`
    index: HashMap<K, usize>,
    /// Entries ordered from most to least recently used
    list: RecencyList<K, V>,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone + Debug,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 falls back to [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };

        Self {
            index: HashMap::with_capacity(capacity),
            list: RecencyList::with_capacity(capacity),
            capacity,
        }
    }

    // == Add ==
    /// Stores `value` under `key`, returning the stored value.
    ///
    /// A missing key is rejected without touching the cache and yields
    /// `None`. Success is reported by `Some`, whatever the value is, so
    /// values like `0`, `false` or `""` are stored like any other.
    ///
    /// # Arguments
    /// * `key` - The key to store under; `None` is a no-op
    /// * `value` - The value to store
    /// * `ttl` - Optional time to live; zero or `None` never expires
    pub fn add(&mut self, key: Option<K>, value: V, ttl: Option<Duration>) -> Option<&V> {
        let Some(key) = key else {
            debug!("Ignoring add without a key");
            return None;
        };
        Some(self.insert(key, value, ttl))
    }

    // == Insert ==
    /// Stores `value` under `key` and makes it the most recently used entry.
    ///
    /// If the key already exists, its old value and TTL are discarded and
    /// the count is unchanged. Otherwise, if the cache is full, the least
    /// recently used entry is evicted first.
    pub fn insert(&mut self, key: K, value: V, ttl: Option<Duration>) -> &V {
        if let Some(&idx) = self.index.get(&key) {
            // Refresh: the index entry is overwritten below
            self.list.remove(idx);
        } else if self.list.len() == self.capacity {
            self.evict();
        }

        let expires_at = expires_at_from(ttl, current_timestamp_ms());
        let idx = self.list.push_front(Entry::new(key.clone(), value, expires_at));
        self.index.insert(key, idx);

        &self.list[idx].value
    }

    // == Fetch ==
    /// Retrieves a value by key and promotes it to most recently used.
    ///
    /// Returns `None` if the key is absent or has expired; an expired entry
    /// is removed before returning.
    pub fn fetch<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.index.get(key)?;

        if self.list[idx].is_expired_at(current_timestamp_ms()) {
            self.index.remove(key);
            if let Some(entry) = self.list.remove(idx) {
                debug!(key = ?entry.key, "Purged expired entry on fetch");
            }
            return None;
        }

        self.list.move_to_front(idx);
        Some(&self.list[idx].value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value.
    ///
    /// Returns `None` if the key is absent; nothing is changed in that case.
    pub fn rm<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.index.remove(key)?;
        self.list.remove(idx).map(|entry| entry.value)
    }

    // == Snapshot ==
    /// Lists every entry from most to least recently used.
    ///
    /// Expired entries that have not been fetched yet are still listed.
    pub fn snapshot(&self) -> Vec<SnapshotEntry<'_, K, V>> {
        self.list
            .iter()
            .map(|entry| SnapshotEntry {
                key: &entry.key,
                value: &entry.value,
                expires_at: entry.expires_at,
            })
            .collect()
    }

    // == Clear ==
    /// Removes every entry, returning how many were dropped.
    pub fn clear(&mut self) -> usize {
        let removed = self.list.len();
        self.index.clear();
        self.list.clear();
        removed
    }

    /// Checks for a key without promoting it or checking its expiry.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Evicts the least recently used entry.
    fn evict(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            debug!(key = ?entry.key, "Evicted least recently used entry");
        }
    }

    /// Walks the list in both directions and cross-checks it with the index.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let count = self.list.len();
        assert_eq!(count, self.index.len(), "index size differs from list length");
        assert!(count <= self.capacity, "count {} exceeds capacity", count);
        assert_eq!(self.list.head().is_none(), count == 0);
        assert_eq!(self.list.tail().is_none(), count == 0);

        let mut walked = 0;
        let mut prev = None;
        let mut cursor = self.list.head();
        while let Some(idx) = cursor {
            let entry = &self.list[idx];
            assert_eq!(entry.prev, prev, "broken back link at slot {}", idx);
            assert_eq!(self.index.get(&entry.key), Some(&idx), "index mismatch for {:?}", entry.key);
            walked += 1;
            assert!(walked <= count, "cycle in recency list");
            prev = Some(idx);
            cursor = entry.next;
        }
        assert_eq!(walked, count, "list walk does not cover every entry");
        assert_eq!(self.list.tail(), prev, "tail is not the last node");
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    fn keys<V>(cache: &Cache<&'static str, V>) -> Vec<&'static str> {
        cache.snapshot().iter().map(|e| *e.key).collect()
    }

    #[test]
    fn test_cache_new() {
        let cache: Cache<String, String> = Cache::new(100);
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 100);
        cache.assert_invariants();
    }

    #[test]
    fn test_zero_capacity_uses_default() {
        let cache: Cache<String, String> = Cache::new(0);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_add_and_fetch() {
        let mut cache = Cache::new(5);

        let stored = cache.add(Some("key1".to_string()), "value1".to_string(), None);
        assert_eq!(stored.map(String::as_str), Some("value1"));

        assert_eq!(cache.fetch("key1").map(String::as_str), Some("value1"));
        assert_eq!(cache.len(), 1);
        cache.assert_invariants();
    }

    #[test]
    fn test_add_without_key_is_noop() {
        let mut cache: Cache<String, u32> = Cache::new(5);
        cache.insert("a".to_string(), 1, None);

        assert!(cache.add(None, 2, None).is_none());

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fetch("a"), Some(&1));
        cache.assert_invariants();
    }

    #[test]
    fn test_falsy_values_report_success() {
        let mut cache = Cache::new(5);

        assert_eq!(cache.add(Some("zero"), 0, None), Some(&0));
        assert_eq!(cache.fetch("zero"), Some(&0));

        let mut flags = Cache::new(5);
        assert_eq!(flags.add(Some("off"), false, None), Some(&false));

        let mut strings = Cache::new(5);
        assert_eq!(strings.add(Some("blank"), String::new(), None), Some(&String::new()));
        assert_eq!(strings.fetch("blank"), Some(&String::new()));
    }

    #[test]
    fn test_fetch_nonexistent() {
        let mut cache: Cache<String, String> = Cache::new(5);

        assert!(cache.fetch("nonexistent").is_none());
        assert_eq!(cache.len(), 0);
        cache.assert_invariants();
    }

    #[test]
    fn test_add_orders_most_recent_first() {
        let mut cache = Cache::new(5);

        cache.insert("a.key", (), None);
        assert_eq!(keys(&cache), vec!["a.key"]);

        cache.insert("another.key", (), None);
        cache.insert("and.yet.another.key", (), None);
        assert_eq!(keys(&cache), vec!["and.yet.another.key", "another.key", "a.key"]);
        assert_eq!(cache.len(), 3);
        cache.assert_invariants();
    }

    #[test]
    fn test_refresh_moves_to_head_without_growing() {
        let mut cache = Cache::new(5);

        cache.insert("a", 1, None);
        cache.insert("b", 2, None);
        cache.insert("c", 3, None);

        cache.insert("b", 20, Some(Duration::from_secs(60)));
        assert_eq!(keys(&cache), vec!["b", "c", "a"]);
        assert_eq!(cache.len(), 3);

        cache.insert("a", 10, None);
        assert_eq!(keys(&cache), vec!["a", "b", "c"]);
        assert_eq!(cache.len(), 3);

        let snapshot = cache.snapshot();
        assert_eq!(*snapshot[0].value, 10);
        assert_eq!(*snapshot[1].value, 20);
        assert!(snapshot[1].expires_at.is_some());
        cache.assert_invariants();
    }

    #[test]
    fn test_refresh_discards_old_ttl() {
        let mut cache = Cache::new(5);

        cache.insert("k", 1, Some(Duration::from_millis(5)));
        cache.insert("k", 2, None);
        sleep(Duration::from_millis(10));

        assert_eq!(cache.fetch("k"), Some(&2));
    }

    #[test]
    fn test_refresh_at_capacity_does_not_evict() {
        let mut cache = Cache::new(2);

        cache.insert("a", 1, None);
        cache.insert("b", 2, None);
        cache.insert("a", 3, None);

        assert_eq!(keys(&cache), vec!["a", "b"]);
        cache.assert_invariants();
    }

    #[test]
    fn test_fetch_promotes() {
        let mut cache = Cache::new(5);

        cache.insert("a.key", "first", None);
        cache.insert("another.key", "second", None);

        assert_eq!(cache.fetch("a.key"), Some(&"first"));
        assert_eq!(cache.len(), 2);
        assert_eq!(keys(&cache), vec!["a.key", "another.key"]);
        cache.assert_invariants();
    }

    #[test]
    fn test_fetch_preserves_expiry() {
        let mut cache = Cache::new(5);

        cache.insert("a", 1, Some(Duration::from_secs(60)));
        cache.insert("b", 2, None);
        let before = cache.snapshot()[1].expires_at;

        cache.fetch("a");
        let after = cache.snapshot();
        assert_eq!(*after[0].key, "a");
        assert_eq!(after[0].expires_at, before);
    }

    #[test]
    fn test_ttl_expiration() {
        let mut cache = Cache::new(5);

        cache.insert("a.key", "value", Some(Duration::from_millis(1000)));
        assert_eq!(cache.fetch("a.key"), Some(&"value"));

        cache.insert("a.key", "value", Some(Duration::from_millis(5)));
        sleep(Duration::from_millis(10));

        // Expiry is lazy: nothing is purged until the key is fetched
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.snapshot().len(), 1);

        assert!(cache.fetch("a.key").is_none());
        assert_eq!(cache.len(), 0);
        cache.assert_invariants();
    }

    #[test]
    fn test_sub_millisecond_ttl_outlives_insertion() {
        let mut cache = Cache::new(5);

        let before = current_timestamp_ms();
        cache.insert("k", 1, Some(Duration::from_micros(500)));

        let expires_at = cache.snapshot()[0].expires_at.unwrap();
        assert!(expires_at > before);
    }

    #[test]
    fn test_expired_purge_relinks_neighbours() {
        let mut cache = Cache::new(5);

        cache.insert("a", 1, None);
        cache.insert("b", 2, Some(Duration::from_millis(5)));
        cache.insert("c", 3, None);
        sleep(Duration::from_millis(10));

        assert!(cache.fetch("b").is_none());
        assert_eq!(keys(&cache), vec!["c", "a"]);
        cache.assert_invariants();
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = Cache::new(3);

        cache.insert("a", (), None);
        cache.insert("b", (), None);
        cache.insert("c", (), None);
        assert_eq!(keys(&cache), vec!["c", "b", "a"]);

        cache.insert("e", (), None);
        cache.insert("d", (), None);
        cache.insert("f", (), None);

        assert_eq!(cache.len(), 3);
        assert_eq!(keys(&cache), vec!["f", "d", "e"]);
        assert!(!cache.contains("a"));
        cache.assert_invariants();
    }

    #[test]
    fn test_lru_touch_on_fetch() {
        let mut cache = Cache::new(3);

        cache.insert("a", 1, None);
        cache.insert("b", 2, None);
        cache.insert("c", 3, None);

        // Access a to make it most recently used
        cache.fetch("a");

        // Adding d should evict b (now oldest)
        cache.insert("d", 4, None);

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert_eq!(keys(&cache), vec!["d", "a", "c"]);
        cache.assert_invariants();
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = Cache::new(1);

        cache.insert("a", 1, None);
        cache.insert("b", 2, None);

        assert_eq!(cache.len(), 1);
        assert!(cache.fetch("a").is_none());
        assert_eq!(cache.fetch("b"), Some(&2));
        cache.assert_invariants();
    }

    #[test]
    fn test_rm() {
        let mut cache = Cache::new(5);

        cache.insert("a.key", 1, None);
        assert_eq!(cache.rm("a.key"), Some(1));
        assert!(cache.is_empty());
        cache.assert_invariants();

        cache.insert("a.key", 1, None);
        cache.insert("another.key", 2, None);

        assert_eq!(cache.rm("a.key"), Some(1));
        assert_eq!(keys(&cache), vec!["another.key"]);
        cache.assert_invariants();

        assert_eq!(cache.rm("another.key"), Some(2));
        assert!(cache.is_empty());
        cache.assert_invariants();
    }

    #[test]
    fn test_rm_head_middle_and_tail() {
        let mut cache = Cache::new(5);

        for key in ["a", "b", "c", "d", "e"] {
            cache.insert(key, (), None);
        }

        cache.rm("e");
        assert_eq!(keys(&cache), vec!["d", "c", "b", "a"]);
        cache.assert_invariants();

        cache.rm("a");
        assert_eq!(keys(&cache), vec!["d", "c", "b"]);
        cache.assert_invariants();

        cache.rm("c");
        assert_eq!(keys(&cache), vec!["d", "b"]);
        cache.assert_invariants();
    }

    #[test]
    fn test_rm_nonexistent() {
        let mut cache = Cache::new(5);
        cache.insert("a", 1, None);

        assert!(cache.rm("nonexistent").is_none());
        assert_eq!(cache.rm("a"), Some(1));
        assert!(cache.rm("a").is_none());
        assert!(cache.fetch("a").is_none());
        assert_eq!(cache.len(), 0);
        cache.assert_invariants();
    }

    #[test]
    fn test_snapshot_empty() {
        let cache: Cache<String, String> = Cache::new(5);
        assert!(cache.snapshot().is_empty());
    }

    #[test]
    fn test_snapshot_records() {
        let mut cache = Cache::new(5);

        cache.insert("a", 1, None);
        cache.insert("b", 2, Some(Duration::from_secs(60)));

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.len(), cache.len());
        assert_eq!(
            snapshot[1],
            SnapshotEntry {
                key: &"a",
                value: &1,
                expires_at: None,
            }
        );
        assert_eq!(*snapshot[0].key, "b");
        assert!(snapshot[0].expires_at.unwrap() > current_timestamp_ms());
    }

    #[test]
    fn test_clear() {
        let mut cache = Cache::new(5);

        cache.insert("a", 1, None);
        cache.insert("b", 2, None);

        assert_eq!(cache.clear(), 2);
        assert!(cache.is_empty());
        assert!(cache.fetch("a").is_none());
        cache.assert_invariants();

        cache.insert("c", 3, None);
        assert_eq!(keys(&cache), vec!["c"]);
        cache.assert_invariants();
    }
}

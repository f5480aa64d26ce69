//! TTL Cache Store Module
//!
//! In-memory key/value store with optional per-entry expiry. Entries are
//! evicted lazily when a lookup finds them expired; a periodic sweep
//! (`sweep_expired`, driven by the tasks module) bounds the growth of
//! entries nobody reads again.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};

// == TTL Cache ==
/// In-memory TTL cache over an opaque payload type.
///
/// Every operation is total: lookups return `Option` and nothing here can
/// fail. The cache is a single-owner structure; callers that need to share it
/// with the sweep task wrap it in `Arc<RwLock<...>>` at the composition root.
pub struct TtlCache<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Usage counters
    stats: CacheStats,
    /// Injected time source
    clock: Arc<dyn Clock>,
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> TtlCache<V> {
    // == Constructors ==
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache on an injected clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            clock,
        }
    }

    // == Set ==
    /// Stores `value` under `key`, unconditionally overwriting any existing
    /// entry. With a TTL the entry expires `ttl` from now; without one it
    /// never expires.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let now = self.clock.now_ms();
        let ttl_ms = ttl.map(|d| d.as_millis() as u64);
        self.entries
            .insert(key.into(), CacheEntry::new(value, now, ttl_ms));
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves the value for `key`.
    ///
    /// Returns `None` for absent keys. An entry whose expiry has passed
    /// behaves as if it does not exist: it is evicted on this access and the
    /// lookup counts as a miss.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                self.stats.record_expired();
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                None
            }
            Some(entry) => {
                self.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Clear ==
    /// Removes the entry for `key` if present; no-op otherwise.
    pub fn clear(&mut self, key: &str) {
        self.entries.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Clear All ==
    /// Empties the store.
    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Sweep Expired ==
    /// Removes every entry whose expiry has passed, returning the count.
    pub fn sweep_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            self.entries.remove(&key);
            self.stats.record_expired();
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns a snapshot of the usage counters.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

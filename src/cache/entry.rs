//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with optional expiry.

// == Cache Entry ==
/// A single cache entry: the stored payload plus timing metadata.
///
/// The entry never reads the clock itself; the owning store passes "now" in,
/// which is what keeps expiry deterministic under an injected clock.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored payload, opaque to the cache
    pub value: V,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = never expires
    pub expires_at: Option<u64>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped at `now_ms`, expiring `ttl_ms` later when
    /// a TTL is given.
    pub fn new(value: V, now_ms: u64, ttl_ms: Option<u64>) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: ttl_ms.map(|ttl| now_ms + ttl),
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired as of `now_ms`.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiration time, so an entry whose TTL
    /// has fully elapsed is never served again.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.expires_at {
            Some(expires) => now_ms >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Remaining TTL in milliseconds as of `now_ms`.
    ///
    /// Returns `Some(0)` once expired and `None` for entries without expiry.
    pub fn ttl_remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.expires_at.map(|expires| expires.saturating_sub(now_ms))
    }
}

//! Cache Module
//!
//! In-memory key/value caching with optional per-entry TTL and lazy expiry
//! eviction. Used by the client session to avoid redundant fetches; values
//! are opaque to the cache.

mod clock;
mod entry;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

//! Cache Sweep Task
//!
//! Background task that periodically removes expired cache entries, bounding
//! the growth of entries no lookup ever touches again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;

/// Spawns a task that sweeps expired entries every `sweep_interval_secs`.
///
/// The cache is otherwise single-owner; the composition root shares it with
/// this task behind `Arc<RwLock<...>>`. The returned handle is aborted
/// during shutdown.
pub fn spawn_sweep_task<V>(
    cache: Arc<RwLock<TtlCache<V>>>,
    sweep_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Send + Sync + 'static,
{
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            interval_secs = sweep_interval_secs,
            "starting cache sweep task"
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.sweep_expired()
            };

            if removed > 0 {
                info!(removed, "cache sweep removed expired entries");
            } else {
                debug!("cache sweep found no expired entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_removes_expired_entries() {
        let clock = ManualClock::new(0);
        let cache = Arc::new(RwLock::new(TtlCache::with_clock(Arc::new(clock.clone()))));

        {
            let mut cache_guard = cache.write().await;
            cache_guard.set("expire_soon", "value", Some(Duration::from_millis(500)));
        }

        let handle = spawn_sweep_task(Arc::clone(&cache), 1);

        // Let the TTL elapse on the cache clock, then let the sweep fire.
        clock.advance(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let cache_guard = cache.read().await;
            assert!(cache_guard.is_empty(), "expired entry should be swept");
            assert_eq!(cache_guard.stats().expired, 1);
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_preserves_valid_entries() {
        let clock = ManualClock::new(0);
        let cache = Arc::new(RwLock::new(TtlCache::with_clock(Arc::new(clock.clone()))));

        {
            let mut cache_guard = cache.write().await;
            cache_guard.set("long_lived", "value", Some(Duration::from_secs(3600)));
            cache_guard.set("forever", "value", None);
        }

        let handle = spawn_sweep_task(Arc::clone(&cache), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let cache_guard = cache.read().await;
            assert_eq!(cache_guard.len(), 2, "valid entries must survive sweeps");
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache: Arc<RwLock<TtlCache<String>>> = Arc::new(RwLock::new(TtlCache::new()));

        let handle = spawn_sweep_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished(), "task should be finished after abort");
    }
}

//! Periodic active expiry for [`TtlCache`].
//!
//! The sweep runs on its own task, independent of request traffic, and is
//! stopped through a [`CancellationToken`] so shutdown is deterministic.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ttl_cache::TtlCache;

/// Default sweep period (60 seconds)
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Handle to a running cleanup task
pub struct CacheSweeper {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl CacheSweeper {
    /// Spawn a task calling `cache.cleanup()` every `period`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<V>(cache: Arc<TtlCache<V>>, period: Duration) -> Self
    where
        V: Clone + Send + 'static,
    {
        Self::spawn_with_token(cache, period, CancellationToken::new())
    }

    /// Like [`spawn`](Self::spawn), stopping when `token` (or a parent) is cancelled.
    pub fn spawn_with_token<V>(
        cache: Arc<TtlCache<V>>,
        period: Duration,
        token: CancellationToken,
    ) -> Self
    where
        V: Clone + Send + 'static,
    {
        let cancel = token.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = cache.cleanup();
                        if removed > 0 {
                            debug!(removed, remaining = cache.size(), "Swept expired cache entries");
                        }
                    }
                }
            }
            debug!("Cache sweeper stopped");
        });

        Self { token, handle }
    }

    /// Token that stops the sweeper when cancelled
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the task and wait for it to exit.
    pub async fn shutdown(self) {
        self.token.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Cache sweeper task ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_unread_expired_entries() {
        let cache = Arc::new(TtlCache::new());
        cache.set("short", 1, Some(Duration::from_secs(1)));
        cache.set("long", 2, Some(Duration::from_secs(600)));

        let sweeper = CacheSweeper::spawn(Arc::clone(&cache), Duration::from_secs(60));

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(cache.size(), 2);

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(cache.size(), 1);
        assert!(cache.has("long"));

        sweeper.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_task() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new());
        let sweeper = CacheSweeper::spawn(Arc::clone(&cache), Duration::from_secs(60));
        assert!(!sweeper.is_finished());

        sweeper.shutdown().await;

        // No task left holding the cache
        assert_eq!(Arc::strong_count(&cache), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_token_cancels_sweeper() {
        let cache: Arc<TtlCache<u32>> = Arc::new(TtlCache::new());
        let parent = CancellationToken::new();
        let sweeper = CacheSweeper::spawn_with_token(
            Arc::clone(&cache),
            Duration::from_secs(60),
            parent.child_token(),
        );

        parent.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(sweeper.is_finished());
    }
}

//! In-memory key/value cache with per-entry expiry.
//!
//! Expiry is enforced two ways:
//!
//! - **Lazily** on [`get`](TtlCache::get) / [`has`](TtlCache::has): an expired
//!   entry is deleted and reported as absent.
//! - **Actively** by [`cleanup`](TtlCache::cleanup), which the
//!   [`CacheSweeper`](super::CacheSweeper) runs on a fixed period so keys that
//!   are written but never read again do not accumulate.
//!
//! There is no size bound or LRU eviction. Memory is bounded only by expiry,
//! which is fine for a small key space but grows with free-text keyed tools
//! (e.g. `search_entries`).
//!
//! Time is read from [`tokio::time::Instant`], so tests can pause and
//! advance the clock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;

/// Default entry lifetime when none is given (5 minutes)
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) <= self.ttl
    }
}

/// Thread-safe TTL cache keyed by string.
pub struct TtlCache<V> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_default_ttl(DEFAULT_TTL)
    }

    pub fn with_default_ttl(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Store `value`, replacing any previous entry and resetting its age.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl: ttl.unwrap_or(self.default_ttl),
        };
        self.lock().insert(key.into(), entry);
    }

    /// Live value for `key`. An expired entry is removed.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Whether a live entry exists. An expired entry is removed.
    pub fn has(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if entry.is_live(now) => true,
            Some(_) => {
                entries.remove(key);
                false
            }
            None => false,
        }
    }

    /// Remove `key`; returns whether an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn size(&self) -> usize {
        self.lock().len()
    }

    /// Delete every expired entry; returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    // A panic while holding the lock cannot leave the map half-updated
    // (every mutation is a single HashMap call), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for TtlCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size = self
            .entries
            .lock()
            .map(|e| e.len())
            .unwrap_or_else(|e| e.into_inner().len());
        f.debug_struct("TtlCache")
            .field("size", &size)
            .field("default_ttl", &self.default_ttl)
            .finish()
    }
}

//! Expiring key/value cache
//!
//! Every entry carries an absolute expiry timestamp. [`TtlCache::get`] treats
//! an expired entry as absent but leaves it in place; the background sweeper
//! started with [`TtlCache::start_sweeper`] removes expired entries.
//!
//! # Thread Safety
//!
//! The map sits behind a `parking_lot::RwLock`: lookups share the read lock,
//! inserts and removals take the write lock. Clones share the same map.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Shared string-keyed cache with per-entry expiry
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
    default_ttl: Duration,
}

impl<V> Clone for TtlCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            default_ttl: self.default_ttl,
        }
    }
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache whose [`set`](Self::set) uses `default_ttl`
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Value stored under `key`, unless absent or expired
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Utc::now();
        self.entries
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` with the default TTL
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::max_value());
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.entries
            .write()
            .insert(key.into(), Entry { value, expires_at });
    }

    /// Remove one key; returns whether it was present
    pub fn delete(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Remove every key starting with `prefix`; returns how many were removed
    pub fn delete_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Drop every entry
    pub fn clean(&self) {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        tracing::info!(count = count, "Cache cleaned");
    }

    /// Remove entries whose expiry has passed
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until swept
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Spawn the periodic expiry sweep on the current tokio runtime
    ///
    /// The task runs until the returned handle is aborted.
    pub fn start_sweeper(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
            // the first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let count = cache.sweep_expired();
                if count > 0 {
                    tracing::info!(count = count, "Swept expired cache entries");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("bookInfo:/a.fb2", "info".to_string());

        assert_eq!(cache.get("bookInfo:/a.fb2").as_deref(), Some("info"));
        assert_eq!(cache.get("bookInfo:/b.fb2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_hidden_but_kept() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("k", 1u32, Duration::ZERO);

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.sweep_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_sweep_keeps_live_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("live", 1u32);
        cache.set_with_ttl("dead", 2u32, Duration::ZERO);

        assert_eq!(cache.sweep_expired(), 1);
        assert_eq!(cache.get("live"), Some(1));
    }

    #[test]
    fn test_overwrite_refreshes_value() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("k", 1u32, Duration::ZERO);
        cache.set("k", 2u32);

        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_delete_and_prefix_delete() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("/books/a.epub:1", 1u32);
        cache.set("/books/a.epub:2", 2u32);
        cache.set("/books/b.epub:1", 3u32);

        assert!(cache.delete("/books/b.epub:1"));
        assert!(!cache.delete("/books/b.epub:1"));
        assert_eq!(cache.delete_prefix("/books/a.epub:"), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clean() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1u32);
        cache.set("b", 2u32);
        cache.clean();

        assert!(cache.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let other = cache.clone();
        other.set("shared", 7u32);

        assert_eq!(cache.get("shared"), Some(7));
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let cache = TtlCache::new(Duration::MAX);
        cache.set("forever", 1u32);

        assert_eq!(cache.get("forever"), Some(1));
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set_with_ttl("short", 1u32, Duration::from_millis(10));
        cache.set("long", 2u32);

        let handle = cache.start_sweeper(Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long"), Some(2));
    }
}

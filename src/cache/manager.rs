//! In-memory TTL cache for upstream API responses
//!
//! Provides a `MemoryCache` that stores serialized values with expiry
//! timestamps behind an async lock, supporting graceful degradation when
//! upstream APIs are unavailable. Entries are keyed by composite strings
//! such as `finance-pelosi-2024`.

use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// A single cached value with its expiry bookkeeping
#[derive(Debug, Clone)]
struct CacheEntry {
    /// The cached data, stored as JSON
    data: Value,
    /// When the data was cached
    cached_at: DateTime<Utc>,
    /// When the cache entry expires
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct Cached<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    #[allow(dead_code)]
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Thread-safe in-memory cache with per-entry TTLs
///
/// Expired entries are still returned (with `is_expired = true`) so callers
/// can serve stale data when an upstream fetch fails. There is no size bound;
/// `purge_expired` exists for periodic housekeeping.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value under the given key with a TTL in seconds
    ///
    /// # Arguments
    /// * `key` - Composite cache key (e.g. "finance-pelosi-2024")
    /// * `data` - The value to cache (must implement Serialize)
    /// * `ttl_secs` - How long the entry is considered fresh
    ///
    /// # Returns
    /// * `Ok(())` on success
    /// * `Err` if the value cannot be serialized to JSON
    pub async fn insert<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        ttl_secs: u64,
    ) -> Result<(), serde_json::Error> {
        let now = Utc::now();
        let entry = CacheEntry {
            data: serde_json::to_value(data)?,
            cached_at: now,
            expires_at: now + Duration::seconds(ttl_secs as i64),
        };

        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    /// Reads a value from the cache
    ///
    /// Returns `None` if the key is absent or the stored value cannot be
    /// deserialized into `T`. Returns `Some(Cached)` with `is_expired = true`
    /// if the entry exists but its TTL has elapsed.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<Cached<T>> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;
        let data: T = serde_json::from_value(entry.data.clone()).ok()?;

        Some(Cached {
            data,
            cached_at: entry.cached_at,
            is_expired: Utc::now() > entry.expires_at,
        })
    }

    /// Removes entries that expired more than `grace_secs` ago, returning
    /// how many were dropped
    ///
    /// Entries inside the grace window are kept even though their TTL has
    /// elapsed, so they remain available to serve stale when an upstream
    /// fetch fails. A grace of zero drops everything expired.
    pub async fn purge_expired(&self, grace_secs: u64) -> usize {
        let cutoff = Utc::now() - Duration::seconds(grace_secs as i64);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at >= cutoff);
        before - entries.len()
    }

    /// Number of entries currently held (fresh or expired)
    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::time::Duration as StdDuration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample() -> TestData {
        TestData {
            name: "test".to_string(),
            value: 42,
        }
    }

    #[tokio::test]
    async fn test_get_returns_none_for_missing_key() {
        let cache = MemoryCache::new();
        let result: Option<Cached<TestData>> = cache.get("nonexistent").await;
        assert!(result.is_none(), "Should return None for missing key");
    }

    #[tokio::test]
    async fn test_fresh_entry_is_not_expired() {
        let cache = MemoryCache::new();
        cache
            .insert("fresh", &sample(), 3600)
            .await
            .expect("Insert should succeed");

        let result: Cached<TestData> = cache.get("fresh").await.expect("Should read fresh entry");
        assert_eq!(result.data, sample());
        assert!(!result.is_expired, "Fresh entry should not be expired");
    }

    #[tokio::test]
    async fn test_zero_ttl_entry_is_expired_but_returned() {
        let cache = MemoryCache::new();
        cache
            .insert("stale", &sample(), 0)
            .await
            .expect("Insert should succeed");

        tokio::time::sleep(StdDuration::from_millis(10)).await;

        let result: Cached<TestData> = cache.get("stale").await.expect("Should read stale entry");
        assert_eq!(result.data, sample());
        assert!(result.is_expired, "Zero TTL entry should be expired");
    }

    #[tokio::test]
    async fn test_insert_overwrites_existing_entry() {
        let cache = MemoryCache::new();
        let first = TestData {
            name: "first".to_string(),
            value: 1,
        };
        let second = TestData {
            name: "second".to_string(),
            value: 2,
        };

        cache.insert("key", &first, 60).await.expect("First insert");
        cache.insert("key", &second, 60).await.expect("Second insert");

        let result: Cached<TestData> = cache.get("key").await.expect("Should read entry");
        assert_eq!(result.data, second, "Cache should contain latest data");
    }

    #[tokio::test]
    async fn test_purge_expired_drops_only_stale_entries() {
        let cache = MemoryCache::new();
        cache.insert("fresh", &sample(), 3600).await.expect("Insert");
        cache.insert("stale", &sample(), 0).await.expect("Insert");

        tokio::time::sleep(StdDuration::from_millis(10)).await;

        let dropped = cache.purge_expired(0).await;
        assert_eq!(dropped, 1, "Exactly one entry should be purged");
        assert_eq!(cache.len().await, 1);

        let fresh: Option<Cached<TestData>> = cache.get("fresh").await;
        let stale: Option<Cached<TestData>> = cache.get("stale").await;
        assert!(fresh.is_some(), "Fresh entry should survive purge");
        assert!(stale.is_none(), "Stale entry should be gone");
    }

    #[tokio::test]
    async fn test_purge_grace_preserves_recently_expired_entries() {
        let cache = MemoryCache::new();
        cache.insert("roster", &sample(), 0).await.expect("Insert");

        tokio::time::sleep(StdDuration::from_millis(10)).await;

        // Expired, but well inside the grace window
        let dropped = cache.purge_expired(3600).await;
        assert_eq!(dropped, 0, "Grace window should protect expired entries");

        let result: Cached<TestData> = cache
            .get("roster")
            .await
            .expect("Expired entry should still be readable for stale serving");
        assert_eq!(result.data, sample());
        assert!(result.is_expired, "Entry should still report as expired");
    }

    #[tokio::test]
    async fn test_cached_at_timestamp_is_recorded() {
        let cache = MemoryCache::new();

        let before = Utc::now();
        cache.insert("ts", &sample(), 60).await.expect("Insert");
        let after = Utc::now();

        let result: Cached<TestData> = cache.get("ts").await.expect("Should read entry");
        assert!(result.cached_at >= before, "cached_at should be after insert started");
        assert!(result.cached_at <= after, "cached_at should be before insert finished");
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_lose_entries() {
        let cache = std::sync::Arc::new(MemoryCache::new());

        let mut handles = Vec::new();
        for i in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let data = TestData {
                    name: format!("writer-{}", i),
                    value: i,
                };
                cache
                    .insert(&format!("key-{}", i), &data, 60)
                    .await
                    .expect("Insert should succeed");
            }));
        }
        for handle in handles {
            handle.await.expect("Writer task should complete");
        }

        assert_eq!(cache.len().await, 16);
    }
}

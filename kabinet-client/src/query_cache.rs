//! Tag-invalidation query cache.
//!
//! Read operations register their result under one or more named tags;
//! write operations invalidate the tags they affect. An invalidated entry
//! stays in place but is marked stale, so the next consumer that observes
//! it refetches. The only ordering guarantee is "happens-after the
//! triggering mutation's success" — this is a publish/invalidate model,
//! not a dependency graph.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::ApiError;

/// Logical cache tags, one per dependent data family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Auth,
    User,
    Profile,
}

/// Cached response snapshot with its tag set and freshness state.
#[derive(Debug, Clone)]
struct CachedEntry {
    value: serde_json::Value,
    tags: Vec<Tag>,
    stale: bool,
}

/// In-memory cache keyed by request signature (the request path).
#[derive(Debug, Clone, Default)]
pub struct QueryCache {
    entries: Arc<RwLock<HashMap<String, CachedEntry>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `key` from cache when a fresh entry exists, otherwise run
    /// `fetch`, store the result under `tags` and return it.
    ///
    /// Failed fetches are never cached.
    pub async fn get_or_fetch<T, F>(
        &self,
        key: &str,
        tags: &[Tag],
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.fresh_value(key).await {
            match serde_json::from_value(value) {
                Ok(data) => {
                    debug!("[QueryCache] hit for {key}");
                    return Ok(data);
                }
                Err(err) => {
                    // A snapshot that no longer deserializes is dropped and
                    // refetched rather than surfaced as an error.
                    warn!("[QueryCache] discarding corrupt entry {key}: {err}");
                    self.remove(key).await;
                }
            }
        }
        self.refetch(key, tags, fetch).await
    }

    /// Fetch unconditionally and replace whatever the cache held for `key`.
    pub async fn refetch<T, F>(
        &self,
        key: &str,
        tags: &[Tag],
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ApiError>>,
    {
        debug!("[QueryCache] fetching {key}");
        let data = fetch.await?;
        let value = serde_json::to_value(&data)
            .map_err(|err| ApiError::Decode(err.to_string()))?;
        self.entries.write().await.insert(
            key.to_string(),
            CachedEntry {
                value,
                tags: tags.to_vec(),
                stale: false,
            },
        );
        Ok(data)
    }

    /// Mark every entry carrying `tag` stale.
    pub async fn invalidate(&self, tag: Tag) {
        let mut entries = self.entries.write().await;
        let mut touched = 0usize;
        for entry in entries.values_mut() {
            if entry.tags.contains(&tag) && !entry.stale {
                entry.stale = true;
                touched += 1;
            }
        }
        debug!("[QueryCache] invalidated {touched} entries under {tag:?}");
    }

    /// Drop a single entry.
    pub async fn remove(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Discard the entire cache (logout reset).
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        let entries = self.entries.read().await;
        let total_entries = entries.len();
        let stale_entries = entries.values().filter(|e| e.stale).count();
        CacheStats {
            total_entries,
            fresh_entries: total_entries - stale_entries,
            stale_entries,
        }
    }

    async fn fresh_value(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.stale)
            .map(|entry| entry.value.clone())
    }
}

/// Cache bookkeeping counters.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub fresh_entries: usize,
    pub stale_entries: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn counted_fetch(
        counter: &AtomicUsize,
        value: i32,
    ) -> Result<i32, ApiError> {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let first: i32 = cache
            .get_or_fetch("k", &[Tag::User], counted_fetch(&calls, 1))
            .await
            .expect("first fetch");
        let second: i32 = cache
            .get_or_fetch("k", &[Tag::User], counted_fetch(&calls, 2))
            .await
            .expect("second fetch");

        assert_eq!(first, 1);
        assert_eq!(second, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidation_forces_refetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let _: i32 = cache
            .get_or_fetch("k", &[Tag::Profile], counted_fetch(&calls, 1))
            .await
            .expect("first fetch");
        cache.invalidate(Tag::Profile).await;
        let after: i32 = cache
            .get_or_fetch("k", &[Tag::Profile], counted_fetch(&calls, 2))
            .await
            .expect("refetch");

        assert_eq!(after, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidation_only_touches_matching_tag() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let _: i32 = cache
            .get_or_fetch("user", &[Tag::User], counted_fetch(&calls, 1))
            .await
            .expect("user fetch");
        let _: i32 = cache
            .get_or_fetch("profile", &[Tag::Profile], counted_fetch(&calls, 2))
            .await
            .expect("profile fetch");
        cache.invalidate(Tag::Profile).await;

        let user: i32 = cache
            .get_or_fetch("user", &[Tag::User], counted_fetch(&calls, 3))
            .await
            .expect("user read");
        assert_eq!(user, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.stale_entries, 1);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let failed: Result<i32, ApiError> = cache
            .get_or_fetch("k", &[Tag::User], async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Decode("bad".to_string()))
            })
            .await;
        assert!(failed.is_err());

        let ok: i32 = cache
            .get_or_fetch("k", &[Tag::User], counted_fetch(&calls, 9))
            .await
            .expect("retry");
        assert_eq!(ok, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn clear_discards_everything() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let _: i32 = cache
            .get_or_fetch("k", &[Tag::Auth], counted_fetch(&calls, 1))
            .await
            .expect("fetch");
        cache.clear().await;

        assert_eq!(cache.stats().await.total_entries, 0);
        let refetched: i32 = cache
            .get_or_fetch("k", &[Tag::Auth], counted_fetch(&calls, 5))
            .await
            .expect("refetch");
        assert_eq!(refetched, 5);
    }

    #[tokio::test]
    async fn refetch_bypasses_a_fresh_entry() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        let _: i32 = cache
            .get_or_fetch("k", &[Tag::User], counted_fetch(&calls, 1))
            .await
            .expect("fetch");
        let forced: i32 = cache
            .refetch("k", &[Tag::User], counted_fetch(&calls, 2))
            .await
            .expect("forced refetch");

        assert_eq!(forced, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

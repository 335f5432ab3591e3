//! In-memory caching for list snapshots.
//!
//! List views cache-then-revalidate. Entries carry the instant their fetch
//! started so a slow stale response can never overwrite a snapshot from a
//! fetch that started later - overwrites must be monotonic in fetch time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;

/// An immutable list snapshot with its fetch timestamp.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub items: Arc<Vec<T>>,
    /// When the fetch that produced this snapshot started.
    pub fetched_at: Instant,
}

impl<T> Snapshot<T> {
    /// Wrap freshly fetched items, stamped with the fetch start time.
    #[must_use]
    pub fn new(items: Vec<T>, fetched_at: Instant) -> Self {
        Self {
            items: Arc::new(items),
            fetched_at,
        }
    }
}

/// TTL-bounded cache of list snapshots keyed by query string.
pub struct ListCache<T> {
    cache: Cache<String, Snapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> ListCache<T> {
    /// Create a cache with the given time to live.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder().max_capacity(64).time_to_live(ttl).build(),
        }
    }

    /// Look up a cached snapshot.
    pub async fn get(&self, key: &str) -> Option<Snapshot<T>> {
        self.cache.get(key).await
    }

    /// Store a snapshot unless a fresher one is already present.
    pub async fn insert_if_newer(&self, key: &str, snapshot: Snapshot<T>) {
        self.cache
            .entry(key.to_owned())
            .and_upsert_with(|existing| {
                let incoming = snapshot.clone();
                async move {
                    match existing {
                        Some(entry) => {
                            let current = entry.into_value();
                            // A fetch that started later already landed.
                            if current.fetched_at > incoming.fetched_at {
                                current
                            } else {
                                incoming
                            }
                        }
                        None => incoming,
                    }
                }
            })
            .await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache: ListCache<u32> = ListCache::new(Duration::from_secs(60));
        cache
            .insert_if_newer("k", Snapshot::new(vec![1, 2], Instant::now()))
            .await;
        let got = cache.get("k").await.unwrap();
        assert_eq!(*got.items, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_stale_fetch_does_not_overwrite_newer() {
        let cache: ListCache<u32> = ListCache::new(Duration::from_secs(60));

        let early = Instant::now();
        let late = early + Duration::from_millis(50);

        // The fetch that started later completes first...
        cache.insert_if_newer("k", Snapshot::new(vec![9], late)).await;
        // ...then the earlier, staler fetch finally lands.
        cache.insert_if_newer("k", Snapshot::new(vec![1], early)).await;

        let got = cache.get("k").await.unwrap();
        assert_eq!(*got.items, vec![9], "stale snapshot must not win");
    }

    #[tokio::test]
    async fn test_newer_fetch_overwrites() {
        let cache: ListCache<u32> = ListCache::new(Duration::from_secs(60));

        let early = Instant::now();
        let late = early + Duration::from_millis(50);

        cache.insert_if_newer("k", Snapshot::new(vec![1], early)).await;
        cache.insert_if_newer("k", Snapshot::new(vec![9], late)).await;

        let got = cache.get("k").await.unwrap();
        assert_eq!(*got.items, vec![9]);
    }
}

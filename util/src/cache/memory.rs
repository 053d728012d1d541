use super::{AggregateCache, CacheError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: impl Into<String>, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };
        Self {
            value: value.into(),
            expires_at,
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process cache backed by a sharded concurrent map.
///
/// Expired keys are dropped lazily on access.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn live_value(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        }
        None
    }
}

#[async_trait]
impl AggregateCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.live_value(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries.insert(key.to_owned(), Entry::new(value, ttl));
        Ok(())
    }

    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, CacheError> {
        let now = Instant::now();
        // The entry guard holds the shard lock, so read-modify-write is atomic per key.
        let mut entry = self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::new("0", Duration::ZERO));
        if entry.is_expired(now) {
            *entry = Entry::new("0", Duration::ZERO);
        }

        let current: i64 = entry
            .value
            .parse()
            .map_err(|_| CacheError::NotAnInteger(key.to_owned()))?;
        let next = current + delta;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);
        Ok(())
    }

    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError> {
        Ok(keys.iter().map(|key| self.live_value(key)).collect())
    }

    async fn flush_all(&self) -> Result<(), CacheError> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn get_returns_none_for_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn incr_by_creates_key_at_delta() {
        let cache = MemoryCache::new();
        assert_eq!(cache.incr_by("counter", 5).await.unwrap(), 5);
        assert_eq!(cache.incr_by("counter", 3).await.unwrap(), 8);
        assert_eq!(cache.get("counter").await.unwrap().as_deref(), Some("8"));
    }

    #[tokio::test]
    async fn incr_by_rejects_non_integer_values() {
        let cache = MemoryCache::new();
        cache.set("status", "closed", Duration::ZERO).await.unwrap();
        let err = cache.incr_by("status", 1).await.unwrap_err();
        assert!(matches!(err, CacheError::NotAnInteger(key) if key == "status"));
    }

    #[tokio::test]
    async fn expired_keys_are_absent() {
        let cache = MemoryCache::new();
        cache
            .set("short", "1", Duration::from_millis(10))
            .await
            .unwrap();
        cache.set("long", "2", Duration::ZERO).await.unwrap();
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert_eq!(cache.get("long").await.unwrap().as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn multi_get_preserves_input_order() {
        let cache = MemoryCache::new();
        cache.set("a", "1", Duration::ZERO).await.unwrap();
        cache.set("c", "3", Duration::ZERO).await.unwrap();

        let keys = vec!["c".to_string(), "b".to_string(), "a".to_string()];
        let values = cache.multi_get(&keys).await.unwrap();
        assert_eq!(
            values,
            vec![Some("3".to_string()), None, Some("1".to_string())]
        );
    }

    #[tokio::test]
    async fn delete_and_flush_remove_keys() {
        let cache = MemoryCache::new();
        cache.set("a", "1", Duration::ZERO).await.unwrap();
        cache.set("b", "2", Duration::ZERO).await.unwrap();

        cache.delete("a").await.unwrap();
        assert_eq!(cache.get("a").await.unwrap(), None);

        cache.flush_all().await.unwrap();
        assert_eq!(cache.get("b").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_increments_are_not_lost() {
        let cache = Arc::new(MemoryCache::new());
        let mut handles = Vec::new();
        for _ in 0..50 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..20 {
                    cache.incr_by("hits", 1).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(cache.get("hits").await.unwrap().as_deref(), Some("1000"));
    }
}

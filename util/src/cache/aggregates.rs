use super::{AggregateCache, CacheError, MemoryCache, RedisCache};
use std::sync::Arc;
use std::time::Duration;

fn submissions_key(class_id: &str) -> String {
    format!("submissions:{class_id}")
}

fn running_total_key(course_id: &str, user_id: &str) -> String {
    format!("course_total_scores:{course_id}:{user_id}")
}

fn course_status_key(course_id: &str) -> String {
    format!("course_status:{course_id}")
}

fn course_key(course_id: &str) -> String {
    format!("course:{course_id}")
}

fn registration_key(course_id: &str, user_id: &str) -> String {
    format!("registration:{course_id}:{user_id}")
}

fn parse_count(key: &str, raw: Option<String>) -> Result<i64, CacheError> {
    match raw {
        None => Ok(0),
        Some(value) => value
            .parse()
            .map_err(|_| CacheError::NotAnInteger(key.to_owned())),
    }
}

/// Typed view over the aggregate cache.
///
/// Every derived value the services keep (submission counters, running score
/// totals, course status/existence snapshots and registration snapshots) is read
/// and written through here so the key layout lives in one place.
#[derive(Clone)]
pub struct Aggregates {
    backend: Arc<dyn AggregateCache>,
}

impl Aggregates {
    pub fn new(backend: Arc<dyn AggregateCache>) -> Self {
        Self { backend }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCache::new()))
    }

    /// Picks a backend from a cache URL: empty means in-process, anything else
    /// is handed to Redis.
    pub async fn connect(cache_url: &str) -> Result<Self, CacheError> {
        if cache_url.trim().is_empty() {
            tracing::info!("Using in-process aggregate cache");
            return Ok(Self::in_memory());
        }
        let redis = RedisCache::connect(cache_url).await?;
        tracing::info!("Using Redis aggregate cache");
        Ok(Self::new(Arc::new(redis)))
    }

    pub fn backend(&self) -> &Arc<dyn AggregateCache> {
        &self.backend
    }

    pub async fn flush_all(&self) -> Result<(), CacheError> {
        self.backend.flush_all().await
    }

    // --- submission counters ---

    /// Number of submissions recorded for a class; 0 when nothing is cached.
    pub async fn submission_count(&self, class_id: &str) -> Result<i64, CacheError> {
        let key = submissions_key(class_id);
        let raw = self.backend.get(&key).await?;
        parse_count(&key, raw)
    }

    pub async fn submission_counts(&self, class_ids: &[String]) -> Result<Vec<i64>, CacheError> {
        let keys: Vec<String> = class_ids.iter().map(|id| submissions_key(id)).collect();
        let values = self.backend.multi_get(&keys).await?;
        keys.iter()
            .zip(values)
            .map(|(key, raw)| parse_count(key, raw))
            .collect()
    }

    pub async fn incr_submission_count(&self, class_id: &str) -> Result<i64, CacheError> {
        self.backend.incr_by(&submissions_key(class_id), 1).await
    }

    pub async fn set_submission_count(&self, class_id: &str, count: i64) -> Result<(), CacheError> {
        self.backend
            .set(&submissions_key(class_id), &count.to_string(), Duration::ZERO)
            .await
    }

    // --- running totals ---

    pub async fn seed_running_total(&self, course_id: &str, user_id: &str) -> Result<(), CacheError> {
        self.set_running_total(course_id, user_id, 0).await
    }

    pub async fn set_running_total(
        &self,
        course_id: &str,
        user_id: &str,
        total: i64,
    ) -> Result<(), CacheError> {
        self.backend
            .set(&running_total_key(course_id, user_id), &total.to_string(), Duration::ZERO)
            .await
    }

    pub async fn add_to_running_total(
        &self,
        course_id: &str,
        user_id: &str,
        delta: i64,
    ) -> Result<i64, CacheError> {
        self.backend
            .incr_by(&running_total_key(course_id, user_id), delta)
            .await
    }

    /// Running totals for many users of one course, in input order. Missing
    /// totals read as 0.
    pub async fn running_totals(
        &self,
        course_id: &str,
        user_ids: &[String],
    ) -> Result<Vec<i64>, CacheError> {
        let keys: Vec<String> = user_ids
            .iter()
            .map(|user_id| running_total_key(course_id, user_id))
            .collect();
        let values = self.backend.multi_get(&keys).await?;
        keys.iter()
            .zip(values)
            .map(|(key, raw)| parse_count(key, raw))
            .collect()
    }

    // --- snapshots ---

    pub async fn course_status(&self, course_id: &str) -> Result<Option<String>, CacheError> {
        self.backend.get(&course_status_key(course_id)).await
    }

    pub async fn remember_course_status(&self, course_id: &str, status: &str) -> Result<(), CacheError> {
        self.backend
            .set(&course_status_key(course_id), status, Duration::ZERO)
            .await
    }

    pub async fn forget_course_status(&self, course_id: &str) -> Result<(), CacheError> {
        self.backend.delete(&course_status_key(course_id)).await
    }

    /// Whether the course has been seen to exist. Only positive answers are cached.
    pub async fn course_known(&self, course_id: &str) -> Result<bool, CacheError> {
        Ok(self.backend.get(&course_key(course_id)).await?.is_some())
    }

    pub async fn remember_course(&self, course_id: &str) -> Result<(), CacheError> {
        self.backend.set(&course_key(course_id), "1", Duration::ZERO).await
    }

    /// Whether the user has been seen registered for the course. Registrations are
    /// never removed, so a positive snapshot never goes stale.
    pub async fn registration_known(&self, course_id: &str, user_id: &str) -> Result<bool, CacheError> {
        Ok(self
            .backend
            .get(&registration_key(course_id, user_id))
            .await?
            .is_some())
    }

    pub async fn remember_registration(&self, course_id: &str, user_id: &str) -> Result<(), CacheError> {
        self.backend
            .set(&registration_key(course_id, user_id), "1", Duration::ZERO)
            .await
    }
}

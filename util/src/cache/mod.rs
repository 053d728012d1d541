//! Aggregate cache: a small key-value contract with TTLs and atomic increments.
//!
//! Two backends implement [`AggregateCache`]: [`MemoryCache`] (in-process, the
//! default and the one tests use) and [`RedisCache`]. Handlers never talk to a
//! backend directly; they go through the typed [`Aggregates`] handle stored in
//! `AppState`.

mod aggregates;
mod memory;
mod redis_store;

pub use aggregates::Aggregates;
pub use memory::MemoryCache;
pub use redis_store::RedisCache;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cached value at '{0}' is not an integer")]
    NotAnInteger(String),
}

/// Backend contract shared by every cache implementation.
///
/// Values are stored as strings. A `ttl` of [`Duration::ZERO`] means the key never
/// expires. Absence is reported as `None`, never as a zero value.
#[async_trait]
pub trait AggregateCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Atomically adds `delta` to the integer at `key`, creating it at `delta`
    /// when absent. Returns the new value.
    async fn incr_by(&self, key: &str, delta: i64) -> Result<i64, CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Fetches every key in one round trip. The result is in input order.
    async fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>, CacheError>;

    /// Drops every key this cache owns. Only the rebuild path calls this.
    async fn flush_all(&self) -> Result<(), CacheError>;
}

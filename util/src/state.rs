//! Application state container shared across Axum route handlers and services.
//!
//! Holds the database connection plus the two derived-state caches. It is cheap
//! to clone and is passed into route handlers via Axum's `State<T>` extractor.

use crate::cache::Aggregates;
use crate::gpa_cache::GpaPopulationCache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Central application state shared across the server.
///
/// This includes:
/// - A cloned, thread-safe database connection for use with SeaORM.
/// - The aggregate cache holding submission counters, running totals and snapshots.
/// - The GPA population cache, shared so that concurrent readers coalesce.
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    cache: Aggregates,
    gpa: Arc<GpaPopulationCache>,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `db` - A SeaORM `DatabaseConnection`, typically cloned from the main pool.
    /// * `cache` - The aggregate cache handle (in-process or Redis).
    /// * `gpa` - The GPA population cache.
    pub fn new(db: DatabaseConnection, cache: Aggregates, gpa: GpaPopulationCache) -> Self {
        Self {
            db,
            cache,
            gpa: Arc::new(gpa),
        }
    }

    /// Returns a shared reference to the internal `DatabaseConnection`.
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn cache(&self) -> &Aggregates {
        &self.cache
    }

    pub fn gpa(&self) -> &GpaPopulationCache {
        &self.gpa
    }
}

impl AppState {
    /// Returns a cloned copy of the database connection.
    ///
    /// Useful for async contexts or spawning tasks that require ownership.
    pub fn db_clone(&self) -> DatabaseConnection {
        self.db.clone()
    }
}

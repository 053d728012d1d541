//! Time-windowed cache of the GPA of every student with at least one closed course.

use crate::singleflight::Group;
use sea_orm::DbErr;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::Instant;

const POPULATION_KEY: &str = "gpa_population";

#[derive(Clone)]
struct Snapshot {
    taken_at: Instant,
    gpas: Arc<Vec<f64>>,
}

/// Serves the GPA population list without recomputing it per request.
///
/// A non-empty snapshot younger than the freshness window is returned as is.
/// Otherwise the list is rebuilt by the supplied loader; concurrent callers that
/// find the snapshot stale join the same rebuild. A failed rebuild is reported to
/// every waiter and the previous snapshot is kept.
pub struct GpaPopulationCache {
    ttl: Duration,
    snapshot: Arc<RwLock<Option<Snapshot>>>,
    flight: Group<&'static str, Arc<Vec<f64>>, DbErr>,
    loads: Arc<AtomicU64>,
}

impl GpaPopulationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            snapshot: Arc::new(RwLock::new(None)),
            flight: Group::new(),
            loads: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// How many times a loader has been started since construction.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }

    fn fresh(&self, now: Instant) -> Option<Arc<Vec<f64>>> {
        let guard = self.snapshot.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|snap| !snap.gpas.is_empty() && now.duration_since(snap.taken_at) < self.ttl)
            .map(|snap| snap.gpas.clone())
    }

    pub async fn get_or_refresh<F, Fut>(&self, load: F) -> Result<Arc<Vec<f64>>, Arc<DbErr>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<f64>, DbErr>> + Send + 'static,
    {
        if let Some(gpas) = self.fresh(Instant::now()) {
            return Ok(gpas);
        }

        let snapshot = self.snapshot.clone();
        let loads = self.loads.clone();
        self.flight
            .run(POPULATION_KEY, move || {
                loads.fetch_add(1, Ordering::Relaxed);
                let pending = load();
                async move {
                    let gpas = Arc::new(pending.await?);
                    let mut guard = snapshot.write().unwrap_or_else(PoisonError::into_inner);
                    *guard = Some(Snapshot {
                        taken_at: Instant::now(),
                        gpas: gpas.clone(),
                    });
                    tracing::debug!(population = gpas.len(), "GPA population refreshed");
                    Ok(gpas)
                }
            })
            .await
    }

    /// Drops the snapshot so the next read rebuilds it.
    pub fn clear(&self) {
        let mut guard = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}

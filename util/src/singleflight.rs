//! Request coalescing: concurrent callers asking for the same key share one
//! in-flight computation.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type SharedCall<V, E> = Shared<BoxFuture<'static, Result<V, Arc<E>>>>;

/// Registry of in-flight calls keyed by `K`.
///
/// The first caller for a key installs a shared future; callers arriving while it
/// runs await that same future and receive a clone of its result. The registry
/// lock is never held across an `.await`.
pub struct Group<K, V, E> {
    calls: Mutex<HashMap<K, (u64, SharedCall<V, E>)>>,
    generation: AtomicU64,
}

impl<K, V, E> Default for Group<K, V, E> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
        }
    }
}

impl<K, V, E> Group<K, V, E>
where
    K: Eq + Hash + Clone,
    V: Clone + Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `work` unless a call for `key` is already in flight, in which case
    /// its result is awaited instead. `work` is only invoked by the caller that
    /// starts the flight.
    pub async fn run<F, Fut>(&self, key: K, work: F) -> Result<V, Arc<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let (id, call) = {
            let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
            match calls.get(&key) {
                Some((id, call)) => (*id, call.clone()),
                None => {
                    let id = self.generation.fetch_add(1, Ordering::Relaxed);
                    let call = work().map(|res| res.map_err(Arc::new)).boxed().shared();
                    calls.insert(key.clone(), (id, call.clone()));
                    (id, call)
                }
            }
        };

        let result = call.await;

        // Only retire the flight we joined; a newer one may already be installed.
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        if calls.get(&key).is_some_and(|(current, _)| *current == id) {
            calls.remove(&key);
        }

        result
    }

    /// Number of keys with a call currently in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

//! Read-through accessor with stampede protection.
//!
//! A `get` first consults the cache store. On a miss, concurrent callers
//! asking for the same key are coalesced behind one backing-store fetch:
//! the first caller registers an in-flight token holding a shared future,
//! later callers await that same future.
//!
//! The fetch runs in its own task so that a caller dropping its future
//! does not abort the fetch the other waiters depend on. The token is
//! removed from the map before the task yields its result, so once any
//! waiter has observed an outcome the next miss starts a fresh fetch.

use crate::metrics::CacheMetrics;
use crate::{CacheExt, CacheInterface, TtlPolicy};
use folio_core::{FolioError, FolioResult};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

type FetchOutcome<T> = Result<Option<T>, Arc<FolioError>>;
type SharedFetch<T> = Shared<BoxFuture<'static, FetchOutcome<T>>>;
type KeyFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
type FetchFn<T> = Arc<dyn Fn(String) -> BoxFuture<'static, FolioResult<Option<T>>> + Send + Sync>;
type InFlightMap<T> = Arc<Mutex<HashMap<String, InFlight<T>>>>;

struct InFlight<T: Clone> {
    generation: u64,
    fetch: SharedFetch<T>,
}

/// Removes its in-flight entry on drop, whether the fetch returned,
/// failed or panicked.
struct InFlightToken<T: Clone> {
    in_flight: InFlightMap<T>,
    key: String,
    generation: u64,
}

impl<T: Clone> Drop for InFlightToken<T> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        if in_flight
            .get(&self.key)
            .is_some_and(|entry| entry.generation == self.generation)
        {
            in_flight.remove(&self.key);
        }
    }
}

/// Cache-aside accessor for one logical collection.
///
/// Build one per collection (photo by id, photos by user, ...). Each
/// instance has its own coalescing map, so single-entity and list lookups
/// never share in-flight fetches even when their ids coincide.
pub struct ReadThrough<T: Clone> {
    inner: Arc<Inner<T>>,
}

struct Inner<T: Clone> {
    name: &'static str,
    cache: Arc<dyn CacheInterface>,
    key_fn: KeyFn,
    fetch_fn: FetchFn<T>,
    ttl: TtlPolicy,
    in_flight: InFlightMap<T>,
    generation: AtomicU64,
}

impl<T> ReadThrough<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates an accessor.
    ///
    /// - `name` labels logs and metrics.
    /// - `key_fn` maps an id to its full cache key.
    /// - `fetch` loads an id from the backing store; `Ok(None)` is not-found.
    pub fn new<K, F, Fut>(
        name: &'static str,
        cache: Arc<dyn CacheInterface>,
        key_fn: K,
        fetch: F,
        ttl: TtlPolicy,
    ) -> Self
    where
        K: Fn(&str) -> String + Send + Sync + 'static,
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FolioResult<Option<T>>> + Send + 'static,
    {
        let fetch_fn: FetchFn<T> = Arc::new(move |id| fetch(id).boxed());
        Self {
            inner: Arc::new(Inner {
                name,
                cache,
                key_fn: Arc::new(key_fn),
                fetch_fn,
                ttl,
                in_flight: Arc::new(Mutex::new(HashMap::new())),
                generation: AtomicU64::new(0),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.inner.name
    }

    #[must_use]
    pub fn ttl_policy(&self) -> TtlPolicy {
        self.inner.ttl
    }

    /// Full cache key for `id`.
    #[must_use]
    pub fn key_for(&self, id: &str) -> String {
        (self.inner.key_fn)(id)
    }

    /// Number of keys with a fetch currently in flight.
    #[must_use]
    pub fn in_flight_count(&self) -> usize {
        self.inner.in_flight.lock().len()
    }

    /// Returns the entity for `id`, loading it on a miss.
    ///
    /// `Ok(None)` means the backing store has no such entity; that outcome
    /// is not cached. A backing-store error reaches every coalesced caller
    /// as [`FolioError::Coalesced`] wrapping the same error.
    pub async fn get(&self, id: &str) -> FolioResult<Option<T>> {
        let key = self.key_for(id);
        let name = self.inner.name;

        match self.inner.cache.get::<T>(&key).await {
            Ok(Some(value)) => {
                debug!(accessor = name, key = %key, "Cache hit");
                CacheMetrics::hit(name);
                return Ok(Some(value));
            }
            Ok(None) => debug!(accessor = name, key = %key, "Cache miss"),
            Err(e) => warn!(accessor = name, key = %key, error = %e, "Cache read failed, falling back to store"),
        }
        CacheMetrics::miss(name);

        let (fetch, started) = self.join_or_start(&key, id);
        if !started {
            debug!(accessor = name, key = %key, "Joining in-flight fetch");
            CacheMetrics::coalesced_wait(name);
        }

        fetch.await.map_err(FolioError::Coalesced)
    }

    /// Deletes the cached entry for `id`.
    ///
    /// Returns whether an entry existed. Callers that must not fail on a
    /// cache outage go through [`crate::CacheInvalidator`] instead.
    pub async fn invalidate(&self, id: &str) -> FolioResult<bool> {
        let key = self.key_for(id);
        let existed = self.inner.cache.delete(&key).await?;
        debug!(accessor = self.inner.name, key = %key, existed, "Invalidated");
        Ok(existed)
    }

    fn join_or_start(&self, key: &str, id: &str) -> (SharedFetch<T>, bool) {
        let mut in_flight = self.inner.in_flight.lock();
        if let Some(entry) = in_flight.get(key) {
            return (entry.fetch.clone(), false);
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
        let task = tokio::spawn(Inner::run_fetch(
            Arc::clone(&self.inner),
            key.to_string(),
            id.to_string(),
            generation,
        ));

        let fetch = async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(e) => Err(Arc::new(FolioError::Internal(format!(
                    "Backing-store fetch aborted: {}",
                    e
                )))),
            }
        }
        .boxed()
        .shared();

        in_flight.insert(
            key.to_string(),
            InFlight {
                generation,
                fetch: fetch.clone(),
            },
        );
        (fetch, true)
    }
}

impl<T> Inner<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    async fn run_fetch(self: Arc<Self>, key: String, id: String, generation: u64) -> FetchOutcome<T> {
        let _token = InFlightToken {
            in_flight: Arc::clone(&self.in_flight),
            key: key.clone(),
            generation,
        };

        // A previous miss window may have populated the entry meanwhile.
        match self.cache.get::<T>(&key).await {
            Ok(Some(value)) => {
                debug!(accessor = self.name, key = %key, "Populated by an earlier fetch");
                return Ok(Some(value));
            }
            Ok(None) => {}
            Err(e) => warn!(accessor = self.name, key = %key, error = %e, "Cache re-check failed"),
        }

        CacheMetrics::fetch(self.name);
        let fetched = (self.fetch_fn)(id).await.map_err(|e| {
            warn!(accessor = self.name, key = %key, error = %e, "Backing-store fetch failed");
            Arc::new(e)
        })?;

        match &fetched {
            Some(value) => self.populate(key, value.clone()),
            None => debug!(accessor = self.name, key = %key, "Not found in backing store"),
        }

        Ok(fetched)
    }

    /// Writes `value` in the background with a jittered TTL.
    fn populate(&self, key: String, value: T) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.ttl.effective_ttl();
        let name = self.name;

        tokio::spawn(async move {
            match cache.set(&key, &value, ttl).await {
                Ok(()) => debug!(accessor = name, key = %key, ttl_ms = ttl.as_millis() as u64, "Cache populated"),
                Err(e) => {
                    warn!(accessor = name, key = %key, error = %e, "Cache population failed");
                    CacheMetrics::population_failed(name);
                }
            }
        });
    }
}

impl<T: Clone> Clone for ReadThrough<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> std::fmt::Debug for ReadThrough<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadThrough")
            .field("name", &self.inner.name)
            .field("ttl", &self.inner.ttl)
            .field("in_flight", &self.inner.in_flight.lock().len())
            .finish_non_exhaustive()
    }
}

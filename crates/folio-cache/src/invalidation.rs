//! Post-write cache invalidation.

use crate::metrics::CacheMetrics;
use crate::CacheInterface;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-call summary of an invalidation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvalidationOutcome {
    /// Keys that held an entry and were deleted.
    pub deleted: usize,
    /// Keys that had no entry.
    pub absent: usize,
    /// Keys whose deletion failed.
    pub failed: usize,
}

impl InvalidationOutcome {
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Deletes stale entries after a durable write.
///
/// Must only be called once the write has succeeded. Failures are logged
/// and counted but never surfaced: the write already happened, and the
/// stale entry still expires on its own TTL.
#[derive(Clone)]
pub struct CacheInvalidator {
    cache: Arc<dyn CacheInterface>,
}

impl CacheInvalidator {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }

    /// Deletes every key in `keys` concurrently.
    pub async fn invalidate<S: AsRef<str>>(&self, keys: &[S]) -> InvalidationOutcome {
        let results = join_all(keys.iter().map(|key| self.cache.delete(key.as_ref()))).await;

        let mut outcome = InvalidationOutcome::default();
        for (key, result) in keys.iter().zip(results) {
            let key = key.as_ref();
            match result {
                Ok(true) => {
                    debug!(key, "Invalidated cache entry");
                    CacheMetrics::invalidated();
                    outcome.deleted += 1;
                }
                Ok(false) => outcome.absent += 1,
                Err(e) => {
                    warn!(key, error = %e, "Cache invalidation failed");
                    CacheMetrics::invalidation_failed();
                    outcome.failed += 1;
                }
            }
        }
        outcome
    }
}

impl std::fmt::Debug for CacheInvalidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheInvalidator").finish_non_exhaustive()
    }
}

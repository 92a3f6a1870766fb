//! In-process cache with per-key expiry.
//!
//! Same contract as the Redis implementation. Used when Redis is disabled
//! and throughout the test suites.

use crate::CacheInterface;
use async_trait::async_trait;
use folio_core::FolioResult;
use parking_lot::Mutex;
use shaku::Component;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Process-local cache store.
#[derive(Component, Default)]
#[shaku(interface = CacheInterface)]
pub struct InMemoryCache {
    #[shaku(force_default)]
    entries: Mutex<HashMap<String, Entry>>,
}

/// Stored value with its absolute expiry.
#[derive(Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl InMemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remaining lifetime of a live entry.
    #[must_use]
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .and_then(|e| e.expires_at.checked_duration_since(Instant::now()))
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> FolioResult<Option<String>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> FolioResult<()> {
        let entry = Entry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> FolioResult<bool> {
        let removed = self.entries.lock().remove(key);
        Ok(removed.is_some_and(|e| e.expires_at > Instant::now()))
    }

    async fn exists(&self, key: &str) -> FolioResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for InMemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCache")
            .field("entries", &self.len())
            .finish()
    }
}

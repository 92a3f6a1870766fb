//! Cache interface trait for abstracted caching operations.

use async_trait::async_trait;
use folio_core::{FolioResult, Interface};
use std::time::Duration;
use tracing::warn;

/// Shared key-value store with per-key expiry.
///
/// Values are JSON strings so the trait stays dyn-compatible; typed access
/// goes through [`CacheExt`].
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value from the cache.
    ///
    /// Returns `None` if the key doesn't exist or has expired.
    async fn get_raw(&self, key: &str) -> FolioResult<Option<String>>;

    /// Set a raw JSON value in the cache with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> FolioResult<()>;

    /// Delete a value from the cache.
    ///
    /// Returns `true` if the key existed and was deleted.
    async fn delete(&self, key: &str) -> FolioResult<bool>;

    /// Check if a key exists in the cache.
    async fn exists(&self, key: &str) -> FolioResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed access on top of [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    ///
    /// An entry that no longer decodes as `T` (for example after a schema
    /// change) is reported as a miss.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> FolioResult<Option<T>> {
        let Some(json) = self.get_raw(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&json) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "Undecodable cache entry, treating as miss");
                Ok(None)
            }
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> FolioResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}

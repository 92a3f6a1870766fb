//! Revocation ledger.
//!
//! Records identifiers (token `jti`s) that must be treated as invalid
//! until a stored expiry. Expired records are dropped on lookup and swept
//! every [`PURGE_EVERY`] revocations.

use crate::metrics::CacheMetrics;
use crate::{CacheInterface, KeySpace};
use async_trait::async_trait;
use folio_core::Interface;
use parking_lot::Mutex;
use shaku::Component;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Bounded-lifetime set of revoked identifiers.
#[async_trait]
pub trait RevocationLedger: Interface + Send + Sync {
    /// Marks `id` revoked for `ttl`. Revoking again replaces the expiry.
    async fn revoke(&self, id: &str, ttl: Duration);

    /// Whether `id` has an unexpired revocation record.
    async fn is_revoked(&self, id: &str) -> bool;
}

/// Revocations recorded between two sweeps of expired records.
pub const PURGE_EVERY: usize = 64;

/// Process-local ledger.
#[derive(Component, Default)]
#[shaku(interface = RevocationLedger)]
pub struct InMemoryRevocationLedger {
    #[shaku(default)]
    records: Mutex<HashMap<String, Instant>>,
    #[shaku(force_default)]
    writes: AtomicUsize,
}

impl InMemoryRevocationLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, expired ones included until looked up.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every expired record; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        sweep(&mut self.records.lock(), Instant::now())
    }

    fn record(&self, id: &str, ttl: Duration) {
        let now = Instant::now();
        let mut records = self.records.lock();
        if self.writes.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            let removed = sweep(&mut records, now);
            debug!(removed, "Swept expired revocation records");
        }
        records.insert(id.to_string(), now + ttl);
    }

    fn check(&self, id: &str) -> bool {
        let mut records = self.records.lock();
        match records.get(id) {
            Some(expires_at) if *expires_at > Instant::now() => true,
            Some(_) => {
                records.remove(id);
                debug!(id, "Dropped expired revocation record");
                false
            }
            None => false,
        }
    }
}

fn sweep(records: &mut HashMap<String, Instant>, now: Instant) -> usize {
    let before = records.len();
    records.retain(|_, expires_at| *expires_at > now);
    before - records.len()
}

#[async_trait]
impl RevocationLedger for InMemoryRevocationLedger {
    async fn revoke(&self, id: &str, ttl: Duration) {
        self.record(id, ttl);
        CacheMetrics::revoked("memory");
    }

    async fn is_revoked(&self, id: &str) -> bool {
        let revoked = self.check(id);
        CacheMetrics::revocation_checked("memory", revoked);
        revoked
    }
}

impl std::fmt::Debug for InMemoryRevocationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRevocationLedger")
            .field("records", &self.len())
            .finish()
    }
}

/// Ledger stored in the shared cache so every replica sees a revocation.
///
/// Each record is the key `<prefix>:revoked:<id>` with the revocation TTL
/// as its expiry. Records are mirrored locally; when the cache store is
/// unreachable, lookups answer from the mirror.
#[derive(Component)]
#[shaku(interface = RevocationLedger)]
pub struct SharedRevocationLedger {
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    keys: KeySpace,
    local: InMemoryRevocationLedger,
}

impl SharedRevocationLedger {
    #[must_use]
    pub fn new(cache: Arc<dyn CacheInterface>, keys: KeySpace) -> Self {
        Self {
            cache,
            keys,
            local: InMemoryRevocationLedger::new(),
        }
    }
}

#[async_trait]
impl RevocationLedger for SharedRevocationLedger {
    async fn revoke(&self, id: &str, ttl: Duration) {
        self.local.record(id, ttl);
        CacheMetrics::revoked("shared");
        if ttl.is_zero() {
            return;
        }

        let key = self.keys.revoked(id);
        if let Err(e) = self.cache.set_raw(&key, "1", ttl).await {
            warn!(id, error = %e, "Shared revocation write failed, revoked on this replica only");
        }
    }

    async fn is_revoked(&self, id: &str) -> bool {
        let key = self.keys.revoked(id);
        let revoked = match self.cache.exists(&key).await {
            Ok(true) => true,
            Ok(false) => self.local.check(id),
            Err(e) => {
                warn!(id, error = %e, "Shared revocation lookup failed, using local records");
                self.local.check(id)
            }
        };
        CacheMetrics::revocation_checked("shared", revoked);
        revoked
    }
}

impl std::fmt::Debug for SharedRevocationLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRevocationLedger")
            .field("prefix", &self.keys.prefix())
            .field("local", &self.local)
            .finish()
    }
}

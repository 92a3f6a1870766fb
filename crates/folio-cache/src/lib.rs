//! # Folio Cache
//!
//! Caching layer shared by the Folio services:
//!
//! - [`ReadThrough`]: cache-aside accessor that coalesces concurrent misses
//!   on the same key into a single backing-store fetch.
//! - [`TtlPolicy`]: base TTL plus bounded random jitter.
//! - [`CacheInvalidator`]: post-write deletion of stale entries.
//! - [`RevocationLedger`]: bounded-lifetime set of revoked identifiers.
//!
//! Storage goes through [`CacheInterface`], implemented by
//! [`RedisCacheService`] and [`InMemoryCache`].

mod cache_interface;
pub mod cache_keys;
mod invalidation;
mod memory_cache;
pub mod metrics;
mod read_through;
mod redis_cache;
mod revocation;
mod ttl;

pub use cache_interface::{CacheExt, CacheInterface};
pub use cache_keys::KeySpace;
pub use invalidation::{CacheInvalidator, InvalidationOutcome};
pub use memory_cache::{InMemoryCache, InMemoryCacheParameters};
pub use read_through::ReadThrough;
pub use redis_cache::{create_redis_pool, RedisCacheService, RedisCacheServiceParameters};
pub use revocation::{
    InMemoryRevocationLedger, InMemoryRevocationLedgerParameters, RevocationLedger,
    SharedRevocationLedger, SharedRevocationLedgerParameters, PURGE_EVERY,
};
pub use ttl::{effective_ttl, TtlPolicy, DEFAULT_JITTER_RATIO};

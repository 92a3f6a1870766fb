//! Cache and revocation counters.
//!
//! Recorded through the `metrics` facade; whichever recorder the host
//! process installs receives them.

use metrics::{counter, describe_counter};

/// Metric names.
pub mod names {
    /// Reads answered from the cache store.
    pub const CACHE_HITS_TOTAL: &str = "folio_cache_hits_total";
    /// Reads that missed (including cache errors and undecodable entries).
    pub const CACHE_MISSES_TOTAL: &str = "folio_cache_misses_total";
    /// Callers that joined an in-flight fetch instead of starting one.
    pub const CACHE_COALESCED_WAITS_TOTAL: &str = "folio_cache_coalesced_waits_total";
    /// Backing-store fetches issued by the accessor.
    pub const CACHE_FETCHES_TOTAL: &str = "folio_cache_fetches_total";
    /// Background writes that failed.
    pub const CACHE_POPULATION_FAILURES_TOTAL: &str = "folio_cache_population_failures_total";
    /// Keys deleted after a write.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "folio_cache_invalidations_total";
    /// Post-write deletions that failed.
    pub const CACHE_INVALIDATION_FAILURES_TOTAL: &str = "folio_cache_invalidation_failures_total";

    /// Identifiers revoked.
    pub const REVOCATIONS_TOTAL: &str = "folio_revocations_total";
    /// Revocation lookups, labelled by outcome.
    pub const REVOCATION_CHECKS_TOTAL: &str = "folio_revocation_checks_total";
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Total number of cache hits");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Total number of cache misses");
    describe_counter!(
        names::CACHE_COALESCED_WAITS_TOTAL,
        "Total number of reads that waited on an in-flight fetch"
    );
    describe_counter!(
        names::CACHE_FETCHES_TOTAL,
        "Total number of backing-store fetches after a miss"
    );
    describe_counter!(
        names::CACHE_POPULATION_FAILURES_TOTAL,
        "Total number of failed background cache writes"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Total number of cache keys invalidated after writes"
    );
    describe_counter!(
        names::CACHE_INVALIDATION_FAILURES_TOTAL,
        "Total number of failed cache invalidations"
    );
    describe_counter!(names::REVOCATIONS_TOTAL, "Total number of revoked identifiers");
    describe_counter!(
        names::REVOCATION_CHECKS_TOTAL,
        "Total number of revocation lookups"
    );
}

/// Cache metrics recorder.
#[derive(Clone)]
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn hit(accessor: &'static str) {
        counter!(names::CACHE_HITS_TOTAL, "accessor" => accessor).increment(1);
    }

    pub fn miss(accessor: &'static str) {
        counter!(names::CACHE_MISSES_TOTAL, "accessor" => accessor).increment(1);
    }

    pub fn coalesced_wait(accessor: &'static str) {
        counter!(names::CACHE_COALESCED_WAITS_TOTAL, "accessor" => accessor).increment(1);
    }

    pub fn fetch(accessor: &'static str) {
        counter!(names::CACHE_FETCHES_TOTAL, "accessor" => accessor).increment(1);
    }

    pub fn population_failed(accessor: &'static str) {
        counter!(names::CACHE_POPULATION_FAILURES_TOTAL, "accessor" => accessor).increment(1);
    }

    pub fn invalidated() {
        counter!(names::CACHE_INVALIDATIONS_TOTAL).increment(1);
    }

    pub fn invalidation_failed() {
        counter!(names::CACHE_INVALIDATION_FAILURES_TOTAL).increment(1);
    }

    /// `ledger` is `memory` or `shared`.
    pub fn revoked(ledger: &'static str) {
        counter!(names::REVOCATIONS_TOTAL, "ledger" => ledger).increment(1);
    }

    pub fn revocation_checked(ledger: &'static str, revoked: bool) {
        let result = if revoked { "revoked" } else { "valid" };
        counter!(
            names::REVOCATION_CHECKS_TOTAL,
            "ledger" => ledger,
            "result" => result
        )
        .increment(1);
    }
}

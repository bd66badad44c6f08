//! Cache Metrics System
//!
//! Provides a metrics system for both cache structures using BTreeMap-based
//! metrics reporting. Each structure tracks its own specific counters while
//! implementing a common [`CacheMetrics`] trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! BTreeMap is used instead of HashMap for several reasons:
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for testing and benchmark comparisons
//! - **Better debugging**: Consistent output makes logs more readable
//!
//! The performance difference (O(log n) vs O(1)) is negligible with ~10
//! metric keys, but the deterministic behavior matters when comparing runs.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Common counters tracked by both cache structures.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    /// Total number of lookups made against the structure
    pub requests: u64,

    /// Number of lookups that found a live entry
    pub cache_hits: u64,

    /// Number of entries stored (new keys only, not in-place replacements)
    pub insertions: u64,

    /// Number of entries removed to make room for a new one
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a new `CoreCacheMetrics` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a hit: a lookup that found a live entry.
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a miss: a lookup that found nothing.
    ///
    /// Misses are derivable as `requests - cache_hits`; only the request
    /// counter advances here.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records the insertion of a new entry.
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records the eviction of an entry to make room for another.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Number of lookups that found nothing.
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Hit rate in `[0.0, 1.0]`, or `0.0` before the first request.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Miss rate in `[0.0, 1.0]`, or `0.0` before the first request.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Evictions per request in `[0.0, 1.0]`, or `0.0` before the first
    /// request.
    pub fn eviction_rate(&self) -> f64 {
        if self.requests > 0 {
            self.evictions as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Converts the core counters and derived rates to a BTreeMap.
    ///
    /// Uses BTreeMap to ensure deterministic, consistent ordering of metrics,
    /// which keeps test assertions and benchmark comparisons reproducible.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("eviction_rate".to_string(), self.eviction_rate());
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        metrics
    }
}

/// Trait implemented by every structure that reports metrics.
///
/// Uses BTreeMap to ensure deterministic ordering of metrics, which is
/// essential for reproducible benchmarks and consistent test results.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// A static string identifying the structure (e.g., "Interval-LRU").
    fn algorithm_name(&self) -> &'static str;
}

/// Metrics for [`IntervalLruCache`](crate::IntervalLruCache): core counters
/// plus invalidation tracking.
#[derive(Debug, Default, Clone)]
pub struct IntervalLruCacheMetrics {
    /// Core counters common to both structures
    pub core: CoreCacheMetrics,

    /// Number of `invalidate` calls made against the cache
    pub invalidations: u64,

    /// Total entries actually dropped across all `invalidate` calls.
    /// Stale index references that pointed at already-evicted entries
    /// do not count; only live entries removed do.
    pub entries_invalidated: u64,
}

impl IntervalLruCacheMetrics {
    /// Creates a new `IntervalLruCacheMetrics` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one `invalidate` call that dropped `dropped` live entries.
    pub fn record_invalidation(&mut self, dropped: u64) {
        self.invalidations += 1;
        self.entries_invalidated += dropped;
    }

    /// Converts all interval-LRU metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert(
            "entries_invalidated".to_string(),
            self.entries_invalidated as f64,
        );
        metrics.insert("invalidations".to_string(), self.invalidations as f64);
        metrics
    }
}

impl CacheMetrics for IntervalLruCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "Interval-LRU"
    }
}

/// Metrics for [`SplayMemoTable`](crate::SplayMemoTable): core counters plus
/// restructuring activity.
#[derive(Debug, Default, Clone)]
pub struct SplayMemoMetrics {
    /// Core counters common to both structures
    pub core: CoreCacheMetrics,

    /// Number of single rotations performed while splaying
    pub rotations: u64,

    /// Number of splay operations (each moves one node to the root)
    pub splays: u64,
}

impl SplayMemoMetrics {
    /// Creates a new `SplayMemoMetrics` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one rotation.
    pub fn record_rotation(&mut self) {
        self.rotations += 1;
    }

    /// Records one completed splay-to-root.
    pub fn record_splay(&mut self) {
        self.splays += 1;
    }

    /// Converts all splay-memo metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("rotations".to_string(), self.rotations as f64);
        metrics.insert("splays".to_string(), self.splays as f64);
        metrics
    }
}

impl CacheMetrics for SplayMemoMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "Splay-Memo"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_counters_and_rates() {
        let mut core = CoreCacheMetrics::new();
        core.record_miss();
        core.record_insertion();
        core.record_hit();
        core.record_hit();
        core.record_miss();
        core.record_insertion();
        core.record_eviction();

        assert_eq!(core.requests, 4);
        assert_eq!(core.cache_hits, 2);
        assert_eq!(core.cache_misses(), 2);
        assert_eq!(core.insertions, 2);
        assert_eq!(core.evictions, 1);
        assert!((core.hit_rate() - 0.5).abs() < f64::EPSILON);
        assert!((core.miss_rate() - 0.5).abs() < f64::EPSILON);
        assert!((core.eviction_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rates_are_zero_before_first_request() {
        let core = CoreCacheMetrics::new();
        assert_eq!(core.hit_rate(), 0.0);
        assert_eq!(core.miss_rate(), 0.0);
        assert_eq!(core.eviction_rate(), 0.0);
    }

    #[test]
    fn test_btreemap_keys_are_sorted() {
        let metrics = IntervalLruCacheMetrics::new().to_btreemap();
        let keys: alloc::vec::Vec<&String> = metrics.keys().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_invalidation_tracking() {
        let mut metrics = IntervalLruCacheMetrics::new();
        metrics.record_invalidation(3);
        metrics.record_invalidation(0);
        assert_eq!(metrics.invalidations, 2);
        assert_eq!(metrics.entries_invalidated, 3);

        let map = metrics.to_btreemap();
        assert_eq!(map["invalidations"], 2.0);
        assert_eq!(map["entries_invalidated"], 3.0);
    }

    #[test]
    fn test_splay_metrics_report_restructuring() {
        let mut metrics = SplayMemoMetrics::new();
        metrics.record_splay();
        metrics.record_rotation();
        metrics.record_rotation();
        assert_eq!(metrics.splays, 1);
        assert_eq!(metrics.rotations, 2);
        assert_eq!(metrics.algorithm_name(), "Splay-Memo");

        let map = metrics.metrics();
        assert_eq!(map["rotations"], 2.0);
        assert_eq!(map["splays"], 1.0);
    }
}

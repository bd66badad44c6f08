//! Interval-Indexed LRU Cache Implementation
//!
//! This module provides an LRU cache whose keys are closed intervals
//! `[start, end]` over positions of a caller-owned array, extended with an
//! inverted index from array position to the set of cached ranges covering
//! it. The index is what makes invalidation exact: mutating one position
//! drops precisely the cached ranges that cover it and nothing else.
//!
//! # Algorithm
//!
//! Recency is tracked the classic way: a hash map from key to a node in a
//! doubly linked list ordered most to least recently used. On top of that,
//! every `put` of a new range registers its key at each covered position of
//! the inverted index, and every eviction unregisters its span. An
//! `invalidate(position)` call drains that position's covering set and
//! removes each still-live entry from the cache.
//!
//! Invalidation deliberately leaves the dropped keys registered at the
//! *other* positions they covered. A later invalidation touching one of
//! those positions finds keys that are no longer in the map and skips them.
//! This stale-tolerant design trades a per-position cleanup pass for lazy
//! no-op removal.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Put (existing key): O(1)
//!   - Put (new key): O(w) where w is the range width
//!   - Invalidate: O(k) where k is the number of keys registered at the
//!     position, live or stale
//!   - Eviction: O(w) for the victim's width
//!
//! - **Space Complexity**:
//!   - O(n · w̄) where n is the capacity and w̄ the mean range width, since
//!     the inverted index keeps one membership per covered position
//!
//! The O(w) work on insert, evict, and invalidate is the cost of exact
//! invalidation at mutation time.
//!
//! # When to Use
//!
//! This cache fits workloads that repeatedly query aggregate results over
//! array ranges and occasionally mutate single positions. It is a poor fit
//! when mutations dominate queries, or when ranges are so wide that index
//! bookkeeping swamps the cached computation.
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap the
//! cache with a synchronization primitive such as `Mutex` or `RwLock`.

extern crate alloc;

#[cfg(not(feature = "hashbrown"))]
extern crate std;

use crate::config::IntervalLruCacheConfig;
use crate::error::Error;
use crate::metrics::{CacheMetrics, IntervalLruCacheMetrics};
use crate::recency::{Node, RecencyList};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;
use core::hash::BuildHasher;
use core::num::NonZeroUsize;
use core::ops::RangeInclusive;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::{HashMap, HashSet};

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::{HashMap, HashSet};

/// A closed interval `[start, end]` of array positions, used as a cache key.
///
/// Construction validates `start <= end`; a `RangeKey` that exists is always
/// a well-formed interval. Both bounds are inclusive.
///
/// # Examples
///
/// ```
/// use rangecache_rs::RangeKey;
///
/// let key = RangeKey::new(2, 5).unwrap();
/// assert_eq!(key.width(), 4);
/// assert!(key.covers(3));
/// assert!(!key.covers(6));
///
/// assert!(RangeKey::new(5, 2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RangeKey {
    start: usize,
    end: usize,
}

impl RangeKey {
    /// Creates a key for the closed interval `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `start > end`.
    pub fn new(start: usize, end: usize) -> Result<Self, Error> {
        if start > end {
            return Err(Error::InvalidRange { start, end });
        }
        Ok(RangeKey { start, end })
    }

    /// Inclusive lower bound of the interval.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Inclusive upper bound of the interval.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Number of positions the interval covers. At least 1.
    #[inline]
    pub fn width(&self) -> usize {
        self.end - self.start + 1
    }

    /// Returns true if `position` lies inside the interval.
    #[inline]
    pub fn covers(&self, position: usize) -> bool {
        self.start <= position && position <= self.end
    }

    /// Iterates over every covered position.
    #[inline]
    fn positions(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// An LRU cache keyed by array ranges, with an inverted index for exact
/// position-scoped invalidation.
///
/// # Safety
///
/// The `map` field holds raw pointers into nodes owned by `order`. A pointer
/// stays valid from the `push_front` that created it until the entry leaves
/// the cache through eviction, invalidation, or `clear`; the map entry is
/// removed in the same operation, so the map never holds a dangling pointer.
///
/// # Examples
///
/// ```
/// use rangecache_rs::{IntervalLruCache, RangeKey};
/// use core::num::NonZeroUsize;
///
/// let mut cache = IntervalLruCache::new(NonZeroUsize::new(2).unwrap());
/// let key = RangeKey::new(0, 4).unwrap();
///
/// cache.put(key, 15i64);
/// assert_eq!(cache.get(&key), Some(&15));
///
/// // Mutating position 2 drops every cached range covering it.
/// assert_eq!(cache.invalidate(2), 1);
/// assert_eq!(cache.get(&key), None);
/// ```
pub struct IntervalLruCache<V, S = DefaultHashBuilder> {
    config: IntervalLruCacheConfig,
    order: RecencyList<(RangeKey, V)>,
    map: HashMap<RangeKey, *mut Node<(RangeKey, V)>, S>,
    index: HashMap<usize, HashSet<RangeKey>, S>,
    metrics: IntervalLruCacheMetrics,
}

// SAFETY: the cache owns all data; the raw pointers in `map` point only at
// nodes owned by `order`, which is owned by the same struct.
unsafe impl<V: Send, S: Send> Send for IntervalLruCache<V, S> {}

// SAFETY: all mutation requires &mut self; shared references cannot cause
// data races.
unsafe impl<V: Send, S: Sync> Sync for IntervalLruCache<V, S> {}

impl<V> IntervalLruCache<V> {
    /// Creates a new cache with the given capacity and the default hasher.
    pub fn new(cap: NonZeroUsize) -> IntervalLruCache<V, DefaultHashBuilder> {
        IntervalLruCache::with_hasher(cap, DefaultHashBuilder::default())
    }
}

impl<V, S: BuildHasher + Clone> IntervalLruCache<V, S> {
    /// Creates a new cache with the given capacity and hash builder.
    ///
    /// The hash builder is cloned for the inverted index, which is a second
    /// hash map keyed by position.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        let map_capacity = cap.get().next_power_of_two();
        IntervalLruCache {
            config: IntervalLruCacheConfig { capacity: cap },
            order: RecencyList::new(cap),
            map: HashMap::with_capacity_and_hasher(map_capacity, hash_builder.clone()),
            index: HashMap::with_hasher(hash_builder),
            metrics: IntervalLruCacheMetrics::new(),
        }
    }
}

impl<V, S: BuildHasher + Clone + Default> IntervalLruCache<V, S> {
    /// Creates a new cache from a configuration struct.
    ///
    /// Pass `None` to use the default hasher.
    ///
    /// # Examples
    ///
    /// ```
    /// use rangecache_rs::config::IntervalLruCacheConfig;
    /// use rangecache_rs::IntervalLruCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let config = IntervalLruCacheConfig {
    ///     capacity: NonZeroUsize::new(64).unwrap(),
    /// };
    /// let cache: IntervalLruCache<i64> = IntervalLruCache::init(config, None);
    /// ```
    pub fn init(config: IntervalLruCacheConfig, hasher: Option<S>) -> Self {
        Self::with_hasher(config.capacity, hasher.unwrap_or_default())
    }
}

impl<V, S: BuildHasher> IntervalLruCache<V, S> {
    /// Returns the maximum number of entries the cache can hold.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Returns the current number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns true if `key` has a live entry, without touching recency.
    #[inline]
    pub fn contains(&self, key: &RangeKey) -> bool {
        self.map.contains_key(key)
    }

    /// Looks up a cached value, promoting the entry to most recently used.
    ///
    /// Records a hit or a miss in the cache metrics.
    pub fn get(&mut self, key: &RangeKey) -> Option<&V> {
        if let Some(node) = self.map.get(key).copied() {
            self.metrics.core.record_hit();
            // SAFETY: node comes from our map, so it is live in `order`
            unsafe {
                self.order.move_to_front(node);
                Some(&(*node).value().1)
            }
        } else {
            self.metrics.core.record_miss();
            None
        }
    }

    /// Inserts a value for `key`, returning the pair it displaced, if any.
    ///
    /// For an existing key the value is replaced in place, the entry is
    /// promoted to most recently used, and the old `(key, value)` pair is
    /// returned. The inverted index is left untouched: the key *is* its
    /// span, so the registered positions cannot have changed.
    ///
    /// For a new key at capacity, the least recently used entry is evicted
    /// first: it leaves the recency order, the map, and every position set
    /// in its span. The evicted pair is returned. The new entry is then
    /// pushed to the front and registered at every covered position.
    pub fn put(&mut self, key: RangeKey, value: V) -> Option<(RangeKey, V)> {
        if let Some(node) = self.map.get(&key).copied() {
            // SAFETY: node comes from our map, so it is live in `order`
            unsafe {
                self.order.move_to_front(node);
                let (_, old) = self.order.replace(node, (key, value));
                return Some((key, old));
            }
        }

        let mut evicted = None;
        if self.map.len() >= self.cap().get() {
            if let Some((victim_key, victim_value)) = self.order.pop_back() {
                self.map.remove(&victim_key);
                self.unregister(&victim_key);
                self.metrics.core.record_eviction();
                evicted = Some((victim_key, victim_value));
            }
        }

        if let Some(node) = self.order.push_front((key, value)) {
            self.map.insert(key, node);
            self.register(&key);
            self.metrics.core.record_insertion();
        }

        evicted
    }

    /// Drops every cached range covering `position`. Returns the number of
    /// entries actually removed.
    ///
    /// The position's covering set is drained and deleted outright. Keys in
    /// the set that were already evicted are skipped silently; keys removed
    /// here stay registered at the other positions of their span, where a
    /// later invalidation will skip them the same way.
    pub fn invalidate(&mut self, position: usize) -> usize {
        let mut dropped = 0;
        if let Some(keys) = self.index.remove(&position) {
            for key in keys {
                if let Some(node) = self.map.remove(&key) {
                    // SAFETY: node comes from our map, so it is live in `order`
                    unsafe { self.order.unlink(node) };
                    dropped += 1;
                }
            }
        }
        self.metrics.record_invalidation(dropped as u64);
        dropped
    }

    /// Removes all entries and all inverted-index state.
    pub fn clear(&mut self) {
        self.map.clear();
        self.index.clear();
        self.order.clear();
    }

    /// Adds `key` to the covering set of every position in its span.
    fn register(&mut self, key: &RangeKey) {
        for position in key.positions() {
            self.index.entry(position).or_default().insert(*key);
        }
    }

    /// Removes `key` from the covering set of every position in its span,
    /// dropping sets that become empty.
    fn unregister(&mut self, key: &RangeKey) {
        for position in key.positions() {
            let now_empty = match self.index.get_mut(&position) {
                Some(covering) => {
                    covering.remove(key);
                    covering.is_empty()
                }
                None => false,
            };
            if now_empty {
                self.index.remove(&position);
            }
        }
    }
}

impl<V, S> fmt::Debug for IntervalLruCache<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalLruCache")
            .field("capacity", &self.config.capacity)
            .field("len", &self.map.len())
            .field("indexed_positions", &self.index.len())
            .finish()
    }
}

impl<V, S: BuildHasher> CacheMetrics for IntervalLruCache<V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

//! Range-Sum Engine
//!
//! Cached range sums over a caller-owned array. The engine holds only cache
//! state; the array itself is passed into every call as a slice, so ownership
//! and mutation stay with the caller.
//!
//! Correctness of cached reads rests on one rule: every mutation goes through
//! [`RangeSumCache::update`], which writes the array and invalidates the
//! covering cache entries before the cache can be consulted again. Reading a
//! cached sum after an unreported mutation returns stale data, exactly as it
//! would with any external cache.
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap the
//! engine with a synchronization primitive such as `Mutex` or `RwLock`.

extern crate alloc;

#[cfg(not(feature = "hashbrown"))]
extern crate std;

use crate::error::Error;
use crate::interval_lru::{IntervalLruCache, RangeKey};
use crate::metrics::CacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::hash::BuildHasher;
use core::iter::Sum;
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

use crate::config::IntervalLruCacheConfig;

/// Validates a query against the array length, producing the cache key.
fn check_range(len: usize, start: usize, end: usize) -> Result<RangeKey, Error> {
    let key = RangeKey::new(start, end)?;
    if end >= len {
        return Err(Error::IndexOutOfBounds { index: end, len });
    }
    Ok(key)
}

/// Computes the sum of `array[start..=end]` without caching.
///
/// The uncached reference computation: one pass over the range, O(width).
///
/// # Errors
///
/// Returns [`Error::InvalidRange`] if `start > end` and
/// [`Error::IndexOutOfBounds`] if `end` is outside the array.
///
/// # Examples
///
/// ```
/// use rangecache_rs::sum_slice;
///
/// let array = [1i64, 2, 3, 4, 5];
/// assert_eq!(sum_slice(&array, 1, 3).unwrap(), 9);
/// assert!(sum_slice(&array, 3, 1).is_err());
/// assert!(sum_slice(&array, 0, 5).is_err());
/// ```
pub fn sum_slice<T>(array: &[T], start: usize, end: usize) -> Result<T, Error>
where
    T: Copy + Sum<T>,
{
    check_range(array.len(), start, end)?;
    Ok(array[start..=end].iter().copied().sum())
}

/// Writes `value` at `index` without touching any cache.
///
/// The uncached counterpart of [`RangeSumCache::update`]. Callers holding a
/// `RangeSumCache` over the same array must use the cache's `update` instead,
/// or cached sums covering `index` go stale.
///
/// # Errors
///
/// Returns [`Error::IndexOutOfBounds`] if `index` is outside the array.
pub fn update_slice<T>(array: &mut [T], index: usize, value: T) -> Result<(), Error> {
    if index >= array.len() {
        return Err(Error::IndexOutOfBounds {
            index,
            len: array.len(),
        });
    }
    array[index] = value;
    Ok(())
}

/// Cached range sums over a caller-owned array.
///
/// Wraps an [`IntervalLruCache`] keyed by `(start, end)` and routes every
/// mutation through position-scoped invalidation.
///
/// # Examples
///
/// ```
/// use rangecache_rs::RangeSumCache;
/// use core::num::NonZeroUsize;
///
/// let mut array = [1i64, 2, 3, 4, 5];
/// let mut sums = RangeSumCache::new(NonZeroUsize::new(16).unwrap());
///
/// assert_eq!(sums.range_sum(&array, 0, 4).unwrap(), 15);
///
/// // The update invalidates the cached (0, 4) sum.
/// sums.update(&mut array, 2, 10).unwrap();
/// assert_eq!(sums.range_sum(&array, 0, 4).unwrap(), 22);
/// ```
#[derive(Debug)]
pub struct RangeSumCache<T, S = DefaultHashBuilder> {
    cache: IntervalLruCache<T, S>,
}

impl<T: Copy + Sum<T>> RangeSumCache<T> {
    /// Creates a new engine with the given cache capacity and the default
    /// hasher.
    pub fn new(capacity: NonZeroUsize) -> RangeSumCache<T, DefaultHashBuilder> {
        RangeSumCache {
            cache: IntervalLruCache::new(capacity),
        }
    }
}

impl<T: Copy + Sum<T>, S: BuildHasher + Clone> RangeSumCache<T, S> {
    /// Creates a new engine with the given cache capacity and hash builder.
    pub fn with_hasher(capacity: NonZeroUsize, hash_builder: S) -> Self {
        RangeSumCache {
            cache: IntervalLruCache::with_hasher(capacity, hash_builder),
        }
    }

    /// Returns the sum of `array[start..=end]`, from cache when possible.
    ///
    /// A miss computes the sum in O(width), stores it, and registers the
    /// range in the inverted index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRange`] if `start > end` and
    /// [`Error::IndexOutOfBounds`] if `end` is outside the array.
    pub fn range_sum(&mut self, array: &[T], start: usize, end: usize) -> Result<T, Error> {
        let key = check_range(array.len(), start, end)?;
        if let Some(sum) = self.cache.get(&key) {
            return Ok(*sum);
        }
        let sum = array[start..=end].iter().copied().sum();
        self.cache.put(key, sum);
        Ok(sum)
    }

    /// Writes `value` at `index` and invalidates every cached range covering
    /// that position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if `index` is outside the array.
    /// On error nothing is written and nothing is invalidated.
    pub fn update(&mut self, array: &mut [T], index: usize, value: T) -> Result<(), Error> {
        if index >= array.len() {
            return Err(Error::IndexOutOfBounds {
                index,
                len: array.len(),
            });
        }
        array[index] = value;
        self.cache.invalidate(index);
        Ok(())
    }

    /// Gives read access to the underlying cache for inspection and metrics.
    pub fn cache(&self) -> &IntervalLruCache<T, S> {
        &self.cache
    }
}

impl<T: Copy + Sum<T>, S: BuildHasher + Clone + Default> RangeSumCache<T, S> {
    /// Creates a new engine from a cache configuration struct.
    ///
    /// Pass `None` to use the default hasher.
    pub fn init(config: IntervalLruCacheConfig, hasher: Option<S>) -> Self {
        Self::with_hasher(config.capacity, hasher.unwrap_or_default())
    }
}

impl<T, S: BuildHasher> CacheMetrics for RangeSumCache<T, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        CacheMetrics::metrics(&self.cache)
    }

    fn algorithm_name(&self) -> &'static str {
        self.cache.algorithm_name()
    }
}

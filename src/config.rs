//! Configuration for the interval-indexed LRU cache.
//!
//! # Sizing Guidelines
//!
//! `capacity` bounds the number of cached range results, not bytes: every
//! entry stores one key and one numeric sum, so memory cost per entry is
//! flat. The real cost driver is the inverted index, which holds one set
//! membership per array position covered by a live range. A cache of `C`
//! entries with average range width `W` keeps `C × W` index memberships.
//!
//! **Example**: 1,000 cached ranges averaging 64 positions each keep
//! 64,000 index memberships alive. If your workload caches very wide
//! ranges, budget the capacity accordingly.
//!
//! # Examples
//!
//! ```
//! use rangecache_rs::config::IntervalLruCacheConfig;
//! use rangecache_rs::IntervalLruCache;
//! use core::num::NonZeroUsize;
//!
//! let config = IntervalLruCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: IntervalLruCache<i64> = IntervalLruCache::init(config, None);
//! assert_eq!(cache.cap().get(), 1000);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an [`IntervalLruCache`](crate::IntervalLruCache).
///
/// # Fields
///
/// - `capacity`: Maximum number of cached range entries. When a new range is
///   inserted at capacity, the least recently used entry is evicted and its
///   span is unregistered from the inverted index.
///
/// # Examples
///
/// ```
/// use rangecache_rs::config::IntervalLruCacheConfig;
/// use rangecache_rs::IntervalLruCache;
/// use core::num::NonZeroUsize;
///
/// // Small cache for a hot set of repeated range queries.
/// let config = IntervalLruCacheConfig {
///     capacity: NonZeroUsize::new(128).unwrap(),
/// };
/// let cache: IntervalLruCache<i64> = IntervalLruCache::init(config, None);
/// ```
#[derive(Clone, Copy)]
pub struct IntervalLruCacheConfig {
    /// Maximum number of range entries the cache can hold.
    pub capacity: NonZeroUsize,
}

impl fmt::Debug for IntervalLruCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalLruCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#![doc = include_str!("../README.md")]
//!
//! # Code Reference
//!
//! Quick examples for the two data structures. See each module's
//! documentation for algorithm details and performance characteristics.
//!
//! ## Interval-Indexed LRU Cache
//!
//! ```
//! use rangecache_rs::{IntervalLruCache, RangeKey};
//! use core::num::NonZeroUsize;
//!
//! let mut cache = IntervalLruCache::new(NonZeroUsize::new(8).unwrap());
//! let key = RangeKey::new(2, 5).unwrap();
//! cache.put(key, 42i64);
//! assert_eq!(cache.get(&key), Some(&42));
//!
//! // Invalidation is position-scoped: dropping position 3 removes the
//! // cached (2, 5) entry because that range covers it.
//! assert_eq!(cache.invalidate(3), 1);
//! assert!(cache.get(&key).is_none());
//! ```
//!
//! ## Range-Sum Engine
//!
//! ```
//! use rangecache_rs::RangeSumCache;
//! use core::num::NonZeroUsize;
//!
//! let mut array = [1i64, 2, 3, 4, 5];
//! let mut sums = RangeSumCache::new(NonZeroUsize::new(16).unwrap());
//! assert_eq!(sums.range_sum(&array, 0, 4).unwrap(), 15);
//!
//! sums.update(&mut array, 2, 10).unwrap();
//! assert_eq!(sums.range_sum(&array, 0, 4).unwrap(), 22);
//! ```
//!
//! ## Splay-Tree Memo Table
//!
//! ```
//! use rangecache_rs::{fibonacci, SplayMemoTable};
//!
//! let mut memo = SplayMemoTable::new();
//! assert_eq!(fibonacci(90, &mut memo).unwrap(), 2_880_067_194_370_816_120);
//!
//! // The most recently touched key sits at the root.
//! assert_eq!(memo.root_key(), Some(&90));
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration structs for cache construction.
//! - [`error`]: The crate-wide error type.
//! - [`fib`]: Memoized Fibonacci evaluation over pluggable memo backends.
//! - [`interval_lru`]: The interval-indexed LRU cache.
//! - [`metrics`]: Metrics collection and reporting.
//! - [`range_sum`]: Cached range sums over caller-owned arrays.
//! - [`splay`]: The arena-based splay-tree memo table.
#![no_std]

/// Configuration structures for cache construction.
pub mod config;

/// Error types for range validation and arithmetic overflow.
pub mod error;

/// Memoized Fibonacci evaluation, generic over the memo backend.
pub mod fib;

/// Interval-indexed LRU cache with position-scoped invalidation.
pub mod interval_lru;

/// Metrics collection for cache observability.
pub mod metrics;

/// Cached range sums over caller-owned arrays.
pub mod range_sum;

/// Arena-based splay tree used as a memo table.
pub mod splay;

// Internal infrastructure.
pub(crate) mod recency;

pub use error::Error;
pub use fib::{fibonacci, MemoTable};
pub use interval_lru::{IntervalLruCache, RangeKey};
pub use metrics::{CacheMetrics, CoreCacheMetrics, IntervalLruCacheMetrics, SplayMemoMetrics};
pub use range_sum::{sum_slice, update_slice, RangeSumCache};
pub use splay::SplayMemoTable;

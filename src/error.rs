//! Crate Error Type
//!
//! All fallible operations in this crate return `Result<_, Error>`. Failures
//! are reported to the caller immediately: bounds are never silently clamped,
//! nothing is retried, and nothing is swallowed. The one deliberate exception
//! is invalidation hitting an inverted-index entry whose cache entry is
//! already gone, which is an expected no-op rather than an error (see
//! [`IntervalLruCache::invalidate`](crate::IntervalLruCache::invalidate)).

use thiserror::Error as ThisError;

/// Errors reported by the range-sum engine and the Fibonacci evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum Error {
    /// A range was requested with `start > end`.
    #[error("invalid range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Inclusive lower bound of the offending range.
        start: usize,
        /// Inclusive upper bound of the offending range.
        end: usize,
    },

    /// A position fell outside the array store.
    #[error("index {index} out of bounds for array of length {len}")]
    IndexOutOfBounds {
        /// The offending position.
        index: usize,
        /// Length of the array store at the time of the call.
        len: usize,
    },

    /// A Fibonacci term grew past the range of `u128`.
    #[error("fibonacci({term}) does not fit in a u128")]
    TermOverflow {
        /// First term whose value overflowed.
        term: u64,
    },
}

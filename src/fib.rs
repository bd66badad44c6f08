//! Memoized Fibonacci Evaluation
//!
//! A Fibonacci evaluator generic over its memo backend. The [`MemoTable`]
//! trait is the seam: the splay tree and a plain hash map both implement it,
//! so the two memoization strategies can be compared on identical workloads.
//!
//! Evaluation is an explicit bottom-up loop that consults the memo at every
//! term. There is no recursion, so large `n` cannot exhaust the call stack;
//! the limiting factor is the `u128` value range, which ends at
//! `fibonacci(186)`.

#[cfg(not(feature = "hashbrown"))]
extern crate std;

use crate::error::Error;
use crate::splay::SplayMemoTable;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A memo backend for [`fibonacci`].
///
/// `lookup` takes `&mut self` because some backends restructure themselves
/// on every hit; the splay tree moves the found node to the root.
pub trait MemoTable<K, V> {
    /// Returns the memoized value for `key`, if present.
    fn lookup(&mut self, key: &K) -> Option<V>;

    /// Stores a value for `key`, replacing any previous one.
    fn store(&mut self, key: K, value: V);

    /// Returns the number of memoized entries.
    fn len(&self) -> usize;

    /// Returns true if nothing is memoized yet.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Ord, V: Clone> MemoTable<K, V> for SplayMemoTable<K, V> {
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.search(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn len(&self) -> usize {
        SplayMemoTable::len(self)
    }
}

impl<K: Hash + Eq, V: Clone, S: BuildHasher> MemoTable<K, V> for HashMap<K, V, S> {
    fn lookup(&mut self, key: &K) -> Option<V> {
        self.get(key).cloned()
    }

    fn store(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }
}

/// Computes the `n`-th Fibonacci number through the given memo backend.
///
/// `fibonacci(0) = 0`, `fibonacci(1) = 1`. For larger `n` the memo is
/// consulted for `n` itself, then the sequence is evaluated bottom-up with
/// one memo consultation per term: hits are reused (and, with the splay
/// backend, promoted toward the root), misses are computed and stored.
///
/// The loop is iterative throughout, so `n = 10_000` cannot overflow the
/// stack; it fails with [`Error::TermOverflow`] instead, because the term
/// values stop fitting in a `u128` after `fibonacci(186)`.
///
/// # Errors
///
/// Returns [`Error::TermOverflow`] on the first term whose value exceeds
/// `u128::MAX`.
///
/// # Examples
///
/// ```
/// use rangecache_rs::{fibonacci, SplayMemoTable};
///
/// let mut memo = SplayMemoTable::new();
/// assert_eq!(fibonacci(10, &mut memo).unwrap(), 55);
///
/// // The memo persists across calls; this one is a pure lookup.
/// assert_eq!(fibonacci(10, &mut memo).unwrap(), 55);
/// ```
pub fn fibonacci<M: MemoTable<u64, u128>>(n: u64, memo: &mut M) -> Result<u128, Error> {
    if n == 0 {
        return Ok(0);
    }
    if n == 1 {
        return Ok(1);
    }
    if let Some(value) = memo.lookup(&n) {
        return Ok(value);
    }

    let mut previous: u128 = 0;
    let mut current: u128 = 1;
    for term in 2..=n {
        let next = match memo.lookup(&term) {
            Some(value) => value,
            None => {
                let computed = previous
                    .checked_add(current)
                    .ok_or(Error::TermOverflow { term })?;
                memo.store(term, computed);
                computed
            }
        };
        previous = current;
        current = next;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    type PlainMemo = HashMap<u64, u128>;

    const KNOWN: [u128; 11] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];

    #[test]
    fn test_base_cases() {
        let mut memo = SplayMemoTable::new();
        assert_eq!(fibonacci(0, &mut memo).unwrap(), 0);
        assert_eq!(fibonacci(1, &mut memo).unwrap(), 1);
        // Base cases never touch the memo.
        assert!(memo.is_empty());
    }

    #[test]
    fn test_known_prefix_with_splay_backend() {
        let mut memo = SplayMemoTable::new();
        for (n, expected) in KNOWN.iter().enumerate() {
            assert_eq!(fibonacci(n as u64, &mut memo).unwrap(), *expected);
        }
    }

    #[test]
    fn test_known_prefix_with_hash_backend() {
        let mut memo = PlainMemo::default();
        for (n, expected) in KNOWN.iter().enumerate() {
            assert_eq!(fibonacci(n as u64, &mut memo).unwrap(), *expected);
        }
    }

    #[test]
    fn test_backends_agree() {
        let mut splay = SplayMemoTable::new();
        let mut hash = PlainMemo::default();
        for n in 0..=40u64 {
            assert_eq!(
                fibonacci(n, &mut splay).unwrap(),
                fibonacci(n, &mut hash).unwrap(),
                "backends diverged at n = {n}"
            );
        }
        assert_eq!(fibonacci(40, &mut splay).unwrap(), 102_334_155);
    }

    #[test]
    fn test_warm_memo_is_a_pure_lookup() {
        let mut memo = SplayMemoTable::new();
        fibonacci(30, &mut memo).unwrap();
        let stored = MemoTable::len(&memo);

        fibonacci(30, &mut memo).unwrap();
        assert_eq!(MemoTable::len(&memo), stored);
        // The hot term sits at the root after the lookup.
        assert_eq!(memo.root_key(), Some(&30));
    }

    #[test]
    fn test_largest_representable_term() {
        let mut memo = SplayMemoTable::new();
        let value = fibonacci(186, &mut memo).unwrap();
        assert_eq!(value, 332_825_110_087_067_562_321_196_029_789_634_457_848);
    }

    #[test]
    fn test_overflow_reports_first_overflowing_term() {
        let mut memo = SplayMemoTable::new();
        assert_eq!(
            fibonacci(187, &mut memo),
            Err(Error::TermOverflow { term: 187 })
        );
    }

    #[test]
    fn test_huge_n_fails_cleanly_without_recursion() {
        // The iterative loop walks term by term and stops at the first
        // overflow instead of blowing the stack.
        let mut memo = SplayMemoTable::new();
        assert_eq!(
            fibonacci(10_000, &mut memo),
            Err(Error::TermOverflow { term: 187 })
        );

        let mut hash = PlainMemo::default();
        assert_eq!(
            fibonacci(10_000, &mut hash),
            Err(Error::TermOverflow { term: 187 })
        );
    }

    #[test]
    fn test_partial_memo_is_extended() {
        let mut memo = SplayMemoTable::new();
        fibonacci(10, &mut memo).unwrap();
        let before = MemoTable::len(&memo);

        fibonacci(20, &mut memo).unwrap();
        assert!(MemoTable::len(&memo) > before);
        assert_eq!(fibonacci(20, &mut memo).unwrap(), 6765);
    }
}

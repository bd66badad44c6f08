//! Splay-Tree Memo Table Implementation
//!
//! This module provides a self-adjusting binary search tree used as a memo
//! table. Every successful lookup and every insert splays the touched node
//! to the root, so entries that are consulted often sit near the top of the
//! tree and are cheapest to reach again.
//!
//! # Algorithm
//!
//! Splaying moves a node to the root through a sequence of rotations chosen
//! by the node's position relative to its parent and grandparent:
//!
//! - **zig**: the parent is the root; one rotation at the parent.
//! - **zig-zig**: node and parent are same-side children; rotate the
//!   grandparent first, then the parent.
//! - **zig-zag**: node and parent are opposite-side children; rotate the
//!   parent first, then the grandparent.
//!
//! Nodes live in a growable arena (`Vec`) and reference each other by index.
//! Rotations rewire indices only; no node is ever moved or freed, so an
//! arena index stays valid for the life of the table. There is no unsafe
//! code in this module.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Insert: O(log n) amortized
//!   - Search (hit): O(log n) amortized, plus the splay
//!   - Search (miss): O(log n) amortized, no structural change
//!
//! - **Space Complexity**:
//!   - O(n) where n is the number of distinct keys ever inserted; the memo
//!     table never deletes
//!
//! All descent and splaying is iterative, so key magnitude never threatens
//! the call stack.
//!
//! # When to Use
//!
//! Splay trees fit memoization workloads with strong temporal locality:
//! recently computed terms are re-read immediately, and the splay keeps them
//! at the root. They are a poor fit when lookups must not mutate the
//! structure, since even a read restructures the tree.
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. For concurrent access, wrap the
//! table with a synchronization primitive such as `Mutex` or `RwLock`.

extern crate alloc;

use crate::metrics::{CacheMetrics, SplayMemoMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

/// A node in the splay tree arena. Links are arena indices.
#[derive(Debug)]
struct SplayNode<K, V> {
    key: K,
    value: V,
    parent: Option<usize>,
    left: Option<usize>,
    right: Option<usize>,
}

/// A self-adjusting binary search tree used as a memo table.
///
/// Keys are created once and never deleted; the arena only grows. Lookups
/// take `&mut self` because a hit splays the found node to the root.
///
/// # Examples
///
/// ```
/// use rangecache_rs::SplayMemoTable;
///
/// let mut memo = SplayMemoTable::new();
/// memo.insert(10u64, 55u128);
/// memo.insert(11, 89);
///
/// // A hit moves the entry to the root.
/// assert_eq!(memo.search(&10), Some(&55));
/// assert_eq!(memo.root_key(), Some(&10));
///
/// // A miss leaves the tree untouched.
/// assert_eq!(memo.search(&99), None);
/// assert_eq!(memo.root_key(), Some(&10));
/// ```
pub struct SplayMemoTable<K, V> {
    nodes: Vec<SplayNode<K, V>>,
    root: Option<usize>,
    metrics: SplayMemoMetrics,
}

impl<K, V> SplayMemoTable<K, V> {
    /// Creates an empty memo table.
    pub fn new() -> Self {
        SplayMemoTable {
            nodes: Vec::new(),
            root: None,
            metrics: SplayMemoMetrics::new(),
        }
    }

    /// Creates an empty memo table with arena space for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        SplayMemoTable {
            nodes: Vec::with_capacity(capacity),
            root: None,
            metrics: SplayMemoMetrics::new(),
        }
    }

    /// Returns the number of distinct keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the table holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the key at the root, or None if the table is empty.
    ///
    /// After a successful `search` or an `insert`, the touched key is here.
    #[inline]
    pub fn root_key(&self) -> Option<&K> {
        self.root.map(|idx| &self.nodes[idx].key)
    }

    /// Returns all keys in ascending order.
    ///
    /// Walks the tree iteratively with an explicit stack.
    pub fn keys_in_order(&self) -> Vec<&K> {
        let mut keys = Vec::with_capacity(self.nodes.len());
        let mut stack = Vec::new();
        let mut cur = self.root;
        while cur.is_some() || !stack.is_empty() {
            while let Some(idx) = cur {
                stack.push(idx);
                cur = self.nodes[idx].left;
            }
            if let Some(idx) = stack.pop() {
                keys.push(&self.nodes[idx].key);
                cur = self.nodes[idx].right;
            }
        }
        keys
    }

    fn push_node(&mut self, key: K, value: V, parent: Option<usize>) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(SplayNode {
            key,
            value,
            parent,
            left: None,
            right: None,
        });
        idx
    }
}

impl<K: Ord, V> SplayMemoTable<K, V> {
    /// Inserts a key-value pair and splays the touched node to the root.
    ///
    /// An equal key overwrites its value in place; the node is still splayed.
    pub fn insert(&mut self, key: K, value: V) {
        let Some(mut cur) = self.root else {
            let idx = self.push_node(key, value, None);
            self.root = Some(idx);
            self.metrics.core.record_insertion();
            return;
        };

        loop {
            match key.cmp(&self.nodes[cur].key) {
                Ordering::Less => match self.nodes[cur].left {
                    Some(next) => cur = next,
                    None => {
                        let idx = self.push_node(key, value, Some(cur));
                        self.nodes[cur].left = Some(idx);
                        self.metrics.core.record_insertion();
                        self.splay(idx);
                        return;
                    }
                },
                Ordering::Greater => match self.nodes[cur].right {
                    Some(next) => cur = next,
                    None => {
                        let idx = self.push_node(key, value, Some(cur));
                        self.nodes[cur].right = Some(idx);
                        self.metrics.core.record_insertion();
                        self.splay(idx);
                        return;
                    }
                },
                Ordering::Equal => {
                    self.nodes[cur].value = value;
                    self.splay(cur);
                    return;
                }
            }
        }
    }

    /// Looks up a key. A hit splays the node to the root and returns its
    /// value; a miss changes nothing structurally.
    pub fn search(&mut self, key: &K) -> Option<&V> {
        let mut cur = self.root;
        while let Some(idx) = cur {
            match key.cmp(&self.nodes[idx].key) {
                Ordering::Less => cur = self.nodes[idx].left,
                Ordering::Greater => cur = self.nodes[idx].right,
                Ordering::Equal => {
                    self.metrics.core.record_hit();
                    self.splay(idx);
                    return Some(&self.nodes[idx].value);
                }
            }
        }
        self.metrics.core.record_miss();
        None
    }

    /// Moves `node` to the root through zig, zig-zig, and zig-zag steps.
    fn splay(&mut self, node: usize) {
        self.metrics.record_splay();
        while let Some(parent) = self.nodes[node].parent {
            match self.nodes[parent].parent {
                None => {
                    // zig: one rotation at the root.
                    if self.nodes[parent].left == Some(node) {
                        self.rotate_right(parent);
                    } else {
                        self.rotate_left(parent);
                    }
                }
                Some(grand) => {
                    let node_is_left = self.nodes[parent].left == Some(node);
                    let parent_is_left = self.nodes[grand].left == Some(parent);
                    match (node_is_left, parent_is_left) {
                        // zig-zig: grandparent first, then parent.
                        (true, true) => {
                            self.rotate_right(grand);
                            self.rotate_right(parent);
                        }
                        (false, false) => {
                            self.rotate_left(grand);
                            self.rotate_left(parent);
                        }
                        // zig-zag: parent first, then grandparent.
                        (false, true) => {
                            self.rotate_left(parent);
                            self.rotate_right(grand);
                        }
                        (true, false) => {
                            self.rotate_right(parent);
                            self.rotate_left(grand);
                        }
                    }
                }
            }
        }
    }

    /// Rotates left around `x`, promoting its right child.
    ///
    /// Fixes the three parent back-references: the displaced subtree, the
    /// demoted node, and the promoted node's link to the tree above.
    fn rotate_left(&mut self, x: usize) {
        let Some(y) = self.nodes[x].right else {
            return;
        };
        self.metrics.record_rotation();

        let displaced = self.nodes[y].left;
        self.nodes[x].right = displaced;
        if let Some(d) = displaced {
            self.nodes[d].parent = Some(x);
        }

        let upper = self.nodes[x].parent;
        self.nodes[y].parent = upper;
        match upper {
            None => self.root = Some(y),
            Some(p) if self.nodes[p].left == Some(x) => self.nodes[p].left = Some(y),
            Some(p) => self.nodes[p].right = Some(y),
        }

        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    /// Rotates right around `x`, promoting its left child.
    fn rotate_right(&mut self, x: usize) {
        let Some(y) = self.nodes[x].left else {
            return;
        };
        self.metrics.record_rotation();

        let displaced = self.nodes[y].right;
        self.nodes[x].left = displaced;
        if let Some(d) = displaced {
            self.nodes[d].parent = Some(x);
        }

        let upper = self.nodes[x].parent;
        self.nodes[y].parent = upper;
        match upper {
            None => self.root = Some(y),
            Some(p) if self.nodes[p].left == Some(x) => self.nodes[p].left = Some(y),
            Some(p) => self.nodes[p].right = Some(y),
        }

        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }
}

impl<K, V> Default for SplayMemoTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for SplayMemoTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplayMemoTable")
            .field("len", &self.nodes.len())
            .field("root", &self.root)
            .finish()
    }
}

impl<K, V> CacheMetrics for SplayMemoTable<K, V> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_sorted(table: &SplayMemoTable<u64, u128>) {
        let keys = table.keys_in_order();
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "keys out of order: {:?}", keys);
        }
    }

    #[test]
    fn test_empty_table() {
        let mut table: SplayMemoTable<u64, u128> = SplayMemoTable::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.root_key(), None);
        assert_eq!(table.search(&1), None);
    }

    #[test]
    fn test_insert_and_search() {
        let mut table = SplayMemoTable::new();
        table.insert(5u64, 50u128);
        table.insert(3, 30);
        table.insert(8, 80);

        assert_eq!(table.len(), 3);
        assert_eq!(table.search(&5), Some(&50));
        assert_eq!(table.search(&3), Some(&30));
        assert_eq!(table.search(&8), Some(&80));
        assert_eq!(table.search(&7), None);
        assert_sorted(&table);
    }

    #[test]
    fn test_insert_splays_to_root() {
        let mut table = SplayMemoTable::new();
        table.insert(1u64, 1u128);
        table.insert(2, 2);
        table.insert(3, 3);
        assert_eq!(table.root_key(), Some(&3));

        table.insert(2, 20);
        assert_eq!(table.root_key(), Some(&2));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_search_hit_splays_to_root() {
        let mut table = SplayMemoTable::new();
        for k in 1..=7u64 {
            table.insert(k, u128::from(k));
        }
        assert_eq!(table.search(&1), Some(&1));
        assert_eq!(table.root_key(), Some(&1));
        assert_sorted(&table);
    }

    #[test]
    fn test_search_miss_leaves_structure_alone() {
        let mut table = SplayMemoTable::new();
        table.insert(2u64, 2u128);
        table.insert(1, 1);
        table.insert(3, 3);
        let root_before = table.root_key().copied();

        assert_eq!(table.search(&10), None);
        assert_eq!(table.root_key().copied(), root_before);
        assert_sorted(&table);
    }

    #[test]
    fn test_insert_equal_key_overwrites() {
        let mut table = SplayMemoTable::new();
        table.insert(4u64, 40u128);
        table.insert(4, 44);
        assert_eq!(table.len(), 1);
        assert_eq!(table.search(&4), Some(&44));
    }

    #[test]
    fn test_sequential_inserts_keep_bst_property() {
        // Ascending inserts build a degenerate spine; splaying must fold it
        // back while preserving order.
        let mut table = SplayMemoTable::new();
        for k in 0..100u64 {
            table.insert(k, u128::from(k) * 2);
        }
        assert_eq!(table.len(), 100);
        assert_sorted(&table);

        assert_eq!(table.search(&0), Some(&0));
        assert_eq!(table.root_key(), Some(&0));
        assert_sorted(&table);
    }

    #[test]
    fn test_zig_zag_shape() {
        // 5 -> 1 -> 3 puts 3 in a left-right position; inserting it
        // exercises the zig-zag arm.
        let mut table = SplayMemoTable::new();
        table.insert(5u64, 5u128);
        table.insert(1, 1);
        table.insert(3, 3);
        assert_eq!(table.root_key(), Some(&3));
        assert_sorted(&table);
    }

    #[test]
    fn test_zig_zig_shape() {
        // Descending inserts make each new node a left-left grandchild on
        // the next search from the top.
        let mut table = SplayMemoTable::new();
        table.insert(5u64, 5u128);
        table.insert(3, 3);
        table.insert(1, 1);
        assert_eq!(table.root_key(), Some(&1));

        assert_eq!(table.search(&5), Some(&5));
        assert_eq!(table.root_key(), Some(&5));
        assert_sorted(&table);
    }

    #[test]
    fn test_metrics_track_activity() {
        let mut table = SplayMemoTable::new();
        table.insert(1u64, 1u128);
        table.insert(2, 2);
        table.search(&1);
        table.search(&9);

        let metrics = CacheMetrics::metrics(&table);
        assert_eq!(metrics["insertions"], 2.0);
        assert_eq!(metrics["cache_hits"], 1.0);
        assert_eq!(metrics["cache_misses"], 1.0);
        assert!(metrics["rotations"] >= 1.0);
        assert!(metrics["splays"] >= 2.0);
        assert_eq!(table.algorithm_name(), "Splay-Memo");
    }

    #[test]
    fn test_with_capacity_preallocates() {
        let table: SplayMemoTable<u64, u128> = SplayMemoTable::with_capacity(64);
        assert!(table.is_empty());
    }
}

//! Recency order backing LRU eviction.
//!
//! A doubly linked list over raw pointers with sentinel (sigil) nodes at both
//! ends. The cache maps keys to `*mut Node<T>` so that promotion, eviction,
//! and targeted removal during invalidation are all O(1) pointer surgery.
//! Front = most recently used, back = least recently used.
//!
//! Not part of the public API.

extern crate alloc;

use alloc::boxed::Box;
use alloc::fmt;
use core::mem;
use core::num::NonZeroUsize;
use core::ptr::{self, NonNull};

/// A node in the recency list.
///
/// Contains a value and pointers to the previous and next nodes. Sigil nodes
/// leave the value uninitialized, hence the `MaybeUninit`.
pub(crate) struct Node<T> {
    /// The value stored in this node. Uninitialized for sigil nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the previous node in the list.
    prev: *mut Node<T>,
    /// Pointer to the next node in the list.
    next: *mut Node<T>,
}

impl<T> Node<T> {
    fn new(val: T) -> Self {
        Node {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a sigil (sentinel) node without initializing the value.
    fn new_sigil() -> Self {
        Node {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the stored value.
    ///
    /// # Safety
    ///
    /// The value must be initialized. Must only be called on non-sigil nodes.
    pub(crate) unsafe fn value(&self) -> &T {
        // SAFETY: the caller guarantees the value is initialized
        unsafe { self.val.assume_init_ref() }
    }

    /// Consumes a boxed node and returns its value.
    ///
    /// # Safety
    ///
    /// The value must be initialized. Must only be called on non-sigil nodes.
    unsafe fn into_value(self: Box<Self>) -> T {
        // SAFETY: the caller guarantees the value is initialized
        unsafe { self.val.assume_init() }
    }
}

/// A fixed-capacity doubly linked list maintaining recency order.
///
/// Sentinel nodes at the head and tail make attach and detach unconditional:
/// every real node always has a live `prev` and `next`. All list operations
/// are O(1).
pub(crate) struct RecencyList<T> {
    /// Maximum number of items the list can hold.
    cap: NonZeroUsize,
    /// Current number of items in the list.
    len: usize,
    /// Pointer to the head sentinel node.
    head: *mut Node<T>,
    /// Pointer to the tail sentinel node.
    tail: *mut Node<T>,
}

impl<T> RecencyList<T> {
    /// Creates a new list that holds at most `cap` items.
    pub(crate) fn new(cap: NonZeroUsize) -> RecencyList<T> {
        let head = Box::into_raw(Box::new(Node::new_sigil()));
        let tail = Box::into_raw(Box::new(Node::new_sigil()));

        let list = RecencyList {
            cap,
            len: 0,
            head,
            tail,
        };

        unsafe {
            // SAFETY: head and tail are newly allocated and valid pointers
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Returns the maximum number of items the list can hold.
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    /// Returns the current number of items in the list.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no items.
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the list is at capacity.
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap.get()
    }

    /// Adds a value at the front (most recently used position).
    ///
    /// Returns a pointer to the newly created node, or None if the list is
    /// full. The returned pointer stays valid until the node is removed by
    /// `pop_back`, `unlink`, `clear`, or Drop.
    pub(crate) fn push_front(&mut self, v: T) -> Option<*mut Node<T>> {
        if self.is_full() {
            return None;
        }
        // SAFETY: Box::into_raw creates a valid raw pointer and we're using
        // NonNull to assert its non-nullness
        let node = unsafe { NonNull::new_unchecked(Box::into_raw(Box::new(Node::new(v)))) };
        // SAFETY: node is a newly allocated entry that is not part of any list yet
        unsafe { self.attach(node.as_ptr()) };
        self.len += 1;
        Some(node.as_ptr())
    }

    /// Removes and returns the value at the back (least recently used
    /// position), or None if the list is empty.
    pub(crate) fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head and tail are valid pointers initialized in `new`, and
        // the list is not empty, so there is at least one node between them
        let prev = unsafe { (*self.tail).prev };
        if prev == self.head {
            return None;
        }
        unsafe {
            self.detach(prev);
            self.len -= 1;
            // SAFETY: prev is a real node we just detached; its value is
            // initialized
            Some(Box::from_raw(prev).into_value())
        }
    }

    /// Detaches an arbitrary node from the list and returns its value.
    ///
    /// This is the operation invalidation relies on: a node anywhere in the
    /// list is removed without touching the rest of the order.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node currently in this list
    /// (not null, not freed, not a sigil).
    pub(crate) unsafe fn unlink(&mut self, node: *mut Node<T>) -> Option<T> {
        if self.is_empty() || node.is_null() || node == self.head || node == self.tail {
            return None;
        }
        unsafe {
            // SAFETY: caller guarantees node is a live entry in this list
            self.detach(node);
            self.len -= 1;
            Some(Box::from_raw(node).into_value())
        }
    }

    /// Moves a node to the front of the list (most recently used position).
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node currently in this list.
    pub(crate) unsafe fn move_to_front(&mut self, node: *mut Node<T>) {
        if node.is_null() || node == self.head || node == self.tail {
            return;
        }
        // SAFETY: the caller guarantees node is a live entry in this list,
        // and head is a valid pointer initialized in `new`
        unsafe {
            if (*self.head).next == node {
                return;
            }
            self.detach(node);
            self.attach(node);
        }
    }

    /// Replaces the value stored in a node, returning the old value.
    ///
    /// The node keeps its position in the recency order; callers promote
    /// separately when the replacement should also count as a use.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a non-sigil node in this list with
    /// an initialized value.
    pub(crate) unsafe fn replace(&mut self, node: *mut Node<T>, v: T) -> T {
        // SAFETY: the caller guarantees node is a live non-sigil node with an
        // initialized value
        unsafe { mem::replace(&mut (*node).val, mem::MaybeUninit::new(v)).assume_init() }
    }

    /// Unhooks `node` from its neighbors without deallocating it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid node in this list; its prev and next pointers
    /// must point at live nodes.
    unsafe fn detach(&mut self, node: *mut Node<T>) {
        // SAFETY: the caller guarantees node is a live entry in the list,
        // which means its prev and next pointers are also live entries
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Hooks `node` in directly after the head sentinel.
    ///
    /// # Safety
    ///
    /// `node` must be a valid node that is not currently linked into any
    /// list (newly allocated or just detached).
    unsafe fn attach(&mut self, node: *mut Node<T>) {
        // SAFETY: head is a valid pointer initialized in `new`, and the
        // caller guarantees node is a valid entry not already in the list
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }

    /// Removes all items from the list.
    pub(crate) fn clear(&mut self) {
        while self.pop_back().is_some() {}
    }
}

impl<T> Drop for RecencyList<T> {
    fn drop(&mut self) {
        // Drop all real nodes first, then free the sentinels.
        self.clear();

        // SAFETY: head and tail are valid pointers initialized in `new` and
        // only replaced with null here after being freed
        unsafe {
            if !self.head.is_null() {
                let _ = Box::from_raw(self.head);
                self.head = ptr::null_mut();
            }
            if !self.tail.is_null() {
                let _ = Box::from_raw(self.tail);
                self.tail = ptr::null_mut();
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for RecencyList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecencyList")
            .field("capacity", &self.cap)
            .field("length", &self.len)
            .finish()
    }
}

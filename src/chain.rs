//! Arena-backed doubly linked chain with fixed sentinel endpoints.
//!
//! Nodes live in a single `Vec` and refer to each other by slot index instead
//! of by pointer. Slot 0 is the front sentinel and slot 1 is the back sentinel;
//! neither ever holds a value. Every real node sits strictly between them, so
//! splicing at either end never has to special-case a missing neighbor.
//!
//! ```text
//!   slot 0                                                 slot 1
//! ┌───────┐ next ┌────────┐ next ┌────────┐ next ┌───────┐
//! │ FRONT │─────▶│ oldest │─────▶│  ...   │─────▶│ BACK  │
//! │       │◀─────│        │◀─────│        │◀─────│       │
//! └───────┘ prev └────────┘ prev └────────┘ prev └───────┘
//! ```
//!
//! Slots vacated by removals are pushed on a free list and reused by the next
//! insertion, so a chain that is filled, drained and refilled keeps its
//! original allocation.
//!
//! **Note**: handles are plain indices. A [`SlotId`] is only meaningful while
//! the node it was returned for is still linked; the owning cache guarantees
//! this by removing the handle from its index in the same step that unlinks
//! the node.

extern crate alloc;

use alloc::fmt;
use alloc::vec::Vec;

const FRONT: usize = 0;
const BACK: usize = 1;

/// Stable handle to a node in a [`Chain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct SlotId(usize);

impl SlotId {
    #[cfg(test)]
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// One slot in the arena.
///
/// `val` is `None` for both sentinels and for vacant slots on the free list.
struct Node<T> {
    val: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Node<T> {
    fn vacant() -> Self {
        Node {
            val: None,
            prev: FRONT,
            next: BACK,
        }
    }
}

/// Ordered sequence of values with O(1) insertion at the back, removal from
/// the front, and removal of any node by handle.
pub(crate) struct Chain<T> {
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Chain<T> {
    /// Creates an empty chain with room for `capacity` values before the
    /// arena has to grow.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.saturating_add(2));
        nodes.push(Node::vacant());
        nodes.push(Node::vacant());
        Chain {
            nodes,
            free: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.nodes[FRONT].next == BACK
    }

    /// Links `val` immediately before the back sentinel.
    ///
    /// Returns the new node's handle together with a reference to the stored
    /// value.
    pub(crate) fn push_back(&mut self, val: T) -> (SlotId, &mut T) {
        let last = self.nodes[BACK].prev;
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => {
                self.nodes.push(Node::vacant());
                self.nodes.len() - 1
            }
        };

        self.nodes[last].next = idx;
        self.nodes[BACK].prev = idx;
        self.len += 1;

        let node = &mut self.nodes[idx];
        node.prev = last;
        node.next = BACK;
        (SlotId(idx), node.val.insert(val))
    }

    /// Unlinks the node right after the front sentinel and returns its value.
    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let first = self.nodes[FRONT].next;
        if first == BACK {
            return None;
        }
        self.unlink(first)
    }

    /// Unlinks the node behind `id` and returns its value.
    ///
    /// Returns `None` for sentinel slots and for slots that are already vacant.
    pub(crate) fn remove(&mut self, id: SlotId) -> Option<T> {
        if id.0 == FRONT || id.0 == BACK {
            return None;
        }
        self.unlink(id.0)
    }

    fn unlink(&mut self, idx: usize) -> Option<T> {
        let val = self.nodes.get_mut(idx)?.val.take()?;
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = FRONT;
        self.nodes[idx].next = BACK;
        self.free.push(idx);
        self.len -= 1;
        Some(val)
    }

    #[inline]
    pub(crate) fn get(&self, id: SlotId) -> Option<&T> {
        self.nodes.get(id.0).and_then(|node| node.val.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.nodes.get_mut(id.0).and_then(|node| node.val.as_mut())
    }

    /// Oldest value, if any.
    #[inline]
    pub(crate) fn front(&self) -> Option<&T> {
        self.nodes[self.nodes[FRONT].next].val.as_ref()
    }

    /// Newest value, if any.
    #[inline]
    pub(crate) fn back(&self) -> Option<&T> {
        self.nodes[self.nodes[BACK].prev].val.as_ref()
    }

    /// Drops every value and relinks the sentinels to each other.
    pub(crate) fn clear(&mut self) {
        self.nodes.truncate(2);
        self.nodes[FRONT].next = BACK;
        self.nodes[BACK].prev = FRONT;
        self.free.clear();
        self.len = 0;
    }

    /// Number of slots allocated in the arena, sentinels included.
    #[cfg(test)]
    #[inline]
    pub(crate) fn slots(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            chain: self,
            head: self.nodes[FRONT].next,
            tail: self.nodes[BACK].prev,
            remaining: self.len,
        }
    }

    /// Walks the chain front to back checking that links are mutual inverses
    /// and that the walk visits exactly `len` valued nodes.
    ///
    /// Returns the handles in walk order on success, or a description of the
    /// first broken link.
    pub(crate) fn verify_links(&self) -> Result<Vec<SlotId>, &'static str> {
        if self.nodes[FRONT].val.is_some() || self.nodes[BACK].val.is_some() {
            return Err("sentinel slot holds a value");
        }

        let mut visited = Vec::with_capacity(self.len);
        let mut prev = FRONT;
        let mut cur = self.nodes[FRONT].next;
        while cur != BACK {
            if visited.len() > self.len {
                return Err("chain walk exceeds recorded length");
            }
            let node = self.nodes.get(cur).ok_or("link points outside the arena")?;
            if cur == FRONT {
                return Err("chain loops back to the front sentinel");
            }
            if node.val.is_none() {
                return Err("linked node holds no value");
            }
            if node.prev != prev {
                return Err("prev link is not the inverse of next link");
            }
            visited.push(SlotId(cur));
            prev = cur;
            cur = node.next;
        }
        if self.nodes[BACK].prev != prev {
            return Err("back sentinel prev does not point at last node");
        }
        if visited.len() != self.len {
            return Err("chain walk does not match recorded length");
        }
        Ok(visited)
    }
}

impl<T> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.len)
            .field("slots", &self.nodes.len())
            .field("free", &self.free.len())
            .finish()
    }
}

/// Front-to-back iterator over the values of a [`Chain`].
pub(crate) struct Iter<'a, T> {
    chain: &'a Chain<T>,
    head: usize,
    tail: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.chain.nodes[self.head];
        self.head = node.next;
        self.remaining -= 1;
        node.val.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.chain.nodes[self.tail];
        self.tail = node.prev;
        self.remaining -= 1;
        node.val.as_ref()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

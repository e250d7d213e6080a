//! First In, First Out (FIFO) Queue Cache Implementation
//!
//! A fixed-capacity queue whose entries are also addressable by key. New keys
//! join the back of the queue; when the queue is full, the entry at the front
//! (the one inserted earliest) is evicted to make room.
//!
//! # Algorithm
//!
//! Two structures are kept in lock-step:
//!
//! - a hash index mapping each key to the handle of its node, and
//! - an ordered chain of nodes bounded by a front and a back sentinel.
//!
//! ```text
//!   index                       chain (oldest ──▶ newest)
//! ┌───────────┐
//! │ "a" ──▶ 2 │        ┌───────┐   ┌─────┐   ┌─────┐   ┌─────┐   ┌───────┐
//! │ "b" ──▶ 3 │        │ FRONT │◀─▶│ a:1 │◀─▶│ b:2 │◀─▶│ c:3 │◀─▶│ BACK  │
//! │ "c" ──▶ 4 │        └───────┘   └─────┘   └─────┘   └─────┘   └───────┘
//! └───────────┘                      slot 2    slot 3    slot 4
//! ```
//!
//! The chain owns every entry. The index only stores handles, so removing a
//! key from the index never frees anything by itself.
//!
//! ## Reads and updates never reorder
//!
//! This is not an LRU. `get` leaves the chain untouched, and `put` on an
//! existing key rewrites the value in place: the entry keeps the slot it was
//! given when first inserted and is evicted based on that original position.
//!
//! # Performance Characteristics
//!
//! | Operation | Time |
//! |-----------|------|
//! | `enqueue` / `put` | O(1) average |
//! | `get` / `contains_key` | O(1) average |
//! | `dequeue` / `peek_front` / `peek_back` | O(1) |
//! | `remove` | O(1) average |
//!
//! Node slots freed by dequeues and evictions are reused, so a cache at steady
//! state does not grow its node arena.
//!
//! # Thread Safety
//!
//! `FifoCache` is `Send` but not `Sync`, because lookups through `&self`
//! update `Cell` counters. Wrap it in a `Mutex` (an `RwLock` will not do),
//! or enable the `concurrent` feature and use `ConcurrentFifoCache`.

extern crate alloc;

use crate::chain::{self, Chain, SlotId};
use crate::config::FifoCacheConfig;
use crate::error::{CacheError, InvariantError};
use crate::metrics::{CacheMetrics, FifoCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Upper bound on the number of entries reserved up front. Larger caches
/// grow their arena and index on demand.
const MAX_PREALLOC: usize = 1024;

/// Internal FIFO segment containing the actual cache algorithm.
///
/// This is shared between `FifoCache` (single-threaded) and
/// `ConcurrentFifoCache` (behind a lock).
///
/// Invariants re-established by every method before it returns:
///
/// - `chain.len() == map.len()` and both equal the number of nodes reachable
///   from the front sentinel
/// - `chain.len() <= config.capacity`
/// - every handle in `map` resolves to a node whose key equals the map key
/// - chain links are mutual inverses
pub(crate) struct FifoSegment<K, V, S = DefaultHashBuilder> {
    config: FifoCacheConfig,
    chain: Chain<(K, V)>,
    map: HashMap<K, SlotId, S>,
    metrics: FifoCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoSegment<K, V, S> {
    pub(crate) fn init(config: FifoCacheConfig, hash_builder: S) -> Self {
        let cap = config.capacity.get();
        let prealloc = cap.min(MAX_PREALLOC);
        FifoSegment {
            config,
            chain: Chain::with_capacity(prealloc),
            map: HashMap::with_capacity_and_hasher(prealloc, hash_builder),
            metrics: FifoCacheMetrics::new(cap as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.chain.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &FifoCacheMetrics {
        &self.metrics
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.map.contains_key(key)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.map.get(key).and_then(|&id| self.chain.get(id)) {
            Some((_, v)) => {
                self.metrics.core.record_hit();
                Some(v)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let found = self.map.get(key).copied();
        match found.and_then(|id| self.chain.get_mut(id)) {
            Some((_, v)) => {
                self.metrics.core.record_hit();
                Some(v)
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    pub(crate) fn enqueue(&mut self, key: K, value: V) -> Result<&V, CacheError<K, V>> {
        if self.map.contains_key(&key) {
            self.metrics.core.record_duplicate_rejection();
            tracing::debug!(len = self.chain.len(), "rejected enqueue of duplicate key");
            return Err(CacheError::DuplicateKey { key, value });
        }
        Ok(self.insert_new(key, value))
    }

    /// Links a key known to be absent at the back, evicting the front first
    /// if the cache is full.
    fn insert_new(&mut self, key: K, value: V) -> &V {
        if self.chain.len() >= self.config.capacity.get() {
            self.evict_oldest();
        }

        let (id, entry) = self.chain.push_back((key.clone(), value));
        self.map.insert(key, id);
        self.metrics.core.record_insertion();
        &entry.1
    }

    fn evict_oldest(&mut self) {
        if let Some((key, _)) = self.chain.pop_front() {
            self.map.remove(&key);
            self.metrics.core.record_eviction();
            tracing::trace!(
                len = self.chain.len(),
                capacity = self.config.capacity.get(),
                "evicted oldest entry"
            );
        }
    }

    pub(crate) fn put(&mut self, key: K, value: V) -> Option<V> {
        let found = self.map.get(&key).copied();
        if let Some((_, slot)) = found.and_then(|id| self.chain.get_mut(id)) {
            self.metrics.core.record_update();
            return Some(mem::replace(slot, value));
        }

        self.metrics.record_put_insert();
        self.insert_new(key, value);
        None
    }

    pub(crate) fn pop_front(&mut self) -> Option<(K, V)> {
        let (key, value) = self.chain.pop_front()?;
        self.map.remove(&key);
        self.metrics.core.record_dequeue();
        tracing::trace!(len = self.chain.len(), "dequeued oldest entry");
        Some((key, value))
    }

    #[inline]
    pub(crate) fn dequeue(&mut self) -> Option<V> {
        self.pop_front().map(|(_, v)| v)
    }

    #[inline]
    pub(crate) fn front(&self) -> Option<(&K, &V)> {
        self.chain.front().map(|(k, v)| (k, v))
    }

    #[inline]
    pub(crate) fn back(&self) -> Option<(&K, &V)> {
        self.chain.back().map(|(k, v)| (k, v))
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let id = self.map.remove(key)?;
        let (_, value) = self.chain.remove(id)?;
        self.metrics.core.record_removal();
        Some(value)
    }

    pub(crate) fn clear(&mut self) {
        self.metrics.core.record_clear(self.chain.len() as u64);
        self.map.clear();
        self.chain.clear();
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.chain.iter(),
        }
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        let walk = self
            .chain
            .verify_links()
            .map_err(|msg| InvariantError::new(format!("chain links broken: {}", msg)))?;

        if walk.len() != self.map.len() {
            return Err(InvariantError::new(format!(
                "chain holds {} entries but index holds {}",
                walk.len(),
                self.map.len()
            )));
        }
        if walk.len() > self.config.capacity.get() {
            return Err(InvariantError::new(format!(
                "{} entries exceed capacity {}",
                walk.len(),
                self.config.capacity
            )));
        }
        for (pos, id) in walk.iter().enumerate() {
            let Some((key, _)) = self.chain.get(*id) else {
                return Err(InvariantError::new(format!(
                    "node at position {} vanished during check",
                    pos
                )));
            };
            if self.map.get(key) != Some(id) {
                return Err(InvariantError::new(format!(
                    "index handle for node at position {} does not point back to it",
                    pos
                )));
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn arena_slots(&self) -> usize {
        self.chain.slots()
    }
}

impl<K, V, S> fmt::Debug for FifoSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoSegment")
            .field("capacity", &self.config.capacity)
            .field("len", &self.chain.len())
            .finish()
    }
}

/// A fixed-capacity FIFO queue with key-addressable entries.
///
/// Fresh keys are appended at the back. Once the cache holds `capacity`
/// entries, inserting another fresh key first evicts the oldest one. Lookups
/// and in-place updates never change an entry's position.
///
/// # Examples
///
/// ```
/// use fifo_cache::FifoCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = FifoCache::new(NonZeroUsize::new(2).unwrap());
///
/// cache.enqueue(1, "one").unwrap();
/// cache.enqueue(2, "two").unwrap();
///
/// // Updating a key keeps its place in line
/// cache.put(1, "uno");
///
/// // The cache is full, so key 1 (inserted first) is evicted
/// cache.enqueue(3, "three").unwrap();
/// assert_eq!(cache.get(&1), None);
/// assert_eq!(cache.peek_front(), Some(&"two"));
/// assert_eq!(cache.peek_back(), Some(&"three"));
/// assert_eq!(cache.size(), 2);
/// ```
///
/// # Thread Safety
///
/// `FifoCache` is `Send` but not `Sync`: [`get`](Self::get) takes `&self` and
/// counts hits and misses through `Cell`s. Share it behind a `Mutex`, not an
/// `RwLock`, or use `ConcurrentFifoCache` from the `concurrent` feature.
pub struct FifoCache<K, V, S = DefaultHashBuilder> {
    segment: FifoSegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V> FifoCache<K, V> {
    /// Creates a new FIFO cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> FifoCache<K, V, DefaultHashBuilder> {
        FifoCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new FIFO cache from a configuration with an optional hasher.
    ///
    /// # Example
    ///
    /// ```
    /// use fifo_cache::config::FifoCacheConfig;
    /// use fifo_cache::FifoCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let config = FifoCacheConfig {
    ///     capacity: NonZeroUsize::new(100).unwrap(),
    /// };
    /// let cache: FifoCache<u64, String> = FifoCache::init(config, None);
    /// assert!(cache.is_empty());
    /// ```
    pub fn init(config: FifoCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        FifoCache {
            segment: FifoSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> FifoCache<K, V, S> {
    /// Creates a new FIFO cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self::init_with_hasher(FifoCacheConfig { capacity: cap }, hash_builder)
    }

    /// Creates a new FIFO cache from a configuration and a hash builder.
    pub fn init_with_hasher(config: FifoCacheConfig, hash_builder: S) -> Self {
        FifoCache {
            segment: FifoSegment::init(config, hash_builder),
        }
    }

    /// Maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// Number of entries currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Number of entries currently held. Same as [`len`](Self::len).
    #[inline]
    pub fn size(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if the cache holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Inserts a fresh key at the back of the queue and returns the stored value.
    ///
    /// If the cache is full the oldest entry is evicted first and its value is
    /// dropped. Check [`len`](Self::len) beforehand if that entry matters.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DuplicateKey`] carrying the key and value back if
    /// the key is already present. Nothing is evicted or changed in that case.
    #[inline]
    pub fn enqueue(&mut self, key: K, value: V) -> Result<&V, CacheError<K, V>> {
        self.segment.enqueue(key, value)
    }

    /// Looks up a key without changing its position.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Mutable lookup. Like [`get`](Self::get), never changes position.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Updates the value of an existing key in place, or enqueues a fresh key.
    ///
    /// An update keeps the entry's original queue position, so it stays next
    /// in line for eviction if it was the oldest. A fresh key goes through the
    /// same path as [`enqueue`](Self::enqueue), evicting the oldest entry when
    /// the cache is full.
    ///
    /// Returns the previous value when an existing key was updated.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.put(key, value)
    }

    /// Removes the oldest entry and returns its value, or `None` when empty.
    #[inline]
    pub fn dequeue(&mut self) -> Option<V> {
        self.segment.dequeue()
    }

    /// Removes the oldest entry and returns it with its key.
    #[inline]
    pub fn pop_front(&mut self) -> Option<(K, V)> {
        self.segment.pop_front()
    }

    /// Value of the oldest entry, or `None` when empty.
    #[inline]
    pub fn peek_front(&self) -> Option<&V> {
        self.segment.front().map(|(_, v)| v)
    }

    /// Value of the newest entry, or `None` when empty.
    #[inline]
    pub fn peek_back(&self) -> Option<&V> {
        self.segment.back().map(|(_, v)| v)
    }

    /// Oldest entry with its key.
    #[inline]
    pub fn front(&self) -> Option<(&K, &V)> {
        self.segment.front()
    }

    /// Newest entry with its key.
    #[inline]
    pub fn back(&self) -> Option<(&K, &V)> {
        self.segment.back()
    }

    /// Checks if the cache contains a key. Does not count as a lookup.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains_key(key)
    }

    /// Removes a key from anywhere in the queue and returns its value.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Removes all entries. Capacity and metrics are kept.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Iterates over entries from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.segment.iter()
    }

    /// Verifies that the key index and the node chain agree.
    ///
    /// Checks that both hold the same number of entries, that the count is
    /// within capacity, that every indexed handle points at a node carrying
    /// the same key, and that chain links are mutual inverses.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.check_invariants()
    }
}

impl<K, V, S> FifoCache<K, V, S> {
    #[cfg(feature = "concurrent")]
    pub(crate) fn into_segment(self) -> FifoSegment<K, V, S> {
        self.segment
    }
}

impl<K, V, S> fmt::Debug for FifoCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCache")
            .field("segment", &self.segment)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for FifoCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

impl<'a, K: Hash + Eq + Clone, V, S: BuildHasher> IntoIterator for &'a FifoCache<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// Oldest-to-newest iterator over the entries of a [`FifoCache`].
pub struct Iter<'a, K, V> {
    inner: chain::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k, v))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;

    fn make_cache<K: Hash + Eq + Clone, V>(cap: usize) -> FifoCache<K, V> {
        let config = FifoCacheConfig {
            capacity: NonZeroUsize::new(cap).unwrap(),
        };
        FifoCache::init(config, None)
    }

    fn keys<K: Hash + Eq + Clone, V>(cache: &FifoCache<K, V>) -> Vec<K> {
        cache.iter().map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn test_fifo_enqueue_get() {
        let mut cache = make_cache(2);
        assert_eq!(cache.enqueue("apple", 1), Ok(&1));
        assert_eq!(cache.enqueue("banana", 2), Ok(&2));
        assert_eq!(cache.get(&"apple"), Some(&1));
        assert_eq!(cache.get(&"banana"), Some(&2));
        assert_eq!(cache.get(&"cherry"), None);
        assert_eq!(cache.size(), 2);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_enqueue_duplicate_is_rejected() {
        let mut cache = make_cache(2);
        cache.enqueue("apple", 1).unwrap();
        cache.enqueue("banana", 2).unwrap();

        let err = cache.enqueue("apple", 9).unwrap_err();
        assert_eq!(err.into_parts(), ("apple", 9));

        // Full cache: the rejected call must not have evicted anything
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"apple"), Some(&1));
        assert_eq!(keys(&cache), vec!["apple", "banana"]);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_capacity_limits() {
        let mut cache = make_cache(2);
        cache.enqueue(1, 1).unwrap();
        cache.enqueue(2, 2).unwrap();
        cache.enqueue(3, 3).unwrap();
        assert_eq!(cache.size(), 2);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), Some(&2));
        assert_eq!(cache.get(&3), Some(&3));
        assert_eq!(cache.peek_front(), Some(&2));
        assert_eq!(cache.peek_back(), Some(&3));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_get_does_not_promote() {
        let mut cache = make_cache(3);
        cache.enqueue(1, 10).unwrap();
        cache.enqueue(2, 20).unwrap();
        cache.enqueue(3, 30).unwrap();

        for _ in 0..5 {
            assert_eq!(cache.get(&1), Some(&10));
        }
        if let Some(v) = cache.get_mut(&1) {
            *v = 11;
        }

        cache.enqueue(4, 40).unwrap();
        assert_eq!(cache.get(&1), None);
        assert_eq!(keys(&cache), vec![2, 3, 4]);
    }

    #[test]
    fn test_fifo_put_updates_in_place() {
        let mut cache = make_cache(2);
        cache.enqueue("k1", 1).unwrap();
        cache.enqueue("k2", 2).unwrap();

        assert_eq!(cache.put("k1", 100), Some(1));
        assert_eq!(cache.get(&"k1"), Some(&100));
        assert_eq!(cache.peek_front(), Some(&100));
        assert_eq!(keys(&cache), vec!["k1", "k2"]);

        // k1 keeps its original slot, so it goes first
        cache.enqueue("k3", 3).unwrap();
        assert_eq!(cache.get(&"k1"), None);
        assert_eq!(cache.get(&"k2"), Some(&2));
        assert_eq!(cache.get(&"k3"), Some(&3));
    }

    #[test]
    fn test_fifo_put_missing_key_enqueues() {
        let mut cache = make_cache(2);
        assert_eq!(cache.put("a", 1), None);
        assert_eq!(cache.put("b", 2), None);
        assert_eq!(cache.put("c", 3), None);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.peek_back(), Some(&3));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_dequeue() {
        let mut cache = make_cache(3);
        assert_eq!(cache.dequeue(), None);
        assert_eq!(cache.size(), 0);

        cache.enqueue("a", 1).unwrap();
        cache.enqueue("b", 2).unwrap();
        assert_eq!(cache.dequeue(), Some(1));
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.size(), 1);
        assert_eq!(cache.pop_front(), Some(("b", 2)));
        assert!(cache.is_empty());
        assert_eq!(cache.dequeue(), None);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_peek_on_empty() {
        let cache: FifoCache<u32, u32> = make_cache(1);
        assert_eq!(cache.peek_front(), None);
        assert_eq!(cache.peek_back(), None);
        assert_eq!(cache.front(), None);
        assert_eq!(cache.back(), None);
    }

    #[test]
    fn test_fifo_front_back_entries() {
        let mut cache = make_cache(3);
        cache.enqueue("x", 1).unwrap();
        cache.enqueue("y", 2).unwrap();
        assert_eq!(cache.front(), Some((&"x", &1)));
        assert_eq!(cache.back(), Some((&"y", &2)));
    }

    #[test]
    fn test_fifo_remove() {
        let mut cache = make_cache(3);
        cache.enqueue(1, "a").unwrap();
        cache.enqueue(2, "b").unwrap();
        cache.enqueue(3, "c").unwrap();

        assert_eq!(cache.remove(&2), Some("b"));
        assert_eq!(cache.remove(&2), None);
        assert_eq!(keys(&cache), vec![1, 3]);
        assert!(cache.check_invariants().is_ok());

        // Freed room means no eviction on the next insert
        cache.enqueue(4, "d").unwrap();
        assert_eq!(keys(&cache), vec![1, 3, 4]);
    }

    #[test]
    fn test_fifo_clear() {
        let mut cache = make_cache(2);
        cache.enqueue("apple", 1).unwrap();
        cache.enqueue("banana", 2).unwrap();
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"apple"), None);
        cache.enqueue("cherry", 3).unwrap();
        assert_eq!(cache.get(&"cherry"), Some(&3));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_string_keys_borrow_lookup() {
        let mut cache = make_cache(2);
        cache.enqueue(String::from("apple"), 1).unwrap();
        cache.enqueue(String::from("banana"), 2).unwrap();
        assert_eq!(cache.get("apple"), Some(&1));
        assert!(cache.contains_key("banana"));
        assert_eq!(cache.remove("banana"), Some(2));
        assert!(!cache.contains_key("banana"));
    }

    #[test]
    fn test_fifo_iter_order() {
        let mut cache = make_cache(4);
        for i in 0..6 {
            cache.put(i, i * 10);
        }
        let entries: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
        assert_eq!(entries, vec![(2, 20), (3, 30), (4, 40), (5, 50)]);

        let newest_first: Vec<_> = (&cache).into_iter().rev().map(|(k, _)| *k).collect();
        assert_eq!(newest_first, vec![5, 4, 3, 2]);
        assert_eq!(cache.iter().len(), 4);
    }

    #[test]
    fn test_fifo_round_trip_restores_state() {
        let mut cache = make_cache(3);
        cache.enqueue(9, 99).unwrap();
        assert_eq!(cache.peek_back(), Some(&99));
        assert_eq!(cache.dequeue(), Some(99));
        assert_eq!(cache.get(&9), None);
        assert!(cache.is_empty());

        // A non-empty cache hands back its oldest entry instead
        cache.enqueue(1, 1).unwrap();
        cache.enqueue(2, 2).unwrap();
        assert_eq!(cache.dequeue(), Some(1));
        assert_eq!(keys(&cache), vec![2]);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_steady_state_reuses_slots() {
        let mut cache = make_cache(8);
        for i in 0..8 {
            cache.enqueue(i, i).unwrap();
        }
        let slots = cache.segment.arena_slots();
        for i in 8..1000 {
            cache.enqueue(i, i).unwrap();
            if i % 3 == 0 {
                cache.dequeue();
            }
        }
        assert_eq!(cache.segment.arena_slots(), slots);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_metrics() {
        let mut cache = make_cache(2);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("requests").unwrap(), &0.0);
        assert_eq!(metrics.get("cache_hits").unwrap(), &0.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &0.0);

        cache.enqueue("apple", 1).unwrap();
        cache.enqueue("banana", 2).unwrap();
        cache.get(&"apple");
        cache.get(&"banana");
        cache.get(&"cherry");
        let metrics = cache.metrics();
        assert_eq!(metrics.get("cache_hits").unwrap(), &2.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &1.0);
        assert_eq!(metrics.get("requests").unwrap(), &3.0);

        let _ = cache.enqueue("apple", 5);
        cache.put("apple", 6);
        cache.put("cherry", 3);
        cache.dequeue();
        let metrics = cache.metrics();
        assert_eq!(metrics.get("duplicate_rejections").unwrap(), &1.0);
        assert_eq!(metrics.get("updates").unwrap(), &1.0);
        assert_eq!(metrics.get("put_inserts").unwrap(), &1.0);
        assert_eq!(metrics.get("evictions").unwrap(), &1.0);
        assert_eq!(metrics.get("dequeues").unwrap(), &1.0);
        assert_eq!(metrics.get("entries").unwrap(), &1.0);
        assert_eq!(cache.algorithm_name(), "FIFO");
    }

    #[test]
    fn test_fifo_segment_directly() {
        let mut segment: FifoSegment<&str, i32, DefaultHashBuilder> = FifoSegment::init(
            FifoCacheConfig {
                capacity: NonZeroUsize::new(2).unwrap(),
            },
            DefaultHashBuilder::default(),
        );
        assert_eq!(segment.len(), 0);
        assert!(segment.is_empty());
        assert_eq!(segment.cap().get(), 2);
        segment.enqueue("a", 1).unwrap();
        segment.enqueue("b", 2).unwrap();
        assert_eq!(segment.len(), 2);
        assert_eq!(segment.get(&"a"), Some(&1));
        assert_eq!(segment.get(&"b"), Some(&2));
    }

    #[test]
    fn test_fifo_check_invariants_detects_stale_index() {
        let mut cache = make_cache(3);
        cache.enqueue(1, 1).unwrap();
        cache.enqueue(2, 2).unwrap();
        cache.segment.map.remove(&1);
        let err = cache.check_invariants().unwrap_err();
        assert!(err.message().contains("index"));
    }

    #[test]
    fn test_fifo_behind_mutex() {
        extern crate std;
        use std::sync::{Arc, Mutex};
        use std::thread;

        let cache = Arc::new(Mutex::new(make_cache::<String, usize>(100)));
        let num_threads = 4;
        let ops_per_thread = 100;

        let mut handles: Vec<std::thread::JoinHandle<()>> = Vec::new();

        for t in 0..num_threads {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = std::format!("thread_{}_key_{}", t, i);
                    let mut guard = cache.lock().unwrap();
                    guard.put(key, t * 1000 + i);
                    if i % 7 == 0 {
                        guard.dequeue();
                    }
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        let guard = cache.lock().unwrap();
        assert!(guard.len() <= 100);
        assert!(!guard.is_empty());
        assert!(guard.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_scoped_pool_batches() {
        let mut pool = scoped_threadpool::Pool::new(4);
        let mut caches: Vec<FifoCache<usize, usize>> = (0..4).map(|_| make_cache(16)).collect();

        pool.scoped(|scope| {
            for (t, cache) in caches.iter_mut().enumerate() {
                scope.execute(move || {
                    for i in 0..64 {
                        cache.put(i, t * 100 + i);
                    }
                });
            }
        });

        for (t, cache) in caches.iter().enumerate() {
            assert_eq!(cache.len(), 16);
            assert_eq!(cache.peek_front(), Some(&(t * 100 + 48)));
            assert_eq!(cache.peek_back(), Some(&(t * 100 + 63)));
        }
    }

    #[test]
    fn test_fifo_huge_capacity_grows_on_demand() {
        let mut cache: FifoCache<u32, u32> = FifoCache::new(NonZeroUsize::MAX);
        assert_eq!(cache.cap(), NonZeroUsize::MAX);
        assert!(cache.segment.arena_slots() <= MAX_PREALLOC + 2);

        cache.enqueue(1, 10).unwrap();
        cache.enqueue(2, 20).unwrap();
        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.dequeue(), Some(10));
        assert_eq!(cache.peek_front(), Some(&20));
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_fifo_send_and_mutex_sync() {
        extern crate std;
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<FifoCache<String, Vec<u8>>>();
        assert_sync::<std::sync::Mutex<FifoCache<String, Vec<u8>>>>();
    }
}

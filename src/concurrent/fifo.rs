//! Concurrent FIFO Cache Implementation
//!
//! A thread-safe FIFO queue cache. This is the multi-threaded counterpart to
//! [`FifoCache`](crate::FifoCache).
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             ConcurrentFifoCache              │
//! │                                              │
//! │   ┌──────────────────────────────────────┐   │
//! │   │            Mutex (single)            │   │
//! │   └──────────────────┬───────────────────┘   │
//! │                      │                       │
//! │   ┌──────────────────▼───────────────────┐   │
//! │   │  FifoSegment: index + node chain     │   │
//! │   └──────────────────────────────────────┘   │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Performance Characteristics
//!
//! | Metric | Value |
//! |--------|-------|
//! | Every operation | O(1) average plus one lock acquisition |
//! | Concurrency | Fully serialized |
//!
//! # When to Use
//!
//! **Use ConcurrentFifoCache when:**
//! - Multiple threads share one queue and need exact global FIFO eviction
//! - Callers want owned values back without managing a lock themselves
//!
//! **Consider alternatives when:**
//! - Single-threaded access only → use `FifoCache`
//! - Several operations must happen atomically → use [`with_lock`](ConcurrentFifoCache::with_lock)

extern crate alloc;

use crate::config::{ConcurrentFifoCacheConfig, FifoCacheConfig};
use crate::error::{CacheError, InvariantError};
use crate::fifo::FifoSegment;
use crate::metrics::CacheMetrics;
use crate::FifoCache;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe FIFO queue cache guarded by a single lock.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Clone + Send`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```rust
/// use fifo_cache::ConcurrentFifoCache;
/// use core::num::NonZeroUsize;
///
/// let cache = ConcurrentFifoCache::new(NonZeroUsize::new(2).unwrap());
/// cache.enqueue("a", 1).unwrap();
/// cache.enqueue("b", 2).unwrap();
/// cache.enqueue("c", 3).unwrap();
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.peek_front(), Some(2));
/// ```
pub struct ConcurrentFifoCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<FifoSegment<K, V, S>>,
}

impl<K, V> ConcurrentFifoCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    /// Creates a new concurrent FIFO cache holding at most `cap` entries.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::init_with_hasher(
            ConcurrentFifoCacheConfig {
                base: FifoCacheConfig { capacity: cap },
            },
            DefaultHashBuilder::default(),
        )
    }

    /// Creates a new concurrent FIFO cache from a configuration with an
    /// optional hasher.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fifo_cache::ConcurrentFifoCache;
    /// use fifo_cache::config::{ConcurrentFifoCacheConfig, FifoCacheConfig};
    /// use core::num::NonZeroUsize;
    ///
    /// let config = ConcurrentFifoCacheConfig {
    ///     base: FifoCacheConfig {
    ///         capacity: NonZeroUsize::new(10_000).unwrap(),
    ///     },
    /// };
    /// let cache: ConcurrentFifoCache<String, i32> = ConcurrentFifoCache::init(config, None);
    /// assert_eq!(cache.capacity(), 10_000);
    /// ```
    pub fn init(config: ConcurrentFifoCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self::init_with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentFifoCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    /// Creates a concurrent FIFO cache with a custom hash builder.
    pub fn init_with_hasher(config: ConcurrentFifoCacheConfig, hash_builder: S) -> Self {
        Self {
            segment: Mutex::new(FifoSegment::init(config.base, hash_builder)),
        }
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.segment.lock().cap().get()
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Number of entries currently held. Same as [`len`](Self::len).
    pub fn size(&self) -> usize {
        self.len()
    }

    /// Returns `true` if the cache contains no entries.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Inserts a fresh key at the back, evicting the oldest entry if full.
    ///
    /// Returns a clone of the stored value.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::DuplicateKey`] if the key is already present.
    pub fn enqueue(&self, key: K, value: V) -> Result<V, CacheError<K, V>> {
        let mut segment = self.segment.lock();
        segment.enqueue(key, value).map(V::clone)
    }

    /// Retrieves a clone of the value for `key`.
    ///
    /// For operations that don't need ownership, use
    /// [`get_with()`](Self::get_with) instead.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let segment = self.segment.lock();
        segment.get(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the lock.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fifo_cache::ConcurrentFifoCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = ConcurrentFifoCache::new(NonZeroUsize::new(4).unwrap());
    /// cache.put("greeting", String::from("hello"));
    /// assert_eq!(cache.get_with(&"greeting", |v| v.len()), Some(5));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        let segment = self.segment.lock();
        segment.get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value for `key`.
    ///
    /// The entry keeps its position in the queue.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        let mut segment = self.segment.lock();
        segment.get_mut(key).map(f)
    }

    /// Updates an existing key in place, or enqueues a fresh key.
    ///
    /// Returns the previous value when an existing key was updated.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut segment = self.segment.lock();
        segment.put(key, value)
    }

    /// Removes the oldest entry and returns its value, or `None` when empty.
    pub fn dequeue(&self) -> Option<V> {
        let mut segment = self.segment.lock();
        segment.dequeue()
    }

    /// Removes the oldest entry and returns it with its key.
    pub fn pop_front(&self) -> Option<(K, V)> {
        let mut segment = self.segment.lock();
        segment.pop_front()
    }

    /// Clone of the oldest value, or `None` when empty.
    pub fn peek_front(&self) -> Option<V> {
        self.peek_front_with(V::clone)
    }

    /// Clone of the newest value, or `None` when empty.
    pub fn peek_back(&self) -> Option<V> {
        self.peek_back_with(V::clone)
    }

    /// Applies `f` to the oldest value while holding the lock.
    pub fn peek_front_with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let segment = self.segment.lock();
        segment.front().map(|(_, v)| f(v))
    }

    /// Applies `f` to the newest value while holding the lock.
    pub fn peek_back_with<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let segment = self.segment.lock();
        segment.back().map(|(_, v)| f(v))
    }

    /// Checks if the cache contains a key. Does not count as a lookup.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let segment = self.segment.lock();
        segment.contains_key(key)
    }

    /// Removes a key from anywhere in the queue.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let mut segment = self.segment.lock();
        segment.remove(key)
    }

    /// Removes all entries.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Verifies that the key index and the node chain agree.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.lock().check_invariants()
    }

    /// Runs `f` against the whole cache under a single lock acquisition.
    ///
    /// Use this when several operations must be observed as one step, such
    /// as checking the front before dequeuing it.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fifo_cache::ConcurrentFifoCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = ConcurrentFifoCache::new(NonZeroUsize::new(4).unwrap());
    /// cache.put(1, 10);
    /// cache.put(2, 20);
    ///
    /// // Dequeue only if the oldest value is small
    /// let taken = cache.with_lock(|c| match c.peek_front() {
    ///     Some(&v) if v < 15 => c.dequeue(),
    ///     _ => None,
    /// });
    /// assert_eq!(taken, Some(10));
    /// ```
    pub fn with_lock<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut LockedFifoCache<'_, K, V, S>) -> R,
    {
        let mut segment = self.segment.lock();
        let mut locked = LockedFifoCache {
            segment: &mut *segment,
        };
        f(&mut locked)
    }
}

/// Exclusive view of a [`ConcurrentFifoCache`] handed to
/// [`with_lock`](ConcurrentFifoCache::with_lock).
///
/// Offers the single-threaded [`FifoCache`] API with borrowed results.
pub struct LockedFifoCache<'a, K, V, S> {
    segment: &'a mut FifoSegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> LockedFifoCache<'_, K, V, S> {
    /// See [`FifoCache::enqueue`].
    pub fn enqueue(&mut self, key: K, value: V) -> Result<&V, CacheError<K, V>> {
        self.segment.enqueue(key, value)
    }

    /// See [`FifoCache::get`].
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// See [`FifoCache::put`].
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.put(key, value)
    }

    /// See [`FifoCache::dequeue`].
    pub fn dequeue(&mut self) -> Option<V> {
        self.segment.dequeue()
    }

    /// See [`FifoCache::peek_front`].
    pub fn peek_front(&self) -> Option<&V> {
        self.segment.front().map(|(_, v)| v)
    }

    /// See [`FifoCache::peek_back`].
    pub fn peek_back(&self) -> Option<&V> {
        self.segment.back().map(|(_, v)| v)
    }

    /// See [`FifoCache::size`].
    pub fn size(&self) -> usize {
        self.segment.len()
    }

    /// See [`FifoCache::iter`].
    pub fn iter(&self) -> crate::fifo::Iter<'_, K, V> {
        self.segment.iter()
    }
}

impl<K, V, S> fmt::Debug for LockedFifoCache<'_, K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedFifoCache")
            .field("segment", &self.segment)
            .finish()
    }
}

impl<K, V, S> fmt::Debug for ConcurrentFifoCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segment.try_lock() {
            Some(segment) => f
                .debug_struct("ConcurrentFifoCache")
                .field("segment", &*segment)
                .finish(),
            None => f
                .debug_struct("ConcurrentFifoCache")
                .finish_non_exhaustive(),
        }
    }
}

impl<K, V, S> From<FifoCache<K, V, S>> for ConcurrentFifoCache<K, V, S> {
    fn from(cache: FifoCache<K, V, S>) -> Self {
        Self {
            segment: Mutex::new(cache.into_segment()),
        }
    }
}

impl<K, V, S> CacheMetrics for ConcurrentFifoCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentFIFO"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::sync::Arc;
    use std::thread;
    use std::vec::Vec;

    fn make_cache(cap: usize) -> ConcurrentFifoCache<usize, usize> {
        let config = ConcurrentFifoCacheConfig {
            base: FifoCacheConfig {
                capacity: NonZeroUsize::new(cap).unwrap(),
            },
        };
        ConcurrentFifoCache::init(config, None)
    }

    #[test]
    fn test_concurrent_fifo_basic_operations() {
        let cache = make_cache(2);
        assert_eq!(cache.enqueue(1, 10), Ok(10));
        assert_eq!(cache.enqueue(2, 20), Ok(20));
        assert!(cache.enqueue(1, 99).is_err());
        assert_eq!(cache.get(&1), Some(10));

        assert_eq!(cache.put(1, 11), Some(10));
        cache.put(3, 30);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.peek_front(), Some(20));
        assert_eq!(cache.peek_back(), Some(30));
        assert_eq!(cache.size(), 2);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_concurrent_fifo_dequeue_and_empty() {
        let cache = make_cache(3);
        assert_eq!(cache.dequeue(), None);
        assert_eq!(cache.peek_front(), None);
        assert_eq!(cache.peek_back(), None);
        assert!(cache.is_empty());

        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.pop_front(), Some((1, 1)));
        assert_eq!(cache.dequeue(), Some(2));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_concurrent_fifo_with_lock_is_atomic() {
        let cache = make_cache(3);
        cache.put(1, 1);
        cache.put(2, 2);
        let drained: Vec<usize> = cache.with_lock(|c| {
            let mut out = Vec::new();
            while let Some(v) = c.dequeue() {
                out.push(v);
            }
            out
        });
        assert_eq!(drained, std::vec![1, 2]);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_fifo_from_single_threaded() {
        let mut single = FifoCache::new(NonZeroUsize::new(2).unwrap());
        single.enqueue(5usize, 50usize).unwrap();
        let cache: ConcurrentFifoCache<usize, usize> = single.into();
        assert_eq!(cache.get(&5), Some(50));
        assert_eq!(cache.capacity(), 2);
    }

    #[test]
    fn test_concurrent_fifo_threads_respect_capacity() {
        let cache = Arc::new(make_cache(64));
        let mut handles = Vec::new();
        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..500 {
                    cache.put(t * 1000 + i, i);
                    let _ = cache.get(&(t * 1000 + i));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 64);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_concurrent_fifo_scoped_pool() {
        let cache = make_cache(128);
        let mut pool = scoped_threadpool::Pool::new(4);
        pool.scoped(|scope| {
            for t in 0..4 {
                let cache = &cache;
                scope.execute(move || {
                    for i in 0..32 {
                        cache.enqueue(t * 32 + i, i).unwrap();
                    }
                });
            }
        });
        assert_eq!(cache.len(), 128);
        assert!(cache.check_invariants().is_ok());
    }

    #[test]
    fn test_concurrent_fifo_metrics() {
        let cache = make_cache(1);
        cache.put(1, 1);
        cache.put(2, 2);
        let _ = cache.get(&2);
        let _ = cache.get(&1);
        let metrics = cache.metrics();
        assert_eq!(metrics.get("evictions").unwrap(), &1.0);
        assert_eq!(metrics.get("cache_hits").unwrap(), &1.0);
        assert_eq!(metrics.get("cache_misses").unwrap(), &1.0);
        assert_eq!(cache.algorithm_name(), "ConcurrentFIFO");
    }
}

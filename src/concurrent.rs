//! Concurrent Cache Implementation
//!
//! This module provides a thread-safe wrapper around the FIFO cache.
//!
//! # Architecture
//!
//! The whole cache sits behind a single `parking_lot::Mutex`. Every operation
//! takes the lock, runs to completion, and releases it, so no caller can ever
//! observe the index and the node chain out of sync.
//!
//! ## Why one lock instead of striped segments?
//!
//! Lock striping partitions keys across independent segments, and each
//! segment would evict its own oldest entry. That gives up the property this
//! cache exists for: strict, global oldest-first eviction and a single
//! front/back to peek at. A single lock keeps `dequeue`, `peek_front` and
//! `peek_back` exact.
//!
//! ## Why Mutex instead of RwLock?
//!
//! `get` does not reorder entries, but it does bump hit/miss counters, which
//! live in `Cell`s and are therefore not `Sync`. Every access goes through the
//! mutex.
//!
//! # Example
//!
//! ```rust
//! use fifo_cache::ConcurrentFifoCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentFifoCache::new(NonZeroUsize::new(1000).unwrap()));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             cache.put(format!("key_{}_{}", t, i), i);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```
//!
//! # Zero-Copy Access
//!
//! Methods returning values hand out clones so the lock is not held by the
//! caller. Use the `*_with` methods to read a value in place while the lock
//! is held, or [`with_lock`](ConcurrentFifoCache::with_lock) to run several
//! operations as one atomic step.

mod fifo;

pub use self::fifo::{ConcurrentFifoCache, LockedFifoCache};

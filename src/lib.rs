#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Queue Semantics
//!
//! ```text
//!  dequeue / evict                                   enqueue / put (fresh key)
//!        ◀──── [ oldest ] [ ... ] [ ... ] [ newest ] ◀────
//!                  ▲                          ▲
//!             peek_front                  peek_back
//! ```
//!
//! - `enqueue` accepts only fresh keys and evicts the oldest entry when full
//! - `put` updates an existing key **in place** (no reordering) or enqueues
//! - `get` is a pure lookup; reads never promote an entry
//! - `dequeue`, `peek_front` and `peek_back` return `None` on an empty cache
//!
//! ```rust
//! use fifo_cache::FifoCache;
//! use fifo_cache::config::FifoCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = FifoCacheConfig {
//!     capacity: NonZeroUsize::new(2).unwrap(),
//! };
//! let mut cache = FifoCache::init(config, None);
//!
//! cache.enqueue(1, 1).unwrap();
//! cache.enqueue(2, 2).unwrap();
//! cache.enqueue(3, 3).unwrap();
//!
//! assert_eq!(cache.size(), 2);
//! assert_eq!(cache.get(&1), None);
//! assert_eq!(cache.get(&2), Some(&2));
//! assert_eq!(cache.peek_front(), Some(&2));
//! assert_eq!(cache.peek_back(), Some(&3));
//! ```
//!
//! ## Concurrent Cache
//!
//! Enable the `concurrent` feature for a thread-safe version:
//!
//! ```toml
//! [dependencies]
//! fifo-cache = { version = "0.1", features = ["concurrent"] }
//! ```
//!
//! ```rust,ignore
//! use fifo_cache::ConcurrentFifoCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(ConcurrentFifoCache::new(NonZeroUsize::new(10_000).unwrap()));
//!
//! let cache_clone = Arc::clone(&cache);
//! std::thread::spawn(move || {
//!     cache_clone.put("key".to_string(), 42);
//! });
//! ```
//!
//! ## Modules
//!
//! - [`fifo`]: FIFO queue cache implementation
//! - [`config`]: Configuration structures
//! - [`error`]: Error types
//! - [`metrics`]: Metrics collection for cache monitoring
//! - `concurrent`: Lock-guarded concurrent cache (requires `concurrent` feature)

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Arena-backed doubly linked chain with sentinel endpoints.
///
/// **Note**: This module is internal infrastructure. Handles into the arena
/// are only valid while the owning cache keeps its key index in sync.
pub(crate) mod chain;

/// Cache configuration structures.
pub mod config;

/// Error types.
///
/// Provides `CacheError` (duplicate keys), `ConfigError` and `InvariantError`.
pub mod error;

/// First In, First Out (FIFO) queue cache implementation.
///
/// Provides a fixed-size, key-addressable queue that evicts the entry inserted
/// earliest when capacity is reached.
pub mod fifo;

/// Cache metrics system.
///
/// Provides BTreeMap-based metrics reporting through the `CacheMetrics` trait.
pub mod metrics;

/// Concurrent cache implementation.
///
/// Provides a thread-safe FIFO cache guarded by a single lock.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use error::{CacheError, ConfigError, InvariantError};
pub use fifo::FifoCache;

#[cfg(feature = "concurrent")]
pub use concurrent::{ConcurrentFifoCache, LockedFifoCache};

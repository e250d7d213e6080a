//! Cache Configuration Module
//!
//! This module provides the configuration structures for the FIFO cache and
//! its lock-guarded concurrent wrapper.
//!
//! # Design Philosophy
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: `NonZeroUsize` makes a zero capacity unrepresentable
//! - **Runtime input**: [`FifoCacheConfig::try_new`] validates a plain `usize`
//!
//! | Config | Cache |
//! |--------|-------|
//! | `FifoCacheConfig` | [`FifoCache`](crate::FifoCache) |
//! | `ConcurrentFifoCacheConfig` | `ConcurrentFifoCache` (requires `concurrent` feature) |
//!
//! # Examples
//!
//! ```
//! use fifo_cache::config::FifoCacheConfig;
//! use fifo_cache::FifoCache;
//! use core::num::NonZeroUsize;
//!
//! let config = FifoCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: FifoCache<String, i32> = FifoCache::init(config, None);
//! assert_eq!(cache.cap().get(), 1000);
//! ```

pub mod fifo;

pub use fifo::FifoCacheConfig;

/// Configuration for a [`ConcurrentFifoCache`](crate::ConcurrentFifoCache).
///
/// Wraps the single-threaded configuration. The whole cache sits behind one
/// lock, so there is no segment count to tune: splitting the key space would
/// give each segment its own eviction order and break global FIFO ordering.
///
/// # Example
///
/// ```
/// use fifo_cache::config::{ConcurrentFifoCacheConfig, FifoCacheConfig};
/// use core::num::NonZeroUsize;
///
/// let config = ConcurrentFifoCacheConfig {
///     base: FifoCacheConfig {
///         capacity: NonZeroUsize::new(10_000).unwrap(),
///     },
/// };
/// assert_eq!(config.base.capacity.get(), 10_000);
/// ```
#[cfg(feature = "concurrent")]
#[derive(Clone, Copy)]
pub struct ConcurrentFifoCacheConfig {
    /// Base configuration for the guarded cache.
    pub base: FifoCacheConfig,
}

#[cfg(feature = "concurrent")]
impl core::fmt::Debug for ConcurrentFifoCacheConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentFifoCacheConfig")
            .field("base", &self.base)
            .finish()
    }
}

//! Configuration for the FIFO queue cache.
//!
//! The only tunable is `capacity`: the maximum number of entries held at
//! once. When an insert of a fresh key finds the cache full, the oldest entry
//! is evicted first, so the cache never holds more than `capacity` entries.
//!
//! # Examples
//!
//! ```
//! use fifo_cache::config::FifoCacheConfig;
//! use fifo_cache::FifoCache;
//! use core::num::NonZeroUsize;
//!
//! // Known-good capacity at compile time
//! let config = FifoCacheConfig {
//!     capacity: NonZeroUsize::new(500).unwrap(),
//! };
//! let cache: FifoCache<&str, i32> = FifoCache::init(config, None);
//!
//! // Capacity read from user input
//! let config = FifoCacheConfig::try_new(64).expect("non-zero capacity");
//! let cache: FifoCache<u64, Vec<u8>> = FifoCache::init(config, None);
//! ```

use crate::error::ConfigError;
use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for a FIFO (First In, First Out) queue cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of key-value pairs the cache can hold. Fixed
///   for the lifetime of the cache.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FifoCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl FifoCacheConfig {
    /// Creates a configuration from a plain capacity.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `capacity` is zero.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| ConfigError::new("capacity must be greater than zero"))?;
        Ok(Self { capacity })
    }
}

impl fmt::Debug for FifoCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FifoCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_config_creation() {
        let config = FifoCacheConfig {
            capacity: NonZeroUsize::new(1000).unwrap(),
        };
        assert_eq!(config.capacity.get(), 1000);
    }

    #[test]
    fn test_fifo_config_try_new() {
        let config = FifoCacheConfig::try_new(8).unwrap();
        assert_eq!(config.capacity.get(), 8);

        let err = FifoCacheConfig::try_new(0).unwrap_err();
        assert!(err.message().contains("capacity"));
    }
}

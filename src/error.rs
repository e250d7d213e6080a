//! Error types for the FIFO cache.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by [`FifoCache::enqueue`](crate::FifoCache::enqueue)
//!   when the key is already present. The rejected key and value are handed
//!   back so the caller can retry with `put` without cloning.
//! - [`ConfigError`]: Returned when configuration parameters are invalid
//!   (zero capacity).
//! - [`InvariantError`]: Returned by `check_invariants` when the index and the
//!   node chain disagree.
//!
//! An empty cache is not an error: `dequeue`, `peek_front` and `peek_back`
//! report emptiness with `None`.
//!
//! ## Example Usage
//!
//! ```
//! use fifo_cache::{CacheError, FifoCache};
//! use core::num::NonZeroUsize;
//!
//! let mut cache = FifoCache::new(NonZeroUsize::new(2).unwrap());
//! cache.enqueue("a", 1).unwrap();
//!
//! match cache.enqueue("a", 2) {
//!     Err(CacheError::DuplicateKey { key, value }) => {
//!         assert_eq!((key, value), ("a", 2));
//!     }
//!     Ok(_) => unreachable!(),
//! }
//! assert_eq!(cache.get(&"a"), Some(&1));
//! ```

extern crate alloc;

use alloc::string::String;
use core::fmt;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache operations that require a fresh key.
#[derive(Clone, PartialEq, Eq)]
pub enum CacheError<K, V> {
    /// The key is already present; the cache was left unchanged.
    DuplicateKey {
        /// The rejected key.
        key: K,
        /// The value that was not inserted.
        value: V,
    },
}

impl<K, V> CacheError<K, V> {
    /// Returns the rejected key and value.
    pub fn into_parts(self) -> (K, V) {
        match self {
            CacheError::DuplicateKey { key, value } => (key, value),
        }
    }

    /// Returns a reference to the rejected key.
    pub fn key(&self) -> &K {
        match self {
            CacheError::DuplicateKey { key, .. } => key,
        }
    }
}

// Keys and values are not required to be Debug.
impl<K, V> fmt::Debug for CacheError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::DuplicateKey { .. } => f.debug_struct("DuplicateKey").finish_non_exhaustive(),
        }
    }
}

impl<K, V> fmt::Display for CacheError<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::DuplicateKey { .. } => {
                f.write_str("key is already present in the cache; use put to update it")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<K, V> std::error::Error for CacheError<K, V> {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// # Example
///
/// ```
/// use fifo_cache::config::FifoCacheConfig;
///
/// let err = FifoCacheConfig::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when the index and the node chain are out of sync.
///
/// Produced by [`FifoCache::check_invariants`](crate::FifoCache::check_invariants).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvariantError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::ToString;

    #[test]
    fn test_duplicate_key_into_parts() {
        let err: CacheError<&str, i32> = CacheError::DuplicateKey {
            key: "apple",
            value: 7,
        };
        assert_eq!(err.key(), &"apple");
        assert_eq!(err.into_parts(), ("apple", 7));
    }

    #[test]
    fn test_duplicate_key_display_and_debug() {
        struct Opaque;
        let err: CacheError<Opaque, Opaque> = CacheError::DuplicateKey {
            key: Opaque,
            value: Opaque,
        };
        assert!(err.to_string().contains("already present"));
        assert!(format!("{:?}", err).starts_with("DuplicateKey"));
    }

    #[test]
    fn test_config_error_message() {
        let err = ConfigError::new("capacity must be greater than zero");
        assert_eq!(err.message(), "capacity must be greater than zero");
        assert_eq!(err.to_string(), err.message());
    }

    #[test]
    fn test_invariant_error_message() {
        let err = InvariantError::new("len mismatch");
        assert_eq!(err.message(), "len mismatch");
        assert_eq!(err.to_string(), "len mismatch");
    }
}

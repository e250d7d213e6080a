//! FIFO Cache Metrics
//!
//! Metrics specific to the FIFO queue cache.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// FIFO-specific metrics (extends CoreCacheMetrics).
#[derive(Debug, Clone)]
pub struct FifoCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,
    /// Number of `put` calls that fell through to a fresh insert.
    pub put_inserts: u64,
}

impl FifoCacheMetrics {
    /// Creates zeroed metrics for a cache holding at most `capacity` entries.
    pub fn new(capacity: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(capacity),
            put_inserts: 0,
        }
    }

    /// Records a `put` on a missing key that was delegated to `enqueue`.
    #[inline]
    pub fn record_put_insert(&mut self) {
        self.put_inserts += 1;
    }

    /// Converts FIFO metrics to a BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("put_inserts".to_string(), self.put_inserts as f64);
        metrics
    }
}

impl CacheMetrics for FifoCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "FIFO"
    }
}

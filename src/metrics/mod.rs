//! Cache Metrics System
//!
//! Provides BTreeMap-based metrics reporting for the FIFO cache. Counters are
//! kept in [`CoreCacheMetrics`] and exported through the [`CacheMetrics`]
//! trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for testing and benchmarking comparisons
//! - **Stable serialization**: JSON/CSV exports have predictable key ordering
//!
//! # Lookups through `&self`
//!
//! `get` and `peek_*` do not mutate the cache, so request and hit counters are
//! stored in [`Cell`]s. The cache stays `Send` but is not `Sync`: share it
//! across threads behind a `Mutex` or through the `concurrent` wrapper.
//! `RwLock<FifoCache>` is not `Sync` and cannot be shared.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::cell::Cell;

pub mod fifo;

pub use fifo::FifoCacheMetrics;

/// Counters tracked by every cache in this crate.
#[derive(Debug, Default, Clone)]
pub struct CoreCacheMetrics {
    requests: Cell<u64>,
    cache_hits: Cell<u64>,
    insertions: u64,
    updates: u64,
    evictions: u64,
    dequeues: u64,
    removals: u64,
    duplicate_rejections: u64,
    capacity: u64,
}

impl CoreCacheMetrics {
    /// Creates zeroed counters for a cache holding at most `capacity` entries.
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&self) {
        self.requests.set(self.requests.get() + 1);
        self.cache_hits.set(self.cache_hits.get() + 1);
    }

    /// Records a lookup that did not find its key.
    #[inline]
    pub fn record_miss(&self) {
        self.requests.set(self.requests.get() + 1);
    }

    /// Records a fresh key linked at the back of the queue.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an in-place value update of an existing key.
    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records the oldest entry being dropped to make room for a new one.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an explicit removal from the front of the queue.
    #[inline]
    pub fn record_dequeue(&mut self) {
        self.dequeues += 1;
    }

    /// Records a removal by key.
    #[inline]
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Records an `enqueue` rejected because the key was already present.
    #[inline]
    pub fn record_duplicate_rejection(&mut self) {
        self.duplicate_rejections += 1;
    }

    /// Total lookups.
    pub fn requests(&self) -> u64 {
        self.requests.get()
    }

    /// Lookups that found their key.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.get()
    }

    /// Lookups that did not find their key.
    pub fn cache_misses(&self) -> u64 {
        self.requests.get() - self.cache_hits.get()
    }

    /// Fresh keys inserted.
    pub fn insertions(&self) -> u64 {
        self.insertions
    }

    /// In-place updates.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Capacity-triggered evictions.
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    /// Explicit dequeues that returned an entry.
    pub fn dequeues(&self) -> u64 {
        self.dequeues
    }

    /// Removals by key.
    pub fn removals(&self) -> u64 {
        self.removals
    }

    /// Rejected duplicate enqueues.
    pub fn duplicate_rejections(&self) -> u64 {
        self.duplicate_rejections
    }

    /// Configured capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of entries currently held, derived from the counters.
    pub fn entries(&self) -> u64 {
        self.insertions - self.evictions - self.dequeues - self.removals
    }

    /// Forgets the entries counted so far after the cache was cleared.
    ///
    /// Cleared entries are folded into `removals` so that `entries()` drops to
    /// zero without losing the insertion history.
    pub fn record_clear(&mut self, cleared: u64) {
        self.removals += cleared;
    }

    /// Hit rate between 0.0 and 1.0, or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let requests = self.requests.get();
        if requests > 0 {
            self.cache_hits.get() as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Miss rate between 0.0 and 1.0, or 0.0 if no lookups have been made.
    pub fn miss_rate(&self) -> f64 {
        let requests = self.requests.get();
        if requests > 0 {
            self.cache_misses() as f64 / requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of capacity in use.
    pub fn utilization(&self) -> f64 {
        if self.capacity > 0 {
            self.entries() as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        // Basic counters
        metrics.insert("requests".to_string(), self.requests() as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits() as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("dequeues".to_string(), self.dequeues as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert(
            "duplicate_rejections".to_string(),
            self.duplicate_rejections as f64,
        );

        // Rates (0.0 to 1.0)
        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        // Occupancy
        metrics.insert("entries".to_string(), self.entries() as f64);
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("utilization".to_string(), self.utilization());

        if self.insertions > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.insertions as f64,
            );
        }

        metrics
    }
}

/// Trait that caches implement for metrics reporting.
///
/// Uses BTreeMap so that metric keys are always reported in the same order.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "FIFO").
    fn algorithm_name(&self) -> &'static str;
}

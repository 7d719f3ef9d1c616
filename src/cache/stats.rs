/// Counters kept by each cache instance.
///
/// Mutated only through `&mut self` on the owning cache (or under the lock of the
/// concurrent wrapper), so plain integers are enough.
#[derive(Debug, Default, Clone)]
pub(crate) struct CacheMetrics {
    hits: u64,
    misses: u64,
    inserts: u64,
    updates: u64,
    evictions: u64,
    removals: u64,
}

impl CacheMetrics {
    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub(crate) fn record_insert(&mut self) {
        self.inserts += 1;
    }

    pub(crate) fn record_update(&mut self) {
        self.updates += 1;
    }

    pub(crate) fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub(crate) fn record_removal(&mut self) {
        self.removals += 1;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            hits: self.hits,
            misses: self.misses,
            inserts: self.inserts,
            updates: self.updates,
            evictions: self.evictions,
            removals: self.removals,
        }
    }
}

/// Point-in-time copy of a cache's counters.
///
/// `inserts` counts new keys, `updates` counts value replacements on resident keys,
/// `removals` counts explicit removals (evictions are counted separately).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub updates: u64,
    pub evictions: u64,
    pub removals: u64,
}

impl CacheMetricsSnapshot {
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.lookups();
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

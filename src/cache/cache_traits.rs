//! # Cache Trait Hierarchy
//!
//! Policy-agnostic operations live in [`CoreCache`]; key-based removal is layered on
//! in [`MutableCache`]; recency-specific operations in [`LRUCacheTrait`].
//!
//! ```text
//!   ┌─────────────────────────────────────────┐
//!   │            CoreCache<K, V>              │
//!   │                                         │
//!   │  insert(&mut, K, V) → Option<V>         │
//!   │  get(&mut, &K) → Option<&V>             │
//!   │  contains(&, &K) → bool                 │
//!   │  len(&) → usize                         │
//!   │  is_empty(&) → bool                     │
//!   │  capacity(&) → usize                    │
//!   │  clear(&mut)                            │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          MutableCache<K, V>             │
//!   │                                         │
//!   │  remove(&K) → Option<V>                 │
//!   │  erase(&K) → bool                       │
//!   │  remove_batch(&[K]) → Vec<Option<V>>    │
//!   └──────────────────┬──────────────────────┘
//!                      │
//!                      ▼
//!   ┌─────────────────────────────────────────┐
//!   │          LRUCacheTrait<K, V>            │
//!   │                                         │
//!   │  pop_lru() → Option<(K, V)>             │
//!   │  peek_lru() → Option<(&K, &V)>          │
//!   │  touch(&K) → bool                       │
//!   │  recency_rank(&K) → Option<usize>       │
//!   └─────────────────────────────────────────┘
//! ```
//!
//! ## Absent values
//!
//! A lookup miss is an ordinary outcome and is always reported as `None`. None of
//! these operations can fail; the only fallible step is construction, which returns
//! [`CacheError`](crate::common::exception::CacheError).
//!
//! ## Thread Safety
//!
//! - [`LRUCache`](crate::cache::lru::LRUCache) is single-owner: mutation needs `&mut self`.
//! - [`ConcurrentLRUCache`](crate::cache::concurrent_lru::ConcurrentLRUCache) guards the
//!   same structure with one mutex and implements [`ConcurrentCache`].

/// Core cache operations.
pub trait CoreCache<K, V> {
    /// Insert a key-value pair, returning the previous value if it existed.
    ///
    /// May evict an unrelated entry when the cache is full.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Get a value by key (updates access tracking on a hit)
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Check if a key exists without updating access state
    fn contains(&self, key: &K) -> bool;

    /// Get the current number of entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the maximum capacity
    fn capacity(&self) -> usize;

    /// Remove all entries
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Remove a specific key-value pair.
    /// Returns the removed value if the key existed.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Remove a key, reporting whether it was resident
    fn erase(&mut self, key: &K) -> bool {
        self.remove(key).is_some()
    }

    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// LRU-specific operations that respect access order
pub trait LRUCacheTrait<K, V>: MutableCache<K, V> {
    /// Remove and return the least recently used entry
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Peek at the LRU entry without removing it
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Mark an entry as recently used without retrieving the value.
    /// Returns true if the key was found and touched.
    fn touch(&mut self, key: &K) -> bool;

    /// Get the recency rank of a key (0 = most recent, higher = less recent)
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// Marker trait for caches that are safe to share between threads
pub trait ConcurrentCache: Send + Sync {}

/// Hit ratio and eviction monitoring
pub trait CacheStats {
    /// Cache hit ratio (0.0 to 1.0)
    fn hit_ratio(&self) -> f64;

    /// Total number of get operations
    fn total_gets(&self) -> u64;

    fn total_hits(&self) -> u64;

    fn total_misses(&self) -> u64 {
        self.total_gets() - self.total_hits()
    }

    fn total_evictions(&self) -> u64;

    fn reset_stats(&mut self);
}

//! # LRU Cache Implementation
//!
//! Fixed-capacity key-value store that evicts the least recently used entry when a
//! new key arrives at a full cache. Both reads (`get`) and writes (`insert`) promote
//! the entry to most-recently-used.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                            LRUCache<K, V>                                │
//!   │                                                                          │
//!   │   map: HashMap<K, usize>           nodes: Vec<Node<K, V>> (dense arena)  │
//!   │   ┌──────────┬──────┐              ┌─────┬──────────────────────────┐    │
//!   │   │  "isbn1" │  0   │─────────────►│  0  │ key, value, prev, next   │    │
//!   │   │  "isbn2" │  1   │─────────────►│  1  │ key, value, prev, next   │    │
//!   │   │  "isbn3" │  2   │─────────────►│  2  │ key, value, prev, next   │    │
//!   │   └──────────┴──────┘              └─────┴──────────────────────────┘    │
//!   │                                                                          │
//!   │   Recency list threaded through the arena by slot index:                 │
//!   │                                                                          │
//!   │     head (MRU)                                        tail (LRU)         │
//!   │        [2] ◄──────────► [0] ◄──────────► [1]                             │
//!   │                                           ▲                              │
//!   │                                     next eviction                        │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The arena stays dense: removing a node `swap_remove`s it and re-points the map
//! entry and neighbours of the node that moved into the vacated slot. No slot is ever
//! left empty, so the arena never holds more than `capacity` nodes.
//!
//! ## Operations
//!
//! | Method                    | Time | Recency effect                         |
//! |---------------------------|------|----------------------------------------|
//! | `new(capacity)`           | O(1) | fails with `InvalidCapacity` if 0      |
//! | `get(&key)`               | O(1) | hit moves key to MRU; miss: none       |
//! | `peek(&key)`              | O(1) | none                                   |
//! | `insert(key, value)`      | O(1) | key moves to MRU; may evict the LRU    |
//! | `remove(&key)` / `erase`  | O(1) | entry dropped, no eviction             |
//! | `pop_lru()` / `peek_lru()`| O(1) | -                                      |
//! | `touch(&key)`             | O(1) | moves key to MRU                       |
//! | `recency_rank(&key)`      | O(N) | none                                   |
//! | `get_or_insert_with`      | O(1) | like `get` on hit, `insert` on miss    |
//!
//! ## Eviction ordering
//!
//! ```text
//!   capacity = 3
//!
//!   insert A, B, C     MRU [C, B, A] LRU
//!   get A              MRU [A, C, B] LRU
//!   insert D           B evicted first, then D linked at head
//!                      MRU [D, A, C] LRU
//! ```
//!
//! The victim is unlinked before the new node is pushed, so `len() <= capacity`
//! holds even in the middle of an `insert`.
//!
//! ## Thread Safety
//!
//! `LRUCache` is the single-owner variant: every mutating call takes `&mut self`.
//! Share it through [`ConcurrentLRUCache`](crate::cache::concurrent_lru::ConcurrentLRUCache)
//! or your own lock.
//!
//! ## Example Usage
//!
//! ```rust
//! use bounded_lru::cache::cache_traits::{CoreCache, MutableCache};
//! use bounded_lru::cache::lru::LRUCache;
//!
//! let mut cache = LRUCache::new(2).unwrap();
//! cache.insert("a", 1);
//! cache.insert("b", 2);
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! cache.insert("c", 3); // evicts "b"
//! assert_eq!(cache.get(&"b"), None);
//! assert!(cache.erase(&"c"));
//! assert_eq!(cache.len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use log::{debug, trace};

use crate::cache::cache_traits::{CacheStats, CoreCache, LRUCacheTrait, MutableCache};
use crate::cache::stats::{CacheMetrics, CacheMetricsSnapshot};
use crate::common::config::CacheConfig;
use crate::common::exception::CacheError;

struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU (Least Recently Used) Cache implementation.
pub struct LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    capacity: usize,
    map: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    /// Most recently used.
    head: Option<usize>,
    /// Least recently used.
    tail: Option<usize>,
    metrics: CacheMetrics,
}

impl<K, V> LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// Returns [`CacheError::InvalidCapacity`] when `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        Self::from_config(&CacheConfig::with_capacity(capacity))
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        config.validate()?;

        let reserved = config.prealloc_entries();
        let map = HashMap::with_capacity(reserved);
        let nodes = Vec::with_capacity(reserved);

        debug!(
            "Created LRU cache with capacity {} ({} entries reserved)",
            config.capacity, reserved
        );

        Ok(LRUCache {
            capacity: config.capacity,
            map,
            nodes,
            head: None,
            tail: None,
            metrics: CacheMetrics::default(),
        })
    }

    /// Returns the value for `key` without changing its recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|&idx| &self.nodes[idx].value)
    }

    /// Mutable counterpart of [`CoreCache::get`]; a hit promotes the key to MRU.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        match self.map.get(key).copied() {
            Some(idx) => {
                self.move_to_head(idx);
                self.metrics.record_hit();
                Some(&mut self.nodes[idx].value)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    /// Returns the cached value for `key`, computing and inserting it with `f` on a miss.
    ///
    /// `f` runs at most once per call and only when `key` is not resident, so while
    /// the key stays resident repeated calls never recompute it.
    pub fn get_or_insert_with<F>(&mut self, key: K, f: F) -> &V
    where
        F: FnOnce() -> V,
    {
        if let Some(idx) = self.map.get(&key).copied() {
            self.move_to_head(idx);
            self.metrics.record_hit();
            return &self.nodes[idx].value;
        }

        self.metrics.record_miss();
        let idx = self.insert_new(key, f());
        &self.nodes[idx].value
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// When `f` fails, the error is returned and the cache is left untouched (nothing
    /// inserted, nothing evicted).
    pub fn try_get_or_insert_with<F, E>(&mut self, key: K, f: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(idx) = self.map.get(&key).copied() {
            self.move_to_head(idx);
            self.metrics.record_hit();
            return Ok(&self.nodes[idx].value);
        }

        self.metrics.record_miss();
        let value = f()?;
        let idx = self.insert_new(key, value);
        Ok(&self.nodes[idx].value)
    }

    /// Iterates entries from most to least recently used without touching recency.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.head,
            remaining: self.nodes.len(),
        }
    }

    /// Resident keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let node = &self.nodes[idx];
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }

        let node = &mut self.nodes[idx];
        node.prev = None;
        node.next = None;
    }

    fn attach_head(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = &mut self.nodes[idx];
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(h) => self.nodes[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn move_to_head(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.attach_head(idx);
    }

    /// Unlinks and removes the node at `idx`, keeping the arena dense.
    fn remove_slot(&mut self, idx: usize) -> (K, V) {
        self.detach(idx);
        let node = self.nodes.swap_remove(idx);
        self.map.remove(&node.key);

        // The former last node now lives at `idx`; re-point everything that referenced it.
        if idx < self.nodes.len() {
            let (prev, next) = {
                let moved = &self.nodes[idx];
                (moved.prev, moved.next)
            };
            match prev {
                Some(p) => self.nodes[p].next = Some(idx),
                None => self.head = Some(idx),
            }
            match next {
                Some(n) => self.nodes[n].prev = Some(idx),
                None => self.tail = Some(idx),
            }
            if let Some(slot) = self.map.get_mut(&self.nodes[idx].key) {
                *slot = idx;
            }
        }

        (node.key, node.value)
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        let evicted = self.remove_slot(tail);
        self.metrics.record_eviction();
        trace!(
            "Evicted least recently used entry (len={}, capacity={})",
            self.nodes.len(),
            self.capacity
        );
        Some(evicted)
    }

    /// Links a key known to be absent at MRU, evicting first if full. Returns its slot.
    fn insert_new(&mut self, key: K, value: V) -> usize {
        if self.nodes.len() >= self.capacity {
            self.evict_lru();
        }

        let idx = self.nodes.len();
        self.nodes.push(Node {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.map.insert(key, idx);
        self.attach_head(idx);
        self.metrics.record_insert();
        idx
    }

    #[cfg(test)]
    fn validate_invariants(&self) {
        assert_eq!(self.map.len(), self.nodes.len());
        assert!(self.nodes.len() <= self.capacity);

        let mut count = 0;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            let node = &self.nodes[idx];
            assert_eq!(node.prev, prev, "broken back link at slot {}", idx);
            assert_eq!(self.map.get(&node.key), Some(&idx));
            prev = Some(idx);
            cursor = node.next;
            count += 1;
            assert!(count <= self.nodes.len(), "cycle in recency list");
        }
        assert_eq!(count, self.nodes.len());
        assert_eq!(self.tail, prev);
    }
}

impl<K, V> CoreCache<K, V> for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(idx) = self.map.get(&key).copied() {
            self.move_to_head(idx);
            self.metrics.record_update();
            return Some(std::mem::replace(&mut self.nodes[idx].value, value));
        }

        self.insert_new(key, value);
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key).copied() {
            Some(idx) => {
                self.move_to_head(idx);
                self.metrics.record_hit();
                Some(&self.nodes[idx].value)
            }
            None => {
                self.metrics.record_miss();
                None
            }
        }
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.map.clear();
        self.nodes.clear();
        self.head = None;
        self.tail = None;
    }
}

impl<K, V> MutableCache<K, V> for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.get(key).copied()?;
        let (_, value) = self.remove_slot(idx);
        self.metrics.record_removal();
        Some(value)
    }
}

impl<K, V> LRUCacheTrait<K, V> for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        let tail = self.tail?;
        let entry = self.remove_slot(tail);
        self.metrics.record_removal();
        Some(entry)
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        self.tail.map(|idx| {
            let node = &self.nodes[idx];
            (&node.key, &node.value)
        })
    }

    fn touch(&mut self, key: &K) -> bool {
        match self.map.get(key).copied() {
            Some(idx) => {
                self.move_to_head(idx);
                true
            }
            None => false,
        }
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        let target = *self.map.get(key)?;
        let mut rank = 0;
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            if idx == target {
                return Some(rank);
            }
            rank += 1;
            cursor = self.nodes[idx].next;
        }
        None
    }
}

impl<K, V> CacheStats for LRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn hit_ratio(&self) -> f64 {
        self.metrics.snapshot().hit_ratio()
    }

    fn total_gets(&self) -> u64 {
        self.metrics.snapshot().lookups()
    }

    fn total_hits(&self) -> u64 {
        self.metrics.snapshot().hits
    }

    fn total_evictions(&self) -> u64 {
        self.metrics.snapshot().evictions
    }

    fn reset_stats(&mut self) {
        self.metrics.reset();
    }
}

impl<K, V> fmt::Debug for LRUCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LRUCache")
            .field("capacity", &self.capacity)
            .field("len", &self.nodes.len())
            .field("entries", &DebugEntries(self))
            .finish()
    }
}

struct DebugEntries<'a, K, V>(&'a LRUCache<K, V>)
where
    K: Eq + Hash + Clone;

impl<K, V> fmt::Debug for DebugEntries<'_, K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

/// Iterator over `(&K, &V)` from most to least recently used.
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = &self.nodes[idx];
        self.cursor = node.next;
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

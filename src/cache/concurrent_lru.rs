//! # Shared LRU Cache
//!
//! [`ConcurrentLRUCache`] puts an [`LRUCache`] holding `Arc<V>` values behind one
//! `parking_lot::Mutex`.
//!
//! ```text
//!   Thread A ──┐
//!   Thread B ──┼──► Mutex<LRUCache<K, Arc<V>>> ──► Arc<V> handed back to caller
//!   Thread C ──┘
//! ```
//!
//! - Every plain operation takes the lock for its full duration. The guard is
//!   dropped on every return path, including a miss. Fills on a miss are the
//!   exception and are described below.
//! - Eviction and insertion happen under the same guard, so no thread can observe
//!   the cache holding `capacity + 1` entries or missing both the victim and the
//!   newcomer.
//! - Concurrent `insert`s on one key are ordered by lock acquisition; the later one wins.
//! - Values leave the cache as `Arc<V>` clones, never as references into the list.
//!   An `Arc` handed out before an eviction stays valid afterwards.
//!
//! ## Filling on a miss
//!
//! ```text
//!   get_or_insert_with(k, f)
//!     1. cache lock:   hit? return it                      (lock released)
//!     2. slot table:   take or create the fill slot for k  (lock released)
//!     3. slot lock:    only callers filling k wait here
//!     4. cache lock:   filled while we waited? return it   (lock released)
//!     5. f()           runs with no cache lock held
//!     6. cache lock:   insert the value                    (lock released)
//!     7. slot table:   drop the slot for k if it is still ours
//! ```
//!
//! A slow `f` only delays other callers filling the same key. Lookups, inserts and
//! fills on other keys go ahead. Lock order is slot, then cache or slot table, and
//! no path takes a slot while holding either of the others.

use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::cache_traits::{ConcurrentCache, CoreCache, LRUCacheTrait, MutableCache};
use crate::cache::lru::LRUCache;
use crate::cache::stats::CacheMetricsSnapshot;
use crate::common::config::CacheConfig;
use crate::common::exception::CacheError;

/// Serializes callers filling the same absent key.
type FillSlot = Arc<Mutex<()>>;

/// Thread-safe LRU cache. Share it with `Arc<ConcurrentLRUCache<K, V>>`.
pub struct ConcurrentLRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    inner: Mutex<LRUCache<K, Arc<V>>>,
    in_flight: Mutex<HashMap<K, FillSlot>>,
}

impl<K, V> ConcurrentLRUCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        Self::from_config(&CacheConfig::with_capacity(capacity))
    }

    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let inner = LRUCache::from_config(config)?;
        Ok(Self {
            inner: Mutex::new(inner),
            in_flight: Mutex::new(HashMap::new()),
        })
    }

    /// Looks up `key`, promoting it to most recently used on a hit.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().get(key).cloned()
    }

    /// Looks up `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().peek(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) -> Option<Arc<V>> {
        self.insert_arc(key, Arc::new(value))
    }

    /// Inserts an already shared value without re-allocating it.
    pub fn insert_arc(&self, key: K, value: Arc<V>) -> Option<Arc<V>> {
        self.inner.lock().insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<Arc<V>> {
        self.inner.lock().remove(key)
    }

    /// Removes `key`, returning whether it was resident.
    pub fn erase(&self, key: &K) -> bool {
        self.inner.lock().erase(key)
    }

    pub fn touch(&self, key: &K) -> bool {
        self.inner.lock().touch(key)
    }

    pub fn pop_lru(&self) -> Option<(K, Arc<V>)> {
        self.inner.lock().pop_lru()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Returns the cached value for `key`, computing it with `f` on a miss.
    ///
    /// `f` runs without the cache lock, so other keys stay available meanwhile.
    /// Callers racing on the same absent key wait for the first one, so `f` runs once
    /// and every caller gets the same `Arc`. `f` may use this cache, but must not
    /// fill `key` itself: that waits on its own slot forever.
    pub fn get_or_insert_with<F>(&self, key: K, f: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        match self.fill(key, || Ok::<V, Infallible>(f())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Fallible variant of [`get_or_insert_with`](Self::get_or_insert_with).
    ///
    /// Nothing is inserted or evicted when `f` fails. A caller that was waiting on
    /// the failed fill then runs its own `f`.
    pub fn try_get_or_insert_with<F, E>(&self, key: K, f: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.fill(key, f)
    }

    fn fill<F, E>(&self, key: K, f: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let cached = self.inner.lock().get(&key).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }

        let slot = Arc::clone(
            self.in_flight
                .lock()
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );
        let _filling = slot.lock();

        // Filled by the caller we were queued behind.
        let filled = {
            let mut inner = self.inner.lock();
            if inner.touch(&key) {
                inner.peek(&key).cloned()
            } else {
                None
            }
        };

        let result = match filled {
            Some(value) => Ok(value),
            None => f().map(|value| {
                let value = Arc::new(value);
                self.inner.lock().insert(key.clone(), Arc::clone(&value));
                value
            }),
        };

        let mut in_flight = self.in_flight.lock();
        if in_flight
            .get(&key)
            .is_some_and(|current| Arc::ptr_eq(current, &slot))
        {
            in_flight.remove(&key);
        }
        result
    }

    /// Resident keys from most to least recently used, copied out under the lock.
    pub fn keys(&self) -> Vec<K> {
        self.inner.lock().keys().cloned().collect()
    }

    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        self.inner.lock().metrics_snapshot()
    }
}

impl<K, V> ConcurrentCache for ConcurrentLRUCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Send + Sync,
{
}

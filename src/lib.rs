//! Fixed-capacity key-value caching with least-recently-used eviction.
//!
//! - [`cache::lru::LRUCache`]: single-owner cache, all mutation through `&mut self`.
//! - [`cache::concurrent_lru::ConcurrentLRUCache`]: the same cache behind one mutex,
//!   handing values out as `Arc<V>`.
//!
//! Construction is the only fallible step ([`common::exception::CacheError`]); a miss
//! is reported as `None`.

pub mod cache;
pub mod common;

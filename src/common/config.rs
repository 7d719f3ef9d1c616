use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::common::exception::CacheError;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Upper bound on the entries reserved up front when `prealloc_memory` is set.
/// Larger caches grow on demand past this point.
pub const PREALLOC_LIMIT: usize = 1 << 16;

/// Construction parameters for [`LRUCache`](crate::cache::lru::LRUCache) and
/// [`ConcurrentLRUCache`](crate::cache::concurrent_lru::ConcurrentLRUCache).
///
/// Loadable from TOML; absent fields take their default:
///
/// ```toml
/// capacity = 4096
/// prealloc_memory = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of resident entries. Must be at least 1.
    pub capacity: usize,
    /// Reserve index and arena space for `capacity` entries (at most
    /// [`PREALLOC_LIMIT`]) up front.
    pub prealloc_memory: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            prealloc_memory: true,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let contents = fs::read_to_string(path).map_err(|source| CacheError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CacheError> {
        let config: CacheConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Number of entries to reserve at construction.
    pub fn prealloc_entries(&self) -> usize {
        if self.prealloc_memory {
            self.capacity.min(PREALLOC_LIMIT)
        } else {
            0
        }
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.capacity == 0 {
            warn!("Rejecting cache configuration with zero capacity");
            return Err(CacheError::InvalidCapacity(self.capacity));
        }
        Ok(())
    }
}

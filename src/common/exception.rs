use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced while building a cache or loading its configuration.
///
/// A missing key is not an error: lookups report it as `None`.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
    #[error("failed to read cache config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse cache config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

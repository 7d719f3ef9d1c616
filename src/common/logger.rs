use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the crate logger at `Info`. `RUST_LOG` overrides the default.
pub fn initialize_logger() {
    initialize_logger_with(LevelFilter::Info);
}

/// Installs the crate logger with `default_level` for the cache modules.
///
/// Only the first call in a process takes effect.
pub fn initialize_logger_with(default_level: LevelFilter) {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("bounded_lru", default_level)
            .filter_module("bounded_lru::cache", default_level)
            .format_timestamp_millis()
            .parse_default_env();

        // Someone else may own the global logger already.
        let _ = builder.try_init();
    });
}

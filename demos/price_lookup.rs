//! Book price lookup backed by a shared LRU cache.
//!
//! A slow "catalogue" is consulted only on a cache miss. The cache is built once in
//! `main` and handed to the service, so nothing in the service owns global state.
//!
//! Run with `RUST_LOG=bounded_lru=trace cargo run --example price_lookup` to see evictions.

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bounded_lru::cache::concurrent_lru::ConcurrentLRUCache;
use bounded_lru::common::config::CacheConfig;
use bounded_lru::common::logger;
use log::info;

struct Catalogue {
    queries: AtomicUsize,
}

impl Catalogue {
    fn price_of(&self, isbn: &str) -> Result<u32, String> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        thread::sleep(Duration::from_millis(20));
        match isbn.bytes().filter(u8::is_ascii_digit).count() {
            10 | 13 => Ok(isbn.bytes().map(u32::from).sum::<u32>() % 5_000 + 499),
            _ => Err(format!("malformed ISBN {}", isbn)),
        }
    }
}

struct PriceService {
    cache: Arc<ConcurrentLRUCache<String, u32>>,
    catalogue: Arc<Catalogue>,
}

impl PriceService {
    fn new(cache: Arc<ConcurrentLRUCache<String, u32>>, catalogue: Arc<Catalogue>) -> Self {
        Self { cache, catalogue }
    }

    fn price(&self, isbn: &str) -> Result<u32, String> {
        let price = self
            .cache
            .try_get_or_insert_with(isbn.to_string(), || self.catalogue.price_of(isbn))?;
        Ok(*price)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    logger::initialize_logger();

    let config = CacheConfig::from_toml_str("capacity = 3")?;
    let cache = Arc::new(ConcurrentLRUCache::from_config(&config)?);
    let catalogue = Arc::new(Catalogue {
        queries: AtomicUsize::new(0),
    });
    let service = PriceService::new(Arc::clone(&cache), Arc::clone(&catalogue));

    let requests = [
        "978-0-13-468599-1",
        "978-1-59327-828-1",
        "978-0-13-468599-1",
        "0-201-63361-2",
        "978-1-49195-016-0",
        "978-0-13-468599-1",
        "978-1-59327-828-1",
        "not-an-isbn",
    ];

    for isbn in requests {
        match service.price(isbn) {
            Ok(cents) => println!("{:<20} ${}.{:02}", isbn, cents / 100, cents % 100),
            Err(err) => println!("{:<20} error: {}", isbn, err),
        }
    }

    let stats = cache.metrics_snapshot();
    info!(
        "catalogue queries: {}, hits: {}, misses: {}, evictions: {}",
        catalogue.queries.load(Ordering::Relaxed),
        stats.hits,
        stats.misses,
        stats.evictions
    );
    println!("resident (MRU first): {:?}", cache.keys());

    Ok(())
}

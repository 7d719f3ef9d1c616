// ==============================================
// LRU BEHAVIOUR TESTS (integration)
// ==============================================

use bounded_lru::cache::cache_traits::{CacheStats, CoreCache, LRUCacheTrait, MutableCache};
use bounded_lru::cache::concurrent_lru::ConcurrentLRUCache;
use bounded_lru::cache::lru::LRUCache;
use bounded_lru::common::exception::CacheError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::common::logger::init_test_logger;

mod construction {
    use super::*;

    #[test]
    fn test_zero_capacity_is_a_configuration_error() {
        init_test_logger();
        let err = assert_err!(LRUCache::<String, u32>::new(0));
        assert!(matches!(err, CacheError::InvalidCapacity(0)));
    }

    #[test]
    fn test_new_cache_is_empty() {
        let cache: LRUCache<String, u32> = assert_ok!(LRUCache::new(5));
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 5);
    }

    #[test]
    fn test_unbounded_capacity_builds_without_reserving_it() {
        let mut cache: LRUCache<u64, u64> = assert_ok!(LRUCache::new(usize::MAX));
        for i in 0..2_000 {
            cache.insert(i, i + 1);
        }
        assert_eq!(cache.len(), 2_000);
        assert_eq!(cache.get(&1_999), Some(&2_000));
        assert_eq!(cache.total_evictions(), 0);

        let shared = assert_ok!(ConcurrentLRUCache::<u64, u64>::new(usize::MAX));
        shared.insert(7, 8);
        assert_eq!(shared.get(&7).as_deref(), Some(&8));
        assert_eq!(shared.capacity(), usize::MAX);
    }
}

mod laws {
    use super::*;

    #[test]
    fn test_capacity_invariant_holds_after_every_insert() {
        init_test_logger();
        let mut cache = assert_ok!(LRUCache::new(4));
        for i in 0..100 {
            cache.insert(i, i * 2);
            assert!(cache.len() <= cache.capacity(), "overflow after insert {}", i);
        }
        assert_eq!(cache.len(), 4);
        assert_eq!(cache.total_evictions(), 96);
    }

    #[test]
    fn test_recency_eviction_law() {
        let mut cache = assert_ok!(LRUCache::new(3));
        cache.insert("A", 1);
        cache.insert("B", 2);
        cache.insert("C", 3);

        assert_eq!(cache.get(&"A"), Some(&1));
        cache.insert("D", 4);

        assert_eq!(cache.get(&"B"), None, "B was least recently touched");
        assert_eq!(cache.get(&"A"), Some(&1));
        assert_eq!(cache.get(&"C"), Some(&3));
        assert_eq!(cache.get(&"D"), Some(&4));
    }

    #[test]
    fn test_idempotent_failed_lookup() {
        let mut cache = assert_ok!(LRUCache::new(3));
        cache.insert(1, "one");
        cache.insert(2, "two");

        for _ in 0..10 {
            assert_eq!(cache.get(&42), None);
        }

        assert_eq!(cache.len(), 2);
        assert_recency!(cache, [2, 1]);
    }

    #[test]
    fn test_update_in_place() {
        let mut cache = assert_ok!(LRUCache::new(2));
        cache.insert("k", "v1");
        cache.insert("other", "x");
        let size = cache.len();

        assert_eq!(cache.insert("k", "v2"), Some("v1"));
        assert_eq!(cache.len(), size);
        assert_eq!(cache.get(&"k"), Some(&"v2"));
    }

    #[test]
    fn test_erase_correctness() {
        let mut cache = assert_ok!(LRUCache::new(3));
        cache.insert(1, 'a');
        cache.insert(2, 'b');

        assert!(cache.erase(&1));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), None);

        assert!(!cache.erase(&1));
        assert!(!cache.erase(&7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_erase_never_triggers_eviction() {
        let mut cache = assert_ok!(LRUCache::new(2));
        cache.insert(1, ());
        cache.insert(2, ());
        cache.erase(&1);
        cache.insert(3, ());

        assert!(cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.total_evictions(), 0);
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn test_end_to_end_capacity_two() {
        init_test_logger();
        let mut cache = assert_ok!(LRUCache::new(2));

        cache.insert("a", 1);
        cache.insert("b", 2);
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get(&"a"), Some(&1));
        assert_eq!(cache.recency_rank(&"a"), Some(0));

        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&"a"));
        assert!(cache.contains(&"c"));

        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn test_permutation_round_trip() {
        let mut rng = StdRng::seed_from_u64(17);

        for n in [1usize, 2, 3, 8, 64, 257] {
            let mut keys: Vec<usize> = (0..n).collect();
            keys.shuffle(&mut rng);

            let mut cache = assert_ok!(LRUCache::new(n));
            for &k in &keys {
                cache.insert(k, k.to_string());
            }

            assert_eq!(cache.len(), n);
            for k in 0..n {
                assert_eq!(cache.get(&k), Some(&k.to_string()), "missing key {}", k);
            }
        }
    }

    #[test]
    fn test_key_cycles_back_after_eviction() {
        let mut cache = assert_ok!(LRUCache::new(1));
        cache.insert("isbn", 10);
        cache.insert("other", 20);
        assert!(!cache.contains(&"isbn"));

        cache.insert("isbn", 30);
        assert_eq!(cache.get(&"isbn"), Some(&30));
    }

    #[test]
    fn test_pop_lru_drains_in_recency_order() {
        let mut cache = assert_ok!(LRUCache::new(4));
        for k in ["w", "x", "y", "z"] {
            cache.insert(k, ());
        }
        cache.get(&"x");
        cache.touch(&"w");

        let mut drained = Vec::new();
        while let Some((k, _)) = cache.pop_lru() {
            drained.push(k);
        }
        assert_eq!(drained, vec!["y", "z", "x", "w"]);
    }
}

mod model_check {
    use super::*;

    /// Reference model: a Vec ordered MRU first, with linear scans.
    struct Model {
        capacity: usize,
        entries: Vec<(u16, u32)>,
    }

    impl Model {
        fn get(&mut self, key: u16) -> Option<u32> {
            let pos = self.entries.iter().position(|(k, _)| *k == key)?;
            let entry = self.entries.remove(pos);
            self.entries.insert(0, entry);
            Some(entry.1)
        }

        fn insert(&mut self, key: u16, value: u32) -> Option<u32> {
            let old = self
                .entries
                .iter()
                .position(|(k, _)| *k == key)
                .map(|pos| self.entries.remove(pos).1);
            if old.is_none() && self.entries.len() == self.capacity {
                self.entries.pop();
            }
            self.entries.insert(0, (key, value));
            old
        }

        fn remove(&mut self, key: u16) -> Option<u32> {
            let pos = self.entries.iter().position(|(k, _)| *k == key)?;
            Some(self.entries.remove(pos).1)
        }
    }

    #[test]
    fn test_matches_reference_model() {
        init_test_logger();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);

        for capacity in [1usize, 2, 5, 16] {
            let mut cache = assert_ok!(LRUCache::new(capacity));
            let mut model = Model {
                capacity,
                entries: Vec::new(),
            };

            for step in 0..4_000u32 {
                let key = rng.gen_range(0..(capacity as u16 * 3));
                match rng.gen_range(0..10) {
                    0..=3 => assert_eq!(cache.insert(key, step), model.insert(key, step)),
                    4..=7 => assert_eq!(cache.get(&key).copied(), model.get(key)),
                    _ => assert_eq!(cache.remove(&key), model.remove(key)),
                }

                assert_eq!(cache.len(), model.entries.len());
                let expected: Vec<u16> = model.entries.iter().map(|(k, _)| *k).collect();
                assert_recency!(cache, expected);
            }
        }
    }
}

#![allow(
    missing_docs,
    clippy::missing_docs_in_private_items,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
use std::collections::HashMap;

use chainmap::{ChainedHashMap, MultiMapExtensions, hashes};
use proptest::prelude::*;

proptest! {
    // Model the map as std HashMap<key, values-newest-first> and compare after every emplace.
    #[test]
    fn prop_matches_model(
        modulus in 1u64..40,
        ops in proptest::collection::vec((0u16..200, any::<u32>()), 1..300),
    ) {
        let mut map = ChainedHashMap::new(move |key: &u16| u64::from(*key) % modulus);
        let mut model: HashMap<u16, Vec<u32>> = HashMap::new();

        for (key, value) in ops {
            map.emplace(key, value);
            model.entry(key).or_default().insert(0, value);

            let stats = map.stats();
            prop_assert!(stats.longest_bucket <= stats.bucket_cap);
            prop_assert_eq!(stats.keys, model.len());
        }

        for (key, values) in &model {
            let actual: Vec<u32> = map.equal_range(key).copied().collect();
            prop_assert_eq!(&actual, values);
        }
        for absent in 200u16..220 {
            prop_assert_eq!(map.equal_range(&absent).count(), 0);
        }
        prop_assert_eq!(map.value_count(), model.values().map(Vec::len).sum::<usize>());
    }

    // Table size and bucket cap only grow, and the table stays 11 * 2^k buckets.
    #[test]
    fn prop_growth_is_monotonic(keys in proptest::collection::vec(any::<u64>(), 1..500)) {
        let mut map = ChainedHashMap::new(|key: &u64| key >> 3);
        let mut last = (map.table_size(), map.bucket_cap(), map.rehash_count());

        for key in keys {
            map.emplace(key, ());
            let now = (map.table_size(), map.bucket_cap(), map.rehash_count());

            prop_assert!(now.0 >= last.0);
            prop_assert!(now.1 >= last.1);
            prop_assert!(now.2 >= last.2);
            prop_assert_eq!(now.0 % 11, 0);
            prop_assert!((now.0 / 11).is_power_of_two());
            last = now;
        }
    }

    // Any string hash keeps every distinct key retrievable across rehashes.
    #[test]
    fn prop_string_hashes_keep_keys(
        hash_idx in 0usize..5,
        keys in proptest::collection::hash_set("[a-z]{1,8}", 1..200),
    ) {
        let hasher = hashes::ALL[hash_idx].1;
        let mut map = ChainedHashMap::new(move |key: &String| hasher(key));
        for key in &keys {
            map.emplace(key.clone(), key.len());
        }

        prop_assert_eq!(map.len(), keys.len());
        for key in &keys {
            prop_assert!(map.contains_key(key));
            prop_assert_eq!(map.equal_range(key).copied().collect::<Vec<_>>(), vec![key.len()]);
        }
    }
}

#[test_log::test]
fn constant_hash_grows_bucket_cap_only() {
    let mut map = ChainedHashMap::new(|_: &u32| 0);
    for key in 0..20 {
        map.emplace(key, key);
    }

    assert_eq!(map.table_size(), 11);
    assert_eq!(map.bucket_cap(), 20);
    assert_eq!(map.empty_buckets(), 10);
    assert_eq!(map.rehash_count(), 17);
    for key in 0..20 {
        assert_eq!(map.equal_range(&key).copied().collect::<Vec<_>>(), [key]);
    }
}

#[test_log::test]
fn sparse_table_doubles_on_first_overflow() {
    let mut map = ChainedHashMap::new(|key: &u64| *key);
    // bucket 0 reaches the cap of 3 while bucket 1 holds a single key
    for key in [0, 1, 11, 22] {
        map.emplace(key, key);
    }
    assert_eq!(map.rehash_count(), 0);
    assert_eq!(map.empty_buckets(), 9);

    map.emplace(33, 33);

    assert_eq!(map.rehash_count(), 1);
    assert_eq!(map.table_size(), 22);
    assert_eq!(map.bucket_cap(), 3);
    // 0 and 22 share bucket 0, 11 and 33 share bucket 11
    assert_eq!(map.empty_buckets(), 19);
    assert_eq!(map.len(), 5);
    for key in [0, 1, 11, 22, 33] {
        assert_eq!(map.equal_range(&key).copied().collect::<Vec<_>>(), [key]);
    }
}

//! Utility functions and traits for `ChainedHashMap`

use crate::ChainedHashMap;

/// Extension trait for multimap implementations that provides additional utility methods
pub trait MultiMapExtensions<K> {
    /// Returns the keys of the map as a Vec
    fn keys(&self) -> Vec<K>;

    /// Returns true if the map holds the given key, even with no values under it
    fn contains_key(&self, key: &K) -> bool;

    /// Returns the number of values stored across all keys
    fn value_count(&self) -> usize;
}

impl<K, T, H> MultiMapExtensions<K> for ChainedHashMap<K, T, H>
where
    K: Eq + Clone,
    H: Fn(&K) -> u64,
{
    fn keys(&self) -> Vec<K> {
        self.iter().map(|(k, _)| k.clone()).collect()
    }

    fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    fn value_count(&self) -> usize {
        self.iter().map(|(_, values)| values.len()).sum()
    }
}

/// Creates a `ChainedHashMap` from an iterator of key-value pairs
pub fn collect_with<K, T, H, I>(hasher: H, iter: I) -> ChainedHashMap<K, T, H>
where
    K: Eq,
    H: Fn(&K) -> u64,
    I: IntoIterator<Item = (K, T)>,
{
    let mut map = ChainedHashMap::new(hasher);
    map.extend(iter);
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashes;

    #[test]
    fn test_collect_with() {
        let data = vec![("a".to_string(), 1), ("b".to_string(), 2), ("a".to_string(), 3)];

        let map = collect_with(|key: &String| hashes::better(key), data);

        assert_eq!(map.equal_range(&"a".to_string()).copied().collect::<Vec<_>>(), [3, 1]);
        assert_eq!(map.equal_range(&"b".to_string()).copied().collect::<Vec<_>>(), [2]);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_keys_and_value_count() {
        let mut map = ChainedHashMap::new(|key: &String| hashes::simple(key));
        map.emplace("a".to_string(), 1);
        map.emplace("b".to_string(), 2);
        map.emplace("b".to_string(), 3);
        map.emplace("c".to_string(), 4);

        let mut keys = map.keys();
        keys.sort(); // Sort for predictable comparison

        assert_eq!(keys, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(map.value_count(), 4);
    }

    #[test]
    fn test_contains_key() {
        let mut map = ChainedHashMap::new(|key: &String| hashes::rot13(key));
        map.emplace("a".to_string(), 1);
        map.emplace_all("empty".to_string(), Vec::<i32>::new());

        assert!(map.contains_key(&"a".to_string()));
        assert!(map.contains_key(&"empty".to_string()));
        assert!(!map.contains_key(&"b".to_string()));
    }
}

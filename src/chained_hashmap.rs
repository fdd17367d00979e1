use std::{
    fmt,
    iter::{FusedIterator, Rev},
    mem, slice,
};

use log::debug;

use crate::policy::{Growth, GrowthPolicy};

/// A key together with every value emplaced under it
#[derive(Debug, Clone)]
struct Slot<K, T> {
    /// The key shared by all values in the slot
    key: K,
    /// Stored back to front, so readers walk them from the end
    values: Vec<T>,
}

/// Slots whose keys reduce to the same table index
type Bucket<K, T> = Vec<Slot<K, T>>;

/// A separate-chaining multimap with bounded buckets.
///
/// Every key owns a list of values: emplacing an existing key adds to its list instead of
/// replacing it. Buckets may hold at most [`bucket_cap`](Self::bucket_cap) keys. When a new key
/// would overflow its bucket the map rehashes, either doubling the table or raising the cap (see
/// [`Growth`]), and then retries the insert.
///
/// The hasher is any `Fn(&K) -> u64`. It is called once per operation and kept for the lifetime
/// of the map.
///
/// Note: This implementation is not thread-safe. Mutation requires `&mut self`.
#[derive(Clone)]
pub struct ChainedHashMap<K, T, H> {
    /// The chains, one per table index
    buckets: Vec<Bucket<K, T>>,
    /// Maps a key to its unsigned hash
    hasher: H,
    /// Number of buckets holding no slot
    empty_buckets: usize,
    /// Most slots a bucket may hold
    bucket_cap: usize,
    /// Number of distinct keys
    len: usize,
    /// Rehashes performed since construction
    rehashes: usize,
}

impl<K, T, H> fmt::Debug for ChainedHashMap<K, T, H>
where
    K: fmt::Debug,
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedHashMap")
            .field("buckets", &self.buckets)
            .field("empty_buckets", &self.empty_buckets)
            .field("bucket_cap", &self.bucket_cap)
            .field("len", &self.len)
            .field("rehashes", &self.rehashes)
            .finish_non_exhaustive()
    }
}

impl<K, T, H> Extend<(K, T)> for ChainedHashMap<K, T, H>
where
    K: Eq,
    H: Fn(&K) -> u64,
{
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.emplace(key, value);
        }
    }
}

impl<K, T, H> ChainedHashMap<K, T, H>
where
    K: Eq,
    H: Fn(&K) -> u64,
{
    /// Creates an empty map with 11 buckets and a bucket cap of 3
    #[must_use]
    pub fn new(hasher: H) -> Self {
        Self::with_policy(hasher, GrowthPolicy::default())
    }

    /// Creates an empty map with the dimensions given by `policy`
    #[must_use]
    pub fn with_policy(hasher: H, policy: GrowthPolicy) -> Self {
        let table_size = policy.table_size();
        Self {
            buckets: empty_table(table_size),
            hasher,
            empty_buckets: table_size,
            bucket_cap: policy.bucket_cap(),
            len: 0,
            rehashes: 0,
        }
    }

    /// Gets the bucket index for a key, always below the bucket count
    #[allow(clippy::cast_possible_truncation)]
    fn index(&self, key: &K) -> usize {
        let hash = (self.hasher)(key);
        // the remainder is below the bucket count, so it fits in a usize
        hash.checked_rem(self.buckets.len() as u64).unwrap_or_default() as usize
    }

    /// Returns the values stored under `key`, newest first.
    ///
    /// A key that was never emplaced yields an empty iterator.
    #[must_use]
    pub fn equal_range(&self, key: &K) -> Values<'_, T> {
        self.get(key).unwrap_or_default()
    }

    /// Returns the values stored under `key`, newest first, or `None` if the key is absent
    #[must_use]
    pub fn get(&self, key: &K) -> Option<Values<'_, T>> {
        self.buckets
            .get(self.index(key))?
            .iter()
            .find(|slot| slot.key == *key)
            .map(|slot| Values { inner: slot.values.iter().rev() })
    }

    /// Adds `value` under `key`, keeping any values already stored there
    pub fn emplace(&mut self, key: K, value: T) {
        self.insert_slot(Slot { key, values: vec![value] });
    }

    /// Adds every element of `values` under `key`.
    ///
    /// A new key reads its values back in the order given. For a key that is already present
    /// the elements are added one by one in iteration order, so the last element becomes the
    /// newest. An empty `values` still registers the key.
    pub fn emplace_all<I>(&mut self, key: K, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut values: Vec<T> = values.into_iter().collect();
        values.reverse();
        self.insert_slot(Slot { key, values });
    }

    /// Inserts a slot, rehashing as many times as it takes for its bucket to accept it
    fn insert_slot(&mut self, mut slot: Slot<K, T>) {
        loop {
            match self.try_place(slot) {
                Ok(()) => return,
                Err(rejected) => {
                    slot = rejected;
                    self.rehash();
                }
            }
        }
    }

    /// Merges `slot` into its bucket, or hands it back when the bucket is already at the cap
    fn try_place(&mut self, slot: Slot<K, T>) -> Result<(), Slot<K, T>> {
        let index = self.index(&slot.key);
        // The policy never builds an empty table and `index` reduces modulo its length, so the
        // lookup always hits. A miss would mean a corrupted table; treat it as an overflow.
        let Some(bucket) = self.buckets.get_mut(index) else {
            return Err(slot);
        };

        if let Some(existing) = bucket.iter_mut().find(|s| s.key == slot.key) {
            // merges only come from callers, and their slots are stored back to front
            existing.values.extend(slot.values.into_iter().rev());
            return Ok(());
        }

        if bucket.len() >= self.bucket_cap {
            return Err(slot);
        }

        if bucket.is_empty() {
            self.empty_buckets = self.empty_buckets.saturating_sub(1);
        }
        bucket.insert(0, slot);
        self.len = self.len.saturating_add(1);
        Ok(())
    }

    /// Rebuilds the table one growth step larger and moves every slot into it
    fn rehash(&mut self) {
        let table_size = self.buckets.len();
        let growth = Growth::choose(table_size, self.empty_buckets);
        let (new_table_size, new_bucket_cap) = growth.apply(table_size, self.bucket_cap);

        debug!(
            "rehash ({growth}): {table_size} buckets / cap {} -> {new_table_size} buckets / cap \
             {new_bucket_cap}, {} keys, {} empty buckets",
            self.bucket_cap, self.len, self.empty_buckets
        );

        let old_buckets = mem::replace(&mut self.buckets, empty_table(new_table_size));
        self.empty_buckets = new_table_size;
        self.bucket_cap = new_bucket_cap;
        self.len = 0;
        self.rehashes = self.rehashes.saturating_add(1);

        for slot in old_buckets.into_iter().flatten() {
            self.insert_slot(slot);
        }
    }

    /// Returns the number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no key has been emplaced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the most keys a bucket may currently hold
    #[must_use]
    pub fn bucket_cap(&self) -> usize {
        self.bucket_cap
    }

    /// Returns the number of buckets holding no key
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.empty_buckets
    }

    /// Returns how many times the table has been rebuilt
    #[must_use]
    pub fn rehash_count(&self) -> usize {
        self.rehashes
    }

    /// Returns an iterator over every key and its values, in no particular order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, T> {
        Iter { slots: self.buckets.iter().flatten() }
    }

    /// Takes a snapshot of the table's shape
    #[must_use]
    pub fn stats(&self) -> TableStats {
        TableStats {
            table_size: self.buckets.len(),
            bucket_cap: self.bucket_cap,
            empty_buckets: self.empty_buckets,
            keys: self.len,
            values: self.buckets.iter().flatten().map(|slot| slot.values.len()).sum(),
            longest_bucket: self.buckets.iter().map(Vec::len).max().unwrap_or_default(),
            rehashes: self.rehashes,
        }
    }
}

/// Allocates `table_size` empty buckets
fn empty_table<K, T>(table_size: usize) -> Vec<Bucket<K, T>> {
    std::iter::repeat_with(Vec::new).take(table_size).collect()
}

/// Shape of a [`ChainedHashMap`] at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// Number of buckets
    pub table_size: usize,
    /// Most keys a bucket may hold
    pub bucket_cap: usize,
    /// Buckets holding no key
    pub empty_buckets: usize,
    /// Distinct keys
    pub keys: usize,
    /// Values across all keys
    pub values: usize,
    /// Keys in the fullest bucket
    pub longest_bucket: usize,
    /// Rehashes performed since construction
    pub rehashes: usize,
}

/// Iterator over the values stored under one key, newest first
#[derive(Debug, Clone)]
pub struct Values<'a, T> {
    /// Walks the slot's values back to front
    inner: Rev<slice::Iter<'a, T>>,
}

impl<T> Default for Values<'_, T> {
    fn default() -> Self {
        let empty: &[T] = &[];
        Self { inner: empty.iter().rev() }
    }
}

impl<'a, T> Iterator for Values<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Values<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Values<'_, T> {}

impl<T> FusedIterator for Values<'_, T> {}

/// Iterator over the keys of a [`ChainedHashMap`] and their values
#[derive(Debug, Clone)]
pub struct Iter<'a, K, T> {
    /// Every slot of every bucket
    slots: std::iter::Flatten<slice::Iter<'a, Bucket<K, T>>>,
}

impl<'a, K, T> Iterator for Iter<'a, K, T> {
    type Item = (&'a K, Values<'a, T>);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.next().map(|slot| (&slot.key, Values { inner: slot.values.iter().rev() }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.slots.size_hint()
    }
}

impl<K, T> FusedIterator for Iter<'_, K, T> {}

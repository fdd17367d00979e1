//! # Chained Hash Map
//!
//! A Rust implementation of a separate-chaining multimap with bounded buckets and an adaptive
//! rehash policy.
//!
//! Every key maps to a list of values. Emplacing a key that is already present adds to its list,
//! nothing is ever overwritten or removed. Each bucket may hold a limited number of keys; when a
//! new key would overflow its bucket, the map looks at how many buckets are in use and either
//! doubles the table or allows one more key per bucket, then rebuilds itself.
//!
//! The map never hashes keys on its own: it is handed a `Fn(&K) -> u64` at construction. The
//! [`hashes`] module provides a handful of string hash functions of varying quality.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chainmap::{ChainedHashMap, hashes};
//!
//! // Create a new map keyed by name
//! let mut map = ChainedHashMap::new(|name: &String| hashes::better(name));
//!
//! // Emplace values
//! map.emplace("apple".to_string(), 1);
//! map.emplace("banana".to_string(), 2);
//!
//! // Emplacing an existing key keeps the old value, newest first
//! map.emplace("apple".to_string(), 10);
//! assert_eq!(map.equal_range(&"apple".to_string()).collect::<Vec<_>>(), [&10, &1]);
//!
//! // Missing keys are simply empty
//! assert_eq!(map.equal_range(&"cherry".to_string()).count(), 0);
//! assert!(map.get(&"cherry".to_string()).is_none());
//! ```
//!
//! ## Growth
//!
//! ```rust
//! use chainmap::{ChainedHashMap, GrowthPolicy};
//!
//! // A hasher that sends every key to the same bucket
//! let mut map = ChainedHashMap::new(|_: &u32| 0);
//! for key in 0..4 {
//!     map.emplace(key, key);
//! }
//!
//! // Only one bucket is in use, so the cap was raised instead of doubling the table
//! assert_eq!(map.table_size(), 11);
//! assert_eq!(map.bucket_cap(), 4);
//!
//! // Initial dimensions can be configured
//! let policy = GrowthPolicy::new(64, 2)?;
//! let map: ChainedHashMap<u32, u32, _> =
//!     ChainedHashMap::with_policy(|key: &u32| u64::from(*key), policy);
//! assert_eq!(map.empty_buckets(), 64);
//! # Ok::<(), chainmap::PolicyError>(())
//! ```

/// Module implementing the chained multimap
mod chained_hashmap;
/// String hash functions
pub mod hashes;
/// Growth policy and its configuration
mod policy;
/// Utility functions and traits for the map
mod utils;

pub use chained_hashmap::{ChainedHashMap, Iter, TableStats, Values};
pub use policy::{DEFAULT_BUCKET_CAP, DEFAULT_TABLE_SIZE, Growth, GrowthPolicy, PolicyError};
pub use utils::{MultiMapExtensions, collect_with};

//! Growth policy for [`ChainedHashMap`](crate::ChainedHashMap)
//!
//! A map only grows when a new key lands in a bucket that already holds as many keys as the
//! current cap allows. At that point exactly one of two things happens: the table doubles, or the
//! cap goes up by one. Which one is decided from how many buckets are in use.

use derive_more::{Display, Error};

/// Number of buckets a table starts with unless configured otherwise
pub const DEFAULT_TABLE_SIZE: usize = 11;

/// Longest a bucket may grow before an insert forces a rehash, unless configured otherwise
pub const DEFAULT_BUCKET_CAP: usize = 3;

/// Weight applied to the occupied bucket count before comparing it against the table size
const OCCUPANCY_WEIGHT: usize = 7;

/// Rejected [`GrowthPolicy`] parameters
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// A table needs at least one bucket to index into
    #[display("table must have at least one bucket")]
    ZeroTableSize,
    /// A bucket cap of zero would make every first insert rehash
    #[display("bucket cap must allow at least one entry")]
    ZeroBucketCap,
}

/// Initial dimensions of a [`ChainedHashMap`](crate::ChainedHashMap)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Number of buckets in a fresh table
    table_size: usize,
    /// Starting cap on bucket length
    bucket_cap: usize,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self { table_size: DEFAULT_TABLE_SIZE, bucket_cap: DEFAULT_BUCKET_CAP }
    }
}

impl GrowthPolicy {
    /// Creates a policy for a table of `table_size` buckets holding at most `bucket_cap` keys each
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::ZeroTableSize`] or [`PolicyError::ZeroBucketCap`] when the
    /// corresponding argument is zero.
    pub const fn new(table_size: usize, bucket_cap: usize) -> Result<Self, PolicyError> {
        if table_size == 0 {
            return Err(PolicyError::ZeroTableSize);
        }
        if bucket_cap == 0 {
            return Err(PolicyError::ZeroBucketCap);
        }
        Ok(Self { table_size, bucket_cap })
    }

    /// Number of buckets a fresh table gets
    #[must_use]
    pub const fn table_size(&self) -> usize {
        self.table_size
    }

    /// Bucket length cap a fresh table gets
    #[must_use]
    pub const fn bucket_cap(&self) -> usize {
        self.bucket_cap
    }
}

/// The single dimension a rehash changes
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Growth {
    /// Twice as many buckets, same cap
    #[display("double table")]
    DoubleTable,
    /// Same buckets, cap raised by one
    #[display("raise bucket cap")]
    RaiseBucketCap,
}

impl Growth {
    /// Picks the growth step for a table of `table_size` buckets of which `empty_buckets` hold
    /// nothing.
    ///
    /// Keys spread over more than a seventh of the table mean the table itself is too small, so
    /// it doubles. Keys crowded into a few buckets would stay crowded after doubling, so the cap
    /// is relaxed instead.
    #[must_use]
    pub const fn choose(table_size: usize, empty_buckets: usize) -> Self {
        let occupied = table_size.saturating_sub(empty_buckets);
        if occupied.saturating_mul(OCCUPANCY_WEIGHT) > table_size {
            Self::DoubleTable
        } else {
            Self::RaiseBucketCap
        }
    }

    /// Returns the `(table_size, bucket_cap)` pair that follows this step
    #[must_use]
    pub const fn apply(self, table_size: usize, bucket_cap: usize) -> (usize, usize) {
        match self {
            Self::DoubleTable => (table_size.saturating_mul(2), bucket_cap),
            Self::RaiseBucketCap => (table_size, bucket_cap.saturating_add(1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.table_size(), 11);
        assert_eq!(policy.bucket_cap(), 3);
    }

    #[test]
    fn test_rejects_zero_dimensions() {
        assert_eq!(GrowthPolicy::new(0, 3), Err(PolicyError::ZeroTableSize));
        assert_eq!(GrowthPolicy::new(11, 0), Err(PolicyError::ZeroBucketCap));
        assert_eq!(GrowthPolicy::new(0, 0), Err(PolicyError::ZeroTableSize));

        let policy = GrowthPolicy::new(5, 1).map(|p| (p.table_size(), p.bucket_cap()));
        assert_eq!(policy, Ok((5, 1)));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(PolicyError::ZeroTableSize.to_string(), "table must have at least one bucket");
        assert_eq!(
            PolicyError::ZeroBucketCap.to_string(),
            "bucket cap must allow at least one entry"
        );
    }

    #[test]
    fn test_choose_single_occupied_bucket() {
        // 1 * 7 <= 11
        assert_eq!(Growth::choose(11, 10), Growth::RaiseBucketCap);
    }

    #[test]
    fn test_choose_spread_keys() {
        // 2 * 7 > 11
        assert_eq!(Growth::choose(11, 9), Growth::DoubleTable);
        assert_eq!(Growth::choose(11, 0), Growth::DoubleTable);
    }

    #[test]
    fn test_choose_boundary() {
        // 2 * 7 == 14, not strictly greater
        assert_eq!(Growth::choose(14, 12), Growth::RaiseBucketCap);
        assert_eq!(Growth::choose(13, 11), Growth::DoubleTable);
    }

    #[test]
    fn test_apply_changes_one_dimension() {
        assert_eq!(Growth::DoubleTable.apply(11, 3), (22, 3));
        assert_eq!(Growth::RaiseBucketCap.apply(11, 3), (11, 4));
        assert_eq!(Growth::DoubleTable.to_string(), "double table");
    }
}

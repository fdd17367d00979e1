//! String hash functions to feed a [`ChainedHashMap`](crate::ChainedHashMap)
//!
//! These range from deliberately weak (`simple` collides on every anagram) to reasonable, which
//! makes them useful for watching how the growth policy reacts to skewed hashes. All of them
//! work on the UTF-8 bytes of the key and wrap on overflow.
//!
//! Bytes are read as signed `char`s, except in [`rot13`]: a byte of `0x80` or above is
//! sign-extended to 32 bits in [`simple`] and [`rot5`], and to 64 bits in [`elf`] and
//! [`better`].

use std::collections::HashSet;

/// Signature shared by every hash function in this module
pub type StrHasher = fn(&str) -> u64;

/// Every hash function in this module with its display name
pub const ALL: [(&str, StrHasher); 5] = [
    ("Simple hash", simple),
    ("Rot5 hash", rot5),
    ("Rot13 hash", rot13),
    ("Elf hash", elf),
    ("Better hash", better),
];

/// Sign-extends a byte to 32 bits
fn signed_32(byte: u8) -> u64 {
    u64::from(u32::from_ne_bytes(i32::from(i8::from_ne_bytes([byte])).to_ne_bytes()))
}

/// Sign-extends a byte to 64 bits
fn signed_64(byte: u8) -> u64 {
    u64::from_ne_bytes(i64::from(i8::from_ne_bytes([byte])).to_ne_bytes())
}

/// Sum of the key's bytes
#[must_use]
pub fn simple(key: &str) -> u64 {
    key.bytes().fold(0, |hash, byte| hash.wrapping_add(signed_32(byte)))
}

/// Adds each byte, then subtracts the hash rotated by 5 bits
#[must_use]
pub fn rot5(key: &str) -> u64 {
    key.bytes().fold(0, |hash: u64, byte| {
        let hash = hash.wrapping_add(signed_32(byte));
        hash.wrapping_sub(hash.wrapping_shl(5) | hash.wrapping_shr(13))
    })
}

/// Adds each byte, then subtracts the hash rotated by 13 bits
#[must_use]
pub fn rot13(key: &str) -> u64 {
    key.bytes().fold(0, |hash: u64, byte| {
        let hash = hash.wrapping_add(u64::from(byte));
        hash.wrapping_sub(hash.wrapping_shl(13) | hash.wrapping_shr(19))
    })
}

/// The ELF object file format's symbol hash
#[must_use]
pub fn elf(key: &str) -> u64 {
    key.bytes().fold(0, |hash: u64, byte| {
        let hash = hash.wrapping_shl(4).wrapping_add(signed_64(byte));
        let high = hash & 0xF000_0000;
        (hash ^ high.wrapping_shr(24)) & !high
    })
}

/// Position-weighted hash that mixes in the running value
#[must_use]
pub fn better(key: &str) -> u64 {
    key.bytes().enumerate().fold(0, |hash: u64, (position, byte)| {
        let weighted = (position as u64).wrapping_mul(signed_64(byte));
        hash.wrapping_add(weighted.wrapping_sub(hash.wrapping_mul(11)) & 0xFFFF_FFFF)
    })
}

/// Returns the percentage of distinct keys whose hash was already produced by an earlier
/// distinct key.
///
/// Repeated keys are counted once. An empty input has no collisions.
#[must_use]
#[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
pub fn collision_rate<I, F>(keys: I, hasher: F) -> f64
where
    I: IntoIterator,
    I::Item: AsRef<str>,
    F: Fn(&str) -> u64,
{
    let mut seen_keys = HashSet::new();
    let mut seen_hashes = HashSet::new();
    let mut collisions: usize = 0;

    for key in keys {
        let key = key.as_ref();
        if !seen_keys.insert(key.to_owned()) {
            continue;
        }
        if !seen_hashes.insert(hasher(key)) {
            collisions = collisions.saturating_add(1);
        }
    }

    if seen_keys.is_empty() {
        return 0.0;
    }
    collisions as f64 * 100.0 / seen_keys.len() as f64
}

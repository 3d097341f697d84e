//! Pluggable hash functions.
//!
//! A map never picks a hashing policy on its own; it is handed a
//! [`HashFunction`] at construction and reduces the returned value modulo its
//! capacity. Closures of the shape `Fn(&K) -> u64` qualify directly.

use std::hash::{DefaultHasher, Hash, Hasher};

/// Maps a key to a non-negative integer
pub trait HashFunction<K: ?Sized> {
    /// Computes the hash of `key`
    fn hash(&self, key: &K) -> u64;
}

impl<K, F> HashFunction<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> u64,
{
    fn hash(&self, key: &K) -> u64 {
        self(key)
    }
}

/// Sums the Unicode code points of a string key.
///
/// Anagrams collide, which makes this useful for exercising collision
/// handling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodePointSum;

impl<T: AsRef<str> + ?Sized> HashFunction<T> for CodePointSum {
    fn hash(&self, key: &T) -> u64 {
        key.as_ref().chars().fold(0_u64, |acc, c| acc.wrapping_add(u64::from(c)))
    }
}

/// Sums the code points of a string key, each weighted by its 1-based position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedCodePointSum;

impl<T: AsRef<str> + ?Sized> HashFunction<T> for WeightedCodePointSum {
    fn hash(&self, key: &T) -> u64 {
        key.as_ref()
            .chars()
            .zip(1_u64..)
            .fold(0_u64, |acc, (c, weight)| acc.wrapping_add(weight.wrapping_mul(u64::from(c))))
    }
}

/// Hashes any `Hash` key with the standard library's `DefaultHasher`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultHashFunction;

impl<T: Hash + ?Sized> HashFunction<T> for DefaultHashFunction {
    fn hash(&self, key: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }
}

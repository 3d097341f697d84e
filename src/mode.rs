//! Mode finding on top of [`ChainedHashMap`]

use std::{cmp::Ordering, hash::Hash};

use crate::{
    chained::ChainedHashMap,
    hash_function::{DefaultHashFunction, HashFunction},
};

/// Returns the most frequent values of `values` and their frequency.
///
/// Ties are reported in the order the values reached the winning count. An
/// empty input yields no modes and a frequency of 0.
///
/// ```rust
/// use quadmap::find_mode;
///
/// let fruit = ["apple", "apple", "grape", "melon", "melon", "peach"];
/// assert_eq!(find_mode(&fruit), (vec!["apple", "melon"], 2));
/// ```
#[must_use]
pub fn find_mode<T>(values: &[T]) -> (Vec<T>, usize)
where
    T: Hash + Eq + Clone,
{
    find_mode_with(values, DefaultHashFunction)
}

/// Same as [`find_mode`], tallying in a map that hashes with `hasher`
pub fn find_mode_with<T, H>(values: &[T], hasher: H) -> (Vec<T>, usize)
where
    T: Eq + Clone,
    H: HashFunction<T>,
{
    let mut tallies = ChainedHashMap::with_hasher(values.len() / 3, hasher);
    let mut modes = Vec::new();
    let mut highest = 0;

    for value in values {
        let count = tallies.get(value).map_or(1, |count: &usize| count.saturating_add(1));
        tallies.put(value.clone(), count);

        match count.cmp(&highest) {
            Ordering::Greater => {
                highest = count;
                modes.clear();
                modes.push(value.clone());
            }
            Ordering::Equal => modes.push(value.clone()),
            Ordering::Less => {}
        }
    }

    (modes, highest)
}

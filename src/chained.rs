use std::{borrow::Borrow, fmt, iter, mem};

use log::debug;

use crate::hash_function::{DefaultHashFunction, HashFunction};

/// A single entry in a chain
#[derive(Debug, Clone)]
struct Entry<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
}

/// Entries whose keys hash to the same bucket, in insertion order
type Chain<K, V> = Vec<Entry<K, V>>;

/// Builds `capacity` empty chains
fn empty_chains<K, V>(capacity: usize) -> Vec<Chain<K, V>> {
    iter::repeat_with(Vec::new).take(capacity).collect()
}

/// A hash map resolving collisions with separate chaining.
///
/// Every bucket owns a chain of entries; colliding keys are appended to the
/// chain of their bucket and lookups scan that one chain. Removal is a real
/// deletion, so no tombstones are involved. The table never resizes on its
/// own: chains simply grow until [`resize_table`](Self::resize_table) is
/// called.
#[derive(Debug, Clone)]
pub struct ChainedHashMap<K, V, H = DefaultHashFunction> {
    /// One chain per bucket; the number of chains is the capacity
    buckets: Vec<Chain<K, V>>,
    /// Total number of entries across all chains
    size: usize,
    /// Caller-supplied hash function
    hasher: H,
}

impl<K, V> ChainedHashMap<K, V, DefaultHashFunction> {
    /// Creates a map with `capacity` buckets hashing keys with [`DefaultHashFunction`]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashFunction)
    }
}

impl<K, V, H> ChainedHashMap<K, V, H> {
    /// Creates a map with `capacity` buckets (at least one) and the given hash function
    pub fn with_hasher(capacity: usize, hasher: H) -> Self {
        Self { buckets: empty_chains(capacity.max(1)), size: 0, hasher }
    }

    /// Returns the number of entries
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `size / capacity`; may exceed 1.0
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Counts buckets whose chain is empty
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|chain| chain.is_empty()).count()
    }

    /// Removes every entry, keeping the capacity
    pub fn clear(&mut self) {
        debug!("clearing chained table of capacity {}", self.capacity());
        self.buckets = empty_chains(self.capacity());
        self.size = 0;
    }

    /// Returns an iterator over the key-value pairs, bucket by bucket
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { chains: self.buckets.iter(), current: std::slice::Iter::default() }
    }

    /// Gets the bucket index for a key
    #[allow(clippy::cast_possible_truncation)]
    fn bucket_index<Q>(&self, key: &Q) -> usize
    where
        Q: ?Sized,
        H: HashFunction<Q>,
    {
        // the remainder is below the capacity, so it fits back into a usize
        self.hasher.hash(key).checked_rem(self.capacity() as u64).unwrap_or(0) as usize
    }

    /// Returns the chain a key hashes to
    fn chain<Q>(&self, key: &Q) -> Option<&Chain<K, V>>
    where
        Q: ?Sized,
        H: HashFunction<Q>,
    {
        self.buckets.get(self.bucket_index(key))
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        self.chain(key)?.iter().find(|entry| entry.key.borrow() == key).map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        let index = self.bucket_index(key);
        self.buckets
            .get_mut(index)?
            .iter_mut()
            .find(|entry| entry.key.borrow() == key)
            .map(|entry| &mut entry.value)
    }

    /// Returns true if `key` is stored in the map
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        if self.size == 0 {
            return false;
        }
        self.get(key).is_some()
    }

    /// Unlinks the entry for `key` from its chain and returns its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        let index = self.bucket_index(key);
        let chain = self.buckets.get_mut(index)?;
        let position = chain.iter().position(|entry| entry.key.borrow() == key)?;
        let removed = chain.remove(position);
        self.size = self.size.saturating_sub(1);
        Some(removed.value)
    }
}

impl<K, V, H> ChainedHashMap<K, V, H>
where
    K: Eq,
    H: HashFunction<K>,
{
    /// Inserts or updates a key-value pair, returning the previous value.
    ///
    /// An existing entry is updated in place; a new one is appended to the end
    /// of its chain.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let index = self.bucket_index(&key);
        let chain = self.buckets.get_mut(index)?;

        if let Some(entry) = chain.iter_mut().find(|entry| entry.key == key) {
            return Some(mem::replace(&mut entry.value, value));
        }

        chain.push(Entry { key, value });
        self.size = self.size.saturating_add(1);
        None
    }

    /// Rebuilds the table with `new_capacity` buckets, rehashing every entry.
    ///
    /// A target below 1 is ignored. Unlike the open addressing map, targets
    /// below the current size are accepted: chains absorb the overflow.
    pub fn resize_table(&mut self, new_capacity: usize) {
        if new_capacity < 1 {
            debug!("ignoring resize to {new_capacity} buckets");
            return;
        }

        debug!("rehashing {} entries: {} -> {} buckets", self.size, self.capacity(), new_capacity);
        let old_buckets = mem::replace(&mut self.buckets, empty_chains(new_capacity));
        self.size = 0;

        for entry in old_buckets.into_iter().flatten() {
            self.put(entry.key, entry.value);
        }
    }

    /// Returns the keys bucket by bucket, each chain in insertion order
    #[must_use]
    pub fn get_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(key, _)| key.clone()).collect()
    }
}

impl<K, V, H> Extend<(K, V)> for ChainedHashMap<K, V, H>
where
    K: Eq,
    H: HashFunction<K>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, H> fmt::Display for ChainedHashMap<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chain) in self.buckets.iter().enumerate() {
            write!(f, "{index}:")?;
            for entry in chain {
                write!(f, " -> ({}: {})", entry.key, entry.value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Iterator over the key-value pairs of a [`ChainedHashMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Chains not yet visited
    chains: std::slice::Iter<'a, Chain<K, V>>,
    /// Remainder of the chain being visited
    current: std::slice::Iter<'a, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.current.next() {
                return Some((&entry.key, &entry.value));
            }
            self.current = self.chains.next()?.iter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash_function::{CodePointSum, WeightedCodePointSum};

    fn identity(key: &u32) -> u64 {
        u64::from(*key)
    }

    #[test]
    fn test_contains_key() {
        let mut map: ChainedHashMap<String, i32, _> = ChainedHashMap::with_hasher(10, CodePointSum);
        assert!(!map.contains_key("key1"));
        map.put("key1".to_string(), 10);
        map.put("key2".to_string(), 20);
        map.put("key3".to_string(), 30);

        assert!(map.contains_key("key1"));
        assert!(!map.contains_key("key4"));
        assert!(map.contains_key("key2"));
        assert!(map.contains_key("key3"));

        assert_eq!(map.remove("key3"), Some(30));
        assert!(!map.contains_key("key3"));
        assert_eq!(map.size(), 2);
    }

    #[test]
    fn test_collisions_share_a_chain() {
        let mut map = ChainedHashMap::with_hasher(7, identity);
        for (key, value) in [(55, 1), (5, 2), (42, 3), (19, 4), (25, 5), (15, 6), (32, 7)] {
            assert_eq!(map.put(key, value), None);
        }

        assert_eq!(map.size(), 7);
        assert!((map.table_load() - 1.0).abs() < f64::EPSILON);
        // buckets 2 and 3 stay empty; 4 and 5 hold two entries each
        assert_eq!(map.empty_buckets(), 2);
        assert_eq!(map.get_keys(), vec![42, 15, 25, 32, 5, 19, 55]);
        assert_eq!(map.get(&32), Some(&7));
        assert_eq!(map.get(&39), None);
    }

    #[test]
    fn test_largest_hash_lands_in_range() {
        let mut map = ChainedHashMap::with_hasher(7, |_: &u32| u64::MAX);
        for key in 1..=3 {
            map.put(key, key);
        }

        // u64::MAX % 7 == 1
        assert_eq!(map.chain(&1).map(Vec::len), Some(3));
        assert_eq!(map.empty_buckets(), 6);
        assert_eq!(map.get_keys(), vec![1, 2, 3]);
        assert_eq!(map.get(&3), Some(&3));
    }

    #[test]
    fn test_update_keeps_chain_position() {
        let mut map = ChainedHashMap::with_hasher(7, identity);
        map.put(4, "a");
        map.put(11, "b");
        map.put(18, "c");

        assert_eq!(map.put(11, "B"), Some("b"));
        assert_eq!(map.size(), 3);
        assert_eq!(map.get_keys(), vec![4, 11, 18]);
        assert_eq!(map.get(&11), Some(&"B"));
    }

    #[test]
    fn test_remove_from_middle_of_chain() {
        let mut map = ChainedHashMap::with_hasher(7, identity);
        map.put(4, 'a');
        map.put(11, 'b');
        map.put(18, 'c');

        assert_eq!(map.remove(&11), Some('b'));
        assert_eq!(map.remove(&11), None);
        assert_eq!(map.get_keys(), vec![4, 18]);
        assert_eq!(map.get(&18), Some(&'c'));
        assert_eq!(map.size(), 2);
    }

    #[test]
    fn test_empty_buckets_and_load() {
        let mut map = ChainedHashMap::with_hasher(100, CodePointSum);
        assert_eq!(map.empty_buckets(), 100);
        map.put("key1".to_string(), 10);
        map.put("key2".to_string(), 20);
        map.put("key1".to_string(), 30);
        assert_eq!(map.empty_buckets(), 98);
        assert!((map.table_load() - 0.02).abs() < f64::EPSILON);
        map.put("key4".to_string(), 40);
        assert_eq!(map.empty_buckets(), 97);
    }

    #[test]
    fn test_resize_and_clear() {
        let mut map = ChainedHashMap::with_hasher(50, CodePointSum);
        map.put("key1".to_string(), 10);
        map.put("key2".to_string(), 20);

        map.resize_table(100);
        assert_eq!((map.size(), map.capacity()), (2, 100));
        assert_eq!(map.get("key1"), Some(&10));

        map.clear();
        assert_eq!((map.size(), map.capacity()), (0, 100));
        assert_eq!(map.empty_buckets(), 100);
        assert_eq!(map.get("key1"), None);
    }

    #[test]
    fn test_resize_below_size_is_allowed() {
        let mut map = ChainedHashMap::with_hasher(10, WeightedCodePointSum);
        for i in (100..200).step_by(10) {
            map.put(i.to_string(), (i * 10).to_string());
        }
        let keys = map.get_keys();

        // a single bucket keeps the previous bucket order
        map.resize_table(1);
        assert_eq!(map.capacity(), 1);
        assert_eq!(map.size(), 10);
        assert_eq!(map.empty_buckets(), 0);
        assert_eq!(map.get_keys(), keys);

        map.put("200".to_string(), "2000".to_string());
        map.remove("100");
        map.resize_table(2);
        assert_eq!(map.size(), 10);
        assert!(map.contains_key("200"));
        assert!(!map.contains_key("100"));

        map.resize_table(0);
        assert_eq!(map.capacity(), 2);
    }

    #[test]
    fn test_get_mut() {
        let mut map = ChainedHashMap::with_capacity(4);
        map.put("key1".to_string(), 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
    }

    #[test]
    fn test_extend() {
        let mut map = ChainedHashMap::with_capacity(3);
        map.extend(vec![("a".to_string(), 1), ("b".to_string(), 2), ("a".to_string(), 3)]);

        assert_eq!(map.size(), 2);
        assert_eq!(map.get("a"), Some(&3));
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_display() {
        let mut map = ChainedHashMap::with_hasher(3, identity);
        map.put(1, 10);
        map.put(4, 40);

        assert_eq!(map.to_string(), "0:\n1: -> (1: 10) -> (4: 40)\n2:\n");
    }
}

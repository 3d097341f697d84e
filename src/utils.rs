//! Utility traits shared by both map implementations

use crate::{ChainedHashMap, OpenAddressingMap, hash_function::HashFunction};

/// Bucket-level statistics common to every table layout
pub trait BucketTable<K> {
    /// Returns the number of live entries
    fn size(&self) -> usize;

    /// Returns the number of buckets
    fn capacity(&self) -> usize;

    /// Returns the number of buckets holding nothing
    fn empty_buckets(&self) -> usize;

    /// Returns the live keys in bucket order
    fn get_keys(&self) -> Vec<K>;

    /// Returns `size / capacity`
    #[allow(clippy::cast_precision_loss)]
    fn table_load(&self) -> f64 {
        self.size() as f64 / self.capacity() as f64
    }

    /// Returns true if the table holds no live entries
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

impl<K: Clone, V, H> BucketTable<K> for OpenAddressingMap<K, V, H> {
    fn size(&self) -> usize {
        Self::size(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn get_keys(&self) -> Vec<K> {
        Self::get_keys(self)
    }
}

impl<K, V, H> BucketTable<K> for ChainedHashMap<K, V, H>
where
    K: Eq + Clone,
    H: HashFunction<K>,
{
    fn size(&self) -> usize {
        Self::size(self)
    }

    fn capacity(&self) -> usize {
        Self::capacity(self)
    }

    fn empty_buckets(&self) -> usize {
        Self::empty_buckets(self)
    }

    fn get_keys(&self) -> Vec<K> {
        Self::get_keys(self)
    }
}

use std::{borrow::Borrow, fmt, iter, mem};

use log::{debug, warn};

use crate::{
    error::{MapError, Result},
    hash_function::{DefaultHashFunction, HashFunction},
};

/// Resize threshold used unless configured otherwise, as a percentage of capacity
const DEFAULT_LOAD_FACTOR_THRESHOLD: usize = 50;

/// A key-value pair stored in a slot
#[derive(Debug, Clone)]
struct Entry<K, V> {
    /// The key in the key-value pair
    key: K,
    /// The value associated with the key
    value: V,
}

/// State of a single bucket.
///
/// A tombstone keeps its entry around until the slot is reused, but it is
/// logically absent: probes walk past it and it never counts as live.
#[derive(Debug, Clone)]
enum Slot<K, V> {
    /// Never written since the table was (re)built; terminates every probe
    Empty,
    /// Holds a live entry
    Occupied(Entry<K, V>),
    /// Held an entry that has since been removed
    Tombstone(Entry<K, V>),
}

impl<K, V> Slot<K, V> {
    /// Returns the entry if the slot is live
    fn live(&self) -> Option<&Entry<K, V>> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty | Self::Tombstone(_) => None,
        }
    }
}

/// Builds a bucket sequence of `capacity` empty slots
fn empty_table<K, V>(capacity: usize) -> Vec<Slot<K, V>> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

/// Indices `(hash + j²) mod capacity` for `j = 0, 1, .., capacity - 1`.
///
/// The sequence is finite: a probe never visits more than `capacity` slots.
#[derive(Debug, Clone)]
struct QuadraticProbe {
    /// `hash mod capacity`
    base: usize,
    /// `j² mod capacity` for the next step
    offset: usize,
    /// Number of indices yielded so far
    step: usize,
    /// Number of buckets in the table being probed
    capacity: usize,
}

impl QuadraticProbe {
    /// Starts a probe for `hash` over a table of `capacity` buckets
    #[allow(clippy::cast_possible_truncation)]
    fn new(hash: u64, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        // the remainder is below `capacity`, so it fits back into a usize
        let base = hash.checked_rem(capacity as u64).unwrap_or(0) as usize;
        Self { base, offset: 0, step: 0, capacity }
    }
}

impl Iterator for QuadraticProbe {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.step >= self.capacity {
            return None;
        }
        let index = (self.base + self.offset) % self.capacity;
        // (j + 1)² = j² + 2j + 1
        let delta = (2 * self.step + 1) % self.capacity;
        self.offset = (self.offset + delta) % self.capacity;
        self.step += 1;
        Some(index)
    }
}

/// Outcome of walking the probe sequence for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key is live at this index
    Found(usize),
    /// The key is absent; a new entry belongs at this index
    Vacant(usize),
    /// The key is absent and no slot on its probe path can take it
    Exhausted,
}

/// A hash map resolving collisions with open addressing and quadratic probing.
///
/// Removal leaves a tombstone behind so that probe sequences running through
/// the slot keep going; later insertions reuse tombstoned slots. Before every
/// `put` the table doubles its capacity if the load factor has reached the
/// configured threshold (50% by default).
///
/// The hash function is injected at construction; see [`HashFunction`].
///
/// Note: This implementation is not thread-safe.
#[derive(Debug, Clone)]
pub struct OpenAddressingMap<K, V, H = DefaultHashFunction> {
    /// The bucket sequence; its length is the capacity
    buckets: Vec<Slot<K, V>>,
    /// Number of live (non-tombstoned) entries
    size: usize,
    /// Caller-supplied hash function
    hasher: H,
    /// Load factor at which `put` grows the table - stored as percentage (1-95)
    load_factor_threshold: usize,
}

impl<K, V> OpenAddressingMap<K, V, DefaultHashFunction> {
    /// Creates a map with `capacity` buckets hashing keys with [`DefaultHashFunction`]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_hasher(capacity, DefaultHashFunction)
    }
}

impl<K, V, H> OpenAddressingMap<K, V, H> {
    /// Creates a map with `capacity` buckets (at least one) and the given hash function
    pub fn with_hasher(capacity: usize, hasher: H) -> Self {
        Self {
            buckets: empty_table(capacity.max(1)),
            size: 0,
            hasher,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
        }
    }

    /// Returns the number of live entries
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns true if the map holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `size / capacity`
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.capacity() as f64
    }

    /// Counts buckets that have never held an entry since the last rebuild.
    /// Tombstones are not empty.
    #[must_use]
    pub fn empty_buckets(&self) -> usize {
        self.buckets.iter().filter(|slot| matches!(slot, Slot::Empty)).count()
    }

    /// Removes every entry, keeping the capacity
    pub fn clear(&mut self) {
        debug!("clearing open addressing table of capacity {}", self.capacity());
        self.buckets = empty_table(self.capacity());
        self.size = 0;
    }

    /// Sets the load factor percentage at which `put` doubles the capacity
    pub fn set_load_factor_threshold(&mut self, threshold: usize) {
        self.load_factor_threshold = threshold.clamp(1, 95);
    }

    /// Returns an iterator over the live key-value pairs in bucket order
    #[must_use]
    #[allow(clippy::iter_without_into_iter)]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { slots: self.buckets.iter() }
    }

    /// Returns the live keys in bucket order
    #[must_use]
    pub fn get_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|(key, _)| key.clone()).collect()
    }

    /// Whether the load factor has reached the resize threshold
    #[allow(clippy::cast_precision_loss)]
    fn needs_growth(&self) -> bool {
        self.table_load() >= self.load_factor_threshold as f64 / 100.0
    }

    /// Walks the probe sequence of `key`
    fn find_slot<Q>(&self, key: &Q) -> Probe
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        let mut first_tombstone = None;

        for index in QuadraticProbe::new(self.hasher.hash(key), self.capacity()) {
            match self.buckets.get(index) {
                None => break,
                Some(Slot::Empty) => return Probe::Vacant(first_tombstone.unwrap_or(index)),
                Some(Slot::Occupied(entry)) if entry.key.borrow() == key => {
                    return Probe::Found(index);
                }
                Some(Slot::Tombstone(_)) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Slot::Occupied(_)) => {}
            }
        }

        first_tombstone.map_or(Probe::Exhausted, Probe::Vacant)
    }

    /// Retrieve a value for a given key
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        let Probe::Found(index) = self.find_slot(key) else {
            return None;
        };
        self.buckets.get(index).and_then(Slot::live).map(|entry| &entry.value)
    }

    /// Get a mutable reference to a value for a given key
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        let Probe::Found(index) = self.find_slot(key) else {
            return None;
        };
        match self.buckets.get_mut(index) {
            Some(Slot::Occupied(entry)) => Some(&mut entry.value),
            _ => None,
        }
    }

    /// Returns true if `key` is live in the map
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
    {
        if self.size == 0 {
            return false;
        }
        matches!(self.find_slot(key), Probe::Found(_))
    }

    /// Tombstones the entry for `key` and returns its value.
    /// Other entries are left where they are.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
        H: HashFunction<Q>,
        V: Clone,
    {
        let Probe::Found(index) = self.find_slot(key) else {
            return None;
        };
        let slot = self.buckets.get_mut(index)?;
        match mem::replace(slot, Slot::Empty) {
            Slot::Occupied(entry) => {
                let removed = entry.value.clone();
                *slot = Slot::Tombstone(entry);
                self.size = self.size.saturating_sub(1);
                Some(removed)
            }
            other => {
                *slot = other;
                None
            }
        }
    }
}

impl<K, V, H> OpenAddressingMap<K, V, H>
where
    K: Eq + Clone,
    V: Clone,
    H: HashFunction<K>,
{
    /// Inserts or updates a key-value pair, returning the previous value.
    ///
    /// If the load factor has reached the threshold, the table doubles first.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::ProbeExhausted`] when neither the key, an empty slot,
    /// nor a tombstone lies on the key's probe sequence. The entries of the map
    /// are left untouched in that case.
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>> {
        if self.needs_growth() {
            self.resize_table(self.capacity().saturating_mul(2))?;
        }

        match self.find_slot(&key) {
            Probe::Found(index) => Ok(match self.buckets.get_mut(index) {
                Some(Slot::Occupied(entry)) => Some(mem::replace(&mut entry.value, value)),
                _ => None,
            }),
            Probe::Vacant(index) => {
                if let Some(slot) = self.buckets.get_mut(index) {
                    *slot = Slot::Occupied(Entry { key, value });
                    self.size = self.size.saturating_add(1);
                }
                Ok(None)
            }
            Probe::Exhausted => {
                warn!(
                    "probe exhausted {} buckets holding {} entries",
                    self.capacity(),
                    self.size
                );
                Err(MapError::ProbeExhausted { capacity: self.capacity(), size: self.size })
            }
        }
    }

    /// Rebuilds the table with `new_capacity` buckets, rehashing every live entry.
    ///
    /// Targets below 1 or below the current size are ignored. Entries are
    /// re-inserted through [`put`](Self::put), so the final capacity can end up
    /// larger than requested if the threshold is crossed while rehashing. The
    /// load factor is not checked afterwards.
    ///
    /// # Errors
    ///
    /// Propagates [`MapError::ProbeExhausted`] from rehashing; the previous table
    /// is restored before returning.
    pub fn resize_table(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity < 1 || new_capacity < self.size {
            debug!("ignoring resize to {new_capacity} buckets: map holds {} entries", self.size);
            return Ok(());
        }

        debug!("rehashing {} entries: {} -> {} buckets", self.size, self.capacity(), new_capacity);
        let old_buckets = mem::replace(&mut self.buckets, empty_table(new_capacity));
        let old_size = mem::replace(&mut self.size, 0);

        let rehashed = old_buckets
            .iter()
            .filter_map(Slot::live)
            .try_for_each(|entry| self.put(entry.key.clone(), entry.value.clone()).map(|_| ()));

        if let Err(err) = rehashed {
            self.buckets = old_buckets;
            self.size = old_size;
            return Err(err);
        }
        Ok(())
    }
}

impl<K, V, H> fmt::Display for OpenAddressingMap<K, V, H>
where
    K: fmt::Display,
    V: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, slot) in self.buckets.iter().enumerate() {
            match slot {
                Slot::Empty => writeln!(f, "{index}: None")?,
                Slot::Occupied(entry) => {
                    writeln!(f, "{index}: K: {} V: {} TS: false", entry.key, entry.value)?;
                }
                Slot::Tombstone(entry) => {
                    writeln!(f, "{index}: K: {} V: {} TS: true", entry.key, entry.value)?;
                }
            }
        }
        Ok(())
    }
}

/// Iterator over the live key-value pairs of an [`OpenAddressingMap`]
#[derive(Debug, Clone)]
pub struct Iter<'a, K, V> {
    /// Remaining slots to scan
    slots: std::slice::Iter<'a, Slot<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.slots.find_map(|slot| slot.live().map(|entry| (&entry.key, &entry.value)))
    }
}

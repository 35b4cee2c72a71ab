//! OwnedSkipList - a skip list that owns its storage.

use core::fmt;
use core::ops::ControlFlow;

use rand_core::{RngCore, SeedableRng};

use crate::comparator::{Ascend, Comparator};
use crate::debug::InvariantViolation;
use crate::skiplist::{Iter, Keys, SkipArena, SkipList, Values};
use crate::{Full, Key};

type Inner<K, V, R, C, Idx, const MAX_HEIGHT: usize> =
    SkipList<K, V, SkipArena<K, V, Idx, MAX_HEIGHT>, R, C, Idx, MAX_HEIGHT>;

/// A skip list that owns its storage.
///
/// This is a convenience wrapper around [`SkipList`] + [`SkipArena`] for cases
/// where you don't need to share storage across multiple data structures.
/// Dropping it drops every entry.
///
/// # Example
///
/// ```
/// use nexus_skipmap::OwnedSkipList;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let rng = SmallRng::seed_from_u64(12345);
/// let mut map: OwnedSkipList<u64, String, _> = OwnedSkipList::with_capacity(rng, 100);
///
/// map.insert(100, "first".into()).unwrap();
/// map.insert(50, "second".into()).unwrap();
///
/// assert_eq!(map.get(&50), Some(&"second".into()));
/// assert_eq!(map.first(), Some((&50, &"second".into())));
///
/// // Iterate in sorted order
/// let keys: Vec<_> = map.keys().copied().collect();
/// assert_eq!(keys, vec![50, 100]);
/// ```
pub struct OwnedSkipList<K, V, R, C = Ascend, Idx: Key = u32, const MAX_HEIGHT: usize = 16> {
    storage: SkipArena<K, V, Idx, MAX_HEIGHT>,
    list: Inner<K, V, R, C, Idx, MAX_HEIGHT>,
}

impl<K, V, R, Idx: Key, const MAX_HEIGHT: usize> OwnedSkipList<K, V, R, Ascend, Idx, MAX_HEIGHT>
where
    K: Ord,
    R: RngCore,
{
    /// Creates a new skip list with the given RNG and capacity.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or exceeds what `Idx` can address.
    pub fn with_capacity(rng: R, capacity: usize) -> Self {
        Self::with_comparator(Ascend, rng, capacity)
    }

    /// Creates a new skip list with custom level ratio.
    ///
    /// `level_ratio` controls memory vs search speed tradeoff:
    /// - 2: Standard (p=0.5), ~2 links per node average
    /// - 4: Redis-style (p=0.25), ~1.33 links per node average
    pub fn with_capacity_and_ratio(rng: R, capacity: usize, level_ratio: u32) -> Self {
        Self {
            storage: SkipArena::with_capacity(capacity),
            list: SkipList::with_level_ratio(rng, level_ratio),
        }
    }
}

impl<K, V, R, C, Idx: Key, const MAX_HEIGHT: usize> OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT>
where
    R: RngCore,
    C: Comparator<K>,
{
    /// Creates a new skip list ordered by `cmp`.
    pub fn with_comparator(cmp: C, rng: R, capacity: usize) -> Self {
        Self {
            storage: SkipArena::with_capacity(capacity),
            list: SkipList::with_comparator(cmp, rng),
        }
    }

    /// Returns the number of elements in the skip list.
    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Returns `true` if the skip list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Returns the storage capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the current head height.
    #[inline]
    pub fn height(&self) -> usize {
        self.list.height()
    }

    /// Returns `true` if at least one entry has the given key.
    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.list.contains(&self.storage, key)
    }

    // ========================================================================
    // Access
    // ========================================================================

    /// Returns the value of the most recent entry with the given key.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.list.get(&self.storage, key)
    }

    /// Returns a mutable reference to the value of the most recent entry with the given key.
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.list.get_mut(&mut self.storage, key)
    }

    /// Returns the first (smallest) key-value pair, or `None` if empty.
    #[inline]
    pub fn first(&self) -> Option<(&K, &V)> {
        self.list.first(&self.storage)
    }

    /// Returns the last (largest) key-value pair, or `None` if empty.
    #[inline]
    pub fn last(&self) -> Option<(&K, &V)> {
        self.list.last(&self.storage)
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Inserts a new entry in front of any entries with an equal key.
    ///
    /// Returns the pair back if storage is full.
    #[inline]
    pub fn insert(&mut self, key: K, value: V) -> Result<(), Full<(K, V)>> {
        self.list.insert(&mut self.storage, key, value)
    }

    /// Overwrites the most recent entry with an equal key, or inserts.
    ///
    /// Returns the previous value on overwrite.
    #[inline]
    pub fn replace(&mut self, key: K, value: V) -> Result<Option<V>, Full<(K, V)>> {
        self.list.replace(&mut self.storage, key, value)
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes the most recent entry with the given key, returning its value.
    #[inline]
    pub fn delete(&mut self, key: &K) -> Option<V> {
        self.list.delete(&mut self.storage, key)
    }

    /// Removes every entry with the given key, handing each to `f`.
    #[inline]
    pub fn delete_all<F: FnMut(K, V)>(&mut self, key: &K, f: F) -> usize {
        self.list.delete_all(&mut self.storage, key, f)
    }

    /// Removes and returns the first (smallest) key-value pair.
    #[inline]
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.list.pop_first(&mut self.storage)
    }

    /// Removes and returns the last (largest) key-value pair.
    #[inline]
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.list.pop_last(&mut self.storage)
    }

    /// Removes all elements, handing each to `f` in order.
    #[inline]
    pub fn clear<F: FnMut(K, V)>(&mut self, f: F) -> usize {
        self.list.clear(&mut self.storage, f)
    }

    /// Hands every entry to `f` in order, then drops the list and its storage.
    pub fn destroy<F: FnMut(K, V)>(mut self, f: F) -> usize {
        self.list.clear(&mut self.storage, f)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Calls `f` on every entry in order until it breaks.
    #[inline]
    pub fn iterate<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        self.list.iterate(&self.storage, f)
    }

    /// Calls `f` starting at the first entry with the given key.
    ///
    /// Returns `None` if no entry matches.
    #[inline]
    pub fn iterate_from<B, F>(&self, key: &K, f: F) -> Option<ControlFlow<B>>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        self.list.iterate_from(&self.storage, key, f)
    }

    /// Returns an iterator over key-value pairs in order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, K, V, SkipArena<K, V, Idx, MAX_HEIGHT>, Idx, MAX_HEIGHT> {
        self.list.iter(&self.storage)
    }

    /// Returns an iterator starting at the first entry with the given key.
    #[inline]
    pub fn iter_from(
        &self,
        key: &K,
    ) -> Option<Iter<'_, K, V, SkipArena<K, V, Idx, MAX_HEIGHT>, Idx, MAX_HEIGHT>> {
        self.list.iter_from(&self.storage, key)
    }

    /// Returns an iterator over keys in order.
    #[inline]
    pub fn keys(&self) -> Keys<'_, K, V, SkipArena<K, V, Idx, MAX_HEIGHT>, Idx, MAX_HEIGHT> {
        self.list.keys(&self.storage)
    }

    /// Returns an iterator over values in key order.
    #[inline]
    pub fn values(&self) -> Values<'_, K, V, SkipArena<K, V, Idx, MAX_HEIGHT>, Idx, MAX_HEIGHT> {
        self.list.values(&self.storage)
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// See [`SkipList::dump_with`].
    pub fn dump_with<W, F>(&self, out: &mut W, entry: F) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &K, &V) -> fmt::Result,
    {
        self.list.dump_with(&self.storage, out, entry)
    }

    /// See [`SkipList::dump`].
    pub fn dump(&self) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        self.list.dump(&self.storage)
    }

    /// See [`SkipList::check_invariants`].
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.list.check_invariants(&self.storage)
    }
}

impl<K, V, R, C, Idx: Key, const MAX_HEIGHT: usize> OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT>
where
    R: SeedableRng,
{
    /// Reseeds the height generator.
    pub fn reseed(&mut self, seed: u64) {
        self.list.reseed(seed);
    }
}

impl<K, V, R, C, Idx: Key, const MAX_HEIGHT: usize> fmt::Debug
    for OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT>
where
    K: fmt::Debug,
    V: fmt::Debug,
    R: RngCore,
    C: Comparator<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

//! Skip list - a probabilistic ordered multimap backed by external storage.
//!
//! A skip list provides O(log n) expected time for insert, lookup, and removal,
//! with predictable latency (no rebalancing).
//!
//! # Design
//!
//! The external storage owns [`SkipNode`]s which contain the key, value, and
//! forward links. The list itself owns only the head links, the entry count,
//! the comparator and the height generator.
//!
//! ```text
//! Level 2:  HEAD ─────────────────────► 50 ──────────────────► END
//!             │                          │
//! Level 1:  HEAD ────────► 20 ──────────► 50 ──────────────────► END
//!             │            │              │
//! Level 0:  HEAD ──► 10 ──► 20 ──► 30 ──► 50 ──► 60 ──► END
//! ```
//!
//! Every mutating or locating operation starts with the same predecessor
//! scan: for each level, the last position whose key is strictly less than
//! the target. Insert and delete splice with that vector.
//!
//! # Duplicate keys
//!
//! Keys may repeat. The scan stops on equal keys, so a new node is always
//! spliced in front of existing nodes with the same key. Among equal keys,
//! iteration order is most-recently-inserted first.
//!
//! # Example
//!
//! ```rust
//! use nexus_skipmap::{SkipArena, SkipList};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut storage: SkipArena<u64, &str> = SkipArena::with_capacity(100);
//! let rng = SmallRng::seed_from_u64(12345);
//! let mut map: SkipList<u64, &str, _, _> = SkipList::new(rng);
//!
//! map.insert(&mut storage, 5, "a").unwrap();
//! map.insert(&mut storage, 5, "b").unwrap();
//! map.insert(&mut storage, 1, "c").unwrap();
//!
//! let all: Vec<_> = map.iter(&storage).collect();
//! assert_eq!(all, vec![(&1, &"c"), (&5, &"b"), (&5, &"a")]);
//! ```

use core::cmp::Ordering;
use core::marker::PhantomData;
use core::ops::ControlFlow;

use rand_core::{RngCore, SeedableRng};

use crate::comparator::{Ascend, Comparator};
use crate::height::HeightGenerator;
use crate::key::Key;
use crate::node::{Link, SkipNode};
use crate::storage::{Arena, Full, Storage};

/// A position a link can hang off: the head, or a node.
///
/// Predecessor slots name the head symbolically, so head growth never leaves
/// a slot pointing at a stale head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pos<Idx> {
    Head,
    Node(Idx),
}

// ============================================================================
// SkipList
// ============================================================================

/// A probabilistic ordered multimap backed by external storage.
///
/// # Type Parameters
///
/// - `K`: Key type
/// - `V`: Value type
/// - `S`: Storage type implementing [`Storage`]
/// - `R`: Random number generator implementing [`RngCore`]
/// - `C`: Key [`Comparator`], defaults to [`Ascend`]
/// - `Idx`: Index type for storage keys, defaults to `u32`
/// - `MAX_HEIGHT`: Maximum node height, defaults to 16 (~65K elements efficient)
///
/// # Critical Invariant: Same Storage Instance
///
/// Every call must pass the same storage instance. Passing another one is a
/// logic error and panics on the first dangling index.
///
/// Dropping the list does not free its nodes; call [`clear`](Self::clear)
/// or [`destroy`](Self::destroy) first, or drop the storage with it.
#[derive(Debug)]
pub struct SkipList<K, V, S, R, C = Ascend, Idx = u32, const MAX_HEIGHT: usize = 16>
where
    Idx: Key,
{
    /// `head[i]` is the first node at level i. Levels at or above
    /// `height` are always `End`.
    pub(crate) head: [Link<Idx>; MAX_HEIGHT],
    /// Height of the tallest node present, at least 1.
    pub(crate) height: usize,
    /// Number of elements in the skip list.
    pub(crate) len: usize,
    pub(crate) cmp: C,
    heights: HeightGenerator<R, MAX_HEIGHT>,
    _marker: PhantomData<(K, V, S)>,
}

impl<K, V, S, R, Idx, const MAX_HEIGHT: usize> SkipList<K, V, S, R, Ascend, Idx, MAX_HEIGHT>
where
    K: Ord,
    R: RngCore,
    Idx: Key,
{
    /// Creates a new empty skip list ordered by `K: Ord`.
    ///
    /// Uses default level ratio of 2 (p=0.5), meaning on average
    /// half of nodes appear at each successive level.
    pub fn new(rng: R) -> Self {
        Self::with_comparator(Ascend, rng)
    }

    /// Creates a new empty skip list with custom level ratio.
    ///
    /// See [`HeightGenerator::with_level_ratio`].
    pub fn with_level_ratio(rng: R, level_ratio: u32) -> Self {
        Self::with_comparator_and_ratio(Ascend, rng, level_ratio)
    }
}

impl<K, V, S, R, C, Idx, const MAX_HEIGHT: usize> SkipList<K, V, S, R, C, Idx, MAX_HEIGHT>
where
    R: RngCore,
    C: Comparator<K>,
    Idx: Key,
{
    /// Creates a new empty skip list ordered by `cmp`.
    pub fn with_comparator(cmp: C, rng: R) -> Self {
        Self::with_comparator_and_ratio(cmp, rng, 2)
    }

    /// Creates a new empty skip list ordered by `cmp` with custom level ratio.
    pub fn with_comparator_and_ratio(cmp: C, rng: R, level_ratio: u32) -> Self {
        Self {
            head: [Link::End; MAX_HEIGHT],
            height: 1,
            len: 0,
            cmp,
            heights: HeightGenerator::with_level_ratio(rng, level_ratio),
            _marker: PhantomData,
        }
    }

    /// Returns the effective level ratio (a power of 2, at least 2).
    #[inline]
    pub fn level_ratio(&self) -> u32 {
        self.heights.level_ratio()
    }
}

impl<K, V, S, R, C, Idx, const MAX_HEIGHT: usize> SkipList<K, V, S, R, C, Idx, MAX_HEIGHT>
where
    Idx: Key,
{
    /// Returns the number of elements in the skip list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the skip list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current head height: the tallest node present, at least 1.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the comparator.
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.cmp
    }
}

impl<K, V, S, R, C, Idx, const MAX_HEIGHT: usize> SkipList<K, V, S, R, C, Idx, MAX_HEIGHT>
where
    R: SeedableRng,
    Idx: Key,
{
    /// Reseeds the height generator.
    ///
    /// Only affects heights drawn by later inserts.
    pub fn reseed(&mut self, seed: u64) {
        self.heights.reseed(seed);
    }
}

impl<K, V, S, R, C, Idx, const MAX_HEIGHT: usize> SkipList<K, V, S, R, C, Idx, MAX_HEIGHT>
where
    R: RngCore,
    C: Comparator<K>,
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns `true` if at least one entry has the given key.
    #[inline]
    pub fn contains(&self, storage: &S, key: &K) -> bool {
        self.find(storage, key).is_some()
    }

    /// Returns the value of the first entry with the given key.
    ///
    /// With duplicates, this is the most recently inserted one.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, key: &K) -> Option<&'a V>
    where
        K: 'a,
    {
        let idx = self.find(storage, key)?;
        Some(&Self::node_at(storage, idx).value)
    }

    /// Returns a mutable reference to the value of the first entry with the given key.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, key: &K) -> Option<&'a mut V>
    where
        K: 'a,
    {
        let idx = self.find(storage, key)?;
        Some(&mut Self::node_at_mut(storage, idx).value)
    }

    /// Returns the first (smallest) key-value pair, or `None` if empty.
    #[inline]
    pub fn first<'a>(&self, storage: &'a S) -> Option<(&'a K, &'a V)> {
        let idx = self.head[0].node()?;
        let node = Self::node_at(storage, idx);
        Some((&node.key, &node.value))
    }

    /// Returns the last (largest) key-value pair, or `None` if empty.
    ///
    /// Walks down from the top level, so this is O(log n) expected.
    pub fn last<'a>(&self, storage: &'a S) -> Option<(&'a K, &'a V)> {
        let mut level = self.height - 1;
        let mut current = self.head[level].node()?;

        loop {
            match Self::node_at(storage, current).next(level) {
                Link::Node(next) => current = next,
                Link::End if level == 0 => break,
                Link::End => level -= 1,
            }
        }

        let node = Self::node_at(storage, current);
        debug_assert!(node.next(0).is_end());
        Some((&node.key, &node.value))
    }

    // ========================================================================
    // Insert
    // ========================================================================

    /// Inserts a new entry, even if entries with an equal key exist.
    ///
    /// The new entry is placed before every existing entry with an equal key.
    /// Returns the key and value back if storage is full; the list is left
    /// untouched in that case.
    pub fn insert(&mut self, storage: &mut S, key: K, value: V) -> Result<(), Full<(K, V)>> {
        let preds = self.search(storage, &key);
        self.insert_at(storage, &preds, key, value)
    }

    /// Overwrites the value of the first entry with an equal key, or inserts.
    ///
    /// Returns the previous value on a match. No storage is allocated in
    /// that case, so it cannot fail.
    pub fn replace(
        &mut self,
        storage: &mut S,
        key: K,
        value: V,
    ) -> Result<Option<V>, Full<(K, V)>> {
        let preds = self.search(storage, &key);

        if let Some(idx) = self.matching(storage, self.next_of(storage, preds[0], 0), &key) {
            let node = Self::node_at_mut(storage, idx);
            return Ok(Some(core::mem::replace(&mut node.value, value)));
        }

        self.insert_at(storage, &preds, key, value)?;
        Ok(None)
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes the first entry with the given key and returns its value.
    ///
    /// Returns `None` without touching the list if no entry matches.
    pub fn delete(&mut self, storage: &mut S, key: &K) -> Option<V> {
        let preds = self.search(storage, key);
        let idx = self.matching(storage, self.next_of(storage, preds[0], 0), key)?;

        let node = storage.remove(idx).expect("invalid index");
        for (level, &next) in node.forward().iter().enumerate() {
            self.set_next(storage, preds[level], level, next);
        }

        self.len -= 1;
        self.shrink_head();

        Some(node.value)
    }

    /// Removes every entry with the given key, handing each to `f`.
    ///
    /// Entries are passed in list order (most recent first). Returns the
    /// number removed, 0 if no entry matched.
    ///
    /// The run is unlinked before `f` first runs. If `f` panics, the entries
    /// it has not seen yet are dropped and their slots freed.
    pub fn delete_all<F>(&mut self, storage: &mut S, key: &K, mut f: F) -> usize
    where
        F: FnMut(K, V),
    {
        let preds = self.search(storage, key);
        let Some(first) = self.matching(storage, self.next_of(storage, preds[0], 0), key) else {
            return 0;
        };

        // Walk the run of equal keys. At each level, the last doomed node seen
        // there holds the link to the first survivor.
        let mut nexts = [Link::End; MAX_HEIGHT];
        let mut tallest = 0;
        let mut doomed_count = 0;
        let mut current = first;
        loop {
            let node = Self::node_at(storage, current);
            let height = node.height();
            tallest = tallest.max(height);
            nexts[..height].copy_from_slice(node.forward());
            doomed_count += 1;

            match self.matching(storage, node.next(0), key) {
                Some(next) => current = next,
                None => break,
            }
        }

        // The run is unlinked before any callback runs.
        for (level, &next) in nexts[..tallest].iter().enumerate() {
            self.set_next(storage, preds[level], level, next);
        }
        self.len -= doomed_count;
        self.shrink_head();

        tracing::trace!(removed = doomed_count, tallest, "deleted key run");

        for (k, v) in Drain::new(storage, Link::Node(first), doomed_count) {
            f(k, v);
        }

        doomed_count
    }

    /// Removes the first (smallest) key-value pair and returns it.
    pub fn pop_first(&mut self, storage: &mut S) -> Option<(K, V)> {
        let idx = self.head[0].node()?;
        let node = storage.remove(idx).expect("invalid head");

        // The first node at level 0 is also first at every level it occupies.
        for (level, &next) in node.forward().iter().enumerate() {
            debug_assert_eq!(self.head[level], Link::Node(idx));
            self.head[level] = next;
        }

        self.len -= 1;
        self.shrink_head();

        Some(node.into_entry())
    }

    /// Removes the last (largest) key-value pair and returns it.
    ///
    /// This is O(log n) expected, as the predecessors of the last node must be
    /// found at every level.
    pub fn pop_last(&mut self, storage: &mut S) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }

        // At each level, stop on the position whose successor is either End
        // or the last node at that level.
        let mut preds = [Pos::Head; MAX_HEIGHT];
        let mut current = Pos::Head;
        for level in (0..self.height).rev() {
            while let Link::Node(next) = self.next_of(storage, current, level) {
                if Self::node_at(storage, next).next(level).is_end() {
                    break;
                }
                current = Pos::Node(next);
            }
            preds[level] = current;
        }

        let idx = self
            .next_of(storage, preds[0], 0)
            .node()
            .expect("non-empty list has a last node");
        let node = storage.remove(idx).expect("invalid index");
        debug_assert!(node.next(0).is_end());

        for level in 0..node.height() {
            self.set_next(storage, preds[level], level, Link::End);
        }

        self.len -= 1;
        self.shrink_head();

        Some(node.into_entry())
    }

    /// Removes all elements, handing each to `f` in order.
    ///
    /// The list stays usable. Returns the number of entries removed. If `f`
    /// panics, the remaining entries are dropped and their slots freed.
    pub fn clear<F>(&mut self, storage: &mut S, mut f: F) -> usize
    where
        F: FnMut(K, V),
    {
        let first = self.head[0];
        let count = self.len;

        self.head = [Link::End; MAX_HEIGHT];
        self.height = 1;
        self.len = 0;

        for (k, v) in Drain::new(storage, first, count) {
            f(k, v);
        }

        tracing::debug!(count, "cleared skip list");
        count
    }

    /// Clears the list, handing each entry to `f`, and consumes it.
    ///
    /// Returns the number of entries removed.
    pub fn destroy<F>(mut self, storage: &mut S, f: F) -> usize
    where
        F: FnMut(K, V),
    {
        self.clear(storage, f)
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Calls `f` on every entry in order until it breaks.
    ///
    /// Returns the break value, or `Continue` if every entry was visited.
    pub fn iterate<B, F>(&self, storage: &S, f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        Self::walk(storage, self.head[0], f)
    }

    /// Like [`iterate`](Self::iterate), but starts at the first entry whose
    /// key equals `key`.
    ///
    /// Returns `None` without calling `f` if no entry has that key.
    pub fn iterate_from<B, F>(&self, storage: &S, key: &K, f: F) -> Option<ControlFlow<B>>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        let idx = self.find(storage, key)?;
        Some(Self::walk(storage, Link::Node(idx), f))
    }

    /// Returns an iterator over key-value pairs in order.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, K, V, S, Idx, MAX_HEIGHT> {
        Iter {
            storage,
            current: self.head[0],
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator starting at the first entry whose key equals `key`,
    /// or `None` if no entry has that key.
    pub fn iter_from<'a>(
        &self,
        storage: &'a S,
        key: &K,
    ) -> Option<Iter<'a, K, V, S, Idx, MAX_HEIGHT>> {
        let idx = self.find(storage, key)?;
        // Only an upper bound: the entries before `idx` are not counted.
        Some(Iter {
            storage,
            current: Link::Node(idx),
            remaining: self.len,
            _marker: PhantomData,
        })
    }

    /// Returns an iterator over keys in order.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, K, V, S, Idx, MAX_HEIGHT> {
        Keys {
            inner: self.iter(storage),
        }
    }

    /// Returns an iterator over values in key order.
    #[inline]
    pub fn values<'a>(&self, storage: &'a S) -> Values<'a, K, V, S, Idx, MAX_HEIGHT> {
        Values {
            inner: self.iter(storage),
        }
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    #[inline]
    pub(crate) fn node_at(storage: &S, idx: Idx) -> &SkipNode<K, V, Idx, MAX_HEIGHT> {
        storage.get(idx).expect("invalid index")
    }

    #[inline]
    fn node_at_mut(storage: &mut S, idx: Idx) -> &mut SkipNode<K, V, Idx, MAX_HEIGHT> {
        storage.get_mut(idx).expect("invalid index")
    }

    #[inline]
    fn next_of(&self, storage: &S, pos: Pos<Idx>, level: usize) -> Link<Idx> {
        match pos {
            Pos::Head => self.head[level],
            Pos::Node(idx) => Self::node_at(storage, idx).next(level),
        }
    }

    #[inline]
    fn set_next(&mut self, storage: &mut S, pos: Pos<Idx>, level: usize, link: Link<Idx>) {
        match pos {
            Pos::Head => self.head[level] = link,
            Pos::Node(idx) => Self::node_at_mut(storage, idx).set_next(level, link),
        }
    }

    /// Returns the linked node if its key equals `key`.
    #[inline]
    fn matching(&self, storage: &S, link: Link<Idx>, key: &K) -> Option<Idx> {
        let idx = link.node()?;
        let node = Self::node_at(storage, idx);
        (self.cmp.compare(&node.key, key) == Ordering::Equal).then_some(idx)
    }

    /// Finds the first node whose key equals `key` without recording
    /// predecessors. Used for read-only operations.
    ///
    /// Descends on equal keys so the match found at level 0 is the first one.
    fn find(&self, storage: &S, key: &K) -> Option<Idx> {
        let mut current = Pos::Head;

        for level in (0..self.height).rev() {
            while let Link::Node(next) = self.next_of(storage, current, level) {
                let node = Self::node_at(storage, next);
                match self.cmp.compare(&node.key, key) {
                    Ordering::Less => current = Pos::Node(next),
                    Ordering::Equal if level == 0 => return Some(next),
                    _ => break,
                }
            }
        }

        None
    }

    /// Predecessor scan. Slot `i` of the result holds the last position at
    /// level `i` whose key is strictly less than `key`. Slots at or above
    /// `self.height` are unused.
    fn search(&self, storage: &S, key: &K) -> [Pos<Idx>; MAX_HEIGHT] {
        let mut preds = [Pos::Head; MAX_HEIGHT];
        let mut current = Pos::Head;

        for level in (0..self.height).rev() {
            // Equal counts as overshoot: stop and descend.
            while let Link::Node(next) = self.next_of(storage, current, level) {
                let node = Self::node_at(storage, next);
                if self.cmp.compare(&node.key, key) != Ordering::Less {
                    break;
                }
                current = Pos::Node(next);
            }
            preds[level] = current;
        }

        preds
    }

    /// Allocates a node and splices it after `preds`.
    fn insert_at(
        &mut self,
        storage: &mut S,
        preds: &[Pos<Idx>; MAX_HEIGHT],
        key: K,
        value: V,
    ) -> Result<(), Full<(K, V)>> {
        let height = self.heights.next_height();
        let idx = match storage.try_insert(SkipNode::new(key, value, height)) {
            Ok(idx) => idx,
            Err(Full(node)) => {
                tracing::debug!(len = self.len, "storage full, insert rejected");
                return Err(Full(node.into_entry()));
            }
        };

        let old_height = self.height;
        if height > old_height {
            self.grow_head(idx, height);
        }

        for (level, &pred) in preds.iter().enumerate().take(height.min(old_height)) {
            let next = self.next_of(storage, pred, level);
            Self::node_at_mut(storage, idx).set_next(level, next);
            self.set_next(storage, pred, level, Link::Node(idx));
        }

        self.len += 1;
        Ok(())
    }

    /// Raises the head to `height`. The new levels point straight at `idx`,
    /// which is the only node tall enough to occupy them.
    fn grow_head(&mut self, idx: Idx, height: usize) {
        tracing::trace!(from = self.height, to = height, "growing head");
        for link in &mut self.head[self.height..height] {
            *link = Link::Node(idx);
        }
        self.height = height;
    }

    /// Drops empty top levels so the head is exactly as tall as the tallest node.
    fn shrink_head(&mut self) {
        let before = self.height;
        while self.height > 1 && self.head[self.height - 1].is_end() {
            self.height -= 1;
        }
        if self.height != before {
            tracing::trace!(from = before, to = self.height, "shrinking head");
        }
    }

    fn walk<B, F>(storage: &S, mut current: Link<Idx>, mut f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        while let Link::Node(idx) = current {
            let node = Self::node_at(storage, idx);
            if let ControlFlow::Break(b) = f(&node.key, &node.value) {
                return ControlFlow::Break(b);
            }
            current = node.next(0);
        }
        ControlFlow::Continue(())
    }
}

// ============================================================================
// Drain
// ============================================================================

/// Frees an already unlinked level-0 run, yielding each entry.
///
/// Dropping it early frees whatever is left, so a panicking callback
/// cannot strand occupied slots.
struct Drain<'s, K, V, S, Idx, const MAX_HEIGHT: usize>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    storage: &'s mut S,
    cursor: Link<Idx>,
    remaining: usize,
    _marker: PhantomData<(K, V)>,
}

impl<'s, K, V, S, Idx, const MAX_HEIGHT: usize> Drain<'s, K, V, S, Idx, MAX_HEIGHT>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    fn new(storage: &'s mut S, first: Link<Idx>, count: usize) -> Self {
        Self {
            storage,
            cursor: first,
            remaining: count,
            _marker: PhantomData,
        }
    }
}

impl<K, V, S, Idx, const MAX_HEIGHT: usize> Iterator for Drain<'_, K, V, S, Idx, MAX_HEIGHT>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.cursor.node().expect("run ended early");
        let node = self.storage.remove(idx).expect("invalid index");
        self.cursor = node.next(0);
        self.remaining -= 1;
        Some(node.into_entry())
    }
}

impl<K, V, S, Idx, const MAX_HEIGHT: usize> Drop for Drain<'_, K, V, S, Idx, MAX_HEIGHT>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    fn drop(&mut self) {
        for _ in self.by_ref() {}
    }
}

// ============================================================================
// Iterators
// ============================================================================

/// An iterator over key-value pairs in order.
pub struct Iter<'a, K, V, S, Idx, const MAX_HEIGHT: usize>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    storage: &'a S,
    current: Link<Idx>,
    /// Upper bound on the entries left.
    remaining: usize,
    _marker: PhantomData<(K, V)>,
}

impl<'a, K: 'a, V: 'a, S, Idx: 'a, const MAX_HEIGHT: usize> Iterator
    for Iter<'a, K, V, S, Idx, MAX_HEIGHT>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current.node()?;
        let node = self.storage.get(idx).expect("invalid index");
        self.current = node.next(0);
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current.is_end() {
            (0, Some(0))
        } else {
            (1, Some(self.remaining))
        }
    }
}

/// An iterator over keys in order.
pub struct Keys<'a, K, V, S, Idx, const MAX_HEIGHT: usize>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    inner: Iter<'a, K, V, S, Idx, MAX_HEIGHT>,
}

impl<'a, K: 'a, V: 'a, S, Idx: 'a, const MAX_HEIGHT: usize> Iterator
    for Keys<'a, K, V, S, Idx, MAX_HEIGHT>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over values in key order.
pub struct Values<'a, K, V, S, Idx, const MAX_HEIGHT: usize>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    inner: Iter<'a, K, V, S, Idx, MAX_HEIGHT>,
}

impl<'a, K: 'a, V: 'a, S, Idx: 'a, const MAX_HEIGHT: usize> Iterator
    for Values<'a, K, V, S, Idx, MAX_HEIGHT>
where
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

// ============================================================================
// Type aliases
// ============================================================================

/// Arena storage for skip list nodes.
pub type SkipArena<K, V, Idx = u32, const MAX_HEIGHT: usize = 16> =
    Arena<SkipNode<K, V, Idx, MAX_HEIGHT>, Idx>;

#[cfg(feature = "slab")]
/// Slab storage for skip list nodes (growable, never full).
pub type SlabSkipStorage<K, V, const MAX_HEIGHT: usize = 16> =
    slab::Slab<SkipNode<K, V, usize, MAX_HEIGHT>>;

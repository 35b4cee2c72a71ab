//! SharedSkipList - an owned skip list behind a single lock.
//!
//! There is no per-node locking. Every operation takes the whole-list
//! mutex, so operations are linearizable in lock order.

use core::ops::ControlFlow;

use parking_lot::{Mutex, MutexGuard};
use rand_core::RngCore;

use crate::comparator::{Ascend, Comparator};
use crate::owned::OwnedSkipList;
use crate::{Full, Key};

/// A thread-safe skip list: [`OwnedSkipList`] inside a [`parking_lot::Mutex`].
///
/// Readers get clones, since references cannot outlive the lock. Use
/// [`lock`](Self::lock) to run several operations atomically or to borrow
/// entries in place.
///
/// # Example
///
/// ```
/// use nexus_skipmap::SharedSkipList;
/// use rand::rngs::SmallRng;
/// use rand::SeedableRng;
///
/// let map: SharedSkipList<u64, u64, _> =
///     SharedSkipList::with_capacity(SmallRng::seed_from_u64(1), 64);
///
/// std::thread::scope(|s| {
///     for t in 0..4 {
///         let map = &map;
///         s.spawn(move || {
///             for i in 0..8 {
///                 map.insert(t * 8 + i, t).unwrap();
///             }
///         });
///     }
/// });
///
/// assert_eq!(map.len(), 32);
/// assert_eq!(map.first(), Some((0, 0)));
/// ```
pub struct SharedSkipList<K, V, R, C = Ascend, Idx: Key = u32, const MAX_HEIGHT: usize = 16> {
    inner: Mutex<OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT>>,
}

impl<K, V, R, Idx: Key, const MAX_HEIGHT: usize> SharedSkipList<K, V, R, Ascend, Idx, MAX_HEIGHT>
where
    K: Ord,
    R: RngCore,
{
    /// Creates a new shared skip list with the given RNG and capacity.
    pub fn with_capacity(rng: R, capacity: usize) -> Self {
        Self::from_owned(OwnedSkipList::with_capacity(rng, capacity))
    }
}

impl<K, V, R, C, Idx: Key, const MAX_HEIGHT: usize> SharedSkipList<K, V, R, C, Idx, MAX_HEIGHT>
where
    R: RngCore,
    C: Comparator<K>,
{
    /// Wraps an existing owned list.
    pub fn from_owned(list: OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT>) -> Self {
        Self {
            inner: Mutex::new(list),
        }
    }

    /// Creates a new shared skip list ordered by `cmp`.
    pub fn with_comparator(cmp: C, rng: R, capacity: usize) -> Self {
        Self::from_owned(OwnedSkipList::with_comparator(cmp, rng, capacity))
    }

    /// Locks the list for exclusive access.
    ///
    /// Calling any other method on `self` while the guard is alive deadlocks.
    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT>> {
        self.inner.lock()
    }

    /// Consumes the lock, returning the owned list.
    pub fn into_inner(self) -> OwnedSkipList<K, V, R, C, Idx, MAX_HEIGHT> {
        self.inner.into_inner()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns `true` if at least one entry has the given key.
    pub fn contains(&self, key: &K) -> bool {
        self.inner.lock().contains(key)
    }

    /// Returns a clone of the most recent value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Returns a clone of the first (smallest) entry.
    pub fn first(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .lock()
            .first()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns a clone of the last (largest) entry.
    pub fn last(&self) -> Option<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.inner
            .lock()
            .last()
            .map(|(k, v)| (k.clone(), v.clone()))
    }

    /// See [`OwnedSkipList::insert`].
    pub fn insert(&self, key: K, value: V) -> Result<(), Full<(K, V)>> {
        self.inner.lock().insert(key, value)
    }

    /// See [`OwnedSkipList::replace`].
    pub fn replace(&self, key: K, value: V) -> Result<Option<V>, Full<(K, V)>> {
        self.inner.lock().replace(key, value)
    }

    /// See [`OwnedSkipList::delete`].
    pub fn delete(&self, key: &K) -> Option<V> {
        self.inner.lock().delete(key)
    }

    /// See [`OwnedSkipList::delete_all`]. `f` runs with the lock held.
    pub fn delete_all<F: FnMut(K, V)>(&self, key: &K, f: F) -> usize {
        self.inner.lock().delete_all(key, f)
    }

    /// See [`OwnedSkipList::pop_first`].
    pub fn pop_first(&self) -> Option<(K, V)> {
        self.inner.lock().pop_first()
    }

    /// See [`OwnedSkipList::pop_last`].
    pub fn pop_last(&self) -> Option<(K, V)> {
        self.inner.lock().pop_last()
    }

    /// See [`OwnedSkipList::iterate`]. `f` runs with the lock held.
    pub fn iterate<B, F>(&self, f: F) -> ControlFlow<B>
    where
        F: FnMut(&K, &V) -> ControlFlow<B>,
    {
        self.inner.lock().iterate(f)
    }

    /// See [`OwnedSkipList::clear`]. `f` runs with the lock held.
    pub fn clear<F: FnMut(K, V)>(&self, f: F) -> usize {
        self.inner.lock().clear(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::thread;

    fn make(capacity: usize) -> SharedSkipList<u64, u64, SmallRng> {
        SharedSkipList::with_capacity(SmallRng::seed_from_u64(12345), capacity)
    }

    #[test]
    fn basic_operations() {
        let map = make(16);

        map.insert(2, 20).unwrap();
        map.insert(1, 10).unwrap();
        assert_eq!(map.replace(2, 21), Ok(Some(20)));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&2), Some(21));
        assert!(map.contains(&1));
        assert_eq!(map.first(), Some((1, 10)));
        assert_eq!(map.last(), Some((2, 21)));

        assert_eq!(map.delete(&1), Some(10));
        assert_eq!(map.pop_last(), Some((2, 21)));
        assert!(map.is_empty());
        assert_eq!(map.pop_first(), None);
    }

    #[test]
    fn lock_groups_operations() {
        let map = make(16);
        {
            let mut guard = map.lock();
            guard.insert(5, 1).unwrap();
            guard.insert(5, 2).unwrap();
            assert_eq!(guard.get(&5), Some(&2));
        }
        assert_eq!(map.delete_all(&5, |_, _| {}), 2);
        assert!(map.into_inner().is_empty());
    }

    #[test]
    fn concurrent_inserts() {
        const THREADS: u64 = 4;
        const PER_THREAD: u64 = 250;

        let map = make((THREADS * PER_THREAD) as usize);

        thread::scope(|s| {
            for t in 0..THREADS {
                let map = &map;
                s.spawn(move || {
                    for i in 0..PER_THREAD {
                        map.insert(i * THREADS + t, t).unwrap();
                    }
                });
            }
        });

        assert_eq!(map.len(), (THREADS * PER_THREAD) as usize);
        let guard = map.lock();
        guard.check_invariants().unwrap();
        let keys: Vec<_> = guard.keys().copied().collect();
        assert_eq!(keys, (0..THREADS * PER_THREAD).collect::<Vec<_>>());
    }

    #[test]
    fn concurrent_producers_and_consumer() {
        let map = make(256);
        let mut drained = Vec::new();

        thread::scope(|s| {
            for t in 0..2u64 {
                let map = &map;
                s.spawn(move || {
                    for i in 0..100 {
                        while map.insert(i, t).is_err() {
                            thread::yield_now();
                        }
                    }
                });
            }

            let map = &map;
            let drained = &mut drained;
            s.spawn(move || {
                while drained.len() < 200 {
                    match map.pop_first() {
                        Some((k, _)) => drained.push(k),
                        None => thread::yield_now(),
                    }
                }
            });
        });

        assert_eq!(drained.len(), 200);
        assert!(map.is_empty());
        drained.sort_unstable();
        let expected: Vec<_> = (0..100).flat_map(|k| [k, k]).collect();
        assert_eq!(drained, expected);
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<SharedSkipList<u64, String, SmallRng>>();
    }
}

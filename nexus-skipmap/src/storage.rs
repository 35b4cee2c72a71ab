//! Node storage with stable indices.
//!
//! Storage is the allocator seam of the skip list: `try_insert` allocates a
//! slot and `remove` frees it. Indices remain valid until explicitly
//! removed, which lets the skip list link nodes by index instead of pointer.

use core::fmt;

use crate::Key;

/// Slab-like storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`Arena<T>`] - fixed capacity, free-list slot reuse (in this crate)
/// - `slab::Slab<T>` - growable, never full (feature `slab`)
pub trait Storage<T> {
    /// Index type for this storage.
    type Key: Key;

    /// Allocates a slot for `value`, returning its stable index.
    ///
    /// Returns the value back inside [`Full`] when no slot is available.
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>>;

    /// Frees the slot at `index`, returning its value if it was occupied.
    fn remove(&mut self, index: Self::Key) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Key) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Key) -> Option<&mut T>;
}

/// Error returned when storage has no free slot.
///
/// Carries the value that could not be stored, so a failed insert never
/// loses caller data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Display for Full<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// Arena - fixed capacity, vector of slots threaded by a free list
// =============================================================================

#[derive(Debug)]
enum Slot<T, Idx> {
    Occupied(T),
    Vacant { next_free: Option<Idx> },
}

/// Fixed-capacity storage backed by a single vector of slots.
///
/// Freed slots are threaded into a LIFO free list and handed out again
/// before any fresh slot is touched. The slot vector is reserved up front;
/// slots themselves are initialised lazily.
///
/// # Example
///
/// ```
/// use nexus_skipmap::{Arena, Storage};
///
/// let mut storage: Arena<u64> = Arena::with_capacity(2);
///
/// let a = storage.try_insert(1).unwrap();
/// let _b = storage.try_insert(2).unwrap();
/// assert_eq!(storage.try_insert(3).unwrap_err().into_inner(), 3);
///
/// assert_eq!(storage.remove(a), Some(1));
/// assert_eq!(storage.try_insert(4).unwrap(), a);
/// ```
#[derive(Debug)]
pub struct Arena<T, Idx: Key = u32> {
    slots: Vec<Slot<T, Idx>>,
    capacity: usize,
    free_head: Option<Idx>,
    len: usize,
}

impl<T, Idx: Key> Arena<T, Idx> {
    /// Creates storage with exactly `capacity` slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0 or exceeds what the index type can address.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be > 0");
        assert!(
            capacity <= Idx::MAX_SLOTS,
            "capacity exceeds index type maximum"
        );

        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            free_head: None,
            len: 0,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if all slots are occupied.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Drops every stored value and makes all slots available again.
    ///
    /// # Warning
    ///
    /// A skip list still linked into this storage would be left with
    /// dangling indices. Clear the skip list first, or use
    /// [`OwnedSkipList`](crate::OwnedSkipList) which does both.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}

impl<T, Idx: Key> Storage<T> for Arena<T, Idx> {
    type Key = Idx;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>> {
        if let Some(idx) = self.free_head {
            let slot = &mut self.slots[idx.as_usize()];
            let Slot::Vacant { next_free } = *slot else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(value);
            self.len += 1;
            return Ok(idx);
        }

        if self.slots.len() == self.capacity {
            return Err(Full(value));
        }

        let idx = Idx::from_usize(self.slots.len());
        self.slots.push(Slot::Occupied(value));
        self.len += 1;
        Ok(idx)
    }

    #[inline]
    fn remove(&mut self, index: Self::Key) -> Option<T> {
        let slot = self.slots.get_mut(index.as_usize())?;
        if matches!(slot, Slot::Vacant { .. }) {
            return None;
        }

        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        let Slot::Occupied(value) = core::mem::replace(slot, vacant) else {
            unreachable!();
        };
        self.free_head = Some(index);
        self.len -= 1;
        Some(value)
    }

    #[inline]
    fn get(&self, index: Self::Key) -> Option<&T> {
        match self.slots.get(index.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Key) -> Option<&mut T> {
        match self.slots.get_mut(index.as_usize()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Key = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Self::Key, Full<T>> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, index: Self::Key) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: Self::Key) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn get_mut(&mut self, index: Self::Key) -> Option<&mut T> {
        self.get_mut(index)
    }
}

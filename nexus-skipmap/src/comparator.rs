//! Key ordering.
//!
//! The skip list never calls `Ord` directly; every comparison goes through a
//! [`Comparator`]. The comparator must be a total order that stays consistent
//! for the lifetime of the list. Behavior is unspecified otherwise.

use core::cmp::Ordering;

/// Three-way key comparison.
///
/// Implemented by [`Ascend`], [`Descend`] and any
/// `Fn(&K, &K) -> Ordering` closure.
///
/// # Example
///
/// ```
/// use core::cmp::Ordering;
/// use nexus_skipmap::Comparator;
///
/// let by_len = |a: &&str, b: &&str| a.len().cmp(&b.len());
/// assert_eq!(by_len.compare(&"ab", &"abc"), Ordering::Less);
/// ```
pub trait Comparator<K: ?Sized> {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys ascending by their `Ord` impl.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ascend;

impl<K: Ord + ?Sized> Comparator<K> for Ascend {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders keys descending by their `Ord` impl.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Descend;

impl<K: Ord + ?Sized> Comparator<K> for Descend {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        b.cmp(a)
    }
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

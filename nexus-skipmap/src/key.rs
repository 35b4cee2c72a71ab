//! Slot index types for node storage.
//!
//! Storage hands out a [`Key`] for every node it holds. The skip list links
//! nodes by these keys instead of pointers, so a key must stay valid until
//! its slot is explicitly released.

use core::fmt::Debug;

/// A copyable storage slot index.
///
/// Implemented for the unsigned integer types. Narrow types shrink every
/// forward link in a node, at the cost of a lower capacity ceiling.
///
/// # Example
///
/// ```
/// use nexus_skipmap::Key;
///
/// let key = u16::from_usize(300);
/// assert_eq!(key.as_usize(), 300);
/// assert_eq!(<u16 as Key>::MAX_SLOTS, u16::MAX as usize + 1);
/// ```
pub trait Key: Copy + Eq + Debug + 'static {
    /// Number of distinct slots this type can address.
    const MAX_SLOTS: usize;

    /// Creates a key from a slot position.
    fn from_usize(val: usize) -> Self;

    /// Returns the slot position.
    fn as_usize(self) -> usize;
}

macro_rules! impl_key_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Key for $ty {
                const MAX_SLOTS: usize = (<$ty>::MAX as usize).saturating_add(1);

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_key_for_unsigned!(u8, u16, u32, u64, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_usize_roundtrip() {
        for i in [0usize, 1, 100, 1000, u16::MAX as usize] {
            assert_eq!(u32::from_usize(i).as_usize(), i);
        }
    }

    #[test]
    fn max_slots() {
        assert_eq!(<u8 as Key>::MAX_SLOTS, 256);
        assert_eq!(<u16 as Key>::MAX_SLOTS, 65_536);
        assert_eq!(<usize as Key>::MAX_SLOTS, usize::MAX);
    }
}

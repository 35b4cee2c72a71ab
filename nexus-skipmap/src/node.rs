//! Skip list nodes and forward links.

use crate::Key;

/// A forward link at one level.
///
/// `End` terminates every level. It orders after every real key and is never
/// stored, freed or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link<Idx> {
    /// The next node at this level.
    Node(Idx),
    /// Past the last node at this level.
    End,
}

impl<Idx: Key> Link<Idx> {
    /// Returns `true` if this link terminates the level.
    #[inline]
    pub fn is_end(self) -> bool {
        matches!(self, Link::End)
    }

    /// Returns the linked node index, if any.
    #[inline]
    pub fn node(self) -> Option<Idx> {
        match self {
            Link::Node(idx) => Some(idx),
            Link::End => None,
        }
    }
}

/// A node in the skip list containing key, value, and forward links.
///
/// A node of height `h` participates in levels `0..h`. `forward[i]` points to
/// the next node at level `i`. Links at or above the height are unused and
/// stay [`Link::End`].
#[derive(Debug, Clone)]
pub struct SkipNode<K, V, Idx, const MAX_HEIGHT: usize> {
    /// The key used for ordering.
    pub key: K,
    /// The value associated with this key.
    pub value: V,
    forward: [Link<Idx>; MAX_HEIGHT],
    height: u8,
}

impl<K, V, Idx: Key, const MAX_HEIGHT: usize> SkipNode<K, V, Idx, MAX_HEIGHT> {
    /// Creates an unlinked node. Every forward link starts at `End`.
    #[inline]
    pub(crate) fn new(key: K, value: V, height: usize) -> Self {
        debug_assert!((1..=MAX_HEIGHT).contains(&height));
        Self {
            key,
            value,
            forward: [Link::End; MAX_HEIGHT],
            height: height as u8,
        }
    }

    /// Number of levels this node participates in.
    #[inline]
    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// The live forward links, one per level the node occupies.
    #[inline]
    pub fn forward(&self) -> &[Link<Idx>] {
        &self.forward[..self.height as usize]
    }

    #[inline]
    pub(crate) fn next(&self, level: usize) -> Link<Idx> {
        debug_assert!(level < self.height as usize);
        self.forward[level]
    }

    #[inline]
    pub(crate) fn set_next(&mut self, level: usize, link: Link<Idx>) {
        debug_assert!(level < self.height as usize);
        self.forward[level] = link;
    }

    #[inline]
    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

//! Structural diagnostics: per-level dump and invariant checking.
//!
//! Neither is needed for normal operation. Both walk every level, so they
//! cost O(n log n) expected and are meant for tests and debugging.

use core::cmp::Ordering;
use core::fmt::{self, Write as _};
use std::collections::HashMap;

use rand_core::RngCore;

use crate::comparator::Comparator;
use crate::key::Key;
use crate::node::{Link, SkipNode};
use crate::skiplist::SkipList;
use crate::storage::Storage;

/// A broken structural invariant, reported by
/// [`SkipList::check_invariants`].
///
/// Node positions are reported as raw storage indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A head link at or above the head height is not `End`.
    LinkAboveHeight {
        /// The offending level.
        level: usize,
    },
    /// The head is taller than the tallest node.
    EmptyTopLevel {
        /// The head height.
        height: usize,
    },
    /// A node appears on a level its height does not cover, or is taller
    /// than the head.
    HeightOutOfRange {
        /// Storage index of the node.
        index: usize,
        /// The node's height.
        height: usize,
        /// The level it was found on.
        level: usize,
    },
    /// A node's key orders before its predecessor's on some level.
    OutOfOrder {
        /// The level.
        level: usize,
        /// Storage index of the node.
        index: usize,
    },
    /// A node on an upper level is missing from level 0, or appears out of
    /// level-0 order.
    NotInLowerLevel {
        /// The level.
        level: usize,
        /// Storage index of the node.
        index: usize,
    },
    /// A level holds a different number of nodes than the level-0 heights
    /// imply.
    LevelCount {
        /// The level.
        level: usize,
        /// Nodes at level 0 tall enough to appear here.
        expected: usize,
        /// Nodes actually linked here.
        found: usize,
    },
    /// The stored count disagrees with the level-0 chain.
    CountMismatch {
        /// The stored count.
        expected: usize,
        /// Nodes reachable at level 0 (capped at one past `expected`).
        found: usize,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LinkAboveHeight { level } => {
                write!(f, "head link at level {level} is above the head height")
            }
            Self::EmptyTopLevel { height } => {
                write!(f, "top level {} of head height {height} is empty", height - 1)
            }
            Self::HeightOutOfRange { index, height, level } => {
                write!(f, "node #{index} of height {height} found on level {level}")
            }
            Self::OutOfOrder { level, index } => {
                write!(f, "node #{index} is out of order on level {level}")
            }
            Self::NotInLowerLevel { level, index } => {
                write!(f, "node #{index} on level {level} breaks level-0 order")
            }
            Self::LevelCount { level, expected, found } => {
                write!(f, "level {level} holds {found} nodes, expected {expected}")
            }
            Self::CountMismatch { expected, found } => {
                write!(f, "count is {expected} but level 0 holds {found} nodes")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

impl<K, V, S, R, C, Idx, const MAX_HEIGHT: usize> SkipList<K, V, S, R, C, Idx, MAX_HEIGHT>
where
    R: RngCore,
    C: Comparator<K>,
    Idx: Key,
    S: Storage<SkipNode<K, V, Idx, MAX_HEIGHT>, Key = Idx>,
{
    /// Writes every level, top first, followed by per-level node counts.
    ///
    /// `entry` formats one key-value pair inside each node's parentheses.
    ///
    /// ```text
    /// max level is 2
    /// -- L 1: -> #1(2: 20) -> END
    /// -- L 0: -> #0(1: 10) -> #1(2: 20) -> END
    /// -- Count @ 0: 2
    /// -- Count @ 1: 1
    /// ```
    pub fn dump_with<W, F>(&self, storage: &S, out: &mut W, mut entry: F) -> fmt::Result
    where
        W: fmt::Write,
        F: FnMut(&mut W, &K, &V) -> fmt::Result,
    {
        let mut counts = [0usize; MAX_HEIGHT];
        writeln!(out, "max level is {}", self.height)?;

        for level in (0..self.height).rev() {
            write!(out, "-- L {level}:")?;
            let mut current = self.head[level];
            // A corrupted list may cycle; never print more than every node.
            while let Link::Node(idx) = current {
                if counts[level] > self.len {
                    write!(out, " -> ...")?;
                    break;
                }
                let node = Self::node_at(storage, idx);
                write!(out, " -> #{}({}: ", idx.as_usize(), node.height())?;
                entry(out, &node.key, &node.value)?;
                write!(out, ")")?;
                counts[level] += 1;
                current = node.next(level);
            }
            writeln!(out, " -> END")?;
        }

        for (level, count) in counts.iter().enumerate().filter(|(_, c)| **c > 0) {
            writeln!(out, "-- Count @ {level}: {count}")?;
        }
        Ok(())
    }

    /// Renders [`dump_with`](Self::dump_with) into a string, printing each
    /// entry as `key => value`.
    pub fn dump(&self, storage: &S) -> String
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.dump_with(storage, &mut out, |w, k, v| write!(w, "{k:?} => {v:?}"));
        out
    }

    /// Verifies the structure of the list.
    ///
    /// Checks, in order: head links above the head height, a non-empty top
    /// level, the level-0 count, then for every level the node heights, key
    /// order, subset-of-level-0 order and node counts.
    pub fn check_invariants(&self, storage: &S) -> Result<(), InvariantViolation> {
        for level in self.height..MAX_HEIGHT {
            if !self.head[level].is_end() {
                return Err(InvariantViolation::LinkAboveHeight { level });
            }
        }
        if self.height > 1 && self.head[self.height - 1].is_end() {
            return Err(InvariantViolation::EmptyTopLevel {
                height: self.height,
            });
        }

        // Rank of every node in level-0 order.
        let mut rank = HashMap::with_capacity(self.len);
        let mut tall_enough = [0usize; MAX_HEIGHT];
        let mut current = self.head[0];
        while let Link::Node(idx) = current {
            if rank.len() == self.len {
                return Err(InvariantViolation::CountMismatch {
                    expected: self.len,
                    found: self.len + 1,
                });
            }
            rank.insert(idx.as_usize(), rank.len());
            let node = Self::node_at(storage, idx);
            for count in &mut tall_enough[..node.height()] {
                *count += 1;
            }
            current = node.next(0);
        }
        if rank.len() != self.len {
            return Err(InvariantViolation::CountMismatch {
                expected: self.len,
                found: rank.len(),
            });
        }

        for level in 0..self.height {
            let mut prev: Option<(&K, usize)> = None;
            let mut found = 0;
            let mut current = self.head[level];

            while let Link::Node(idx) = current {
                let index = idx.as_usize();
                let node = Self::node_at(storage, idx);
                let height = node.height();
                if height <= level || height > self.height {
                    return Err(InvariantViolation::HeightOutOfRange {
                        index,
                        height,
                        level,
                    });
                }

                let Some(&r) = rank.get(&index) else {
                    return Err(InvariantViolation::NotInLowerLevel { level, index });
                };
                if let Some((prev_key, prev_rank)) = prev {
                    if self.cmp.compare(prev_key, &node.key) == Ordering::Greater {
                        return Err(InvariantViolation::OutOfOrder { level, index });
                    }
                    if r <= prev_rank {
                        return Err(InvariantViolation::NotInLowerLevel { level, index });
                    }
                }

                prev = Some((&node.key, r));
                found += 1;
                current = node.next(level);
            }

            if found != tall_enough[level] {
                return Err(InvariantViolation::LevelCount {
                    level,
                    expected: tall_enough[level],
                    found,
                });
            }
        }

        Ok(())
    }
}

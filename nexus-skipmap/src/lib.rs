//! Ordered skip list multimap with external storage.
//!
//! A skip list keeps entries sorted by key with O(log n) expected insert,
//! lookup and removal, and no rebalancing. Keys may repeat: the most recently
//! inserted entry for a key comes first.
//!
//! # Design Philosophy
//!
//! As with the other nexus collections, storage is separate from structure:
//!
//! ```text
//! Storage (Arena)  - owns nodes, provides stable indices
//! SkipList         - owns head links, coordinates indices
//! ```
//!
//! Nodes link to each other by storage index. Freed slots are recycled, so
//! a pre-sized [`Arena`] never allocates on the hot path.
//!
//! # Quick Start
//!
//! ```
//! use nexus_skipmap::{SkipArena, SkipList};
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//!
//! let mut storage: SkipArena<u32, &str> = SkipArena::with_capacity(64);
//! let mut list: SkipList<u32, &str, _, _> = SkipList::new(SmallRng::seed_from_u64(7));
//!
//! list.insert(&mut storage, 3, "three").unwrap();
//! list.insert(&mut storage, 1, "one").unwrap();
//! list.insert(&mut storage, 3, "tres").unwrap();
//!
//! assert_eq!(list.get(&storage, &3), Some(&"tres"));
//! assert_eq!(list.first(&storage), Some((&1, &"one")));
//!
//! let removed = list.delete_all(&mut storage, &3, |_, _| {});
//! assert_eq!(removed, 2);
//! assert_eq!(list.len(), 1);
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a list must use the same storage instance. This is the
//! caller's responsibility (same discipline as the `slab` crate). Passing a
//! different storage panics on the first index it cannot resolve, or
//! silently corrupts the list if the index happens to resolve.
//!
//! [`OwnedSkipList`] bundles the two and removes the hazard.
//!
//! # Storage Options
//!
//! | Storage | Capacity | Allocation | Use Case |
//! |---------|----------|------------|----------|
//! | [`Arena`] | Fixed (runtime) | Single vector, lazy | Default choice |
//! | `slab::Slab` | Growable | May reallocate | When size unknown |
//!
//! # Ordering
//!
//! Keys are compared through a [`Comparator`]: [`Ascend`] (the default),
//! [`Descend`], or any `Fn(&K, &K) -> Ordering`.
//!
//! # Concurrency
//!
//! The list itself is single-threaded. [`SharedSkipList`] wraps an
//! [`OwnedSkipList`] in one `parking_lot` mutex.
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

pub mod comparator;
pub mod debug;
pub mod height;
pub mod key;
pub mod node;
pub mod owned;
pub mod shared;
pub mod skiplist;
pub mod storage;

pub use comparator::{Ascend, Comparator, Descend};
pub use debug::InvariantViolation;
pub use height::HeightGenerator;
pub use key::Key;
pub use node::{Link, SkipNode};
pub use owned::OwnedSkipList;
pub use shared::SharedSkipList;
pub use skiplist::{Iter, Keys, SkipArena, SkipList, Values};
pub use storage::{Arena, Full, Storage};

#[cfg(feature = "slab")]
pub use skiplist::SlabSkipStorage;

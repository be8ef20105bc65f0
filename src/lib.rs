//! Arena-backed red-black tree map for Rust.
//!
//! [`RBTreeMap`] is an ordered associative container whose nodes and values are
//! pool-allocated in two arenas and linked by integer handles instead of
//! pointers. It keeps the classic red-black guarantees (O(log n) search, insert
//! and remove) and walks in key order by following parent links, with no
//! auxiliary stack.
//!
//! # Example
//!
//! ```
//! use rbt_map::RBTreeMap;
//!
//! let mut ages = RBTreeMap::new();
//! ages.insert("Carol", 41);
//! ages.insert("Alice", 33);
//! ages.insert("Bob", 27);
//!
//! // Inserting a present key leaves the stored value alone and says so.
//! let (age, found) = ages.insert("Alice", 99);
//! assert!(found);
//! assert_eq!(*age, 33);
//!
//! let names: Vec<_> = ages.keys().copied().collect();
//! assert_eq!(names, ["Alice", "Bob", "Carol"]);
//!
//! ages.remove("Bob");
//! assert_eq!(ages.len(), 2);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`
//! - **Non-replacing insert** - [`insert`](RBTreeMap::insert) reports whether the key was
//!   already present instead of overwriting its value
//! - **Opt-in lookup memo** - [`CachedRBTreeMap`] remembers the last node it found
//! - **Detached cursors** - [`Cursor`] walks the map without borrowing it and reports
//!   when a mutation has invalidated it
//! - **`tracing`** (cargo feature) - logs rotations, fix-up cases and arena activity
//!
//! # Implementation
//!
//! Removing a node with two children swaps its position with its in-order
//! successor before unlinking it, so keys and values never move between nodes.
//! Rebalancing after removing a black leaf treats the vacated child slot as the
//! double-black node, so the fix-up never needs a sentinel allocation.

#![no_std]
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod tracing_helpers;

mod error;
mod raw;

pub mod rbtree_map;

pub use error::CursorError;
pub use rbtree_map::{CachedRBTreeMap, Cursor, RBTreeMap};

#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

//! A concurrent set built on phased cuckoo hashing.
//!
//! [`CuckooSet`] keeps every element in one of two candidate buckets, one per
//! table, chosen by a pair of independent hash functions. Buckets hold a few
//! elements each. When an insert crowds a bucket past a threshold, the set
//! walks a bounded chain of moves between the two tables to relieve it, and
//! when that walk cannot finish, it doubles the capacity of both tables and
//! rehashes every element.
//!
//! Operations on an element are serialized by a lock stripe chosen by the
//! element's hash, so threads working on different stripes do not block each
//! other. Only a resize takes the whole set.
//!
//! # Example
//!
//! ```rust
//! use cuckoo_set::CuckooSet;
//!
//! let set = CuckooSet::new();
//!
//! set.put(3);
//! set.put(3);
//! assert!(set.contains(&3));
//! assert_eq!(set.size(), 1);
//!
//! assert!(set.remove(&3));
//! assert!(set.is_empty());
//! ```
//!
//! # Logging
//!
//! Enable the `logging` feature to have sets report resizes and given-up
//! relocation walks through the [`log`](https://docs.rs/log) crate.
//!
//! # Minimum Supported Rust Versions
//!
//! This crate's minimum supported Rust versions (MSRV) are the followings:
//!
//! | Feature          | MSRV                      |
//! |:-----------------|:-------------------------:|
//! | default features | Rust 1.65.0 (Nov 3, 2022) |
//! | `logging`        | Rust 1.65.0 (Nov 3, 2022) |

pub(crate) mod common;
pub mod hash;
pub(crate) mod policy;
pub mod sync;

pub use common::error::BuildError;
pub use hash::{FnHashPair, HashPair, RandomHashPair};
pub use policy::Policy;
pub use sync::{CuckooSet, CuckooSetBuilder};

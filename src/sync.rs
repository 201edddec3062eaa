//! Provides the thread-safe, concurrent cuckoo set.

mod base_set;
mod builder;
mod guard;
mod relocate;
mod set;
mod tables;

pub use {builder::CuckooSetBuilder, set::CuckooSet};

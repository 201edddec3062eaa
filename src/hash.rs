//! The pair of hash functions that places an element in the two tables.

use std::{
    collections::hash_map::RandomState,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

/// Two independent hash functions over the element type.
///
/// `hash0` picks the candidate bucket in table 0 and `hash1` the one in table
/// 1. Both must be deterministic for the lifetime of the set, and equal
/// elements must hash equally. The quality of the pair only affects
/// performance: a poor pair makes relocation walks longer and resizes more
/// frequent, but never loses elements.
///
/// `hash0` also selects the lock stripe that guards the element.
pub trait HashPair<T: ?Sized> {
    /// Hashes an element for table 0.
    fn hash0(&self, element: &T) -> u64;

    /// Hashes an element for table 1.
    fn hash1(&self, element: &T) -> u64;
}

/// The default [`HashPair`], made of two independently seeded
/// `std::collections::hash_map::RandomState`s.
///
/// It is the same algorithm used by `std::collections::HashMap`, currently
/// SipHash 1-3, keyed twice so that the two tables see unrelated hashes.
#[derive(Clone, Default)]
pub struct RandomHashPair {
    first: RandomState,
    second: RandomState,
}

impl RandomHashPair {
    /// Creates a pair with fresh random keys.
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Debug for RandomHashPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomHashPair").finish_non_exhaustive()
    }
}

impl<T: Hash + ?Sized> HashPair<T> for RandomHashPair {
    #[inline]
    fn hash0(&self, element: &T) -> u64 {
        hash_one(&self.first, element)
    }

    #[inline]
    fn hash1(&self, element: &T) -> u64 {
        hash_one(&self.second, element)
    }
}

#[inline]
fn hash_one<S: BuildHasher, T: Hash + ?Sized>(build_hasher: &S, element: &T) -> u64 {
    let mut hasher = build_hasher.build_hasher();
    element.hash(&mut hasher);
    hasher.finish()
}

/// A [`HashPair`] made of two plain functions or closures.
///
/// Useful to plug in a domain specific hash, or to force collisions in tests.
///
/// # Examples
///
/// ```rust
/// use cuckoo_set::{CuckooSet, FnHashPair};
///
/// let pair = FnHashPair::new(|n: &u64| *n, |n: &u64| n.rotate_left(32));
/// let set: CuckooSet<u64, _> = CuckooSet::builder().build_with_hash_pair(pair).unwrap();
///
/// set.put(7);
/// assert!(set.contains(&7));
/// ```
#[derive(Clone)]
pub struct FnHashPair<F0, F1> {
    h0: F0,
    h1: F1,
}

impl<F0, F1> FnHashPair<F0, F1> {
    /// Creates a pair from the table-0 and table-1 hash functions.
    pub fn new(h0: F0, h1: F1) -> Self {
        Self { h0, h1 }
    }
}

impl<F0, F1> fmt::Debug for FnHashPair<F0, F1> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHashPair").finish_non_exhaustive()
    }
}

impl<T, F0, F1> HashPair<T> for FnHashPair<F0, F1>
where
    T: ?Sized,
    F0: Fn(&T) -> u64,
    F1: Fn(&T) -> u64,
{
    #[inline]
    fn hash0(&self, element: &T) -> u64 {
        (self.h0)(element)
    }

    #[inline]
    fn hash1(&self, element: &T) -> u64 {
        (self.h1)(element)
    }
}

use super::tables::Tables;

use parking_lot::{MutexGuard, RwLockReadGuard};
use std::ops::Deref;

/// Exclusive access to one element of a set, and shared access to its tables.
///
/// Holding the guard of an element means that no other thread can add, move
/// or remove that element, and that no resize can happen. Buckets still have
/// to be locked one at a time to be read or mutated, since elements of other
/// stripes share them.
///
/// A thread must not hold more than one `ElementGuard` at a time.
pub(crate) struct ElementGuard<'a, T> {
    // Fields drop in declaration order, so the stripe is released before the
    // tables.
    _stripe: MutexGuard<'a, ()>,
    tables: RwLockReadGuard<'a, Tables<T>>,
}

impl<'a, T> ElementGuard<'a, T> {
    pub(crate) fn new(
        tables: RwLockReadGuard<'a, Tables<T>>,
        stripe: MutexGuard<'a, ()>,
    ) -> Self {
        Self {
            _stripe: stripe,
            tables,
        }
    }
}

impl<T> Deref for ElementGuard<'_, T> {
    type Target = Tables<T>;

    fn deref(&self) -> &Self::Target {
        &self.tables
    }
}

use super::{
    guard::ElementGuard,
    tables::{Placement, Tables},
};
use crate::{
    common::{concurrent::stripes::LockStripes, error::BuildError, SetConfig, Table},
    hash::HashPair,
    Policy,
};

use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The cuckoo engine shared by all clones of a `CuckooSet`.
///
/// # Locking
///
/// - `tables` is taken shared by every element guard and exclusively by a
///   resize.
/// - A stripe of `stripes`, selected by `hash0`, serializes everything that
///   adds, moves, removes or looks up one element.
/// - Each bucket has its own mutex.
///
/// The acquisition order is tables, then stripe, then bucket. A thread holds
/// at most one of each, and releases all of them before a resize or before
/// the next hop of a relocation walk.
pub(crate) struct Inner<T, H> {
    name: Option<String>,
    pub(super) config: SetConfig,
    pub(super) tables: RwLock<Tables<T>>,
    pub(super) stripes: LockStripes,
    size: AtomicUsize,
    pub(super) hash_pair: H,
}

impl<T, H> Inner<T, H> {
    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn policy(&self) -> Policy {
        Policy::new(&self.config, self.stripes.len())
    }

    pub(crate) fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.tables.read().capacity()
    }
}

impl<T, H> Inner<T, H>
where
    T: Eq + Clone,
    H: HashPair<T>,
{
    pub(crate) fn new(
        name: Option<String>,
        config: SetConfig,
        hash_pair: H,
    ) -> Result<Self, BuildError> {
        crate::common::builder_utils::validate(&config)?;
        let tables = Tables::try_new(config.initial_capacity, config.probe_size)?;

        Ok(Self {
            name,
            stripes: LockStripes::new(config.lock_stripes),
            config,
            tables: RwLock::new(tables),
            size: AtomicUsize::new(0),
            hash_pair,
        })
    }

    #[inline]
    pub(super) fn hash(&self, table: Table, element: &T) -> u64 {
        match table {
            Table::First => self.hash_pair.hash0(element),
            Table::Second => self.hash_pair.hash1(element),
        }
    }

    /// Acquires the guard of an element.
    pub(super) fn guard(&self, element: &T) -> ElementGuard<'_, T> {
        let tables = self.tables.read();
        let stripe = self.stripes.lock(self.hash_pair.hash0(element));
        ElementGuard::new(tables, stripe)
    }

    #[inline]
    fn indices(&self, tables: &Tables<T>, element: &T) -> (usize, usize) {
        (
            tables.index_of(self.hash_pair.hash0(element)),
            tables.index_of(self.hash_pair.hash1(element)),
        )
    }

    pub(crate) fn put(&self, element: T) {
        let mut element = element;

        loop {
            let (observed_capacity, placement) = {
                let guard = self.guard(&element);
                let (index0, index1) = self.indices(&guard, &element);
                if guard.contains(&element, index0, index1) {
                    return;
                }

                let placement = guard.place(element, index0, index1, &self.config);
                if !matches!(placement, Placement::Full(_)) {
                    self.size.fetch_add(1, Ordering::AcqRel);
                }
                (guard.capacity(), placement)
            };

            // The guard is released. The element is either stored already, or
            // handed back because both of its buckets are full.
            match placement {
                Placement::Settled => return,
                Placement::Crowded(table, index) => {
                    if !self.relocate(table, index, observed_capacity).is_settled() {
                        self.resize(observed_capacity);
                    }
                    return;
                }
                Placement::Full(e) => {
                    self.resize(observed_capacity);
                    element = e;
                }
            }
        }
    }

    pub(crate) fn contains(&self, element: &T) -> bool {
        let guard = self.guard(element);
        let (index0, index1) = self.indices(&guard, element);
        guard.contains(element, index0, index1)
    }

    pub(crate) fn remove(&self, element: &T) -> bool {
        let guard = self.guard(element);
        let (index0, index1) = self.indices(&guard, element);

        let removed = [(Table::First, index0), (Table::Second, index1)]
            .into_iter()
            .any(|(table, index)| guard.bucket(table, index).lock().remove(element).is_some());
        if removed {
            self.size.fetch_sub(1, Ordering::AcqRel);
        }
        removed
    }

    /// Doubles the capacity of both tables and rehashes every element.
    ///
    /// `observed_capacity` is the capacity at which the caller ran out of
    /// room. If another thread grew the tables in the meantime, this does
    /// nothing.
    pub(super) fn resize(&self, observed_capacity: usize) {
        let mut tables = self.tables.write();
        if tables.capacity() != observed_capacity {
            return;
        }

        let _count = tables.grow(&self.hash_pair, &self.config, self.name());

        #[cfg(feature = "logging")]
        log::debug!(
            "{}Resized from {observed_capacity} to {} buckets per table ({_count} elements)",
            super::set::log_prefix(self.name()),
            tables.capacity(),
        );
    }
}

#[cfg(test)]
impl<T, H> Inner<T, H>
where
    T: Eq + Clone,
    H: HashPair<T>,
{
    /// Checks, at quiescence, that every element sits in exactly one of its
    /// two candidate buckets, that no bucket overflows, and that the size
    /// counter matches the bucket occupancies.
    pub(crate) fn assert_invariants(&self) {
        let tables = self.tables.write();
        let mut count = 0;

        tables.for_each_bucket(|table, index, bucket| {
            assert!(bucket.len() <= self.config.probe_size);
            for element in bucket.iter() {
                count += 1;
                assert_eq!(tables.index_of(self.hash(table, element)), index);

                let other = table.other();
                let twin = tables
                    .bucket(other, tables.index_of(self.hash(other, element)))
                    .lock();
                assert!(!twin.contains(element), "element found in both tables");
                assert_eq!(bucket.iter().filter(|e| *e == element).count(), 1);
            }
        });

        assert_eq!(count, self.size());
    }
}

use crate::{
    common::{bucket::Bucket, error::BuildError, SetConfig, Table},
    hash::HashPair,
};

use parking_lot::Mutex;

type BucketArray<T> = Box<[Mutex<Bucket<T>>]>;

/// Where `Tables::place` put an element.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Placement<T> {
    /// The element went into a bucket below the probe threshold.
    Settled,
    /// The element went into a bucket at or above the probe threshold. That
    /// bucket should be relieved by a relocation walk.
    Crowded(Table, usize),
    /// Both candidate buckets are full. The element is handed back.
    Full(T),
}

/// The two bucket arrays of a set.
///
/// Each bucket has its own mutex, so any number of threads holding a shared
/// reference to the tables may touch buckets. A thread must never lock two
/// buckets at once.
pub(crate) struct Tables<T> {
    capacity: usize,
    buckets: [BucketArray<T>; 2],
}

impl<T> Tables<T> {
    /// Allocates two tables of `capacity` empty buckets each, reporting an
    /// allocation failure instead of aborting.
    pub(crate) fn try_new(capacity: usize, probe_size: usize) -> Result<Self, BuildError> {
        let first = try_alloc_buckets(capacity, probe_size)?;
        let second = try_alloc_buckets(capacity, probe_size)?;
        Ok(Self {
            capacity,
            buckets: [first, second],
        })
    }

    fn new(capacity: usize, probe_size: usize) -> Self {
        let alloc = || {
            (0..capacity)
                .map(|_| Mutex::new(Bucket::with_capacity(probe_size)))
                .collect::<Vec<_>>()
                .into_boxed_slice()
        };
        Self {
            capacity,
            buckets: [alloc(), alloc()],
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn index_of(&self, hash: u64) -> usize {
        (hash % self.capacity as u64) as usize
    }

    #[inline]
    pub(crate) fn bucket(&self, table: Table, index: usize) -> &Mutex<Bucket<T>> {
        &self.buckets[table.index()][index]
    }

    fn buckets_mut(&mut self) -> impl Iterator<Item = &mut Bucket<T>> {
        self.buckets
            .iter_mut()
            .flat_map(|table| table.iter_mut())
            .map(|bucket| bucket.get_mut())
    }

    /// Adds an element to one of its candidate buckets, preferring any bucket
    /// below the threshold, then table 0 over table 1.
    ///
    /// The caller must hold the guard of the element and must have checked
    /// that the element is not already present.
    pub(crate) fn place(
        &self,
        element: T,
        index0: usize,
        index1: usize,
        config: &SetConfig,
    ) -> Placement<T> {
        let bucket0 = self.bucket(Table::First, index0);
        let bucket1 = self.bucket(Table::Second, index1);
        let threshold = config.probe_threshold;

        let element = match add_below(bucket0, element, threshold) {
            Ok(()) => return Placement::Settled,
            Err(e) => e,
        };
        let element = match add_below(bucket1, element, threshold) {
            Ok(()) => return Placement::Settled,
            Err(e) => e,
        };
        let element = match add_below(bucket0, element, config.probe_size) {
            Ok(()) => return Placement::Crowded(Table::First, index0),
            Err(e) => e,
        };
        match add_below(bucket1, element, config.probe_size) {
            Ok(()) => Placement::Crowded(Table::Second, index1),
            Err(e) => Placement::Full(e),
        }
    }
}

impl<T: Eq> Tables<T> {
    #[inline]
    pub(crate) fn contains(&self, element: &T, index0: usize, index1: usize) -> bool {
        self.bucket(Table::First, index0).lock().contains(element)
            || self.bucket(Table::Second, index1).lock().contains(element)
    }

    /// Replaces the bucket arrays with arrays of twice the capacity and
    /// rehashes every element into them. Keeps doubling if some element does
    /// not fit at the new capacity. Returns the number of rehashed elements.
    ///
    /// Needs `&mut self`, which is how resizing excludes every guard.
    ///
    /// # Panics
    ///
    /// Panics if the capacity overflows `usize`.
    pub(crate) fn grow<H: HashPair<T>>(
        &mut self,
        hash_pair: &H,
        config: &SetConfig,
        _name: Option<&str>,
    ) -> usize {
        let mut elements = self
            .buckets_mut()
            .flat_map(|bucket| bucket.drain())
            .collect::<Vec<_>>();
        let count = elements.len();
        let mut capacity = self.capacity;

        loop {
            capacity = capacity
                .checked_mul(2)
                .expect("capacity overflow while resizing the set");
            let fresh = Self::new(capacity, config.probe_size);
            match fresh.rehash_all(elements, hash_pair, config) {
                Ok(fresh) => {
                    *self = fresh;
                    return count;
                }
                Err(rest) => {
                    #[cfg(feature = "logging")]
                    log::debug!(
                        "{}An element did not fit at capacity {capacity}; doubling again",
                        crate::sync::set::log_prefix(_name),
                    );
                    elements = rest;
                }
            }
        }
    }

    /// Places every element against this table's capacity. On failure, drains
    /// everything placed so far and hands all elements back.
    fn rehash_all<H: HashPair<T>>(
        mut self,
        elements: Vec<T>,
        hash_pair: &H,
        config: &SetConfig,
    ) -> Result<Self, Vec<T>> {
        let mut elements = elements.into_iter();
        while let Some(element) = elements.next() {
            let index0 = self.index_of(hash_pair.hash0(&element));
            let index1 = self.index_of(hash_pair.hash1(&element));
            if let Placement::Full(element) = self.place(element, index0, index1, config) {
                let mut all = self
                    .buckets_mut()
                    .flat_map(|bucket| bucket.drain())
                    .collect::<Vec<_>>();
                all.push(element);
                all.extend(elements);
                return Err(all);
            }
        }
        Ok(self)
    }
}

fn try_alloc_buckets<T>(capacity: usize, probe_size: usize) -> Result<BucketArray<T>, BuildError> {
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(capacity)
        .map_err(|_| BuildError::AllocationFailed { capacity })?;
    buckets.extend((0..capacity).map(|_| Mutex::new(Bucket::with_capacity(probe_size))));
    Ok(buckets.into_boxed_slice())
}

fn add_below<T>(bucket: &Mutex<Bucket<T>>, element: T, limit: usize) -> Result<(), T> {
    let mut bucket = bucket.lock();
    if bucket.len() < limit {
        bucket.add(element)
    } else {
        Err(element)
    }
}

#[cfg(test)]
impl<T> Tables<T> {
    pub(crate) fn occupancy(&self) -> usize {
        self.buckets
            .iter()
            .flat_map(|table| table.iter())
            .map(|bucket| bucket.lock().len())
            .sum()
    }

    pub(crate) fn for_each_bucket(&self, mut f: impl FnMut(Table, usize, &Bucket<T>)) {
        for table in [Table::First, Table::Second] {
            for (index, bucket) in self.buckets[table.index()].iter().enumerate() {
                f(table, index, &bucket.lock());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Placement, Tables};
    use crate::{
        common::{SetConfig, Table},
        hash::FnHashPair,
    };

    fn config(probe_threshold: usize, probe_size: usize) -> SetConfig {
        SetConfig {
            probe_threshold,
            probe_size,
            ..Default::default()
        }
    }

    #[test]
    fn place_prefers_comfortable_buckets() {
        let config = config(1, 2);
        let tables = Tables::try_new(4, config.probe_size).unwrap();

        assert_eq!(tables.place(10, 0, 0, &config), Placement::Settled);
        // Table 0 is at the threshold, table 1 is not.
        assert_eq!(tables.place(11, 0, 0, &config), Placement::Settled);
        assert!(tables.bucket(Table::Second, 0).lock().contains(&11));

        // Both at the threshold: table 0 takes it and asks for a relocation.
        assert_eq!(
            tables.place(12, 0, 0, &config),
            Placement::Crowded(Table::First, 0)
        );
        assert_eq!(
            tables.place(13, 0, 0, &config),
            Placement::Crowded(Table::Second, 0)
        );
        assert_eq!(tables.place(14, 0, 0, &config), Placement::Full(14));
        assert_eq!(tables.occupancy(), 4);
    }

    #[test]
    fn grow_rehashes_against_the_new_capacity() {
        let config = config(2, 4);
        let pair = FnHashPair::new(|n: &u64| *n, |n: &u64| n / 3);
        let mut tables = Tables::try_new(4, config.probe_size).unwrap();

        for n in 0..12u64 {
            let i0 = tables.index_of(n);
            let i1 = tables.index_of(n / 3);
            assert!(!matches!(
                tables.place(n, i0, i1, &config),
                Placement::Full(_)
            ));
        }

        assert_eq!(tables.grow(&pair, &config, None), 12);
        assert_eq!(tables.capacity(), 8);
        assert_eq!(tables.occupancy(), 12);

        for n in 0..12u64 {
            assert!(tables.contains(&n, tables.index_of(n), tables.index_of(n / 3)));
        }
        tables.for_each_bucket(|table, index, bucket| {
            for n in bucket.iter() {
                let hash = match table {
                    Table::First => *n,
                    Table::Second => n / 3,
                };
                assert_eq!(tables.index_of(hash), index);
            }
        });
    }

    #[test]
    fn grow_keeps_doubling_until_everything_fits() {
        let config = config(1, 2);
        let pair = FnHashPair::new(|n: &u64| *n, |n: &u64| *n);
        let mut tables = Tables::try_new(2, config.probe_size).unwrap();
        // Multiples of 8 share their buckets up to capacity 8. Only at
        // capacity 16 do they split into two groups that fit.
        for n in [0u64, 8, 16, 24] {
            assert!(!matches!(tables.place(n, 0, 0, &config), Placement::Full(_)));
        }
        assert_eq!(tables.place(32, 1, 1, &config), Placement::Settled);

        assert_eq!(tables.grow(&pair, &config, None), 5);
        assert_eq!(tables.capacity(), 16);
        assert_eq!(tables.occupancy(), 5);
        for n in [0u64, 8, 16, 24, 32] {
            let index = tables.index_of(n);
            assert!(tables.contains(&n, index, index));
        }
    }
}

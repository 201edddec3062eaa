use super::{base_set::Inner, CuckooSetBuilder};
use crate::{
    common::{error::BuildError, SetConfig},
    hash::{HashPair, RandomHashPair},
    Policy,
};

use std::{fmt, hash::Hash, sync::Arc};

/// A thread-safe concurrent set based on cuckoo hashing.
///
/// Every element lives in one of two candidate buckets: one in table 0 chosen
/// by the first hash function, and one in table 1 chosen by the second. Each
/// bucket holds a few elements. When an insert crowds a bucket, the set walks
/// a bounded chain of moves between the two tables to make room, and when
/// that walk cannot finish it doubles the capacity of both tables.
///
/// `CuckooSet` supports full concurrency of `put`, `contains` and `remove`
/// across elements of different lock stripes. Resizing is the only operation
/// that blocks the whole set, and it happens a logarithmic number of times as
/// the set grows.
///
/// # Examples
///
/// Here's an example of updating a set by using multiple threads:
///
/// ```rust
/// use cuckoo_set::CuckooSet;
///
/// use std::thread;
///
/// const NUM_THREADS: u64 = 8;
/// const NUM_ELEMENTS_PER_THREAD: u64 = 500;
///
/// let set = CuckooSet::new();
///
/// // Spawn threads and update the set simultaneously.
/// let threads: Vec<_> = (0..NUM_THREADS)
///     .map(|i| {
///         // To share the same set across the threads, clone it.
///         // This is a cheap operation.
///         let my_set = set.clone();
///         let start = i * NUM_ELEMENTS_PER_THREAD;
///         let end = (i + 1) * NUM_ELEMENTS_PER_THREAD;
///
///         thread::spawn(move || {
///             for n in start..end {
///                 my_set.put(n);
///                 assert!(my_set.contains(&n));
///             }
///
///             // Remove every fourth element we inserted.
///             for n in (start..end).step_by(4) {
///                 assert!(my_set.remove(&n));
///             }
///         })
///     })
///     .collect();
///
/// // Wait for all threads to complete.
/// threads.into_iter().for_each(|t| t.join().expect("Failed"));
///
/// assert_eq!(set.size(), 3_000);
/// assert!(!set.contains(&0));
/// assert!(set.contains(&1));
/// ```
///
/// # Sharing the set
///
/// Cloning is a cheap operation for `CuckooSet` as it only creates a
/// thread-safe reference-counted pointer to the internal data structures.
///
/// # Hashing Algorithm
///
/// By default, `CuckooSet` uses [`RandomHashPair`], two independently keyed
/// instances of the hashing algorithm used by `std::collections::HashMap`.
/// Another pair can be plugged in with the
/// [`build_with_hash_pair`][build-with-hash-pair-method] method of the
/// `CuckooSetBuilder`. The two functions should be independent of each other;
/// a pair that maps many elements to the same two buckets forces frequent
/// resizes.
///
/// [build-with-hash-pair-method]: ./struct.CuckooSetBuilder.html#method.build_with_hash_pair
///
pub struct CuckooSet<T, H = RandomHashPair> {
    inner: Arc<Inner<T, H>>,
}

impl<T, H> Clone for CuckooSet<T, H> {
    /// Makes a clone of this shared set.
    ///
    /// This operation is cheap as it only creates a thread-safe reference
    /// counted pointer to the shared internal data structures.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, H> fmt::Debug for CuckooSet<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CuckooSet")
            .field("name", &self.name())
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<T> CuckooSet<T, RandomHashPair>
where
    T: Hash + Eq + Clone,
{
    /// Constructs a new, empty `CuckooSet<T>` with the default configuration.
    ///
    /// To adjust configuration knobs such as `initial_capacity` or
    /// `lock_stripes`, use the [`CuckooSetBuilder`][builder-struct].
    ///
    /// [builder-struct]: ./struct.CuckooSetBuilder.html
    ///
    /// # Panics
    ///
    /// Panics if the initial bucket arrays cannot be allocated.
    pub fn new() -> Self {
        match Self::with_everything(None, SetConfig::default(), RandomHashPair::default()) {
            Ok(set) => set,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<T> Default for CuckooSet<T, RandomHashPair>
where
    T: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CuckooSet<T> {
    /// Returns a [`CuckooSetBuilder`][builder-struct], which can build a
    /// `CuckooSet` with various configuration knobs.
    ///
    /// [builder-struct]: ./struct.CuckooSetBuilder.html
    pub fn builder() -> CuckooSetBuilder<T> {
        CuckooSetBuilder::default()
    }
}

impl<T, H> CuckooSet<T, H> {
    /// Returns the set's name.
    pub fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    /// Returns a read-only policy of this set.
    ///
    /// At this time, the policy cannot be modified after the set is created.
    pub fn policy(&self) -> Policy {
        self.inner.policy()
    }

    /// Returns the number of elements in this set.
    ///
    /// The counter is read without taking any lock. While other threads are
    /// updating the set the value may be slightly off; it is exact once they
    /// are done.
    pub fn size(&self) -> usize {
        self.inner.size()
    }

    /// Returns `true` if this set holds no elements. Subject to the same
    /// caveat as [`size`](#method.size).
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the current number of buckets in each of the two tables.
    ///
    /// The capacity starts at the configured `initial_capacity` and doubles
    /// each time the set resizes.
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }
}

impl<T, H> CuckooSet<T, H>
where
    T: Eq + Clone,
    H: HashPair<T>,
{
    pub(crate) fn with_everything(
        name: Option<String>,
        config: SetConfig,
        hash_pair: H,
    ) -> Result<Self, BuildError> {
        Ok(Self {
            inner: Arc::new(Inner::new(name, config, hash_pair)?),
        })
    }

    /// Adds an element to the set.
    ///
    /// Adding an element that is already present does nothing. If the set
    /// runs out of room for the element, this call resizes the set before
    /// returning, blocking other threads while doing so.
    pub fn put(&self, element: T) {
        self.inner.put(element)
    }

    /// Returns `true` if the set holds the element.
    pub fn contains(&self, element: &T) -> bool {
        self.inner.contains(element)
    }

    /// Removes an element from the set. Returns `true` if the element was
    /// present.
    pub fn remove(&self, element: &T) -> bool {
        self.inner.remove(element)
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        self.inner.assert_invariants()
    }
}

#[cfg(feature = "logging")]
pub(crate) fn log_prefix(name: Option<&str>) -> String {
    name.map(|name| format!("[{name}] ")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::CuckooSet;
    use crate::hash::FnHashPair;

    use std::{sync::Arc, thread};

    #[test]
    fn basic_single_thread() {
        let set = CuckooSet::new();
        assert!(set.is_empty());

        set.put("alice");
        set.put("bob");
        assert!(set.contains(&"alice"));
        assert!(set.contains(&"bob"));
        assert!(!set.contains(&"cindy"));
        assert_eq!(set.size(), 2);

        // Idempotent put.
        set.put("alice");
        assert_eq!(set.size(), 2);

        assert!(set.remove(&"alice"));
        assert!(!set.remove(&"alice"));
        assert!(!set.contains(&"alice"));
        assert_eq!(set.size(), 1);
        set.assert_invariants();
    }

    #[test]
    fn remove_then_reinsert() {
        let set = CuckooSet::new();
        set.put('a');
        assert!(set.remove(&'a'));
        set.put('a');

        assert!(set.contains(&'a'));
        assert_eq!(set.size(), 1);
        set.assert_invariants();
    }

    #[test]
    fn membership_follows_the_net_effect() {
        let set = CuckooSet::builder()
            .initial_capacity(8)
            .build()
            .expect("valid config");
        let mut model = std::collections::HashSet::new();

        // A deterministic mix of puts and removes over a small domain, so
        // that elements come and go many times and the set resizes.
        let mut x = 12_345u64;
        for _ in 0..20_000 {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            let n = (x >> 33) % 500;
            if x & (1 << 20) == 0 {
                set.put(n);
                model.insert(n);
            } else {
                assert_eq!(set.remove(&n), model.remove(&n));
            }
        }

        for n in 0..500 {
            assert_eq!(set.contains(&n), model.contains(&n), "mismatch for {n}");
        }
        assert_eq!(set.size(), model.len());
        set.assert_invariants();
    }

    #[test]
    fn resize_preserves_membership() {
        let set = CuckooSet::builder()
            .initial_capacity(2)
            .build()
            .expect("valid config");

        let mut capacity = set.capacity();
        let mut resizes = 0;
        for n in 0..2_000u32 {
            set.put(n);
            if set.capacity() != capacity {
                capacity = set.capacity();
                resizes += 1;
                for m in 0..=n {
                    assert!(set.contains(&m), "{m} lost when growing to {capacity}");
                }
            }
        }

        assert!(resizes > 0);
        assert_eq!(set.size(), 2_000);
        set.assert_invariants();
    }

    #[test]
    fn colliding_elements_force_capacity_doubling() {
        // Every multiple of 4 shares bucket 0 of both tables at capacity 4.
        let pair = FnHashPair::new(|n: &u64| *n, |n: &u64| *n);
        let set: CuckooSet<u64, _> = CuckooSet::builder()
            .initial_capacity(4)
            .probe_threshold(1)
            .probe_size(2)
            .lock_stripes(1)
            .build_with_hash_pair(pair)
            .expect("valid config");

        set.put(0);
        set.put(4);
        assert_eq!(set.capacity(), 4);

        // Both buckets of the pair are at the threshold now. The next
        // colliding element crowds them until the set has to grow.
        set.put(8);
        assert_eq!(set.capacity(), 8);

        for n in [0, 4, 8] {
            assert!(set.contains(&n));
        }
        assert_eq!(set.size(), 3);
        set.assert_invariants();
    }

    #[test]
    fn no_duplicates_under_concurrent_puts_of_the_same_elements() {
        let set = CuckooSet::builder()
            .initial_capacity(4)
            .lock_stripes(8)
            .build()
            .expect("valid config");
        let set = Arc::new(set);

        let threads: Vec<_> = (0..4)
            .map(|_| {
                let my_set = Arc::clone(&set);
                thread::spawn(move || {
                    for n in 0..1_000u32 {
                        my_set.put(n);
                    }
                })
            })
            .collect();
        threads.into_iter().for_each(|t| t.join().expect("Failed"));

        assert_eq!(set.size(), 1_000);
        set.assert_invariants();
    }

    #[test]
    fn concurrent_puts_and_removes_keep_the_invariants() {
        let set = CuckooSet::builder()
            .initial_capacity(16)
            .lock_stripes(4)
            .build()
            .expect("valid config");

        let threads: Vec<_> = (0..4u32)
            .map(|i| {
                let my_set = set.clone();
                thread::spawn(move || {
                    let base = i * 10_000;
                    for n in base..base + 2_000 {
                        my_set.put(n);
                        if n % 3 == 0 {
                            assert!(my_set.remove(&n));
                        }
                    }
                })
            })
            .collect();
        threads.into_iter().for_each(|t| t.join().expect("Failed"));

        let expected = (0..4u32)
            .flat_map(|i| (i * 10_000)..(i * 10_000 + 2_000))
            .filter(|n| n % 3 != 0)
            .count();
        assert_eq!(set.size(), expected);
        set.assert_invariants();
    }

    #[test]
    fn debug_shows_name_and_size() {
        let set = CuckooSet::builder()
            .name("visited")
            .initial_capacity(16)
            .build()
            .expect("valid config");
        set.put(1u8);

        let debug = format!("{set:?}");
        assert!(debug.contains("\"visited\""));
        assert!(debug.contains("size: 1"));
        assert!(debug.contains("capacity: 16"));
    }
}

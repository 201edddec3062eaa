use super::CuckooSet;
use crate::{
    common::{error::BuildError, SetConfig},
    hash::{HashPair, RandomHashPair},
};

use std::{hash::Hash, marker::PhantomData};

/// Builds a [`CuckooSet`][set-struct] with various configuration knobs.
///
/// [set-struct]: ./struct.CuckooSet.html
///
/// # Examples
///
/// ```rust
/// use cuckoo_set::CuckooSet;
///
/// let set = CuckooSet::builder()
///     .name("visited")
///     // Start with 64 buckets per table.
///     .initial_capacity(64)
///     // Up to 8 elements per bucket, asking for a relocation from 4 on.
///     .probe_size(8)
///     .probe_threshold(4)
///     // Give up relocating after 128 hops and resize instead.
///     .relocate_limit(128)
///     // Guard the elements with 16 locks.
///     .lock_stripes(16)
///     // Create the set.
///     .build()
///     .expect("invalid configuration");
///
/// set.put("https://example.com/");
/// assert!(set.contains(&"https://example.com/"));
/// assert_eq!(set.policy().num_lock_stripes(), 16);
/// ```
///
#[must_use]
pub struct CuckooSetBuilder<T> {
    name: Option<String>,
    config: SetConfig,
    set_type: PhantomData<fn() -> T>,
}

impl<T> Default for CuckooSetBuilder<T> {
    fn default() -> Self {
        Self {
            name: None,
            config: SetConfig::default(),
            set_type: PhantomData,
        }
    }
}

impl<T> CuckooSetBuilder<T> {
    /// Construct a new `CuckooSetBuilder` with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of the set. The name is used in log messages when the
    /// `logging` feature is enabled.
    pub fn name(self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self
        }
    }

    /// Sets the initial number of buckets in each of the two tables.
    ///
    /// Default: 1024
    pub fn initial_capacity(self, capacity: usize) -> Self {
        let config = SetConfig {
            initial_capacity: capacity,
            ..self.config
        };
        Self { config, ..self }
    }

    /// Sets the bucket fill level at which an insert starts a relocation walk
    /// to bring the bucket back under it. Must be less than the probe size.
    ///
    /// Default: 2
    pub fn probe_threshold(self, threshold: usize) -> Self {
        let config = SetConfig {
            probe_threshold: threshold,
            ..self.config
        };
        Self { config, ..self }
    }

    /// Sets the maximum number of elements per bucket.
    ///
    /// Default: 4
    pub fn probe_size(self, size: usize) -> Self {
        let config = SetConfig {
            probe_size: size,
            ..self.config
        };
        Self { config, ..self }
    }

    /// Sets the maximum number of hops of a relocation walk. When a walk
    /// reaches it, the set resizes. Zero makes every crowded insert resize.
    ///
    /// Default: 512
    pub fn relocate_limit(self, limit: usize) -> Self {
        let config = SetConfig {
            relocate_limit: limit,
            ..self.config
        };
        Self { config, ..self }
    }

    /// Sets the number of locks guarding the elements. It is rounded up to a
    /// power of two. With `1`, every operation but `size` is serialized by one
    /// set-wide lock.
    ///
    /// Default: 64
    pub fn lock_stripes(self, num_stripes: usize) -> Self {
        let config = SetConfig {
            lock_stripes: num_stripes,
            ..self.config
        };
        Self { config, ..self }
    }

    /// Builds a `CuckooSet<T, H>` that places elements with the given hash
    /// pair.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the configuration is invalid or the
    /// initial tables cannot be allocated.
    pub fn build_with_hash_pair<H>(self, hash_pair: H) -> Result<CuckooSet<T, H>, BuildError>
    where
        T: Eq + Clone,
        H: HashPair<T>,
    {
        CuckooSet::with_everything(self.name, self.config, hash_pair)
    }
}

impl<T> CuckooSetBuilder<T>
where
    T: Hash + Eq + Clone,
{
    /// Builds a `CuckooSet<T>`.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] if the configuration is invalid or the
    /// initial tables cannot be allocated.
    pub fn build(self) -> Result<CuckooSet<T, RandomHashPair>, BuildError> {
        self.build_with_hash_pair(RandomHashPair::default())
    }
}

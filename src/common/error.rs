/// The error type returned by
/// [`CuckooSetBuilder::build`][build-method] and
/// [`CuckooSetBuilder::build_with_hash_pair`][build-with-hash-pair-method].
///
/// [build-method]: ./struct.CuckooSetBuilder.html#method.build
/// [build-with-hash-pair-method]: ./struct.CuckooSetBuilder.html#method.build_with_hash_pair
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The initial capacity was zero. Both tables need at least one bucket.
    #[error("initial_capacity must be greater than zero")]
    ZeroInitialCapacity,

    /// The probe size was zero, so no bucket could ever hold an element.
    #[error("probe_size must be greater than zero")]
    ZeroProbeSize,

    /// The probe threshold was not in `1..probe_size`.
    #[error(
        "probe_threshold ({threshold}) must be at least 1 and less than \
    probe_size ({probe_size})"
    )]
    InvalidProbeThreshold {
        /// The rejected probe threshold.
        threshold: usize,
        /// The configured probe size.
        probe_size: usize,
    },

    /// The number of lock stripes was zero.
    #[error("lock_stripes must be greater than zero")]
    ZeroLockStripes,

    /// The bucket arrays for the requested initial capacity could not be
    /// allocated.
    #[error("failed to allocate two tables of {capacity} buckets")]
    AllocationFailed {
        /// The requested number of buckets per table.
        capacity: usize,
    },
}

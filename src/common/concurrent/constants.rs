/// The number of buckets per table of a new set.
pub(crate) const DEFAULT_INITIAL_CAPACITY: usize = 1024;

/// A bucket holding fewer elements than this accepts an insert without asking
/// for a relocation.
pub(crate) const DEFAULT_PROBE_THRESHOLD: usize = 2;

/// The hard limit of elements per bucket.
pub(crate) const DEFAULT_PROBE_SIZE: usize = 4;

/// The maximum number of hops of a relocation walk before the set gives up and
/// resizes.
pub(crate) const DEFAULT_RELOCATE_LIMIT: usize = 512;

pub(crate) const DEFAULT_LOCK_STRIPES: usize = 64;

use crate::common::SetConfig;

#[derive(Clone, Debug)]
/// The policy of a set.
///
/// A `Policy` is a read-only snapshot of the configuration a set was built
/// with. The current number of buckets grows over time and is reported by
/// [`CuckooSet::capacity`](crate::CuckooSet::capacity) instead.
pub struct Policy {
    initial_capacity: usize,
    probe_threshold: usize,
    probe_size: usize,
    relocate_limit: usize,
    num_lock_stripes: usize,
}

impl Policy {
    pub(crate) fn new(config: &SetConfig, num_lock_stripes: usize) -> Self {
        Self {
            initial_capacity: config.initial_capacity,
            probe_threshold: config.probe_threshold,
            probe_size: config.probe_size,
            relocate_limit: config.relocate_limit,
            num_lock_stripes,
        }
    }

    /// Returns the number of buckets per table the set started with.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Returns the bucket fill level at which an insert asks for a relocation.
    pub fn probe_threshold(&self) -> usize {
        self.probe_threshold
    }

    /// Returns the maximum number of elements per bucket.
    pub fn probe_size(&self) -> usize {
        self.probe_size
    }

    /// Returns the maximum number of hops of a relocation walk.
    pub fn relocate_limit(&self) -> usize {
        self.relocate_limit
    }

    /// Returns the number of lock stripes of the set. This is the configured
    /// value rounded up to a power of two.
    pub fn num_lock_stripes(&self) -> usize {
        self.num_lock_stripes
    }
}

pub(crate) mod bucket;
pub(crate) mod builder_utils;
pub(crate) mod concurrent;
pub(crate) mod error;

use self::concurrent::constants::{
    DEFAULT_INITIAL_CAPACITY, DEFAULT_LOCK_STRIPES, DEFAULT_PROBE_SIZE, DEFAULT_PROBE_THRESHOLD,
    DEFAULT_RELOCATE_LIMIT,
};

// Note: `Table` cannot have more than two variants. The relocation walk flips
// between them with `other`, and a set owns exactly two bucket arrays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Table {
    First = 0,
    Second = 1,
}

impl Table {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub(crate) fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SetConfig {
    /// The number of buckets per table of a new set.
    /// Default: `DEFAULT_INITIAL_CAPACITY`
    pub(crate) initial_capacity: usize,
    /// Inserting into a bucket holding this many elements or more asks for a
    /// relocation. Default: `DEFAULT_PROBE_THRESHOLD`
    pub(crate) probe_threshold: usize,
    /// The hard per-bucket limit. Default: `DEFAULT_PROBE_SIZE`
    pub(crate) probe_size: usize,
    /// The maximum number of hops of a relocation walk.
    /// Default: `DEFAULT_RELOCATE_LIMIT`
    pub(crate) relocate_limit: usize,
    /// The number of lock stripes, before rounding up to a power of two.
    /// Default: `DEFAULT_LOCK_STRIPES`
    pub(crate) lock_stripes: usize,
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            probe_threshold: DEFAULT_PROBE_THRESHOLD,
            probe_size: DEFAULT_PROBE_SIZE,
            relocate_limit: DEFAULT_RELOCATE_LIMIT,
            lock_stripes: DEFAULT_LOCK_STRIPES,
        }
    }
}

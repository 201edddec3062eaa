use crossbeam_utils::CachePadded;
use parking_lot::{Mutex, MutexGuard};

/// A fixed table of mutexes. An element is guarded by the stripe selected by
/// its hash, so operations on elements of different stripes run in parallel.
///
/// A thread must hold at most one stripe at a time; nothing orders the
/// stripes against each other.
pub(crate) struct LockStripes {
    stripes: Box<[CachePadded<Mutex<()>>]>,
    mask: usize,
}

impl LockStripes {
    /// # Panics
    ///
    /// Panics if `num_stripes` is 0.
    pub(crate) fn new(num_stripes: usize) -> Self {
        assert!(num_stripes > 0);

        let actual_num_stripes = num_stripes.next_power_of_two();
        let stripes = (0..actual_num_stripes)
            .map(|_| CachePadded::new(Mutex::new(())))
            .collect::<Vec<_>>();

        Self {
            stripes: stripes.into_boxed_slice(),
            mask: actual_num_stripes - 1,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.stripes.len()
    }

    #[inline]
    pub(crate) fn lock(&self, hash: u64) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe_index(hash)].lock()
    }

    #[inline]
    fn stripe_index(&self, hash: u64) -> usize {
        // Fold the high bits in so that hashes differing only there still
        // spread over the stripes.
        ((hash ^ (hash >> 32)) as usize) & self.mask
    }
}

#[cfg(test)]
mod tests {
    use super::LockStripes;

    #[test]
    fn rounds_up_to_a_power_of_two() {
        assert_eq!(LockStripes::new(1).len(), 1);
        assert_eq!(LockStripes::new(3).len(), 4);
        assert_eq!(LockStripes::new(64).len(), 64);
    }

    #[test]
    fn single_stripe_serializes_everything() {
        let stripes = LockStripes::new(1);
        let _guard = stripes.lock(1);
        for hash in [0, 2, u64::MAX] {
            assert!(stripes.stripes[stripes.stripe_index(hash)].is_locked());
        }
    }

    #[test]
    fn distinct_stripes_do_not_block_each_other() {
        let stripes = LockStripes::new(4);
        let _first = stripes.lock(0);
        assert!(stripes.stripes[1].try_lock().is_some());
        assert!(stripes.stripes[0].try_lock().is_none());
    }
}

use super::base_set::Inner;
use crate::{common::Table, hash::HashPair};

/// The outcome of a relocation walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Relocation {
    /// The crowded bucket got back under the probe threshold, or the tables
    /// were rebuilt by a resize while walking. Carries the number of hops
    /// taken.
    Settled { hops: usize },
    /// An element could not move because its other bucket was full.
    Blocked { hops: usize },
    /// The walk took the maximum number of hops without settling.
    Exhausted,
}

impl Relocation {
    pub(crate) fn is_settled(self) -> bool {
        matches!(self, Self::Settled { .. })
    }
}

impl<T, H> Inner<T, H>
where
    T: Eq + Clone,
    H: HashPair<T>,
{
    /// Relieves a crowded bucket by moving its elements to their buckets in
    /// the other table, following the chain of displaced elements for at most
    /// `relocate_limit` hops.
    ///
    /// Each hop acquires the guard of the element it moves and releases it
    /// before the next hop. `observed_capacity` is the capacity at which the
    /// bucket was found crowded.
    pub(crate) fn relocate(
        &self,
        table: Table,
        index: usize,
        observed_capacity: usize,
    ) -> Relocation {
        let threshold = self.config.probe_threshold;
        let (mut source_table, mut source_index) = (table, index);

        for hop in 0..self.config.relocate_limit {
            let victim = match self.peek_victim(source_table, source_index, observed_capacity) {
                Some(victim) => victim,
                None => return Relocation::Settled { hops: hop },
            };

            let guard = self.guard(&victim);
            if guard.capacity() != observed_capacity {
                return Relocation::Settled { hops: hop };
            }

            let source = guard.bucket(source_table, source_index);
            {
                let source = source.lock();
                if !source.contains(&victim) {
                    // Someone removed or moved the victim since we peeked.
                    if source.len() >= threshold {
                        continue;
                    }
                    return Relocation::Settled { hops: hop + 1 };
                }
            }

            let dest_table = source_table.other();
            let dest_index = guard.index_of(self.hash(dest_table, &victim));

            // The victim cannot leave the source while we hold its guard, so
            // copy it over first and remove it from the source afterwards.
            // Only holders of the victim's guard can tell it sits in two
            // buckets in between.
            let dest_was_comfortable = {
                let mut dest = guard.bucket(dest_table, dest_index).lock();
                let comfortable = dest.len() < threshold;
                if dest.add(victim.clone()).is_err() {
                    #[cfg(feature = "logging")]
                    log::trace!(
                        "{}Relocation blocked by a full bucket after {hop} hops",
                        super::set::log_prefix(self.name()),
                    );
                    return Relocation::Blocked { hops: hop + 1 };
                }
                comfortable
            };
            let removed = source.lock().remove(&victim);
            debug_assert!(removed.is_some());

            if dest_was_comfortable {
                return Relocation::Settled { hops: hop + 1 };
            }
            source_table = dest_table;
            source_index = dest_index;
        }

        #[cfg(feature = "logging")]
        log::trace!(
            "{}Relocation gave up after {} hops",
            super::set::log_prefix(self.name()),
            self.config.relocate_limit,
        );
        Relocation::Exhausted
    }

    /// Returns a copy of the element to move out of a bucket, or `None` if
    /// the bucket no longer needs relief.
    fn peek_victim(&self, table: Table, index: usize, observed_capacity: usize) -> Option<T> {
        let tables = self.tables.read();
        if tables.capacity() != observed_capacity {
            // A resize rebuilt the tables, so the bucket is gone.
            return None;
        }
        let bucket = tables.bucket(table, index).lock();
        if bucket.len() < self.config.probe_threshold {
            return None;
        }
        bucket.first().cloned()
    }
}

use smallvec::SmallVec;

/// The number of elements a bucket keeps inline before spilling to the heap.
/// Matches the default probe size.
const INLINE_ELEMENTS: usize = 4;

/// A bounded, unordered container of elements.
///
/// A bucket never holds more than `capacity` elements. It does not check for
/// duplicates on `add`; callers are expected to hold the guard of the element
/// and to have checked membership first.
pub(crate) struct Bucket<T> {
    elements: SmallVec<[T; INLINE_ELEMENTS]>,
    capacity: usize,
}

impl<T> Bucket<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: SmallVec::new(),
            capacity,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.elements.len() >= self.capacity
    }

    /// Returns the element a relocation should move first, if any.
    #[inline]
    pub(crate) fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Adds an element to this bucket. Gives the element back if the bucket is
    /// already full.
    pub(crate) fn add(&mut self, element: T) -> Result<(), T> {
        if self.is_full() {
            return Err(element);
        }
        self.elements.push(element);
        Ok(())
    }

    pub(crate) fn drain(&mut self) -> smallvec::Drain<'_, [T; INLINE_ELEMENTS]> {
        self.elements.drain(..)
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elements.iter()
    }
}

impl<T: Eq> Bucket<T> {
    #[inline]
    pub(crate) fn contains(&self, element: &T) -> bool {
        self.elements.iter().any(|e| e == element)
    }

    /// Removes the element and returns it, or `None` if this bucket does not
    /// hold it.
    pub(crate) fn remove(&mut self, element: &T) -> Option<T> {
        let pos = self.elements.iter().position(|e| e == element)?;
        // Order is not part of the contract, but keep the rest of the elements
        // in insertion order so that `first` stays the oldest one.
        Some(self.elements.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::Bucket;

    #[test]
    fn add_until_full() {
        let mut bucket = Bucket::with_capacity(2);
        assert_eq!(bucket.len(), 0);
        assert!(bucket.first().is_none());

        assert_eq!(bucket.add(1), Ok(()));
        assert_eq!(bucket.add(2), Ok(()));
        assert!(bucket.is_full());
        assert_eq!(bucket.add(3), Err(3));

        assert_eq!(bucket.len(), 2);
        assert!(bucket.contains(&1));
        assert!(bucket.contains(&2));
        assert!(!bucket.contains(&3));
    }

    #[test]
    fn remove_keeps_the_oldest_first() {
        let mut bucket = Bucket::with_capacity(4);
        for i in 10..14 {
            bucket.add(i).unwrap();
        }

        assert_eq!(bucket.remove(&11), Some(11));
        assert_eq!(bucket.remove(&11), None);
        assert_eq!(bucket.first(), Some(&10));

        assert_eq!(bucket.remove(&10), Some(10));
        assert_eq!(bucket.first(), Some(&12));
        assert_eq!(bucket.len(), 2);
        assert!(!bucket.is_full());
    }

    #[test]
    fn spills_past_the_inline_size() {
        let mut bucket = Bucket::with_capacity(16);
        for i in 0..16 {
            bucket.add(i).unwrap();
        }
        assert!(bucket.is_full());
        assert_eq!(bucket.iter().copied().sum::<i32>(), (0..16).sum());

        let drained = bucket.drain().collect::<Vec<_>>();
        assert_eq!(drained, (0..16).collect::<Vec<_>>());
        assert_eq!(bucket.len(), 0);
    }
}

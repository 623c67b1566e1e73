//! Bounded buffer that evicts its oldest entry on overflow.
//!
//! Indexing is newest-first: `recent(0)` is the last pushed element.

use std::iter::FusedIterator;

// ============================================================================
// RingBuffer
// ============================================================================

/// Fixed-capacity circular buffer with O(1) push.
#[derive(Clone)]
pub struct RingBuffer<T> {
    slots: Vec<Option<T>>,
    /// Slot the next push writes to.
    next: usize,
    len: usize,
}

impl<T> RingBuffer<T> {
    /// Buffer holding at most `capacity` elements (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity.max(1)).map(|_| None).collect(),
            next: 0,
            len: 0,
        }
    }

    /// Push `item` as the newest element, returning the evicted oldest one
    /// when the buffer was full.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = self.slots[self.next].replace(item);
        self.next = (self.next + 1) % self.capacity();
        if evicted.is_none() {
            self.len += 1;
        }
        evicted
    }

    /// Element `index` steps back from the newest.
    pub fn recent(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        let capacity = self.capacity();
        let slot = (self.next + capacity - 1 - index) % capacity;
        self.slots[slot].as_ref()
    }

    pub fn latest(&self) -> Option<&T> {
        self.recent(0)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.next = 0;
        self.len = 0;
    }

    /// Elements from newest to oldest.
    pub fn iter(&self) -> Recent<'_, T> {
        Recent {
            buffer: self,
            front: 0,
            back: self.len,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// Newest-first iterator over a [`RingBuffer`].
pub struct Recent<'a, T> {
    buffer: &'a RingBuffer<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iterator for Recent<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let item = self.buffer.recent(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Recent<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.buffer.recent(self.back)
    }
}

impl<T> ExactSizeIterator for Recent<'_, T> {}
impl<T> FusedIterator for Recent<'_, T> {}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Recent<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut buf = RingBuffer::new(3);
        buf.push("a");
        buf.push("b");
        assert_eq!(buf.latest(), Some(&"b"));
        assert_eq!(buf.recent(1), Some(&"a"));
        assert_eq!(buf.recent(2), None);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut buf = RingBuffer::new(2);
        assert_eq!(buf.push(1), None);
        assert_eq!(buf.push(2), None);
        assert_eq!(buf.push(3), Some(1));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.iter().copied().collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!(buf.iter().rev().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut buf = RingBuffer::new(0);
        buf.push('x');
        buf.push('y');
        assert_eq!(buf.capacity(), 1);
        assert_eq!(buf.latest(), Some(&'y'));
    }

    #[test]
    fn test_clear() {
        let mut buf = RingBuffer::new(4);
        buf.push(1);
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.latest(), None);
        buf.push(5);
        assert_eq!(buf.iter().len(), 1);
    }
}

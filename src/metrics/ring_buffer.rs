use std::iter::Chain;
use std::slice;

/// Fixed-capacity circular sequence.
///
/// Appending past capacity evicts the oldest element. Iteration yields
/// elements oldest to newest. The buffer does no locking of its own; the
/// owner serializes access.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    items: Vec<T>,
    capacity: usize,
    /// Index of the oldest element once the buffer has wrapped.
    head: usize,
}

impl<T> RingBuffer<T> {
    /// # Panics
    ///
    /// Panics if capacity is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be > 0");
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    /// Store `item`, evicting the oldest element when full. O(1).
    pub fn append(&mut self, item: T) {
        if self.items.len() < self.capacity {
            self.items.push(item);
        } else {
            self.items[self.head] = item;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.head = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let (newer, older) = self.items.split_at(self.head);
        Iter {
            inner: older.iter().chain(newer.iter()),
        }
    }
}

impl<T: Clone> RingBuffer<T> {
    /// Oldest-to-newest copy of the current contents.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.append(item);
        }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oldest-to-newest iterator over a [`RingBuffer`].
pub struct Iter<'a, T> {
    inner: Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(buffer: &RingBuffer<&str>) -> String {
        buffer.iter().copied().collect::<Vec<_>>().join(",")
    }

    #[test]
    fn test_append_and_len() {
        let mut buffer = RingBuffer::new(5);
        assert_eq!(buffer.len(), 0);
        for (i, item) in ["A", "B", "C", "D", "E", "F", "G"].into_iter().enumerate() {
            buffer.append(item);
            assert_eq!(buffer.len(), (i + 1).min(5));
        }
    }

    #[test]
    fn test_iteration_is_oldest_to_newest() {
        let mut buffer = RingBuffer::new(5);
        assert_eq!(joined(&buffer), "");
        buffer.extend(["A"]);
        assert_eq!(joined(&buffer), "A");
        buffer.extend(["B", "C"]);
        assert_eq!(joined(&buffer), "A,B,C");
        buffer.extend(["D", "E"]);
        assert_eq!(joined(&buffer), "A,B,C,D,E");
        buffer.extend(["F", "G", "H"]);
        assert_eq!(joined(&buffer), "D,E,F,G,H");
        buffer.extend(["I", "J"]);
        assert_eq!(joined(&buffer), "F,G,H,I,J");
    }

    #[test]
    fn test_to_vec_and_reverse_iteration() {
        let mut buffer = RingBuffer::new(5);
        buffer.extend(["A", "B", "C", "D", "E", "F", "G"]);
        assert_eq!(buffer.to_vec(), vec!["C", "D", "E", "F", "G"]);
        let reversed: Vec<_> = buffer.iter().rev().copied().collect();
        assert_eq!(reversed, vec!["G", "F", "E", "D", "C"]);
        assert_eq!(buffer.iter().len(), 5);
    }

    #[test]
    fn test_clear_resets_wrap_position() {
        let mut buffer = RingBuffer::new(3);
        buffer.extend(1..=4);
        buffer.clear();
        assert!(buffer.is_empty());
        buffer.clear();
        buffer.extend([7, 8]);
        assert_eq!(buffer.to_vec(), vec![7, 8]);
    }

    #[test]
    fn test_capacity_one_keeps_latest() {
        let mut buffer = RingBuffer::new(1);
        buffer.extend([1, 2, 3]);
        assert_eq!(buffer.to_vec(), vec![3]);
        assert_eq!(buffer.capacity(), 1);
    }

    #[test]
    #[should_panic(expected = "Ring buffer capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = RingBuffer::<u64>::new(0);
    }
}

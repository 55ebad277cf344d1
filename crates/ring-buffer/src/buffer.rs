//! Fixed-Capacity Ring Buffer Implementation

/// Default window capacity (10 samples, ~1/3 s at 30fps)
pub const DEFAULT_CAPACITY: usize = 10;

/// Fixed-capacity ring buffer that overwrites its oldest entry when full.
///
/// Storage is allocated once up to `capacity`; after that every push writes
/// into the slot at `head` and advances it, so no element is ever shifted.
/// Iteration always runs oldest to newest.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Slot storage, grows to `capacity` then stays fixed
    storage: Vec<T>,
    /// Capacity of the buffer
    capacity: usize,
    /// Next slot to overwrite once full (also the oldest element)
    head: usize,
    /// Total items written (for statistics)
    total_written: u64,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be > 0");
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_written: 0,
        }
    }

    /// Create a buffer with default capacity (10 items)
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    /// Push an item into the buffer, returning the evicted oldest item if full
    pub fn push(&mut self, item: T) -> Option<T> {
        self.total_written = self.total_written.saturating_add(1);

        if self.storage.len() < self.capacity {
            self.storage.push(item);
            return None;
        }

        let evicted = std::mem::replace(&mut self.storage[self.head], item);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    /// Number of items currently held
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        let (newer, older) = self.storage.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    /// Most recently pushed item
    pub fn latest(&self) -> Option<&T> {
        if self.storage.is_empty() {
            return None;
        }
        let idx = if self.head == 0 {
            self.storage.len() - 1
        } else {
            self.head - 1
        };
        self.storage.get(idx)
    }

    /// Oldest item still held
    pub fn oldest(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Read the last N items (most recent first)
    pub fn read_last(&self, count: usize) -> Vec<&T> {
        self.iter().rev().take(count).collect()
    }

    /// Get total items written since creation or the last clear
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
        self.total_written = 0;
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_read() {
        let mut buffer = RingBuffer::new(10);

        for i in 0..5 {
            buffer.push(i * 100);
        }

        assert_eq!(buffer.len(), 5);

        let items = buffer.read_last(3);
        assert_eq!(items.len(), 3);
        assert_eq!(*items[0], 400); // Most recent
        assert_eq!(*items[2], 200);
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut buffer = RingBuffer::new(5);

        for i in 0..10 {
            buffer.push(i);
        }

        // Holds exactly capacity items
        assert_eq!(buffer.len(), 5);
        assert!(buffer.is_full());

        let items: Vec<_> = buffer.iter().copied().collect();
        assert_eq!(items, vec![5, 6, 7, 8, 9]);
        assert_eq!(buffer.oldest(), Some(&5));
        assert_eq!(buffer.latest(), Some(&9));
    }

    #[test]
    fn test_push_returns_evicted() {
        let mut buffer = RingBuffer::new(2);
        assert_eq!(buffer.push('a'), None);
        assert_eq!(buffer.push('b'), None);
        assert_eq!(buffer.push('c'), Some('a'));
        assert_eq!(buffer.push('d'), Some('b'));
        assert_eq!(buffer.total_written(), 4);
    }

    #[test]
    fn test_fill_ratio() {
        let mut buffer = RingBuffer::new(100);
        assert_eq!(buffer.fill_ratio(), 0.0);

        for i in 0..50 {
            buffer.push(i);
        }

        assert!((buffer.fill_ratio() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_clear() {
        let mut buffer = RingBuffer::new(3);
        for i in 0..7 {
            buffer.push(i);
        }
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);

        buffer.push(42);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![42]);
    }

    proptest! {
        #[test]
        fn prop_keeps_last_capacity_items(
            capacity in 1usize..16,
            items in proptest::collection::vec(any::<u32>(), 0..64),
        ) {
            let mut buffer = RingBuffer::new(capacity);
            for &item in &items {
                buffer.push(item);
            }

            prop_assert!(buffer.len() <= capacity);
            let expected: Vec<u32> = items
                .iter()
                .skip(items.len().saturating_sub(capacity))
                .copied()
                .collect();
            let held: Vec<u32> = buffer.iter().copied().collect();
            prop_assert_eq!(held, expected);
        }
    }
}

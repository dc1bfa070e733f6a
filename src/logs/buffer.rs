use std::collections::VecDeque;

/// Fixed-capacity buffer that keeps only the most recent items pushed into it.
///
/// Once full, every push evicts the oldest item, so memory stays bounded by
/// `capacity` no matter how many items flow through.
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` items
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push an item, evicting the oldest one if the buffer is full
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
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

    /// Iterate over retained items, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Consume the buffer, returning retained items oldest first
    pub fn into_vec(self) -> Vec<T> {
        self.items.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_below_capacity() {
        let mut buffer = RollingBuffer::new(3);
        buffer.push(1);
        buffer.push(2);

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.into_vec(), vec![1, 2]);
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut buffer = RollingBuffer::new(3);
        for i in 1..=7 {
            buffer.push(i);
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.capacity(), 3);
        assert_eq!(buffer.into_vec(), vec![5, 6, 7]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut buffer = RollingBuffer::new(0);
        buffer.push("line");

        assert!(buffer.is_empty());
    }

    #[test]
    fn test_iter_preserves_order() {
        let mut buffer = RollingBuffer::new(2);
        buffer.push("a");
        buffer.push("b");
        buffer.push("c");

        let items: Vec<_> = buffer.iter().copied().collect();
        assert_eq!(items, vec!["b", "c"]);
    }
}

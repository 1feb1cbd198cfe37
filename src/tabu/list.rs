//! FIFO short-term memory of forbidden moves.

use std::collections::VecDeque;

/// Bounded FIFO of `(area, region)` pairs; a listed pair forbids moving
/// that area into that region.
#[derive(Debug, Clone, Default)]
pub struct TabuList {
    queue: VecDeque<(usize, usize)>,
    capacity: usize,
}

impl TabuList {
    pub fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Appends an entry, evicting the oldest once full.
    pub fn push(&mut self, area: usize, region: usize) {
        if self.capacity == 0 {
            return;
        }
        if self.queue.len() >= self.capacity {
            self.queue.pop_front();
        }
        self.queue.push_back((area, region));
    }

    pub fn contains(&self, area: usize, region: usize) -> bool {
        self.queue.contains(&(area, region))
    }

    /// Drops the oldest entry.
    pub fn age(&mut self) {
        self.queue.pop_front();
    }

    /// Changes the capacity, evicting the oldest entries that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.queue.len() > capacity {
            self.queue.pop_front();
        }
    }
}

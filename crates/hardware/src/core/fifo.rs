//! Bounded First-In, First-Out collection.
//!
//! A fixed-capacity sequence that evicts its oldest element when a new one is
//! pushed at capacity. The delta history of each prediction entry, the
//! insertion order of the prediction table, and the in-flight prefetch queue
//! are all built on it.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `push()`: O(1)
//!   - `contains()`: O(N)
//! - **Space Complexity:** O(N) where N is the capacity
//! - **Hardware Cost:** Minimal - a circular buffer with head and tail pointers

use std::collections::VecDeque;
use std::collections::vec_deque;

/// Fixed-capacity FIFO with oldest-first eviction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundedFifo<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedFifo<T> {
    /// Creates an empty FIFO.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of elements held. A capacity of zero is
    ///   raised to one so that a push always stores its element. Storage
    ///   grows on demand up to the capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Appends an element, evicting the oldest one first if full.
    ///
    /// # Arguments
    ///
    /// * `item` - The element to append as the newest.
    ///
    /// # Returns
    ///
    /// The evicted element, or `None` if there was room.
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.is_full() {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    /// Appends an element, handing any evicted element to `on_evict` before
    /// the new element is stored.
    pub fn push_with<F>(&mut self, item: T, on_evict: F)
    where
        F: FnOnce(T),
    {
        if self.is_full() {
            if let Some(oldest) = self.items.pop_front() {
                on_evict(oldest);
            }
        }
        self.items.push_back(item);
    }

    /// Removes and returns the oldest element.
    pub fn pop_oldest(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Returns the oldest element.
    #[inline]
    pub fn oldest(&self) -> Option<&T> {
        self.items.front()
    }

    /// Returns the newest element.
    #[inline]
    pub fn newest(&self) -> Option<&T> {
        self.items.back()
    }

    /// Returns the element `age` places before the newest (0 is the newest).
    #[inline]
    pub fn nth_newest(&self, age: usize) -> Option<&T> {
        self.items.len().checked_sub(age + 1).and_then(|i| self.items.get(i))
    }

    /// Returns the element at position `index`, counting from the oldest.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Number of stored elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no elements are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether the next push will evict.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Maximum number of stored elements.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from the oldest to the newest element.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: PartialEq> BoundedFifo<T> {
    /// Linear membership test.
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<'a, T> IntoIterator for &'a BoundedFifo<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

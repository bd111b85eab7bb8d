//! Growable, index-addressed value arena.
//!
//! Every slot attribute lives in its own `DynamicStore`, so a scheduler's
//! slot table is a set of parallel arenas addressed by the same index. The
//! arena grows by doubling (never below [`MIN_GROWTH`]) and compacts with
//! ordered range removal so indices keep their relative order.

use std::ops::{Index, IndexMut};

/// Smallest capacity the arena grows to once it has to grow at all.
pub const MIN_GROWTH: usize = 32;

#[derive(Clone, Debug)]
pub struct DynamicStore<T> {
    items: Vec<T>,
}

impl<T> Default for DynamicStore<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> DynamicStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Make room for `additional` more values, doubling the capacity when full.
    fn grow_for(&mut self, additional: usize) {
        let needed = self.items.len() + additional;
        if needed <= self.items.capacity() {
            return;
        }
        let mut target = (self.items.capacity() << 1).max(MIN_GROWTH);
        while target < needed {
            target <<= 1;
        }
        self.items.reserve_exact(target - self.items.len());
    }

    pub fn push(&mut self, value: T) {
        self.grow_for(1);
        self.items.push(value);
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// Remove `length` values starting at `start`, shifting the tail down.
    ///
    /// Panics when the range runs past the end.
    pub fn remove_range(&mut self, start: usize, length: usize) {
        assert!(
            start + length <= self.items.len(),
            "remove_range {start}+{length} past len {}",
            self.items.len()
        );
        self.items.drain(start..start + length);
    }

    /// Ordered removal of one value.
    pub fn remove_at(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    /// O(1) removal that moves the last value into the hole.
    pub fn swap_remove_at(&mut self, index: usize) -> T {
        self.items.swap_remove(index)
    }

    /// Resize the backing allocation. Shrinking below the length truncates.
    pub fn set_capacity(&mut self, capacity: usize) {
        if capacity < self.items.len() {
            self.items.truncate(capacity);
        }
        if capacity > self.items.capacity() {
            self.items.reserve_exact(capacity - self.items.len());
        } else {
            self.items.shrink_to(capacity);
        }
    }

    /// Drop unused capacity.
    pub fn trim(&mut self) {
        self.items.shrink_to_fit();
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Clear and give the allocation back.
    pub fn release(&mut self) {
        self.items = Vec::new();
    }
}

impl<T: Clone> DynamicStore<T> {
    /// Append `values[start..start + length]`.
    pub fn extend_from_slice(&mut self, values: &[T], start: usize, length: usize) {
        self.grow_for(length);
        self.items.extend_from_slice(&values[start..start + length]);
    }
}

impl<T: PartialEq> DynamicStore<T> {
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.items.iter().position(|v| v == value)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.index_of(value).is_some()
    }
}

impl<T> Index<usize> for DynamicStore<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for DynamicStore<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a DynamicStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_growth_reaches_minimum_then_doubles() {
        let mut store = DynamicStore::new();
        store.push(1u32);
        assert!(store.capacity() >= MIN_GROWTH);
        let cap = store.capacity();
        for i in 0..cap as u32 {
            store.push(i);
        }
        assert!(store.capacity() >= cap * 2);
    }

    #[test]
    fn remove_range_keeps_order_of_tail() {
        let mut store = DynamicStore::new();
        store.extend_from_slice(&[0, 1, 2, 3, 4, 5, 6], 0, 7);
        store.remove_range(2, 3);
        assert_eq!(store.as_slice(), &[0, 1, 5, 6]);
    }

    #[test]
    fn extend_from_slice_honours_offset() {
        let mut store = DynamicStore::new();
        store.extend_from_slice(&['a', 'b', 'c', 'd'], 1, 2);
        assert_eq!(store.as_slice(), &['b', 'c']);
    }

    #[test]
    fn swap_remove_moves_last_into_hole() {
        let mut store = DynamicStore::new();
        store.extend_from_slice(&[10, 20, 30, 40], 0, 4);
        assert_eq!(store.swap_remove_at(1), 20);
        assert_eq!(store.as_slice(), &[10, 40, 30]);
        assert_eq!(store.remove_at(0), 10);
        assert_eq!(store.as_slice(), &[40, 30]);
    }

    #[test]
    fn set_capacity_truncates_and_release_frees() {
        let mut store = DynamicStore::with_capacity(8);
        store.extend_from_slice(&[1, 2, 3, 4], 0, 4);
        store.set_capacity(2);
        assert_eq!(store.as_slice(), &[1, 2]);
        assert_eq!(store.index_of(&2), Some(1));
        assert!(!store.contains(&3));
        store.release();
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 0);
    }

    #[test]
    #[should_panic]
    fn remove_range_past_end_panics() {
        let mut store = DynamicStore::new();
        store.push(1);
        store.remove_range(0, 2);
    }
}

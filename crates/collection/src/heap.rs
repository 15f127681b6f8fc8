//! Array-backed binary min-heap with an external comparator.
//!
//! The heap is ordered by a caller-supplied [`Comparator`]. The comparator
//! must be a valid total order; this is not checked, and an inconsistent
//! comparator leaves the heap in an unspecified (but memory-safe) order.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use vistas_core::{same_fn, Comparator};

#[inline]
fn left_child(index: usize) -> usize {
    2 * index + 1
}

#[inline]
fn right_child(index: usize) -> usize {
    2 * index + 2
}

#[inline]
fn parent(index: usize) -> usize {
    (index - 1) / 2
}

/// A binary min-heap: the element ordered first by the comparator sits at the root.
pub struct Heap<T> {
    data: Vec<T>,
    comparator: Comparator<T>,
}

impl<T: Clone> Clone for Heap<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            comparator: self.comparator.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Heap").field("data", &self.data).finish()
    }
}

impl<T> Heap<T> {
    /// Creates an empty heap.
    pub fn new(comparator: Comparator<T>) -> Self {
        Self {
            data: Vec::new(),
            comparator,
        }
    }

    /// Creates an empty heap with room for `capacity` elements.
    pub fn with_capacity(comparator: Comparator<T>, capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            comparator,
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the allocated capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Returns the comparator.
    #[inline]
    pub fn comparator(&self) -> &Comparator<T> {
        &self.comparator
    }

    /// Returns the backing array in heap order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the root element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Inserts an element.
    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.sift_up(self.data.len() - 1);
    }

    /// Removes and returns the root element.
    pub fn pop(&mut self) -> Option<T> {
        if self.data.is_empty() {
            return None;
        }
        let last = self.data.len() - 1;
        self.data.swap(0, last);
        let root = self.data.pop();
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        root
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Replaces the comparator and restores heap order.
    ///
    /// Returns false (and does nothing) if the same comparator is already set.
    pub fn set_comparator(&mut self, comparator: Comparator<T>) -> bool {
        if same_fn(&self.comparator, &comparator) {
            return false;
        }
        self.comparator = comparator;
        self.heapify();
        true
    }

    /// Consumes the heap and returns its elements in sorted order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.data.len());
        while let Some(item) = self.pop() {
            sorted.push(item);
        }
        sorted
    }

    /// Wraps an array the caller guarantees is already in heap order.
    pub(crate) fn from_raw(data: Vec<T>, comparator: Comparator<T>) -> Self {
        Self { data, comparator }
    }

    /// Mutable access to the backing array, for callers that restore order themselves.
    pub(crate) fn data_mut(&mut self) -> &mut Vec<T> {
        &mut self.data
    }

    /// Swaps the comparator without reordering; the caller guarantees heap order.
    pub(crate) fn replace_comparator(&mut self, comparator: Comparator<T>) {
        self.comparator = comparator;
    }

    #[inline]
    fn less(&self, a: usize, b: usize) -> bool {
        (self.comparator)(&self.data[a], &self.data[b]) == Ordering::Less
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let up = parent(index);
            if !self.less(index, up) {
                break;
            }
            self.data.swap(index, up);
            index = up;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.data.len();
        loop {
            let left = left_child(index);
            let right = right_child(index);
            let mut smallest = index;
            if left < len && self.less(left, smallest) {
                smallest = left;
            }
            if right < len && self.less(right, smallest) {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.data.swap(index, smallest);
            index = smallest;
        }
    }

    fn heapify(&mut self) {
        let len = self.data.len();
        if len < 2 {
            return;
        }
        for index in (0..=parent(len - 1)).rev() {
            self.sift_down(index);
        }
    }
}

impl<T: Clone> Heap<T> {
    /// Returns an iterator yielding the elements in sorted order.
    ///
    /// The iterator drains a copy; `self` is left untouched.
    pub fn iter(&self) -> IntoSorted<T> {
        IntoSorted { heap: self.clone() }
    }
}

impl<T> Extend<T> for Heap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.data.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

/// A sorted, draining iterator over an owned heap.
pub struct IntoSorted<T> {
    heap: Heap<T>,
}

impl<T> Iterator for IntoSorted<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.heap.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.heap.len(), Some(self.heap.len()))
    }
}

impl<T> ExactSizeIterator for IntoSorted<T> {}

impl<T> IntoIterator for Heap<T> {
    type Item = T;
    type IntoIter = IntoSorted<T>;

    fn into_iter(self) -> IntoSorted<T> {
        IntoSorted { heap: self }
    }
}

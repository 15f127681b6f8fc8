//! Heap that can be fully resorted in place when its comparator changes.
//!
//! A fully sorted array is also a valid heap, so after a resort the backing
//! array can be exposed directly in final order. Any later `push`/`pop` only
//! restores heap order and clears the flag.

use crate::heap::{Heap, IntoSorted};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::mem;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use vistas_core::{same_fn, Comparator};

const PIVOT_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

/// Sorts `data` in place with a randomized three-way quicksort.
///
/// Slices of 0, 1 or 2 elements are handled directly. Runs of elements equal
/// to the pivot are excluded from both partitions, so inputs with many
/// duplicates stay O(n log n).
pub fn quicksort<T, F, R>(data: &mut [T], compare: &F, rng: &mut R)
where
    F: Fn(&T, &T) -> Ordering + ?Sized,
    R: Rng + ?Sized,
{
    let n = data.len();
    match n {
        0 | 1 => return,
        2 => {
            if compare(&data[1], &data[0]) == Ordering::Less {
                data.swap(0, 1);
            }
            return;
        }
        _ => {}
    }

    data.swap(0, rng.gen_range(0..n));

    // data[..lt] < pivot, data[lt..i] == pivot, data[gt..] > pivot
    let mut lt = 0;
    let mut i = 1;
    let mut gt = n;
    while i < gt {
        match compare(&data[i], &data[lt]) {
            Ordering::Less => {
                data.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                data.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }

    let (less, rest) = data.split_at_mut(lt);
    quicksort(less, compare, rng);
    quicksort(&mut rest[gt - lt..], compare, rng);
}

/// A heap that tracks whether its backing array is fully sorted.
///
/// A sorted array can be handed out with
/// [`share_sorted`](SortedViewHeap::share_sorted) without copying. Until the
/// next mutation the heap reads from the shared array; the mutation takes it
/// back, copying only if a reader still holds it.
pub struct SortedViewHeap<T> {
    heap: Heap<T>,
    shared: Option<Rc<Vec<T>>>,
    fully_sorted: bool,
    rng: SmallRng,
}

impl<T> SortedViewHeap<T> {
    /// Creates an empty heap. An empty array is trivially sorted.
    pub fn new(comparator: Comparator<T>) -> Self {
        Self {
            heap: Heap::new(comparator),
            shared: None,
            fully_sorted: true,
            rng: SmallRng::seed_from_u64(PIVOT_SEED),
        }
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns true if the heap is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns true if the backing array is in sorted order for the current comparator.
    #[inline]
    pub fn is_fully_sorted(&self) -> bool {
        self.fully_sorted
    }

    /// Returns the comparator.
    #[inline]
    pub fn comparator(&self) -> &Comparator<T> {
        self.heap.comparator()
    }

    /// Returns the backing array (sorted or heap order, see `is_fully_sorted`).
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        match &self.shared {
            Some(items) => items.as_slice(),
            None => self.heap.as_slice(),
        }
    }

    /// Returns the backing array only if it is fully sorted.
    #[inline]
    pub fn sorted_slice(&self) -> Option<&[T]> {
        if self.fully_sorted {
            Some(self.as_slice())
        } else {
            None
        }
    }

    /// Returns the root element without removing it.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Hands out the backing array if it is fully sorted.
    ///
    /// The first call after a resort moves the array behind an `Rc`; later
    /// calls return the same `Rc`.
    pub fn share_sorted(&mut self) -> Option<Rc<Vec<T>>> {
        if !self.fully_sorted {
            return None;
        }
        let heap = &mut self.heap;
        let items = self
            .shared
            .get_or_insert_with(|| Rc::new(mem::take(heap.data_mut())));
        Some(Rc::clone(items))
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        self.shared = None;
        self.heap.clear();
        self.fully_sorted = true;
    }
}

impl<T: Clone> SortedViewHeap<T> {
    /// Inserts an element; clears the sorted flag.
    pub fn push(&mut self, item: T) {
        self.reclaim();
        self.fully_sorted = false;
        self.heap.push(item);
    }

    /// Removes the root element; clears the sorted flag.
    pub fn pop(&mut self) -> Option<T> {
        self.reclaim();
        self.fully_sorted = false;
        self.heap.pop()
    }

    /// Replaces the comparator and resorts the backing array in place.
    ///
    /// Returns false (and leaves the array alone) if the same comparator is
    /// already set.
    pub fn set_comparator(&mut self, comparator: Comparator<T>) -> bool {
        if same_fn(self.heap.comparator(), &comparator) {
            return false;
        }
        self.reclaim();
        log::debug!("sorted heap: resorting {} elements", self.heap.len());
        quicksort(self.heap.data_mut().as_mut_slice(), &*comparator, &mut self.rng);
        // Sorted order satisfies the heap invariant, so no reheapify is needed.
        self.heap.replace_comparator(comparator);
        self.fully_sorted = true;
        true
    }

    /// Returns an iterator yielding the elements in sorted order without
    /// modifying the heap.
    pub fn iter(&self) -> IntoSorted<T> {
        match &self.shared {
            Some(items) => {
                Heap::from_raw(Vec::clone(items), Rc::clone(self.heap.comparator())).into_iter()
            }
            None => self.heap.iter(),
        }
    }

    /// Moves a shared array back into the heap.
    fn reclaim(&mut self) {
        if let Some(items) = self.shared.take() {
            *self.heap.data_mut() = Rc::try_unwrap(items).unwrap_or_else(|items| {
                log::trace!("sorted heap: copying {} shared elements", items.len());
                Vec::clone(&items)
            });
        }
    }
}

impl<T: Clone> Extend<T> for SortedViewHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let mut iter = iter.into_iter().peekable();
        if iter.peek().is_some() {
            self.reclaim();
            self.fully_sorted = false;
            self.heap.extend(iter);
        }
    }
}

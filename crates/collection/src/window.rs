//! Index-window arithmetic over a collection.
//!
//! A `SlidingWindow` selects the inclusive range `[start, end]` of a bound
//! [`Collection`]. When the collection's length is known, a
//! [`ResizeStrategy`] decides what happens to a window reaching past its end.
//! While the length is unknown, requested windows are accepted as-is and
//! every metric reports [`Metric::Ambiguous`], however much of the
//! collection has already been materialized.

use crate::collection::Collection;
use crate::sequence::{SeqIter, Sequence};
use alloc::boxed::Box;
use core::fmt;
use vistas_core::Metric;

/// What to do with a window that extends past the known end of the collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ResizeStrategy {
    /// Keep the window as requested.
    #[default]
    NoAction,
    /// Slide the window backward, preserving its size, as far as index 0.
    Shift,
    /// Clamp the end to the last element.
    Shrink,
    /// Shift first; shrink only if the window still does not fit.
    ShiftAndShrinkIfNecessary,
}

/// A window `[start, end]` (inclusive) over a collection.
pub struct SlidingWindow<T> {
    start: usize,
    end: usize,
    collection: Option<Collection<T>>,
    strategy: ResizeStrategy,
}

impl<T> Clone for SlidingWindow<T> {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            end: self.end,
            collection: self.collection.clone(),
            strategy: self.strategy,
        }
    }
}

impl<T> fmt::Debug for SlidingWindow<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlidingWindow")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("strategy", &self.strategy)
            .field("bound", &self.collection.is_some())
            .finish()
    }
}

impl<T> SlidingWindow<T> {
    /// Creates an unbound window. Bounds given in reverse order are swapped.
    pub fn new(start: usize, end: usize, strategy: ResizeStrategy) -> Self {
        let (start, end) = ordered(start, end);
        Self {
            start,
            end,
            collection: None,
            strategy,
        }
    }

    /// Returns `(start, end)`.
    #[inline]
    pub fn window(&self) -> (usize, usize) {
        (self.start, self.end)
    }

    #[inline]
    pub fn start_index(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn end_index(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn resize_strategy(&self) -> ResizeStrategy {
        self.strategy
    }

    /// Returns the bound collection.
    #[inline]
    pub fn collection(&self) -> Option<&Collection<T>> {
        self.collection.as_ref()
    }

    /// Number of slots in the window.
    #[inline]
    fn span(&self) -> usize {
        (self.end - self.start).saturating_add(1)
    }

    /// Applies the resize strategy to a requested window.
    fn fit(&self, start: usize, end: usize) -> (usize, usize) {
        let (start, end) = ordered(start, end);
        if self.strategy == ResizeStrategy::NoAction {
            return (start, end);
        }
        let len = match self.collection.as_ref().and_then(Collection::known_len) {
            Some(len) => len,
            None => return (start, end),
        };
        if len == 0 {
            return match self.strategy {
                ResizeStrategy::Shift => (0, end - start),
                _ => (0, 0),
            };
        }
        let last = len - 1;
        if end <= last {
            return (start, end);
        }
        match self.strategy {
            ResizeStrategy::NoAction => (start, end),
            ResizeStrategy::Shift => shift_back(start, end, last),
            ResizeStrategy::Shrink => (start.min(last), last),
            ResizeStrategy::ShiftAndShrinkIfNecessary => {
                let (start, end) = shift_back(start, end, last);
                if end <= last {
                    (start, end)
                } else {
                    (0, last)
                }
            }
        }
    }

    /// Requests a new window. Returns true if the effective window moved.
    pub fn set_window(&mut self, start: usize, end: usize) -> bool {
        let fitted = self.fit(start, end);
        if fitted == (self.start, self.end) {
            return false;
        }
        self.start = fitted.0;
        self.end = fitted.1;
        true
    }

    /// Moves the window by `amount` slots, keeping its size.
    ///
    /// A shift below index 0 pins the window at 0.
    pub fn shift_window(&mut self, amount: isize) -> bool {
        let span = self.end - self.start;
        let start = if amount < 0 {
            self.start.saturating_sub(amount.unsigned_abs())
        } else {
            self.start.saturating_add(amount as usize)
        };
        self.set_window(start, start.saturating_add(span))
    }

    /// Changes the resize strategy and reapplies it. Returns true if the window moved.
    pub fn set_resize_strategy(&mut self, strategy: ResizeStrategy) -> bool {
        self.strategy = strategy;
        self.set_window(self.start, self.end)
    }

    /// Binds a new collection, moving the window back to index 0 with the
    /// same size and reapplying the resize strategy.
    ///
    /// Returns true if the window indices changed.
    pub fn set_collection(&mut self, collection: Collection<T>) -> bool {
        let span = self.end - self.start;
        self.collection = Some(collection);
        log::debug!("sliding window: rebound with {} slots", span.saturating_add(1));
        self.set_window(0, span)
    }

    /// Unbinds the collection, keeping the indices.
    pub fn unbind(&mut self) -> Option<Collection<T>> {
        self.collection.take()
    }

    /// Length of the bound collection, as far as it is known.
    fn source_len(&self) -> Metric<usize> {
        match &self.collection {
            None => Metric::Unbound,
            Some(collection) => collection.known_len().into(),
        }
    }

    /// `end - start + 1`.
    pub fn window_size(&self) -> Metric<usize> {
        self.source_len().map(|_| self.span())
    }

    /// Number of elements before the window.
    pub fn num_element_before(&self) -> Metric<usize> {
        self.source_len().map(|len| self.start.min(len))
    }

    /// Number of elements after the window.
    pub fn num_element_after(&self) -> Metric<usize> {
        self.source_len()
            .map(|len| len.saturating_sub(self.end.saturating_add(1)))
    }

    /// True if the window begins at the first element.
    pub fn reached_start(&self) -> Metric<bool> {
        self.source_len().map(|_| self.start == 0)
    }

    /// True if no element exists past the window.
    pub fn reached_end(&self) -> Metric<bool> {
        self.source_len()
            .map(|len| self.end.saturating_add(1) >= len)
    }

    /// True if no element of the collection falls inside the window.
    pub fn is_window_empty(&self) -> Metric<bool> {
        self.source_len().map(|len| self.start >= len)
    }

    /// True if every slot of the window holds an element.
    pub fn is_window_full(&self) -> Metric<bool> {
        self.source_len().map(|len| self.end < len)
    }
}

impl<T: Clone + 'static> SlidingWindow<T> {
    /// Creates a window bound to `collection`, applying the strategy immediately.
    pub fn bound(collection: Collection<T>, start: usize, end: usize, strategy: ResizeStrategy) -> Self {
        let mut window = Self::new(start, end, strategy);
        window.collection = Some(collection);
        window.set_window(start, end);
        window
    }

    /// Returns the element at `window_index` positions from the window start.
    pub fn get(&self, window_index: usize) -> Option<T> {
        if window_index >= self.span() {
            return None;
        }
        self.collection.as_ref()?.get(self.start + window_index)
    }

    /// Returns the number of elements in the window if it is known.
    pub fn known_len(&self) -> Option<usize> {
        let len = self.collection.as_ref()?.known_len()?;
        Some(len.min(self.end.saturating_add(1)).saturating_sub(self.start))
    }

    /// Returns an iterator over the elements in the window.
    pub fn iter(&self) -> SeqIter<T> {
        match &self.collection {
            Some(collection) => collection.slice(self.start, self.end.saturating_add(1)),
            None => Box::new(core::iter::empty()),
        }
    }
}

impl<T: Clone + 'static> Sequence<T> for SlidingWindow<T> {
    fn get(&self, index: usize) -> Option<T> {
        SlidingWindow::get(self, index)
    }

    fn known_len(&self) -> Option<usize> {
        SlidingWindow::known_len(self)
    }

    fn len(&self) -> usize {
        match SlidingWindow::known_len(self) {
            Some(len) => len,
            None => self.iter().count(),
        }
    }

    fn iter(&self) -> SeqIter<T> {
        SlidingWindow::iter(self)
    }

    fn slice(&self, start: usize, end: usize) -> SeqIter<T> {
        let end = end.min(self.span());
        match &self.collection {
            Some(collection) if start < end => {
                collection.slice(self.start + start, self.start.saturating_add(end))
            }
            _ => Box::new(core::iter::empty()),
        }
    }
}

#[inline]
fn ordered(start: usize, end: usize) -> (usize, usize) {
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Slides `[start, end]` back so that it ends at `last`, stopping at index 0.
#[inline]
fn shift_back(start: usize, end: usize, last: usize) -> (usize, usize) {
    let overflow = end - last;
    if overflow <= start {
        (start - overflow, last)
    } else {
        (0, end - start)
    }
}

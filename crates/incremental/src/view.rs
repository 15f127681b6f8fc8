//! The value passed between view functions.
//!
//! A [`View`] is either a [`Collection`] or a snapshot of a
//! [`SlidingWindow`]. Both are cheap handles: cloning a view never copies
//! elements, and [`View::ptr_eq`] tells whether two handles refer to the
//! same underlying output.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;
use vistas_collection::{Collection, SeqIter, Sequence, SlidingWindow};

/// The output of a view function, and the input of the next one.
pub enum View<T> {
    /// A lazily materializing collection.
    Collection(Collection<T>),
    /// A window over a collection.
    Window(Rc<SlidingWindow<T>>),
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        match self {
            View::Collection(collection) => View::Collection(collection.clone()),
            View::Window(window) => View::Window(Rc::clone(window)),
        }
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Collection(collection) => f.debug_tuple("Collection").field(collection).finish(),
            View::Window(window) => f.debug_tuple("Window").field(window).finish(),
        }
    }
}

impl<T> View<T> {
    /// Returns true if both views are the same handle.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (View::Collection(a), View::Collection(b)) => a.ptr_eq(b),
            (View::Window(a), View::Window(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    #[inline]
    pub fn as_collection(&self) -> Option<&Collection<T>> {
        match self {
            View::Collection(collection) => Some(collection),
            View::Window(_) => None,
        }
    }

    #[inline]
    pub fn as_window(&self) -> Option<&SlidingWindow<T>> {
        match self {
            View::Collection(_) => None,
            View::Window(window) => Some(window),
        }
    }
}

impl<T: Clone + 'static> View<T> {
    /// Converts the view into a collection.
    ///
    /// A window becomes a new lazy collection over its elements; a
    /// collection is returned as-is.
    pub fn into_collection(self) -> Collection<T> {
        match self {
            View::Collection(collection) => collection,
            View::Window(window) => Collection::lazy(window.iter()),
        }
    }

    pub fn get(&self, index: usize) -> Option<T> {
        match self {
            View::Collection(collection) => collection.get(index),
            View::Window(window) => window.get(index),
        }
    }

    pub fn known_len(&self) -> Option<usize> {
        match self {
            View::Collection(collection) => collection.known_len(),
            View::Window(window) => window.known_len(),
        }
    }

    /// Returns the length, materializing as far as needed.
    pub fn len(&self) -> usize {
        match self {
            View::Collection(collection) => collection.len(),
            View::Window(window) => Sequence::len(&**window),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            View::Collection(collection) => collection.is_empty(),
            View::Window(window) => Sequence::is_empty(&**window),
        }
    }

    pub fn iter(&self) -> SeqIter<T> {
        match self {
            View::Collection(collection) => collection.iter(),
            View::Window(window) => window.iter(),
        }
    }

    pub fn slice(&self, start: usize, end: usize) -> SeqIter<T> {
        match self {
            View::Collection(collection) => collection.slice(start, end),
            View::Window(window) => Sequence::slice(&**window, start, end),
        }
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

impl<T> From<Collection<T>> for View<T> {
    fn from(collection: Collection<T>) -> Self {
        View::Collection(collection)
    }
}

impl<T> From<SlidingWindow<T>> for View<T> {
    fn from(window: SlidingWindow<T>) -> Self {
        View::Window(Rc::new(window))
    }
}

impl<T: Clone + 'static> From<Vec<T>> for View<T> {
    fn from(items: Vec<T>) -> Self {
        View::Collection(Collection::from_vec(items))
    }
}

impl<T: Clone + 'static> FromIterator<T> for View<T> {
    /// Collects eagerly into a fully materialized collection.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        View::Collection(iter.into_iter().collect())
    }
}

impl<T: Clone + 'static> Sequence<T> for View<T> {
    fn get(&self, index: usize) -> Option<T> {
        View::get(self, index)
    }

    fn known_len(&self) -> Option<usize> {
        View::known_len(self)
    }

    fn len(&self) -> usize {
        View::len(self)
    }

    fn is_empty(&self) -> bool {
        View::is_empty(self)
    }

    fn iter(&self) -> SeqIter<T> {
        View::iter(self)
    }

    fn slice(&self, start: usize, end: usize) -> SeqIter<T> {
        View::slice(self, start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use vistas_collection::ResizeStrategy;

    #[test]
    fn test_ptr_eq_clone() {
        let view: View<i32> = View::from(vec![1, 2, 3]);
        let other: View<i32> = View::from(vec![1, 2, 3]);

        assert!(view.ptr_eq(&view.clone()));
        assert!(!view.ptr_eq(&other));
    }

    #[test]
    fn test_window_view_reads_window() {
        let coll = Collection::from_vec((0..10).collect::<Vec<i32>>());
        let view = View::from(SlidingWindow::bound(coll, 2, 4, ResizeStrategy::NoAction));

        assert_eq!(view.to_vec(), vec![2, 3, 4]);
        assert_eq!(view.get(0), Some(2));
        assert_eq!(view.get(3), None);
        assert_eq!(view.len(), 3);
        assert!(view.as_window().is_some());
        assert!(view.as_collection().is_none());
    }

    #[test]
    fn test_window_and_collection_never_equal() {
        let coll = Collection::from_vec(vec![1, 2]);
        let a = View::Collection(coll.clone());
        let b = View::from(SlidingWindow::bound(coll, 0, 1, ResizeStrategy::NoAction));
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn test_into_collection() {
        let coll = Collection::from_vec(vec![5, 6, 7, 8]);
        let view = View::Collection(coll.clone());
        assert!(view.into_collection().ptr_eq(&coll));

        let window = View::from(SlidingWindow::bound(coll, 1, 2, ResizeStrategy::NoAction));
        assert_eq!(window.into_collection().to_vec(), vec![6, 7]);
    }

    #[test]
    fn test_from_iter() {
        let view: View<u8> = (1..=3).collect();
        assert_eq!(view.known_len(), Some(3));
        assert_eq!(view.slice(1, 5).collect::<Vec<_>>(), vec![2, 3]);
    }
}

//! The read interface shared by everything a view can hand to a consumer.

use alloc::boxed::Box;
use alloc::vec::Vec;

/// An owned, type-erased iterator over sequence elements.
pub type SeqIter<T> = Box<dyn Iterator<Item = T>>;

/// Indexable, sliceable and iterable access to an ordered sequence.
///
/// Implementations may materialize lazily, so even `&self` methods can pull
/// from an underlying source. Iterators are owned so that they can feed the
/// next lazy stage of a pipeline.
pub trait Sequence<T> {
    /// Returns the element at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<T>;

    /// Returns the length if it is known without touching the source.
    fn known_len(&self) -> Option<usize>;

    /// Returns the length, walking the source to the end if necessary.
    fn len(&self) -> usize;

    /// Returns true if the sequence has no elements.
    fn is_empty(&self) -> bool {
        match self.known_len() {
            Some(len) => len == 0,
            None => self.get(0).is_none(),
        }
    }

    /// Returns an iterator over all elements.
    fn iter(&self) -> SeqIter<T>;

    /// Returns an iterator over the elements in `start..end`.
    fn slice(&self, start: usize, end: usize) -> SeqIter<T>;

    /// Collects all elements into a Vec.
    fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

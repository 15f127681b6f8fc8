//! Indexable wrapper around a one-pass source sequence.
//!
//! A `Collection` hands out random access over an iterator without forcing
//! the whole iterator up front. Two strategies are supported:
//!
//! - `Lazy`: elements are memoized in source order the first time they are
//!   reached. The source is pulled at most once per element.
//! - `Prohibit`: nothing is cached. Every access walks a fresh iterator from
//!   the start, so the source must be repeatable. Only the length is kept,
//!   as a hint, once a walk reaches the end.
//!
//! # Preconditions
//!
//! - A `Prohibit` factory must yield the same sequence on every call.
//!   Violating this is not detected and produces unspecified results.
//! - An unbounded source combined with `len()`/`to_vec()` never returns.
//! - Reading a collection from inside its own source iterator panics.

use crate::sequence::{SeqIter, Sequence};
use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

/// An owned one-pass source iterator.
pub type SourceIter<T> = Box<dyn Iterator<Item = T>>;

/// A repeatable source: each call yields a fresh walk of the same sequence.
pub type SourceFactory<T> = Rc<dyn Fn() -> SourceIter<T>>;

/// How a collection keeps the elements it has already read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MaterializationStrategy {
    /// Cache every element reached, in source order.
    #[default]
    Lazy,
    /// Never cache; re-walk the source on every access.
    Prohibit,
}

/// The resumable position inside the source of a lazy collection.
enum Cursor<T> {
    /// The source has not been opened yet.
    Unstarted(SourceFactory<T>),
    /// The source is open and positioned after the last materialized element.
    Running(SourceIter<T>),
    /// The source returned `None`.
    Exhausted,
}

impl<T> Cursor<T> {
    /// Advances the source by one element.
    fn step(&mut self) -> Option<T> {
        if let Cursor::Unstarted(factory) = self {
            let iter = factory();
            *self = Cursor::Running(iter);
        }
        let next = match self {
            Cursor::Running(iter) => iter.next(),
            _ => None,
        };
        if next.is_none() {
            *self = Cursor::Exhausted;
        }
        next
    }

    #[inline]
    fn is_exhausted(&self) -> bool {
        matches!(self, Cursor::Exhausted)
    }
}

enum Store<T> {
    Lazy {
        items: Vec<T>,
        cursor: Cursor<T>,
    },
    Prohibit {
        factory: SourceFactory<T>,
        length: Option<usize>,
    },
    /// A complete array owned jointly with its producer.
    Shared {
        items: Rc<Vec<T>>,
    },
}

impl<T> Store<T> {
    fn known_len(&self) -> Option<usize> {
        match self {
            Store::Lazy { items, cursor } if cursor.is_exhausted() => Some(items.len()),
            Store::Lazy { .. } => None,
            Store::Prohibit { length, .. } => *length,
            Store::Shared { items } => Some(items.len()),
        }
    }
}

/// Materializes elements until `index` is cached or the source ends.
///
/// Returns true if `index` is materialized afterwards.
fn advance_to<T>(items: &mut Vec<T>, cursor: &mut Cursor<T>, index: usize) -> bool {
    while items.len() <= index {
        match cursor.step() {
            Some(item) => items.push(item),
            None => return false,
        }
    }
    true
}

/// A shared, lazily materializing view over a source sequence.
///
/// Cloning is cheap and yields a handle to the same state; two handles are
/// the same collection exactly when [`Collection::ptr_eq`] holds.
pub struct Collection<T> {
    store: Rc<RefCell<Store<T>>>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Rc::clone(&self.store),
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("strategy", &self.strategy())
            .field("materialized", &self.materialized_len())
            .field("known_len", &self.known_len())
            .finish()
    }
}

impl<T> Collection<T> {
    fn from_store(store: Store<T>) -> Self {
        Self {
            store: Rc::new(RefCell::new(store)),
        }
    }

    /// Creates a fully materialized collection from a vector.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_store(Store::Lazy {
            items,
            cursor: Cursor::Exhausted,
        })
    }

    /// Creates a fully materialized collection over a shared array, without copying it.
    pub fn shared(items: Rc<Vec<T>>) -> Self {
        Self::from_store(Store::Shared { items })
    }

    /// Creates an empty collection.
    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Returns the materialization strategy.
    pub fn strategy(&self) -> MaterializationStrategy {
        match &*self.store.borrow() {
            Store::Lazy { .. } | Store::Shared { .. } => MaterializationStrategy::Lazy,
            Store::Prohibit { .. } => MaterializationStrategy::Prohibit,
        }
    }

    /// Returns the length if the end of the source has been observed.
    #[inline]
    pub fn known_len(&self) -> Option<usize> {
        self.store.borrow().known_len()
    }

    /// Returns the number of cached elements. Always 0 under `Prohibit`.
    #[inline]
    pub fn materialized_len(&self) -> usize {
        match &*self.store.borrow() {
            Store::Lazy { items, .. } => items.len(),
            Store::Shared { items } => items.len(),
            Store::Prohibit { .. } => 0,
        }
    }

    /// Returns true if every element is cached.
    pub fn is_fully_materialized(&self) -> bool {
        match &*self.store.borrow() {
            Store::Lazy { cursor, .. } => cursor.is_exhausted(),
            Store::Shared { .. } => true,
            Store::Prohibit { .. } => false,
        }
    }

    /// Returns true if both handles refer to the same collection.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
    }
}

impl<T: Clone + 'static> Collection<T> {
    /// Wraps a one-pass iterator, memoizing elements on demand.
    pub fn lazy<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self::from_store(Store::Lazy {
            items: Vec::new(),
            cursor: Cursor::Running(Box::new(source.into_iter())),
        })
    }

    /// Wraps a repeatable source without ever caching elements.
    pub fn prohibit(factory: SourceFactory<T>) -> Self {
        Self::from_factory(factory, MaterializationStrategy::Prohibit)
    }

    /// Wraps a repeatable source using the given strategy.
    ///
    /// Under `Lazy` the factory is called at most once, on first access.
    pub fn from_factory(factory: SourceFactory<T>, strategy: MaterializationStrategy) -> Self {
        match strategy {
            MaterializationStrategy::Lazy => Self::from_store(Store::Lazy {
                items: Vec::new(),
                cursor: Cursor::Unstarted(factory),
            }),
            MaterializationStrategy::Prohibit => Self::from_store(Store::Prohibit {
                factory,
                length: None,
            }),
        }
    }

    /// Returns the element at `index`.
    ///
    /// An index at or past a known length returns `None` without touching the
    /// source. Otherwise the source is walked up to `index`.
    pub fn get(&self, index: usize) -> Option<T> {
        let factory = {
            let mut store = self.store.borrow_mut();
            if matches!(store.known_len(), Some(len) if index >= len) {
                return None;
            }
            match &mut *store {
                Store::Lazy { items, cursor } => {
                    if !advance_to(items, cursor, index) {
                        return None;
                    }
                    return items.get(index).cloned();
                }
                Store::Shared { items } => return items.get(index).cloned(),
                Store::Prohibit { factory, .. } => Rc::clone(factory),
            }
        };

        let mut seen = 0;
        for item in factory() {
            if seen == index {
                return Some(item);
            }
            seen += 1;
        }
        self.record_len(seen);
        None
    }

    /// Returns the length, walking the source to its end if necessary.
    pub fn len(&self) -> usize {
        if let Some(len) = self.known_len() {
            return len;
        }
        let factory = {
            let mut store = self.store.borrow_mut();
            match &mut *store {
                Store::Lazy { items, cursor } => {
                    let mut index = items.len();
                    while advance_to(items, cursor, index) {
                        index += 1;
                    }
                    return items.len();
                }
                Store::Shared { items } => return items.len(),
                Store::Prohibit { factory, .. } => Rc::clone(factory),
            }
        };
        let len = factory().count();
        self.record_len(len);
        len
    }

    /// Returns true if the collection has no elements.
    pub fn is_empty(&self) -> bool {
        match self.known_len() {
            Some(len) => len == 0,
            None => self.get(0).is_none(),
        }
    }

    /// Returns an iterator over the elements in `start..end`.
    ///
    /// `end` is clamped to the known length. Elements past the materialized
    /// prefix are pulled only as the iterator advances.
    pub fn slice(&self, start: usize, end: usize) -> SeqIter<T> {
        let end = match self.known_len() {
            Some(len) => end.min(len),
            None => end,
        };
        if end <= start {
            return Box::new(core::iter::empty());
        }
        let factory = match &*self.store.borrow() {
            Store::Lazy { .. } | Store::Shared { .. } => None,
            Store::Prohibit { factory, .. } => Some(Rc::clone(factory)),
        };
        match factory {
            None => Box::new(Replay {
                collection: self.clone(),
                next: start,
                end: Some(end),
            }),
            Some(factory) => Box::new(Walk {
                source: factory(),
                collection: self.clone(),
                position: 0,
                start,
                end: Some(end),
            }),
        }
    }

    /// Returns an iterator over all elements.
    ///
    /// Under `Lazy`, the cached prefix is replayed and the shared source is
    /// resumed for the rest, extending the cache as it goes.
    pub fn iter(&self) -> SeqIter<T> {
        let factory = match &*self.store.borrow() {
            Store::Lazy { .. } | Store::Shared { .. } => None,
            Store::Prohibit { factory, .. } => Some(Rc::clone(factory)),
        };
        match factory {
            None => Box::new(Replay {
                collection: self.clone(),
                next: 0,
                end: None,
            }),
            Some(factory) => Box::new(Walk {
                source: factory(),
                collection: self.clone(),
                position: 0,
                start: 0,
                end: None,
            }),
        }
    }

    /// Collects all elements into a Vec.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    fn record_len(&self, len: usize) {
        if let Store::Prohibit { length, .. } = &mut *self.store.borrow_mut() {
            if length.is_none() {
                log::trace!("collection: source length observed as {}", len);
            }
            *length = Some(len);
        }
    }
}

impl<T: Clone + 'static> Default for Collection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone + 'static> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T: Clone + 'static> FromIterator<T> for Collection<T> {
    /// Collects eagerly into a fully materialized collection.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T: Clone + 'static> Sequence<T> for Collection<T> {
    fn get(&self, index: usize) -> Option<T> {
        Collection::get(self, index)
    }

    fn known_len(&self) -> Option<usize> {
        Collection::known_len(self)
    }

    fn len(&self) -> usize {
        Collection::len(self)
    }

    fn is_empty(&self) -> bool {
        Collection::is_empty(self)
    }

    fn iter(&self) -> SeqIter<T> {
        Collection::iter(self)
    }

    fn slice(&self, start: usize, end: usize) -> SeqIter<T> {
        Collection::slice(self, start, end)
    }
}

/// Iterates a lazy collection by index, materializing as it goes.
struct Replay<T> {
    collection: Collection<T>,
    next: usize,
    end: Option<usize>,
}

impl<T: Clone + 'static> Iterator for Replay<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if matches!(self.end, Some(end) if self.next >= end) {
            return None;
        }
        let item = self.collection.get(self.next)?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let upper = match (self.collection.known_len(), self.end) {
            (Some(len), Some(end)) => Some(len.min(end)),
            (Some(len), None) => Some(len),
            (None, end) => end,
        };
        (0, upper.map(|upper| upper.saturating_sub(self.next)))
    }
}

/// A fresh walk of a repeatable source, recording the length when it ends.
struct Walk<T> {
    source: SourceIter<T>,
    collection: Collection<T>,
    position: usize,
    start: usize,
    end: Option<usize>,
}

impl<T: Clone + 'static> Iterator for Walk<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        while self.position < self.start {
            if self.source.next().is_none() {
                self.collection.record_len(self.position);
                self.start = self.position;
                self.end = Some(self.position);
                return None;
            }
            self.position += 1;
        }
        if matches!(self.end, Some(end) if self.position >= end) {
            return None;
        }
        match self.source.next() {
            Some(item) => {
                self.position += 1;
                Some(item)
            }
            None => {
                self.collection.record_len(self.position);
                self.end = Some(self.position);
                None
            }
        }
    }
}

//! Shared closure types for the view pipeline.
//!
//! Closures are reference counted so that identity can be checked with
//! [`same_fn`]: re-registering the very same closure is a no-op, while a new
//! closure with identical behaviour still counts as a change.

use alloc::rc::Rc;
use core::cmp::Ordering;

/// A comparator over elements. Must be a valid total order.
pub type Comparator<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// A predicate over elements.
pub type Predicate<T> = Rc<dyn Fn(&T) -> bool>;

/// An element-wise transformation.
pub type Mapper<T> = Rc<dyn Fn(T) -> T>;

/// Returns true if both handles point to the same closure.
///
/// Only the data pointer is compared; vtable pointers of the same closure
/// may differ across codegen units.
#[inline]
pub fn same_fn<F: ?Sized>(a: &Rc<F>, b: &Rc<F>) -> bool {
    core::ptr::eq(Rc::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
}

/// Sort order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Ascending order (smallest first)
    #[default]
    Asc,
    /// Descending order (largest first)
    Desc,
}

impl Order {
    /// Applies this order to a comparison result.
    #[inline]
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            Order::Asc => ord,
            Order::Desc => ord.reverse(),
        }
    }
}

/// Builds a comparator from the natural order of `T`.
pub fn natural<T: Ord + 'static>(order: Order) -> Comparator<T> {
    Rc::new(move |a: &T, b: &T| order.apply(a.cmp(b)))
}

/// Builds a comparator ordering elements by an extracted key.
pub fn by_key<T, K, F>(order: Order, key: F) -> Comparator<T>
where
    T: 'static,
    K: Ord,
    F: Fn(&T) -> K + 'static,
{
    Rc::new(move |a: &T, b: &T| order.apply(key(a).cmp(&key(b))))
}

/// Wraps a closure as a predicate.
pub fn predicate<T, F>(f: F) -> Predicate<T>
where
    F: Fn(&T) -> bool + 'static,
{
    Rc::new(f)
}

/// Wraps a closure as a mapper.
pub fn mapper<T, F>(f: F) -> Mapper<T>
where
    F: Fn(T) -> T + 'static,
{
    Rc::new(f)
}

//! Ordered chain of view functions.
//!
//! An [`Aggregate`] pipes its source through a [`ChildList`] in order. The
//! list is the only way to change the chain, and every mutation keeps the
//! dirty-flag wiring and the capability dispatch table in step with it.

use crate::function::{ViewFunction, ViewFunctionRef, ViewState};
use crate::operation::Operation;
use crate::view::View;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::ops::Range;
use hashbrown::HashMap;
use vistas_core::{same_fn, Error, Result};
use vistas_reactive::{DirtyFlag, SubscriptionId};

struct ChildEntry<T> {
    function: ViewFunctionRef<T>,
    subscription: SubscriptionId,
}

/// The children of an [`Aggregate`].
///
/// A view function may appear at most once. Insertions that would alias an
/// existing child, or repeat one within the batch, fail with
/// `Error::AliasedViewFunction` and leave the list untouched.
pub struct ChildList<T> {
    entries: Vec<ChildEntry<T>>,
    owner: Rc<DirtyFlag>,
    dispatch: HashMap<&'static str, usize>,
}

impl<T> ChildList<T> {
    fn new(owner: Rc<DirtyFlag>) -> Self {
        Self {
            entries: Vec::new(),
            owner,
            dispatch: HashMap::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ViewFunctionRef<T>> {
        self.entries.get(index).map(|entry| &entry.function)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ViewFunctionRef<T>> {
        self.entries.iter().map(|entry| &entry.function)
    }

    /// Returns the index of `function` in the list.
    pub fn position(&self, function: &ViewFunctionRef<T>) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| same_fn(&entry.function, function))
    }

    #[inline]
    pub fn contains(&self, function: &ViewFunctionRef<T>) -> bool {
        self.position(function).is_some()
    }

    /// Adds view functions at the end.
    pub fn append<I>(&mut self, functions: I) -> Result<bool>
    where
        I: IntoIterator<Item = ViewFunctionRef<T>>,
    {
        self.insert(self.entries.len(), functions)
    }

    /// Adds view functions at the front.
    pub fn prepend<I>(&mut self, functions: I) -> Result<bool>
    where
        I: IntoIterator<Item = ViewFunctionRef<T>>,
    {
        self.insert(0, functions)
    }

    /// Inserts view functions before `index`.
    ///
    /// Returns false if `functions` is empty.
    pub fn insert<I>(&mut self, index: usize, functions: I) -> Result<bool>
    where
        I: IntoIterator<Item = ViewFunctionRef<T>>,
    {
        if index > self.entries.len() {
            return Err(Error::index_out_of_bounds(index, self.entries.len()));
        }
        let batch: Vec<ViewFunctionRef<T>> = functions.into_iter().collect();
        for (offset, function) in batch.iter().enumerate() {
            if let Some(existing) = self.position(function) {
                return Err(Error::aliased_view_function(existing));
            }
            if batch[..offset].iter().any(|other| same_fn(other, function)) {
                return Err(Error::aliased_view_function(index + offset));
            }
        }
        if batch.is_empty() {
            return Ok(false);
        }

        log::debug!("child list: inserting {} at {}", batch.len(), index);
        let added: Vec<ChildEntry<T>> = batch
            .into_iter()
            .map(|function| {
                let subscription = function.borrow().state().dirty().forward_to(&self.owner);
                ChildEntry {
                    function,
                    subscription,
                }
            })
            .collect();
        self.entries.splice(index..index, added);
        self.changed();
        Ok(true)
    }

    /// Removes and returns the view functions in `range`.
    pub fn remove(&mut self, range: Range<usize>) -> Result<Vec<ViewFunctionRef<T>>> {
        let len = self.entries.len();
        if range.end > len {
            return Err(Error::index_out_of_bounds(range.end, len));
        }
        if range.start > range.end {
            return Err(Error::index_out_of_bounds(range.start, range.end));
        }
        if range.is_empty() {
            return Ok(Vec::new());
        }

        log::debug!("child list: removing {:?}", range);
        let removed: Vec<ViewFunctionRef<T>> = self
            .entries
            .drain(range)
            .map(|entry| {
                entry.function.borrow().unsubscribe(entry.subscription);
                entry.function
            })
            .collect();
        self.changed();
        Ok(removed)
    }

    /// Removes and returns the last view function.
    pub fn pop(&mut self) -> Option<ViewFunctionRef<T>> {
        let len = self.entries.len();
        let start = len.checked_sub(1)?;
        self.remove(start..len).ok()?.pop()
    }

    /// Removes every view function. Returns false if the list was empty.
    pub fn clear(&mut self) -> bool {
        match self.remove(0..self.entries.len()) {
            Ok(removed) => !removed.is_empty(),
            Err(_) => false,
        }
    }

    /// Capabilities of all children, each listed once, in list order.
    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for entry in &self.entries {
            for name in entry.function.borrow().capabilities() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Index of the first child accepting `name`.
    #[inline]
    pub fn handler(&self, name: &str) -> Option<usize> {
        self.dispatch.get(name).copied()
    }

    /// Index of the first child accepting `name`.
    ///
    /// A nested chain can gain or lose capabilities without this list
    /// changing, so the cached route is checked against the children's
    /// current capabilities and the table is rebuilt when it no longer holds.
    pub fn route(&mut self, name: &str) -> Option<usize> {
        if let Some(index) = self.handler(name) {
            if self.first_declaring(name, index + 1) == Some(index) {
                return Some(index);
            }
        }
        log::debug!("child list: rebuilding dispatch for {}", name);
        self.rebuild_dispatch();
        self.handler(name)
    }

    fn first_declaring(&self, name: &str, limit: usize) -> Option<usize> {
        self.entries.iter().take(limit).position(|entry| {
            entry
                .function
                .borrow()
                .capabilities()
                .iter()
                .any(|declared| *declared == name)
        })
    }

    /// Recomputes the dispatch table from the children's capabilities.
    pub fn rebuild_dispatch(&mut self) {
        self.dispatch.clear();
        for (index, entry) in self.entries.iter().enumerate() {
            for name in entry.function.borrow().capabilities() {
                self.dispatch.entry(name).or_insert(index);
            }
        }
    }

    fn changed(&mut self) {
        self.rebuild_dispatch();
        self.owner.mark();
    }
}

impl<T> Drop for ChildList<T> {
    fn drop(&mut self) {
        for entry in &self.entries {
            if let Ok(function) = entry.function.try_borrow() {
                function.unsubscribe(entry.subscription);
            }
        }
    }
}

/// A view function made of other view functions, applied in order.
///
/// With no children the output is the source itself.
pub struct Aggregate<T> {
    state: ViewState<T>,
    children: ChildList<T>,
}

impl<T> Default for Aggregate<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Aggregate<T> {
    pub fn new() -> Self {
        let state = ViewState::new();
        let children = ChildList::new(Rc::clone(state.dirty()));
        Self { state, children }
    }

    /// Creates a chain from `functions`.
    pub fn with_children<I>(functions: I) -> Result<Self>
    where
        I: IntoIterator<Item = ViewFunctionRef<T>>,
    {
        let mut aggregate = Self::new();
        aggregate.children.append(functions)?;
        Ok(aggregate)
    }

    #[inline]
    pub fn children(&self) -> &ChildList<T> {
        &self.children
    }

    #[inline]
    pub fn children_mut(&mut self) -> &mut ChildList<T> {
        &mut self.children
    }
}

impl<T: Clone + 'static> ViewFunction<T> for Aggregate<T> {
    fn state(&self) -> &ViewState<T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<T> {
        &mut self.state
    }

    fn is_dirty(&self) -> bool {
        self.state.dirty().is_set() || self.children.iter().any(|child| child.borrow().is_dirty())
    }

    fn regenerate(&mut self, source: &View<T>, use_cache: bool) -> View<T> {
        log::trace!("aggregate: piping through {} children", self.children.len());
        let mut current = source.clone();
        for child in self.children.iter() {
            current = child.borrow_mut().view(&current, use_cache);
        }
        current
    }

    fn capabilities(&self) -> Vec<&'static str> {
        self.children.capabilities()
    }

    fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        let name = operation.name();
        let index = self
            .children
            .route(name)
            .ok_or_else(|| Error::unsupported_operation(name))?;
        let child = match self.children.get(index) {
            Some(child) => Rc::clone(child),
            None => return Err(Error::index_out_of_bounds(index, self.children.len())),
        };

        let result = child.borrow_mut().apply(operation);
        if let Err(err) = &result {
            log::warn!("aggregate: child {} rejected {}: {}", index, name, err);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::{Filter, Partial, Sort, Transform};
    use alloc::boxed::Box;
    use alloc::vec;
    use core::cell::{Cell, RefCell};
    use vistas_collection::ResizeStrategy;
    use vistas_core::{mapper, natural, predicate, Order};
    use vistas_reactive::RegenerationNeeded;

    fn shared<F: ViewFunction<i32> + 'static>(function: F) -> (Rc<RefCell<F>>, ViewFunctionRef<i32>) {
        let typed = Rc::new(RefCell::new(function));
        let erased: ViewFunctionRef<i32> = typed.clone();
        (typed, erased)
    }

    fn numbers() -> View<i32> {
        View::from(vec![1, 2, 3, 4, 5])
    }

    #[test]
    fn test_empty_chain_aliases_source() {
        let mut aggregate: Aggregate<i32> = Aggregate::new();
        let source = numbers();
        assert!(aggregate.view(&source, true).ptr_eq(&source));
    }

    #[test]
    fn test_fresh_functions_start_dirty() {
        assert!(Filter::<i32>::new().is_dirty());
        assert!(Sort::<i32>::new().is_dirty());
        assert!(Partial::<i32>::default().is_dirty());
        assert!(Transform::<i32>::new().is_dirty());

        let (filter, erased) = shared(Filter::new());
        let aggregate = Aggregate::with_children(vec![erased]).unwrap();
        assert!(aggregate.is_dirty());

        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        aggregate.subscribe(Box::new(move |_: &RegenerationNeeded| fired_clone.set(fired_clone.get() + 1)));
        filter.borrow_mut().add_filter_function("odd", predicate(|n: &i32| n % 2 == 1));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_pipes_in_order() {
        let (_, filter) = shared(Filter::new());
        let (_, sort) = shared(Sort::new());
        filter.borrow_mut().apply(Operation::add_filter_function("odd", predicate(|n: &i32| n % 2 == 1))).unwrap();
        sort.borrow_mut().apply(Operation::add_sorting_function("n", natural(Order::Desc), 1)).unwrap();

        let mut aggregate = Aggregate::with_children(vec![filter, sort]).unwrap();
        assert_eq!(aggregate.view(&numbers(), true).to_vec(), vec![5, 3, 1]);
    }

    #[test]
    fn test_memoized_until_child_changes() {
        let (filter, erased) = shared(Filter::new());
        let mut aggregate = Aggregate::with_children(vec![erased]).unwrap();
        let source = numbers();

        let first = aggregate.view(&source, true);
        assert!(!aggregate.is_dirty());
        assert!(first.ptr_eq(&aggregate.view(&source, true)));

        filter.borrow_mut().add_filter_function("big", predicate(|n: &i32| *n > 3));
        assert!(aggregate.is_dirty());
        let second = aggregate.view(&source, true);
        assert!(!first.ptr_eq(&second));
        assert_eq!(second.to_vec(), vec![4, 5]);
    }

    #[test]
    fn test_child_change_notifies_once() {
        let (filter, erased) = shared(Filter::new());
        let mut aggregate = Aggregate::with_children(vec![erased]).unwrap();
        aggregate.view(&numbers(), true);

        let fired = Rc::new(Cell::new(0));
        let fired_clone = fired.clone();
        aggregate.subscribe(Box::new(move |_: &RegenerationNeeded| fired_clone.set(fired_clone.get() + 1)));

        filter.borrow_mut().add_filter_function("a", predicate(|n: &i32| *n > 1));
        filter.borrow_mut().add_filter_function("b", predicate(|n: &i32| *n > 2));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_nested_propagation() {
        let (partial, erased) = shared(Partial::new(0, 1, ResizeStrategy::NoAction));
        let (_, inner) = shared(Aggregate::with_children(vec![erased]).unwrap());
        let mut outer = Aggregate::with_children(vec![inner]).unwrap();
        let source = numbers();

        assert_eq!(outer.view(&source, true).to_vec(), vec![1, 2]);
        assert!(!outer.is_dirty());

        assert!(partial.borrow_mut().shift_window(2));
        assert!(outer.state().dirty().is_set());
        assert_eq!(outer.view(&source, true).to_vec(), vec![3, 4]);
    }

    #[test]
    fn test_aliasing_rejected() {
        let (_, filter) = shared(Filter::new());
        let (_, sort) = shared(Sort::new());
        let mut aggregate = Aggregate::with_children(vec![filter.clone()]).unwrap();

        let err = aggregate.children_mut().append(vec![sort.clone(), filter.clone()]);
        assert_eq!(err, Err(Error::aliased_view_function(0)));
        assert_eq!(aggregate.children().len(), 1);

        let err = aggregate.children_mut().prepend(vec![sort.clone(), sort.clone()]);
        assert_eq!(err, Err(Error::aliased_view_function(1)));
        assert_eq!(aggregate.children().len(), 1);
        assert!(!aggregate.children().contains(&sort));
    }

    #[test]
    fn test_index_errors() {
        let (_, filter) = shared(Filter::new());
        let mut aggregate: Aggregate<i32> = Aggregate::new();

        assert_eq!(
            aggregate.children_mut().insert(1, vec![filter]),
            Err(Error::index_out_of_bounds(1, 0))
        );
        assert!(aggregate.children_mut().remove(0..1).is_err());
        assert_eq!(aggregate.children_mut().pop().map(|_| ()), None);
        assert!(!aggregate.children_mut().clear());
    }

    #[test]
    fn test_mutations_mark_dirty() {
        let (_, filter) = shared(Filter::new());
        let (_, sort) = shared(Sort::new());
        let mut aggregate: Aggregate<i32> = Aggregate::new();
        let source = numbers();
        aggregate.view(&source, true);

        assert_eq!(aggregate.children_mut().append(vec![filter.clone()]), Ok(true));
        assert!(aggregate.is_dirty());
        aggregate.view(&source, true);

        assert_eq!(aggregate.children_mut().append(Vec::new()), Ok(false));
        assert!(!aggregate.is_dirty());

        assert_eq!(aggregate.children_mut().insert(0, vec![sort.clone()]), Ok(true));
        assert_eq!(aggregate.children().position(&sort), Some(0));
        assert_eq!(aggregate.children().position(&filter), Some(1));
    }

    #[test]
    fn test_removed_child_is_unwired() {
        let (filter, erased) = shared(Filter::new());
        let mut aggregate = Aggregate::with_children(vec![erased]).unwrap();
        let source = numbers();

        let removed = aggregate.children_mut().remove(0..1).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(filter.borrow().state().dirty().subscriber_count(), 0);

        aggregate.view(&source, true);
        filter.borrow_mut().add_filter_function("odd", predicate(|n: &i32| n % 2 == 1));
        assert!(!aggregate.is_dirty());
    }

    #[test]
    fn test_pop_and_clear() {
        let (_, filter) = shared(Filter::new());
        let (_, sort) = shared(Sort::new());
        let mut aggregate = Aggregate::with_children(vec![filter.clone(), sort.clone()]).unwrap();

        let popped = aggregate.children_mut().pop().unwrap();
        assert!(same_fn(&popped, &sort));
        assert!(aggregate.children_mut().clear());
        assert!(aggregate.children().is_empty());
    }

    #[test]
    fn test_dispatch_to_first_capable_child() {
        let (first, a) = shared(Transform::new());
        let (second, b) = shared(Transform::new());
        let mut aggregate = Aggregate::with_children(vec![a, b]).unwrap();

        let op = Operation::SetTransformation { mapper: Some(mapper(|n: i32| n * 2)) };
        assert_eq!(aggregate.apply(op), Ok(true));
        assert!(first.borrow().transformation().is_some());
        assert!(second.borrow().transformation().is_none());
        assert_eq!(aggregate.view(&numbers(), true).to_vec(), vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_dispatch_through_nested_chain() {
        let (partial, erased) = shared(Partial::new(0, 0, ResizeStrategy::NoAction));
        let (_, filter) = shared(Filter::new());
        let (_, inner) = shared(Aggregate::with_children(vec![erased]).unwrap());
        let mut outer = Aggregate::with_children(vec![filter, inner]).unwrap();

        let caps = outer.capabilities();
        assert!(caps.contains(&"addFilterFunction"));
        assert!(caps.contains(&"shiftWindow"));

        assert_eq!(outer.apply(Operation::SetWindow { start: 1, end: 2 }), Ok(true));
        assert_eq!(partial.borrow().window(), (1, 2));
        assert_eq!(outer.view(&numbers(), true).to_vec(), vec![2, 3]);
    }

    #[test]
    fn test_dispatch_follows_nested_capability_loss() {
        let (inner_filter, erased) = shared(Filter::new());
        let (inner, inner_erased) = shared(Aggregate::with_children(vec![erased]).unwrap());
        let (fallback, fallback_erased) = shared(Filter::new());
        let mut outer = Aggregate::with_children(vec![inner_erased, fallback_erased]).unwrap();
        assert_eq!(outer.children().handler("addFilterFunction"), Some(0));

        assert!(inner.borrow_mut().children_mut().clear());
        let op = Operation::add_filter_function("k", predicate(|n: &i32| *n > 2));
        assert_eq!(outer.apply(op), Ok(true));
        assert!(fallback.borrow().has_filter_function("k"));
        assert!(!inner_filter.borrow().has_filter_function("k"));
        assert_eq!(outer.children().handler("addFilterFunction"), Some(1));
    }

    #[test]
    fn test_dispatch_follows_nested_capability_gain() {
        let (inner, inner_erased) = shared(Aggregate::<i32>::new());
        let (fallback, fallback_erased) = shared(Filter::new());
        let mut outer = Aggregate::with_children(vec![inner_erased, fallback_erased]).unwrap();
        assert_eq!(outer.children().handler("addFilterFunction"), Some(1));

        let (nested, erased) = shared(Filter::new());
        assert_eq!(inner.borrow_mut().children_mut().append(vec![erased]), Ok(true));
        let op = Operation::add_filter_function("k", predicate(|n: &i32| *n > 2));
        assert_eq!(outer.apply(op), Ok(true));
        assert!(nested.borrow().has_filter_function("k"));
        assert!(!fallback.borrow().has_filter_function("k"));
    }

    #[test]
    fn test_unsupported_operation() {
        let (_, filter) = shared(Filter::new());
        let mut aggregate = Aggregate::with_children(vec![filter]).unwrap();
        assert_eq!(
            aggregate.apply(Operation::ShiftWindow { amount: 1 }),
            Err(Error::unsupported_operation("shiftWindow"))
        );
    }
}

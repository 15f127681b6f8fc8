//! Prioritized multi-key sort.

use crate::function::{ViewFunction, ViewState};
use crate::operation::{capability, Operation};
use crate::view::View;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;
use hashbrown::HashMap;
use vistas_collection::{Collection, SortedViewHeap};
use vistas_core::{same_fn, Comparator, Error, Result};

struct SortEntry<T> {
    comparator: Comparator<T>,
    priority: i32,
}

/// Sorts by a set of keyed comparators.
///
/// The comparator with the highest priority decides first; ties fall
/// through to the next one. Equal priorities are ordered by key. The
/// composite comparator is rebuilt only when the set changes, so its
/// identity is stable across regenerations and an unchanged heap is never
/// resorted.
pub struct Sort<T> {
    state: ViewState<T>,
    entries: HashMap<String, SortEntry<T>>,
    combined: Option<Comparator<T>>,
    heap: Option<SortedViewHeap<T>>,
}

impl<T> Default for Sort<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sort<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::new(),
            entries: HashMap::new(),
            combined: None,
            heap: None,
        }
    }

    /// Binds `comparator` to `key` with the given priority.
    ///
    /// Returns false if the same comparator is already bound to `key` with
    /// the same priority.
    pub fn add_sorting_function(
        &mut self,
        key: impl Into<String>,
        comparator: Comparator<T>,
        priority: i32,
    ) -> bool
    where
        T: 'static,
    {
        let key = key.into();
        if let Some(entry) = self.entries.get(&key) {
            if same_fn(&entry.comparator, &comparator) && entry.priority == priority {
                return false;
            }
        }
        self.entries.insert(key, SortEntry { comparator, priority });
        self.changed();
        true
    }

    /// Removes the comparator bound to `key`. Returns false if there was none.
    pub fn delete_sorting_function(&mut self, key: &str) -> bool
    where
        T: 'static,
    {
        if self.entries.remove(key).is_none() {
            return false;
        }
        self.changed();
        true
    }

    /// Removes every comparator. Returns false if there were none.
    pub fn clear_sorting_function(&mut self) -> bool
    where
        T: 'static,
    {
        if self.entries.is_empty() {
            return false;
        }
        self.entries.clear();
        self.changed();
        true
    }

    /// Changes the priority of the comparator bound to `key`.
    ///
    /// Returns false if `key` is unknown or already has that priority.
    pub fn reorder_sorting_function(&mut self, key: &str, priority: i32) -> bool
    where
        T: 'static,
    {
        match self.entries.get_mut(key) {
            Some(entry) if entry.priority != priority => entry.priority = priority,
            _ => return false,
        }
        self.changed();
        true
    }

    /// Returns the priority bound to `key`.
    pub fn priority(&self, key: &str) -> Option<i32> {
        self.entries.get(key).map(|entry| entry.priority)
    }

    /// Returns the keys in the order their comparators are consulted.
    pub fn sorting_functions(&self) -> Vec<&str> {
        let mut keys: Vec<(&str, i32)> = self
            .entries
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.priority))
            .collect();
        keys.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        keys.into_iter().map(|(key, _)| key).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The composite comparator, or `None` if no comparator is registered.
    #[inline]
    pub fn comparator(&self) -> Option<&Comparator<T>> {
        self.combined.as_ref()
    }

    fn changed(&mut self)
    where
        T: 'static,
    {
        self.combined = self.compose();
        self.state.mark_dirty();
    }

    fn compose(&self) -> Option<Comparator<T>>
    where
        T: 'static,
    {
        if self.entries.is_empty() {
            return None;
        }
        let mut ordered: Vec<(&String, &SortEntry<T>)> = self.entries.iter().collect();
        ordered.sort_by(|a, b| b.1.priority.cmp(&a.1.priority).then_with(|| a.0.cmp(b.0)));
        let chain: Vec<Comparator<T>> = ordered
            .into_iter()
            .map(|(_, entry)| Rc::clone(&entry.comparator))
            .collect();
        Some(Rc::new(move |a: &T, b: &T| {
            chain
                .iter()
                .map(|compare| compare(a, b))
                .find(|ord| *ord != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        }))
    }
}

impl<T: Clone + 'static> ViewFunction<T> for Sort<T> {
    fn state(&self) -> &ViewState<T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<T> {
        &mut self.state
    }

    fn regenerate(&mut self, source: &View<T>, use_cache: bool) -> View<T> {
        let comparator = match &self.combined {
            Some(comparator) => Rc::clone(comparator),
            None => {
                self.heap = None;
                return source.clone();
            }
        };

        if use_cache && !self.state.source_changed(source) {
            if let Some(heap) = &self.heap {
                log::trace!("sort: reusing heap of {} elements", heap.len());
            }
        } else {
            self.heap = None;
        }
        let heap = self.heap.get_or_insert_with(|| {
            let mut heap = SortedViewHeap::new(Rc::clone(&comparator));
            heap.extend(source.iter());
            heap
        });
        heap.set_comparator(comparator);

        let sorted = match heap.share_sorted() {
            Some(items) => Collection::shared(items),
            None => Collection::lazy(heap.iter()),
        };
        View::Collection(sorted)
    }

    fn capabilities(&self) -> Vec<&'static str> {
        vec![
            capability::ADD_SORTING_FUNCTION,
            capability::DELETE_SORTING_FUNCTION,
            capability::CLEAR_SORTING_FUNCTION,
            capability::REORDER_SORTING_FUNCTION,
        ]
    }

    fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        match operation {
            Operation::AddSortingFunction {
                key,
                comparator,
                priority,
            } => Ok(self.add_sorting_function(key, comparator, priority)),
            Operation::DeleteSortingFunction { key } => Ok(self.delete_sorting_function(&key)),
            Operation::ClearSortingFunction => Ok(self.clear_sorting_function()),
            Operation::ReorderSortingFunction { key, priority } => {
                Ok(self.reorder_sorting_function(&key, priority))
            }
            other => Err(Error::unsupported_operation(other.name())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistas_core::{by_key, natural, Order};

    #[test]
    fn test_no_comparator_aliases_source() {
        let mut sort: Sort<i32> = Sort::new();
        let source: View<i32> = View::from(vec![3, 1, 2]);
        assert!(sort.view(&source, true).ptr_eq(&source));
    }

    #[test]
    fn test_sort_descending() {
        let mut sort: Sort<i32> = Sort::new();
        assert!(sort.add_sorting_function("value", natural(Order::Desc), 1));
        let out = sort.view(&View::from(vec![2, 5, 1, 4, 3]), true);
        assert_eq!(out.to_vec(), vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_tie_break_by_priority() {
        let mut sort: Sort<(i32, i32)> = Sort::new();
        sort.add_sorting_function("first", by_key(Order::Asc, |p: &(i32, i32)| p.0), 10);
        sort.add_sorting_function("second", by_key(Order::Desc, |p: &(i32, i32)| p.1), 1);
        let source: View<(i32, i32)> = View::from(vec![(1, 1), (0, 5), (1, 3), (0, 2)]);

        assert_eq!(
            sort.view(&source, true).to_vec(),
            vec![(0, 5), (0, 2), (1, 3), (1, 1)]
        );

        assert!(sort.reorder_sorting_function("second", 20));
        assert_eq!(sort.sorting_functions(), vec!["second", "first"]);
        assert_eq!(
            sort.view(&source, true).to_vec(),
            vec![(0, 5), (1, 3), (0, 2), (1, 1)]
        );
    }

    #[test]
    fn test_equal_priority_ordered_by_key() {
        let mut sort: Sort<(i32, i32)> = Sort::new();
        sort.add_sorting_function("b", by_key(Order::Asc, |p: &(i32, i32)| p.1), 1);
        sort.add_sorting_function("a", by_key(Order::Asc, |p: &(i32, i32)| p.0), 1);
        assert_eq!(sort.sorting_functions(), vec!["a", "b"]);

        let out = sort.view(&View::from(vec![(2, 0), (1, 9), (1, 0)]), true);
        assert_eq!(out.to_vec(), vec![(1, 0), (1, 9), (2, 0)]);
    }

    #[test]
    fn test_reorder_noop() {
        let mut sort: Sort<i32> = Sort::new();
        assert!(!sort.reorder_sorting_function("missing", 1));
        sort.add_sorting_function("value", natural(Order::Asc), 1);
        assert!(!sort.reorder_sorting_function("value", 1));
        assert_eq!(sort.priority("value"), Some(1));
    }

    #[test]
    fn test_comparator_identity_is_stable() {
        let mut sort: Sort<i32> = Sort::new();
        let cmp = natural(Order::Asc);
        sort.add_sorting_function("value", cmp.clone(), 1);
        let first = sort.comparator().cloned();

        assert!(!sort.add_sorting_function("value", cmp, 1));
        let second = sort.comparator().cloned();
        assert!(same_fn(&first.unwrap(), &second.unwrap()));
    }

    #[test]
    fn test_fresh_heap_drains_lazily() {
        let mut sort: Sort<i32> = Sort::new();
        sort.add_sorting_function("value", natural(Order::Asc), 1);
        let out = sort.view(&View::from(vec![3, 1, 2]), true);

        let collection = out.as_collection().unwrap();
        assert_eq!(collection.known_len(), None);
        assert_eq!(out.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_comparator_change_resorts_cached_heap() {
        let mut sort: Sort<i32> = Sort::new();
        let source: View<i32> = View::from(vec![3, 1, 2]);
        sort.add_sorting_function("value", natural(Order::Asc), 1);
        sort.view(&source, true);

        sort.add_sorting_function("value", natural(Order::Desc), 1);
        let out = sort.view(&source, true);

        let collection = out.as_collection().unwrap();
        assert!(collection.is_fully_materialized());
        assert_eq!(out.to_vec(), vec![3, 2, 1]);
    }

    #[test]
    fn test_sorted_output_survives_later_resort() {
        let mut sort: Sort<i32> = Sort::new();
        let source: View<i32> = View::from(vec![3, 1, 2]);
        sort.add_sorting_function("value", natural(Order::Asc), 1);
        sort.view(&source, true);

        sort.add_sorting_function("value", natural(Order::Desc), 1);
        let descending = sort.view(&source, true);
        assert!(sort.invalidate());
        let again = sort.view(&source, true);
        assert_eq!(again.to_vec(), vec![3, 2, 1]);

        sort.add_sorting_function("value", natural(Order::Asc), 1);
        let ascending = sort.view(&source, true);
        assert_eq!(ascending.to_vec(), vec![1, 2, 3]);
        assert_eq!(descending.to_vec(), vec![3, 2, 1]);
        assert_eq!(again.to_vec(), vec![3, 2, 1]);
    }

    #[test]
    fn test_delete_and_clear() {
        let mut sort: Sort<i32> = Sort::new();
        let source: View<i32> = View::from(vec![2, 1]);
        assert!(!sort.delete_sorting_function("value"));
        assert!(!sort.clear_sorting_function());

        sort.add_sorting_function("value", natural(Order::Asc), 1);
        assert_eq!(sort.view(&source, true).to_vec(), vec![1, 2]);

        assert!(sort.delete_sorting_function("value"));
        assert!(sort.comparator().is_none());
        assert!(sort.view(&source, true).ptr_eq(&source));

        sort.add_sorting_function("value", natural(Order::Asc), 1);
        assert!(sort.clear_sorting_function());
        assert!(sort.is_empty());
    }

    #[test]
    fn test_apply() {
        let mut sort: Sort<i32> = Sort::new();
        let op = Operation::add_sorting_function("value", natural(Order::Desc), 1);
        assert_eq!(sort.apply(op), Ok(true));
        assert_eq!(sort.apply(Operation::reorder_sorting_function("value", 5)), Ok(true));
        assert_eq!(sort.priority("value"), Some(5));
        assert_eq!(sort.apply(Operation::delete_sorting_function("value")), Ok(true));
        assert!(sort.apply(Operation::ClearFilterFunction).is_err());
    }
}

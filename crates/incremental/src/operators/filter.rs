//! Keyed predicate filter.

use crate::function::{ViewFunction, ViewState};
use crate::operation::{capability, Operation};
use crate::view::View;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use hashbrown::HashMap;
use vistas_collection::Collection;
use vistas_core::{same_fn, Error, Predicate, Result};

/// Keeps the elements accepted by every registered predicate.
///
/// Adding a predicate under a new key only narrows the output, so the next
/// regeneration may refine the previous output instead of rescanning the
/// source. Replacing or removing a predicate can widen it again, which
/// revokes refinement until the following regeneration.
pub struct Filter<T> {
    state: ViewState<T>,
    predicates: HashMap<String, Predicate<T>>,
    refinement_allowed: bool,
}

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Filter<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::new(),
            predicates: HashMap::new(),
            refinement_allowed: true,
        }
    }

    /// Binds `predicate` to `key`.
    ///
    /// Returns false if the very same predicate is already bound to `key`.
    pub fn add_filter_function(&mut self, key: impl Into<String>, predicate: Predicate<T>) -> bool {
        let key = key.into();
        match self.predicates.get(&key) {
            Some(existing) if same_fn(existing, &predicate) => return false,
            Some(_) => self.refinement_allowed = false,
            None => {}
        }
        self.predicates.insert(key, predicate);
        self.state.mark_dirty();
        true
    }

    /// Removes the predicate bound to `key`. Returns false if there was none.
    pub fn delete_filter_function(&mut self, key: &str) -> bool {
        if self.predicates.remove(key).is_none() {
            return false;
        }
        self.refinement_allowed = false;
        self.state.mark_dirty();
        true
    }

    /// Removes every predicate. Returns false if there were none.
    pub fn clear_filter_function(&mut self) -> bool {
        if self.predicates.is_empty() {
            return false;
        }
        self.predicates.clear();
        self.refinement_allowed = false;
        self.state.mark_dirty();
        true
    }

    #[inline]
    pub fn has_filter_function(&self, key: &str) -> bool {
        self.predicates.contains_key(key)
    }

    /// Returns the registered keys in unspecified order.
    pub fn filter_functions(&self) -> Vec<&str> {
        self.predicates.keys().map(String::as_str).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Returns true if the next regeneration may start from the previous output.
    #[inline]
    pub fn is_refinement_allowed(&self) -> bool {
        self.refinement_allowed
    }
}

impl<T: Clone + 'static> ViewFunction<T> for Filter<T> {
    fn state(&self) -> &ViewState<T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<T> {
        &mut self.state
    }

    fn regenerate(&mut self, source: &View<T>, use_cache: bool) -> View<T> {
        let refine = core::mem::replace(&mut self.refinement_allowed, true);
        if self.predicates.is_empty() {
            return source.clone();
        }

        let previous = match self.state.target() {
            Some(target) if use_cache && refine && !self.state.source_changed(source) => {
                Some(target.clone())
            }
            _ => None,
        };
        let base = match previous {
            Some(target) => {
                log::trace!("filter: refining previous output");
                target
            }
            None => source.clone(),
        };

        let predicates: Vec<Predicate<T>> = self.predicates.values().cloned().collect();
        let filtered = base.iter().filter(move |item| predicates.iter().all(|p| p(item)));
        View::Collection(Collection::lazy(filtered))
    }

    fn capabilities(&self) -> Vec<&'static str> {
        vec![
            capability::ADD_FILTER_FUNCTION,
            capability::DELETE_FILTER_FUNCTION,
            capability::CLEAR_FILTER_FUNCTION,
        ]
    }

    fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        match operation {
            Operation::AddFilterFunction { key, predicate } => Ok(self.add_filter_function(key, predicate)),
            Operation::DeleteFilterFunction { key } => Ok(self.delete_filter_function(&key)),
            Operation::ClearFilterFunction => Ok(self.clear_filter_function()),
            other => Err(Error::unsupported_operation(other.name())),
        }
    }
}

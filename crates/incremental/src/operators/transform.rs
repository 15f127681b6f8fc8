//! Element-wise mapping.

use crate::function::{ViewFunction, ViewState};
use crate::operation::{capability, Operation};
use crate::view::View;
use alloc::vec;
use alloc::vec::Vec;
use vistas_collection::Collection;
use vistas_core::{same_fn, Error, Mapper, Result};

/// Applies a mapper to every element, lazily.
pub struct Transform<T> {
    state: ViewState<T>,
    mapper: Option<Mapper<T>>,
}

impl<T> Default for Transform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Transform<T> {
    /// Creates an identity transform.
    pub fn new() -> Self {
        Self {
            state: ViewState::new(),
            mapper: None,
        }
    }

    pub fn with_mapper(mapper: Mapper<T>) -> Self {
        Self {
            state: ViewState::new(),
            mapper: Some(mapper),
        }
    }

    #[inline]
    pub fn transformation(&self) -> Option<&Mapper<T>> {
        self.mapper.as_ref()
    }

    /// Replaces the mapper; `None` restores the identity.
    ///
    /// Returns false if the same mapper (or no mapper) is already set.
    pub fn set_transformation(&mut self, mapper: Option<Mapper<T>>) -> bool {
        let unchanged = match (&self.mapper, &mapper) {
            (Some(current), Some(new)) => same_fn(current, new),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return false;
        }
        self.mapper = mapper;
        self.state.mark_dirty();
        true
    }
}

impl<T: Clone + 'static> ViewFunction<T> for Transform<T> {
    fn state(&self) -> &ViewState<T> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ViewState<T> {
        &mut self.state
    }

    fn regenerate(&mut self, source: &View<T>, _use_cache: bool) -> View<T> {
        match &self.mapper {
            None => source.clone(),
            Some(mapper) => {
                let mapper = mapper.clone();
                View::Collection(Collection::lazy(source.iter().map(move |item| mapper(item))))
            }
        }
    }

    fn capabilities(&self) -> Vec<&'static str> {
        vec![capability::TRANSFORMATION]
    }

    fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        match operation {
            Operation::SetTransformation { mapper } => Ok(self.set_transformation(mapper)),
            other => Err(Error::unsupported_operation(other.name())),
        }
    }
}

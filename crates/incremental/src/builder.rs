//! Construction of view pipelines.

use crate::function::{RegenerationCallback, ViewFunction, ViewFunctionRef};
use crate::operation::Operation;
use crate::operators::{Aggregate, Filter, Partial, Sort, Transform};
use crate::view::View;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use vistas_collection::ResizeStrategy;
use vistas_core::{Mapper, Result};
use vistas_reactive::SubscriptionId;

/// A typed handle to one stage of a [`Pipeline`].
pub enum Stage<T> {
    Filter(Rc<RefCell<Filter<T>>>),
    Sort(Rc<RefCell<Sort<T>>>),
    Partial(Rc<RefCell<Partial<T>>>),
    Transform(Rc<RefCell<Transform<T>>>),
    Custom(ViewFunctionRef<T>),
}

impl<T: Clone + 'static> Stage<T> {
    /// Returns the stage as a type-erased view function.
    pub fn as_view_function(&self) -> ViewFunctionRef<T> {
        match self {
            Stage::Filter(f) => f.clone(),
            Stage::Sort(f) => f.clone(),
            Stage::Partial(f) => f.clone(),
            Stage::Transform(f) => f.clone(),
            Stage::Custom(f) => f.clone(),
        }
    }
}

/// Builder for [`Pipeline`]s. Stages run in the order they are added.
pub struct PipelineBuilder<T> {
    stages: Vec<Stage<T>>,
}

impl<T> Default for PipelineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PipelineBuilder<T> {
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn filter(mut self) -> Self {
        self.stages.push(Stage::Filter(Rc::new(RefCell::new(Filter::new()))));
        self
    }

    pub fn sort(mut self) -> Self {
        self.stages.push(Stage::Sort(Rc::new(RefCell::new(Sort::new()))));
        self
    }

    pub fn partial(mut self, start: usize, end: usize, strategy: ResizeStrategy) -> Self {
        self.stages
            .push(Stage::Partial(Rc::new(RefCell::new(Partial::new(start, end, strategy)))));
        self
    }

    /// Adds an identity transform.
    pub fn transform(mut self) -> Self {
        self.stages.push(Stage::Transform(Rc::new(RefCell::new(Transform::new()))));
        self
    }

    pub fn transform_with(mut self, mapper: Mapper<T>) -> Self {
        self.stages
            .push(Stage::Transform(Rc::new(RefCell::new(Transform::with_mapper(mapper)))));
        self
    }

    /// Adds an arbitrary view function.
    pub fn stage(mut self, function: ViewFunctionRef<T>) -> Self {
        self.stages.push(Stage::Custom(function));
        self
    }
}

impl<T: Clone + 'static> PipelineBuilder<T> {
    /// Builds the pipeline. Fails if a custom stage was added twice.
    pub fn build(self) -> Result<Pipeline<T>> {
        let root = Aggregate::with_children(self.stages.iter().map(Stage::as_view_function))?;
        Ok(Pipeline {
            root,
            stages: self.stages,
        })
    }
}

/// An [`Aggregate`] together with typed handles to its stages.
pub struct Pipeline<T> {
    root: Aggregate<T>,
    stages: Vec<Stage<T>>,
}

impl<T> Pipeline<T> {
    #[inline]
    pub fn root(&self) -> &Aggregate<T> {
        &self.root
    }

    /// Mutable access to the chain. Stages added or removed through it are
    /// not reflected in [`stages`](Pipeline::stages).
    #[inline]
    pub fn root_mut(&mut self) -> &mut Aggregate<T> {
        &mut self.root
    }

    #[inline]
    pub fn stages(&self) -> &[Stage<T>] {
        &self.stages
    }

    /// The first filter stage.
    pub fn filter(&self) -> Option<&Rc<RefCell<Filter<T>>>> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Filter(f) => Some(f),
            _ => None,
        })
    }

    /// The first sort stage.
    pub fn sort(&self) -> Option<&Rc<RefCell<Sort<T>>>> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Sort(f) => Some(f),
            _ => None,
        })
    }

    /// The first partial stage.
    pub fn partial(&self) -> Option<&Rc<RefCell<Partial<T>>>> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Partial(f) => Some(f),
            _ => None,
        })
    }

    /// The first transform stage.
    pub fn transform(&self) -> Option<&Rc<RefCell<Transform<T>>>> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Transform(f) => Some(f),
            _ => None,
        })
    }
}

impl<T: Clone + 'static> Pipeline<T> {
    /// Returns the output for `source`. See [`ViewFunction::view`].
    pub fn view(&mut self, source: &View<T>, use_cache: bool) -> View<T> {
        self.root.view(source, use_cache)
    }

    pub fn is_dirty(&self) -> bool {
        self.root.is_dirty()
    }

    /// Forwards `operation` to the first stage that accepts it.
    pub fn apply(&mut self, operation: Operation<T>) -> Result<bool> {
        self.root.apply(operation)
    }

    pub fn capabilities(&self) -> Vec<&'static str> {
        self.root.capabilities()
    }

    pub fn subscribe(&self, callback: RegenerationCallback) -> SubscriptionId {
        self.root.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.root.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operators::ChildList;
    use alloc::vec;
    use vistas_core::{mapper, natural, predicate, Error, Order};

    #[test]
    fn test_builder_order() {
        let mut pipeline = PipelineBuilder::new()
            .filter()
            .sort()
            .transform_with(mapper(|n: i32| n * 100))
            .partial(0, 1, ResizeStrategy::Shrink)
            .build()
            .unwrap();
        assert_eq!(pipeline.stages().len(), 4);
        assert_eq!(pipeline.root().children().len(), 4);

        pipeline
            .apply(Operation::add_filter_function("odd", predicate(|n: &i32| n % 2 == 1)))
            .unwrap();
        pipeline
            .apply(Operation::add_sorting_function("n", natural(Order::Desc), 1))
            .unwrap();

        let source: View<i32> = View::from(vec![1, 2, 3, 4, 5]);
        assert_eq!(pipeline.view(&source, true).to_vec(), vec![500, 300]);
    }

    #[test]
    fn test_typed_handles() {
        let pipeline: Pipeline<i32> = PipelineBuilder::new().sort().partial(0, 9, ResizeStrategy::NoAction).build().unwrap();
        assert!(pipeline.sort().is_some());
        assert!(pipeline.partial().is_some());
        assert!(pipeline.filter().is_none());
        assert!(pipeline.transform().is_none());

        let partial = pipeline.partial().unwrap();
        assert!(partial.borrow_mut().shift_window(1));
        assert!(pipeline.is_dirty());
    }

    #[test]
    fn test_custom_stage_aliasing() {
        let filter: ViewFunctionRef<i32> = Rc::new(RefCell::new(Filter::new()));
        let result = PipelineBuilder::new()
            .stage(filter.clone())
            .transform()
            .stage(filter)
            .build();
        assert_eq!(result.err(), Some(Error::aliased_view_function(2)));
    }

    #[test]
    fn test_empty_pipeline() {
        let mut pipeline: Pipeline<i32> = PipelineBuilder::default().build().unwrap();
        let source: View<i32> = View::from(vec![1]);
        assert!(pipeline.view(&source, true).ptr_eq(&source));
        assert!(pipeline.capabilities().is_empty());
        let children: &ChildList<i32> = pipeline.root().children();
        assert!(children.is_empty());
    }
}

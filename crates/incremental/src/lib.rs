//! Vistas Incremental - composable, memoizing view functions.
//!
//! A view function maps a source [`View`] to an output view and caches the
//! result. It regenerates only when it is handed a different source handle
//! or one of its parameters changed, and parameter changes propagate upward
//! through dirty-flag notifications rather than direct calls.
//!
//! # View functions
//!
//! - `Filter`: keyed predicates, AND-combined, refining the previous output when possible
//! - `Sort`: keyed comparators with priorities, backed by a resortable heap
//! - `Partial`: a sliding window of the source
//! - `Transform`: an element-wise mapper
//! - `Aggregate`: an ordered chain of other view functions
//!
//! Parameter changes can be made on the typed handles directly or sent to a
//! chain as an [`Operation`], which is forwarded to the first child that
//! declares the matching capability.
//!
//! # Example
//!
//! ```
//! use vistas_core::{natural, predicate, Order};
//! use vistas_incremental::{Operation, PipelineBuilder, View};
//!
//! let mut pipeline = PipelineBuilder::new().filter().sort().build().unwrap();
//! pipeline
//!     .apply(Operation::add_filter_function("not-one", predicate(|n: &i32| *n != 1)))
//!     .unwrap();
//! pipeline
//!     .apply(Operation::add_sorting_function("value", natural(Order::Desc), 1))
//!     .unwrap();
//!
//! let source = View::from(vec![1, 2, 3, 4, 5]);
//! assert_eq!(pipeline.view(&source, true).to_vec(), vec![5, 4, 3, 2]);
//! ```

#![no_std]

extern crate alloc;

pub mod builder;
pub mod function;
pub mod operation;
pub mod operators;
pub mod view;

pub use builder::{Pipeline, PipelineBuilder, Stage};
pub use function::{RegenerationCallback, ViewFunction, ViewFunctionRef, ViewState};
pub use operation::{capability, Operation};
pub use operators::{Aggregate, ChildList, Filter, Partial, Sort, Transform};
pub use view::View;

// Re-export commonly used types from dependencies
pub use vistas_collection::{Collection, ResizeStrategy, SlidingWindow};
pub use vistas_core::{Error, Metric, Result};
pub use vistas_reactive::{RegenerationNeeded, SubscriptionId};

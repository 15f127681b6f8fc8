//! Vistas Collection - Lazily materializing collections, heaps and windows.
//!
//! This crate provides the data structures the view pipeline is built on:
//!
//! - `Collection`: Indexable wrapper around a one-pass sequence (Lazy / Prohibit)
//! - `Sequence`: Read interface shared by collections and windows
//! - `Heap`: Array-backed binary min-heap with an external comparator
//! - `SortedViewHeap`: Heap that resorts in place when its comparator changes
//! - `SlidingWindow`: Index window over a collection with resize policies
//!
//! # Example
//!
//! ```rust
//! use vistas_collection::{Collection, ResizeStrategy, SlidingWindow};
//! use vistas_core::Metric;
//!
//! // Nothing is pulled from the source until it is indexed
//! let numbers = Collection::lazy((0..).map(|n: u32| n * n));
//! assert_eq!(numbers.get(3), Some(9));
//! assert_eq!(numbers.materialized_len(), 4);
//!
//! // The length of an endless source is never known
//! let window = SlidingWindow::bound(numbers, 0, 9, ResizeStrategy::Shrink);
//! assert_eq!(window.reached_end(), Metric::Ambiguous);
//! ```

#![no_std]

extern crate alloc;

pub mod collection;
pub mod heap;
pub mod sequence;
pub mod sorted_heap;
pub mod window;

pub use collection::{Collection, MaterializationStrategy, SourceFactory, SourceIter};
pub use heap::{Heap, IntoSorted};
pub use sequence::{SeqIter, Sequence};
pub use sorted_heap::{quicksort, SortedViewHeap};
pub use window::{ResizeStrategy, SlidingWindow};

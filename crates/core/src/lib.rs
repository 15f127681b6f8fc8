//! Vistas Core - Core types shared by the Vistas view pipeline.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - `Error`: Configuration errors raised by the pipeline
//! - `Metric`: Tri-state derived values (unbound, ambiguous, known)
//! - `Comparator`, `Predicate`, `Mapper`: Reference counted closures with identity
//! - `Order`: Ascending/descending sort order
//!
//! # Example
//!
//! ```rust
//! use vistas_core::{by_key, same_fn, Metric, Order};
//!
//! let by_abs = by_key(Order::Desc, |v: &i32| v.abs());
//! assert_eq!(by_abs(&-5, &3), core::cmp::Ordering::Less);
//! assert!(same_fn(&by_abs, &by_abs.clone()));
//!
//! let size: Metric<usize> = Some(4).into();
//! assert_eq!(size, Metric::Known(4));
//! ```

#![no_std]

extern crate alloc;

mod error;
mod function;
mod metric;

pub use error::{Error, Result};
pub use function::{by_key, mapper, natural, predicate, same_fn, Comparator, Mapper, Order, Predicate};
pub use metric::Metric;

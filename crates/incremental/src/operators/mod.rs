//! View function implementations.
//!
//! - Filter: keeps elements accepted by every keyed predicate
//! - Sort: orders elements by prioritized keyed comparators
//! - Partial: exposes a sliding window of the source
//! - Transform: maps every element
//! - Aggregate: chains other view functions

mod aggregate;
mod filter;
mod partial;
mod sort;
mod transform;

pub use aggregate::{Aggregate, ChildList};
pub use filter::Filter;
pub use partial::Partial;
pub use sort::Sort;
pub use transform::Transform;

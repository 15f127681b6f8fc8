//! Vistas Reactive - change notification for view functions.
//!
//! View functions never write into each other's state. The only way a change
//! in one stage reaches another is through this crate: each stage owns a
//! [`DirtyFlag`], and a clean-to-dirty transition fires a single
//! [`RegenerationNeeded`] event to whoever subscribed.
//!
//! # Example
//!
//! ```
//! use vistas_reactive::DirtyFlag;
//!
//! let parent = DirtyFlag::new(false);
//! let child = DirtyFlag::new(false);
//! child.forward_to(&parent);
//!
//! assert!(child.mark());
//! assert!(parent.is_set());
//! ```

#![no_std]

extern crate alloc;

pub mod dirty;
pub mod subscription;

pub use dirty::{DirtyFlag, RegenerationNeeded};
pub use subscription::{Callback, SubscriptionId, SubscriptionManager};

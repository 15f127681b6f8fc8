//! Named parameter mutations, dispatched by capability.
//!
//! Every parameter-mutation method of a view function has an [`Operation`]
//! counterpart so that a chain can forward it to whichever child accepts it.

use alloc::string::String;
use core::fmt;
use vistas_collection::ResizeStrategy;
use vistas_core::{Comparator, Mapper, Predicate};

/// Capability names, as advertised by [`crate::ViewFunction::capabilities`].
pub mod capability {
    pub const ADD_FILTER_FUNCTION: &str = "addFilterFunction";
    pub const DELETE_FILTER_FUNCTION: &str = "deleteFilterFunction";
    pub const CLEAR_FILTER_FUNCTION: &str = "clearFilterFunction";
    pub const ADD_SORTING_FUNCTION: &str = "addSortingFunction";
    pub const DELETE_SORTING_FUNCTION: &str = "deleteSortingFunction";
    pub const CLEAR_SORTING_FUNCTION: &str = "clearSortingFunction";
    pub const REORDER_SORTING_FUNCTION: &str = "reorderSortingFunction";
    pub const SET_WINDOW: &str = "setWindow";
    pub const SHIFT_WINDOW: &str = "shiftWindow";
    pub const SET_RESIZE_STRATEGY: &str = "setResizeStrategy";
    pub const TRANSFORMATION: &str = "transformation";
}

/// A parameter mutation for some view function.
pub enum Operation<T> {
    AddFilterFunction { key: String, predicate: Predicate<T> },
    DeleteFilterFunction { key: String },
    ClearFilterFunction,
    AddSortingFunction { key: String, comparator: Comparator<T>, priority: i32 },
    DeleteSortingFunction { key: String },
    ClearSortingFunction,
    ReorderSortingFunction { key: String, priority: i32 },
    SetWindow { start: usize, end: usize },
    ShiftWindow { amount: isize },
    SetResizeStrategy { strategy: ResizeStrategy },
    SetTransformation { mapper: Option<Mapper<T>> },
}

impl<T> Operation<T> {
    /// Returns the capability name this operation is dispatched by.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::AddFilterFunction { .. } => capability::ADD_FILTER_FUNCTION,
            Operation::DeleteFilterFunction { .. } => capability::DELETE_FILTER_FUNCTION,
            Operation::ClearFilterFunction => capability::CLEAR_FILTER_FUNCTION,
            Operation::AddSortingFunction { .. } => capability::ADD_SORTING_FUNCTION,
            Operation::DeleteSortingFunction { .. } => capability::DELETE_SORTING_FUNCTION,
            Operation::ClearSortingFunction => capability::CLEAR_SORTING_FUNCTION,
            Operation::ReorderSortingFunction { .. } => capability::REORDER_SORTING_FUNCTION,
            Operation::SetWindow { .. } => capability::SET_WINDOW,
            Operation::ShiftWindow { .. } => capability::SHIFT_WINDOW,
            Operation::SetResizeStrategy { .. } => capability::SET_RESIZE_STRATEGY,
            Operation::SetTransformation { .. } => capability::TRANSFORMATION,
        }
    }

    pub fn add_filter_function(key: impl Into<String>, predicate: Predicate<T>) -> Self {
        Operation::AddFilterFunction {
            key: key.into(),
            predicate,
        }
    }

    pub fn delete_filter_function(key: impl Into<String>) -> Self {
        Operation::DeleteFilterFunction { key: key.into() }
    }

    pub fn add_sorting_function(key: impl Into<String>, comparator: Comparator<T>, priority: i32) -> Self {
        Operation::AddSortingFunction {
            key: key.into(),
            comparator,
            priority,
        }
    }

    pub fn delete_sorting_function(key: impl Into<String>) -> Self {
        Operation::DeleteSortingFunction { key: key.into() }
    }

    pub fn reorder_sorting_function(key: impl Into<String>, priority: i32) -> Self {
        Operation::ReorderSortingFunction {
            key: key.into(),
            priority,
        }
    }
}

impl<T> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::AddFilterFunction { key, .. }
            | Operation::DeleteFilterFunction { key }
            | Operation::AddSortingFunction { key, .. }
            | Operation::DeleteSortingFunction { key } => {
                f.debug_struct(self.name()).field("key", key).finish()
            }
            Operation::ReorderSortingFunction { key, priority } => f
                .debug_struct(self.name())
                .field("key", key)
                .field("priority", priority)
                .finish(),
            Operation::SetWindow { start, end } => f
                .debug_struct(self.name())
                .field("start", start)
                .field("end", end)
                .finish(),
            Operation::ShiftWindow { amount } => {
                f.debug_struct(self.name()).field("amount", amount).finish()
            }
            Operation::SetResizeStrategy { strategy } => {
                f.debug_struct(self.name()).field("strategy", strategy).finish()
            }
            Operation::SetTransformation { mapper } => f
                .debug_struct(self.name())
                .field("set", &mapper.is_some())
                .finish(),
            Operation::ClearFilterFunction | Operation::ClearSortingFunction => {
                f.write_str(self.name())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use vistas_core::{natural, predicate, Order};

    #[test]
    fn test_operation_names() {
        let op: Operation<i32> = Operation::add_filter_function("odd", predicate(|n: &i32| n % 2 == 1));
        assert_eq!(op.name(), "addFilterFunction");

        let op: Operation<i32> = Operation::add_sorting_function("n", natural(Order::Asc), 1);
        assert_eq!(op.name(), "addSortingFunction");

        assert_eq!(Operation::<i32>::ShiftWindow { amount: -1 }.name(), "shiftWindow");
        assert_eq!(Operation::<i32>::SetTransformation { mapper: None }.name(), "transformation");
    }

    #[test]
    fn test_operation_debug() {
        let op: Operation<i32> = Operation::reorder_sorting_function("n", 3);
        let text = format!("{:?}", op);
        assert!(text.contains("reorderSortingFunction"));
        assert!(text.contains("priority: 3"));
    }
}

//! Error types for Vistas.

use alloc::string::String;
use core::fmt;

/// Result type alias for Vistas operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Configuration errors raised by the view pipeline.
///
/// Expected outcomes on hot paths (an index past the end, an empty heap)
/// are reported through `Option` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A view function would occupy two slots of the same chain.
    AliasedViewFunction {
        index: usize,
    },
    /// An index outside the bounds of a child list.
    IndexOutOfBounds {
        index: usize,
        len: usize,
    },
    /// No view function in the chain accepts the operation.
    UnsupportedOperation {
        operation: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AliasedViewFunction { index } => {
                write!(
                    f,
                    "View function at position {} is already part of this chain",
                    index
                )
            }
            Error::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for length {}", index, len)
            }
            Error::UnsupportedOperation { operation } => {
                write!(f, "Unsupported operation: {}", operation)
            }
        }
    }
}

impl Error {
    /// Creates an aliased view function error.
    pub fn aliased_view_function(index: usize) -> Self {
        Error::AliasedViewFunction { index }
    }

    /// Creates an index out of bounds error.
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Error::IndexOutOfBounds { index, len }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported_operation(operation: impl Into<String>) -> Self {
        Error::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    /// Returns true for errors raised while mutating a child list.
    #[inline]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Error::AliasedViewFunction { .. } | Error::IndexOutOfBounds { .. }
        )
    }
}

use thiserror::Error;

use crate::path::Path;

pub type StateResult<T> = Result<T, StateError>;

/// Usage errors. All of them are raised before the tree is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The value is not a node of any live store.
    #[error("operate only on a tracked state node")]
    Binding,

    #[error("the bound value cannot be null or absent")]
    NullBinding,

    #[error("a bindable component takes exactly one child, got {count}")]
    MultiChild { count: usize },

    #[error("shape mismatch at {path}: expected {expected}, found {found}")]
    ShapeMismatch {
        path: Path,
        expected: &'static str,
        found: &'static str,
    },

    /// A tracked node whose path is no longer present in the current root.
    #[error("path {path} does not resolve in the current tree")]
    PathNotFound { path: Path },
}

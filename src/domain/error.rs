//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the tree invariants or misuse of the model.
/// They are raised before any state is touched and never repaired internally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("input data is missing")]
    NullInput,

    #[error("invalid structure at index {index}: {reason}")]
    InvalidStructure { index: usize, reason: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("node not found: {0}")]
    NodeNotFound(i64),

    #[error("tree is empty, no data has been loaded")]
    EmptyTree,
}

impl DomainError {
    pub(crate) fn structure(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidStructure {
            index,
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

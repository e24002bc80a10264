//! Errors raised by the tree service and the config loader

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Domain failures plus what can go wrong around the store and config.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no tree store at {0}, run `flattree init` first")]
    StoreNotFound(PathBuf),

    #[error("tree store already exists: {0} (use --force to overwrite)")]
    StoreExists(PathBuf),

    #[error("cannot move {ids:?} below {parent}: target lies inside the moved nodes")]
    InvalidDrop { parent: i64, ids: Vec<i64> },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;

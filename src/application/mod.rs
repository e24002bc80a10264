//! Application layer: the tree service sitting between the CLI, the flat
//! store and the domain model.

pub mod error;
pub mod error_ext;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;

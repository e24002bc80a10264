//! Infrastructure: flat store backends, the filesystem boundary and the
//! container that wires them to the tree service.

pub mod di;
pub mod error;
pub mod store;
pub mod traits;

pub use error::{InfraError, InfraResult};
pub use store::{FlatStore, MemoryStore, TomlFileStore};

//! Domain layer: tree entities and structural algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod codec;
pub mod depth;
pub mod error;
pub mod model;
pub mod node;

pub use arena::{PreOrderIter, TreeArena};
pub use codec::{flatten, unflatten, validate_depths};
pub use depth::resync_depths;
pub use error::{DomainError, DomainResult};
pub use model::{MoveOutcome, Observer, SubscriptionId, TreeModel};
pub use node::{NodeHandle, NodeRecord, TreeNode, ROOT_DEPTH, ROOT_ID, ROOT_LABEL};

//! Services are concrete structs over the `FlatStore` trait.

mod tree;

pub use tree::{TreeService, TreeStats};

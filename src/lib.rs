//! flattree: ordered label trees kept as a flat, depth-tagged sequence.
//!
//! The flat sequence is the storage form; the linked tree is derived from it
//! on load and re-flattened after every structural edit.
//!
//! Layers:
//! - [`domain`]: nodes, the flat/tree codec, depth resync and the tree model
//! - [`application`]: the tree service used by the CLI
//! - [`infrastructure`]: flat store, filesystem boundary, DI container
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

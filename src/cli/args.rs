//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Ordered label trees stored as flat depth-tagged sequences
#[derive(Parser, Debug)]
#[command(name = "flattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Tree store file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath, env = "FLATTREE_STORE")]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new tree with one top-level node per label
    Init {
        /// Top-level labels (default: `default_labels` from config)
        labels: Vec<String>,
        /// Overwrite an existing store
        #[arg(long)]
        force: bool,
    },

    /// Show the tree
    Show {
        /// Print the flat sequence instead of the tree
        #[arg(long)]
        flat: bool,
    },

    /// List ancestor ids of a node, nearest first
    Ancestors {
        /// Node id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// List ids of nodes with children below (and including) a node
    Parents {
        /// Node id
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },

    /// Move nodes below a new parent
    Move {
        /// Ids of the nodes to move, in the order they should appear
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
        /// New parent id (default: top level)
        #[arg(short, long, allow_negative_numbers = true)]
        parent: Option<i64>,
        /// Position among the parent's current children (default: append)
        #[arg(short, long, allow_negative_numbers = true)]
        index: Option<i64>,
    },

    /// Enable a node and its subtree
    Enable {
        /// Node id
        id: i64,
    },

    /// Disable a node and its subtree
    Disable {
        /// Node id
        id: i64,
    },

    /// Check the store against the tree invariants
    Validate,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show config file locations
    Path,
}

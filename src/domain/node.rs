//! Node entities: the persisted record and the live tree node.

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

/// Handle of a node inside a [`TreeArena`](crate::domain::TreeArena).
pub type NodeHandle = Index;

/// Sentinel id of the hidden root.
pub const ROOT_ID: i64 = -1;
/// Depth of the hidden root; its direct children sit at depth 0.
pub const ROOT_DEPTH: i32 = -1;
/// Label given to the hidden root when a tree is generated from scratch.
pub const ROOT_LABEL: &str = "Root";

fn default_enabled() -> bool {
    true
}

/// One entry of the flat, pre-order, depth-tagged sequence.
///
/// This is the only form that reaches durable storage. Parent and child
/// links are never stored; they are rebuilt from `depth` on every load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: i64,
    pub label: String,
    pub depth: i32,
    /// Free-form category tag carried through untouched
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl NodeRecord {
    pub fn new(id: i64, label: impl Into<String>, depth: i32) -> Self {
        let label = label.into();
        Self {
            id,
            category: label.clone(),
            label,
            depth,
            enabled: true,
        }
    }

    /// Record of the hidden root.
    pub fn root(label: impl Into<String>) -> Self {
        Self::new(ROOT_ID, label, ROOT_DEPTH)
    }

    /// Hidden root followed by one enabled top-level node per label.
    ///
    /// Ids are assigned `0..labels.len()` in label order.
    pub fn default_tree<S: AsRef<str>>(root_label: &str, labels: &[S]) -> Vec<Self> {
        let mut records = Vec::with_capacity(labels.len() + 1);
        records.push(Self::root(root_label));
        records.extend(
            labels
                .iter()
                .enumerate()
                .map(|(i, label)| Self::new(i as i64, label.as_ref(), 0)),
        );
        records
    }

    pub fn is_root(&self) -> bool {
        self.depth == ROOT_DEPTH
    }
}

/// Live tree node stored in the arena.
///
/// `parent` and `children` are owned by the codec and the model; external
/// callers can read them but never set them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: i64,
    pub label: String,
    pub depth: i32,
    pub enabled: bool,
    pub category: String,
    pub(crate) parent: Option<NodeHandle>,
    /// `None`: never populated. `Some(vec![])`: populated, no children left.
    pub(crate) children: Option<Vec<NodeHandle>>,
}

impl TreeNode {
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    /// Child handles in order, empty when there are none.
    pub fn children(&self) -> &[NodeHandle] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Distinguishes "never computed" from "computed, zero children".
    pub fn children_populated(&self) -> bool {
        self.children.is_some()
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.depth == ROOT_DEPTH && self.parent.is_none()
    }

    pub(crate) fn clear_links(&mut self) {
        self.parent = None;
        self.children = None;
    }

    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            id: self.id,
            label: self.label.clone(),
            depth: self.depth,
            category: self.category.clone(),
            enabled: self.enabled,
        }
    }
}

impl From<NodeRecord> for TreeNode {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            depth: record.depth,
            enabled: record.enabled,
            category: record.category,
            parent: None,
            children: None,
        }
    }
}

impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

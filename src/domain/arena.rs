use std::ops::{Index, IndexMut};

use generational_arena::Arena;
use tracing::instrument;

use crate::domain::node::{NodeHandle, TreeNode};

/// Arena storage for the nodes of one tree.
///
/// Handles are generational, so a handle from a previous load never aliases a
/// node of the current one. Indexing with a stale handle panics; lookups that
/// may legitimately miss go through [`TreeArena::get_node`].
#[derive(Debug, Default)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            arena: Arena::with_capacity(n),
        }
    }

    #[instrument(level = "trace", skip(self, node), fields(id = node.id))]
    pub fn insert_node(&mut self, node: TreeNode) -> NodeHandle {
        self.arena.insert(node)
    }

    pub fn get_node(&self, handle: NodeHandle) -> Option<&TreeNode> {
        self.arena.get(handle)
    }

    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut TreeNode> {
        self.arena.get_mut(handle)
    }

    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.arena.contains(handle)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order walk of the subtree below `start`, `start` included.
    pub fn iter_from(&self, start: NodeHandle) -> PreOrderIter<'_> {
        PreOrderIter::new(self, start)
    }
}

impl Index<NodeHandle> for TreeArena {
    type Output = TreeNode;

    fn index(&self, handle: NodeHandle) -> &TreeNode {
        &self.arena[handle]
    }
}

impl IndexMut<NodeHandle> for TreeArena {
    fn index_mut(&mut self, handle: NodeHandle) -> &mut TreeNode {
        &mut self.arena[handle]
    }
}

/// Explicit-stack pre-order iterator; deep trees never grow the call stack.
pub struct PreOrderIter<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeHandle>,
}

impl<'a> PreOrderIter<'a> {
    fn new(arena: &'a TreeArena, start: NodeHandle) -> Self {
        let stack = if arena.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Self { arena, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = (NodeHandle, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children().iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}

//! Tree model: the live tree plus its authoritative flat sequence.
//!
//! Both views describe one logical state. Every mutator validates first,
//! then mutates the tree, re-derives depths, re-flattens, and only then
//! notifies observers, so nobody ever sees the two views disagree.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::domain::arena::TreeArena;
use crate::domain::codec::{flatten, unflatten, validate_depths};
use crate::domain::depth::resync_depths;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeHandle, NodeRecord, TreeNode};

/// Zero-argument change callback. Observers should re-read the whole model.
pub type Observer = Box<dyn FnMut()>;

/// Token returned by [`TreeModel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

/// What a call to [`TreeModel::move_elements`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Elements were reparented and observers were notified.
    Moved,
    /// The target parent was absent; nothing changed and nobody was notified.
    Ignored,
}

/// Owner of the live tree.
///
/// Not thread-safe by itself: a multi-threaded host has to put the whole
/// model behind one lock.
#[derive(Default)]
pub struct TreeModel {
    arena: TreeArena,
    data: Vec<NodeHandle>,
    root: Option<NodeHandle>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: usize,
}

impl fmt::Debug for TreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeModel")
            .field("nodes", &self.data.len())
            .field("root", &self.root)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model and loads `records` into it.
    pub fn with_records(records: Vec<NodeRecord>) -> DomainResult<Self> {
        let mut model = Self::new();
        model.load(Some(records))?;
        Ok(model)
    }

    // ---------------------------------------------------------------
    // Observers
    // ---------------------------------------------------------------

    pub fn subscribe(&mut self, observer: impl FnMut() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        debug!("notifying {} observers", self.observers.len());
        for (_, observer) in self.observers.iter_mut() {
            observer();
        }
    }

    // ---------------------------------------------------------------
    // Load
    // ---------------------------------------------------------------

    /// Replaces the whole state with `data`.
    ///
    /// `None` is rejected with [`DomainError::NullInput`]. An empty sequence
    /// leaves the model without a root. On any error the previous state is
    /// kept as it was.
    #[instrument(level = "debug", skip(self, data), fields(len = data.as_ref().map(Vec::len)))]
    pub fn load(&mut self, data: Option<Vec<NodeRecord>>) -> DomainResult<()> {
        let records = data.ok_or(DomainError::NullInput)?;

        if records.is_empty() {
            self.arena = TreeArena::new();
            self.data.clear();
            self.root = None;
            self.notify();
            return Ok(());
        }

        let depths: Vec<i32> = records.iter().map(|r| r.depth).collect();
        validate_depths(&depths)?;
        if let Some(dup) = records.iter().map(|r| r.id).duplicates().next() {
            let index = records.iter().rposition(|r| r.id == dup).unwrap_or(0);
            return Err(DomainError::structure(index, format!("duplicate id {dup}")));
        }

        let mut arena = TreeArena::with_capacity(records.len());
        let data: Vec<NodeHandle> = records
            .into_iter()
            .map(|r| arena.insert_node(TreeNode::from(r)))
            .collect();
        let root = unflatten(&mut arena, &data)?;

        self.arena = arena;
        self.data = data;
        self.root = Some(root);
        debug!("loaded {} nodes", self.data.len());
        self.notify();
        Ok(())
    }

    // ---------------------------------------------------------------
    // Read access
    // ---------------------------------------------------------------

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.map(|h| &self.arena[h])
    }

    pub fn root_handle(&self) -> Option<NodeHandle> {
        self.root
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&TreeNode> {
        self.arena.get_node(handle)
    }

    /// Number of nodes in the flat sequence, hidden root included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Nodes in canonical flat order.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.data.iter().map(|&h| &self.arena[h])
    }

    /// The flat sequence as storable records.
    pub fn records(&self) -> Vec<NodeRecord> {
        self.nodes().map(TreeNode::to_record).collect()
    }

    fn require_root(&self) -> DomainResult<NodeHandle> {
        self.root.ok_or(DomainError::EmptyTree)
    }

    fn find_handle(&self, id: i64) -> Option<NodeHandle> {
        self.data.iter().copied().find(|&h| self.arena[h].id == id)
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Linear lookup over the flat sequence.
    pub fn find_by_id(&self, id: i64) -> DomainResult<Option<&TreeNode>> {
        self.require_root()?;
        Ok(self.find_handle(id).map(|h| &self.arena[h]))
    }

    /// Ids of the direct children of `id`, in order.
    pub fn children_ids(&self, id: i64) -> DomainResult<Vec<i64>> {
        self.require_root()?;
        let handle = self.find_handle(id).ok_or(DomainError::NodeNotFound(id))?;
        Ok(self.arena[handle]
            .children()
            .iter()
            .map(|&c| self.arena[c].id)
            .collect())
    }

    /// Ancestor ids of `id`, nearest first, ending with the hidden root.
    ///
    /// Empty when `id` is unknown.
    pub fn ancestors(&self, id: i64) -> DomainResult<Vec<i64>> {
        self.require_root()?;
        let mut ancestors = Vec::new();
        let Some(mut current) = self.find_handle(id) else {
            return Ok(ancestors);
        };
        while let Some(parent) = self.arena[current].parent {
            ancestors.push(self.arena[parent].id);
            current = parent;
        }
        Ok(ancestors)
    }

    /// Ids of every node with at least one child in the subtree of `id`,
    /// `id` itself included. Empty when `id` is unknown.
    pub fn descendants_with_children(&self, id: i64) -> DomainResult<Vec<i64>> {
        self.require_root()?;
        let Some(start) = self.find_handle(id) else {
            return Ok(Vec::new());
        };
        Ok(self
            .arena
            .iter_from(start)
            .filter(|(_, node)| node.has_children())
            .map(|(_, node)| node.id)
            .collect())
    }

    /// Whether dropping `elements` below `parent` keeps the structure a tree.
    ///
    /// False when `parent` is one of the elements or sits below one of them.
    /// [`TreeModel::move_elements`] does not run this check; callers do.
    pub fn is_valid_drop(&self, parent: i64, elements: &[i64]) -> DomainResult<bool> {
        self.require_root()?;
        let mut current = Some(self.find_handle(parent).ok_or(DomainError::NodeNotFound(parent))?);
        while let Some(handle) = current {
            let node = &self.arena[handle];
            if elements.contains(&node.id) {
                return Ok(false);
            }
            current = node.parent;
        }
        Ok(true)
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Reparents `elements` below `new_parent`, starting at `insertion_index`.
    ///
    /// `insertion_index` refers to the parent's children *before* the move.
    /// Elements already sitting in front of that position are discounted so
    /// a reorder within the same parent lands where the caller pointed.
    ///
    /// An absent or unknown `new_parent` is a silent no-op. Moving a node
    /// below one of its own descendants is not detected here; check with
    /// [`TreeModel::is_valid_drop`] first.
    #[instrument(level = "debug", skip(self))]
    pub fn move_elements(
        &mut self,
        new_parent: Option<i64>,
        insertion_index: i64,
        elements: &[i64],
    ) -> DomainResult<MoveOutcome> {
        if insertion_index < 0 {
            return Err(DomainError::InvalidArgument(format!(
                "insertion index must not be negative, got {insertion_index}"
            )));
        }
        let Some(parent_id) = new_parent else {
            return Ok(MoveOutcome::Ignored);
        };
        let Some(parent) = self.find_handle(parent_id) else {
            warn!("move target {} not found, ignoring", parent_id);
            return Ok(MoveOutcome::Ignored);
        };
        let root = self.require_root()?;

        let current_children = self.arena[parent].children().to_vec();
        let index = usize::try_from(insertion_index).map_err(|_| {
            DomainError::InvalidArgument(format!(
                "insertion index {insertion_index} does not fit this platform"
            ))
        })?;
        if index > current_children.len() {
            return Err(DomainError::InvalidArgument(format!(
                "insertion index {index} exceeds child count {} of node {parent_id}",
                current_children.len()
            )));
        }

        let moved = self.resolve_elements(elements, root)?;

        let already_in_front = current_children[..index]
            .iter()
            .filter(|h| moved.contains(*h))
            .count();
        let index = index - already_in_front;

        for &handle in &moved {
            self.detach(handle);
            self.arena[handle].parent = Some(parent);
        }

        let children = self.arena[parent].children.get_or_insert_with(Vec::new);
        let tail = children.split_off(index);
        children.extend(moved.iter().copied());
        children.extend(tail);

        resync_depths(&mut self.arena, root);
        self.data = flatten(&self.arena, root);
        debug!(
            "moved {} elements below {} at {}",
            moved.len(),
            parent_id,
            index
        );
        self.notify();
        Ok(MoveOutcome::Moved)
    }

    /// Sets `enabled` on `id` and its whole subtree. Returns the number of
    /// nodes touched.
    #[instrument(level = "debug", skip(self))]
    pub fn set_enabled(&mut self, id: i64, enabled: bool) -> DomainResult<usize> {
        self.require_root()?;
        let start = self.find_handle(id).ok_or(DomainError::NodeNotFound(id))?;

        let mut touched = 0;
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            let node = &mut self.arena[current];
            node.enabled = enabled;
            touched += 1;
            stack.extend(node.children().iter().copied());
        }

        self.notify();
        Ok(touched)
    }

    fn resolve_elements(&self, elements: &[i64], root: NodeHandle) -> DomainResult<Vec<NodeHandle>> {
        if let Some(dup) = elements.iter().duplicates().next() {
            return Err(DomainError::InvalidArgument(format!(
                "element {dup} listed more than once"
            )));
        }
        elements
            .iter()
            .map(|&id| {
                let handle = self.find_handle(id).ok_or(DomainError::NodeNotFound(id))?;
                if handle == root {
                    return Err(DomainError::InvalidArgument(
                        "the hidden root cannot be moved".to_string(),
                    ));
                }
                Ok(handle)
            })
            .collect()
    }

    fn detach(&mut self, handle: NodeHandle) {
        if let Some(old_parent) = self.arena[handle].parent {
            if let Some(siblings) = self.arena[old_parent].children.as_mut() {
                siblings.retain(|&h| h != handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn records(depths: &[i32]) -> Vec<NodeRecord> {
        depths
            .iter()
            .enumerate()
            .map(|(i, &d)| NodeRecord::new(i as i64 - 1, format!("n{}", i as i64 - 1), d))
            .collect()
    }

    #[test]
    fn given_observer_when_unsubscribed_then_not_called() {
        let mut model = TreeModel::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = model.subscribe(move || counter.set(counter.get() + 1));

        model.load(Some(records(&[-1, 0]))).unwrap();
        assert!(model.unsubscribe(sub));
        assert!(!model.unsubscribe(sub));
        model.load(Some(records(&[-1, 0]))).unwrap();

        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn given_failed_load_when_querying_then_previous_state_is_kept() {
        let mut model = TreeModel::with_records(records(&[-1, 0, 1])).unwrap();

        let err = model.load(Some(records(&[-1, 0, 2]))).unwrap_err();

        assert!(matches!(err, DomainError::InvalidStructure { index: 2, .. }));
        assert_eq!(model.len(), 3);
        assert_eq!(model.ancestors(1).unwrap(), vec![0, -1]);
    }

    #[test]
    fn given_duplicate_ids_when_loading_then_rejected() {
        let mut data = records(&[-1, 0, 0]);
        data[2].id = data[1].id;

        let err = TreeModel::with_records(data).unwrap_err();

        assert!(matches!(err, DomainError::InvalidStructure { index: 2, .. }));
    }

    #[test]
    fn given_move_when_done_then_records_match_tree() {
        let mut model = TreeModel::with_records(records(&[-1, 0, 1, 0])).unwrap();

        model.move_elements(Some(2), 0, &[0]).unwrap();

        let depths: Vec<i32> = model.records().iter().map(|r| r.depth).collect();
        let ids: Vec<i64> = model.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![-1, 2, 0, 1]);
        assert_eq!(depths, vec![-1, 0, 1, 2]);
    }
}

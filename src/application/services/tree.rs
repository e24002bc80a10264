//! Tree service
//!
//! Loads the flat store into a [`TreeModel`], runs queries and structural
//! edits against it, and writes every change back.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{DomainError, MoveOutcome, NodeRecord, TreeModel, ROOT_ID};
use crate::infrastructure::store::FlatStore;

/// Shape summary of a loaded tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeStats {
    /// Visible nodes (hidden root excluded)
    pub nodes: usize,
    /// Nodes with at least one child (hidden root excluded)
    pub internal: usize,
    /// Deepest depth in the tree, -1 when only the root exists
    pub max_depth: i32,
    pub disabled: usize,
}

/// Service driving a tree model backed by a flat store.
pub struct TreeService {
    model: TreeModel,
    store: Arc<dyn FlatStore>,
}

impl std::fmt::Debug for TreeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeService")
            .field("model", &self.model)
            .field("store", &self.store.location())
            .finish()
    }
}

impl TreeService {
    /// Load the tree held by `store`.
    #[instrument(level = "debug", skip(store), fields(store = %store.location().display()))]
    pub fn open(store: Arc<dyn FlatStore>) -> ApplicationResult<Self> {
        let records = store
            .load()
            .with_path_context("read tree store", &store.location())?;

        let mut model = TreeModel::new();
        model.load(records).map_err(|e| match e {
            DomainError::NullInput => ApplicationError::StoreNotFound(store.location()),
            other => ApplicationError::Domain(other),
        })?;
        debug!("opened tree with {} records", model.len());

        Ok(Self { model, store })
    }

    /// Create a fresh tree: hidden root plus one top-level node per label.
    #[instrument(level = "debug", skip(store))]
    pub fn init(
        store: Arc<dyn FlatStore>,
        root_label: &str,
        labels: &[String],
        force: bool,
    ) -> ApplicationResult<Self> {
        if store.exists() && !force {
            return Err(ApplicationError::StoreExists(store.location()));
        }

        let model = TreeModel::with_records(NodeRecord::default_tree(root_label, labels))?;
        let service = Self { model, store };
        service.persist()?;
        info!("initialized tree with {} nodes", labels.len());
        Ok(service)
    }

    pub fn model(&self) -> &TreeModel {
        &self.model
    }

    /// Mutable access for registering observers.
    pub fn model_mut(&mut self) -> &mut TreeModel {
        &mut self.model
    }

    pub fn ancestors(&self, id: i64) -> ApplicationResult<Vec<i64>> {
        Ok(self.model.ancestors(id)?)
    }

    pub fn parents_below(&self, id: i64) -> ApplicationResult<Vec<i64>> {
        Ok(self.model.descendants_with_children(id)?)
    }

    /// Move `ids` below `parent` at `index`.
    ///
    /// Without a parent the nodes go to the top level; without an index
    /// they are appended after the parent's last child. The drop is checked
    /// for cycles before the model is touched.
    #[instrument(level = "debug", skip(self))]
    pub fn move_nodes(
        &mut self,
        parent: Option<i64>,
        index: Option<i64>,
        ids: &[i64],
    ) -> ApplicationResult<MoveOutcome> {
        let parent = match parent {
            Some(id) => id,
            None => self.model.root().map(|r| r.id).unwrap_or(ROOT_ID),
        };

        if !self.model.is_valid_drop(parent, ids)? {
            return Err(ApplicationError::InvalidDrop {
                parent,
                ids: ids.to_vec(),
            });
        }

        let index = match index {
            Some(i) => i,
            None => self.model.children_ids(parent)?.len() as i64,
        };

        let outcome = self.model.move_elements(Some(parent), index, ids)?;
        if outcome == MoveOutcome::Moved {
            self.persist()?;
            info!("moved {:?} below {} at {}", ids, parent, index);
        }
        Ok(outcome)
    }

    /// Enable or disable `id` together with its subtree.
    pub fn set_enabled(&mut self, id: i64, enabled: bool) -> ApplicationResult<usize> {
        let touched = self.model.set_enabled(id, enabled)?;
        self.persist()?;
        Ok(touched)
    }

    pub fn stats(&self) -> TreeStats {
        let visible = || self.model.nodes().filter(|n| !n.is_root());
        TreeStats {
            nodes: visible().count(),
            internal: visible().filter(|n| n.has_children()).count(),
            max_depth: self.model.nodes().map(|n| n.depth).max().unwrap_or(-1),
            disabled: visible().filter(|n| !n.enabled).count(),
        }
    }

    fn persist(&self) -> ApplicationResult<()> {
        self.store
            .save(&self.model.records())
            .with_path_context("write tree store", &self.store.location())
    }
}

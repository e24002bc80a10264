use tracing::instrument;

use crate::domain::arena::TreeArena;
use crate::domain::node::NodeHandle;

/// Re-derives the depth of every node below `root` from `root`'s own depth.
///
/// Must run after any reparenting and before the tree is flattened again.
#[instrument(level = "debug", skip(arena))]
pub fn resync_depths(arena: &mut TreeArena, root: NodeHandle) {
    if !arena.get_node(root).is_some_and(|n| n.has_children()) {
        return;
    }

    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        let depth = arena[current].depth;
        let children = arena[current].children().to_vec();
        for child in children {
            arena[child].depth = depth + 1;
            stack.push(child);
        }
    }
}

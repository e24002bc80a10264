//! Flat sequence <-> linked tree conversion.
//!
//! The flat form is the pre-order traversal of the tree, root first, each
//! entry tagged with its depth. The hidden root has depth -1 and every other
//! entry is at least 0. Depth may drop by any amount between neighbours but
//! never rise by more than one.

use tracing::{debug, instrument};

use crate::domain::arena::TreeArena;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::{NodeHandle, ROOT_DEPTH};

/// Canonical pre-order sequence of the tree below `root`, root first.
#[instrument(level = "debug", skip(arena))]
pub fn flatten(arena: &TreeArena, root: NodeHandle) -> Vec<NodeHandle> {
    arena.iter_from(root).map(|(handle, _)| handle).collect()
}

/// Checks a depth column against the flat-sequence invariants.
pub fn validate_depths(depths: &[i32]) -> DomainResult<()> {
    let Some(&first) = depths.first() else {
        return Err(DomainError::structure(0, "sequence is empty"));
    };
    if first != ROOT_DEPTH {
        return Err(DomainError::structure(
            0,
            format!("hidden root must have depth {ROOT_DEPTH}, got {first}"),
        ));
    }

    for (i, pair) in depths.windows(2).enumerate() {
        let (depth, next) = (pair[0], pair[1]);
        // stored depths may sit at the i32 limits
        if i64::from(next) - i64::from(depth) > 1 {
            return Err(DomainError::structure(
                i + 1,
                format!("depth rises from {depth} to {next}, at most one level per entry"),
            ));
        }
    }

    if let Some((i, depth)) = depths.iter().enumerate().skip(1).find(|(_, d)| **d < 0) {
        return Err(DomainError::structure(
            i,
            format!("only the hidden root may have a negative depth, got {depth}"),
        ));
    }

    if depths.len() > 1 && depths[1] != 0 {
        return Err(DomainError::structure(
            1,
            format!("first entry below the root must have depth 0, got {}", depths[1]),
        ));
    }

    Ok(())
}

/// Rebuilds parent/child links for `sequence` and returns its root.
///
/// Links already present on the nodes are discarded first, so re-running this
/// on a mutated sequence never keeps stale relations. Nothing is modified when
/// validation fails.
#[instrument(level = "debug", skip(arena, sequence), fields(len = sequence.len()))]
pub fn unflatten(arena: &mut TreeArena, sequence: &[NodeHandle]) -> DomainResult<NodeHandle> {
    let mut depths = Vec::with_capacity(sequence.len());
    for (i, &handle) in sequence.iter().enumerate() {
        let node = arena
            .get_node(handle)
            .ok_or_else(|| DomainError::structure(i, "entry does not belong to this tree"))?;
        depths.push(node.depth);
    }
    validate_depths(&depths)?;

    for &handle in sequence {
        arena[handle].clear_links();
    }

    for (p, &parent) in sequence.iter().enumerate() {
        if arena[parent].children_populated() {
            continue;
        }
        let parent_depth = depths[p];

        let mut children = Vec::new();
        for (i, &depth) in depths.iter().enumerate().skip(p + 1) {
            if depth <= parent_depth {
                break;
            }
            if depth == parent_depth + 1 {
                children.push(sequence[i]);
            }
        }

        for &child in &children {
            arena[child].parent = Some(parent);
        }
        if !children.is_empty() {
            arena[parent].children = Some(children);
        }
    }

    debug!("linked {} entries", sequence.len());
    Ok(sequence[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::node::{NodeRecord, TreeNode};
    use rstest::rstest;

    fn build(depths: &[i32]) -> (TreeArena, Vec<NodeHandle>) {
        let mut arena = TreeArena::new();
        let handles = depths
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                arena.insert_node(TreeNode::from(NodeRecord::new(i as i64 - 1, format!("n{i}"), d)))
            })
            .collect();
        (arena, handles)
    }

    #[rstest]
    #[case::empty(&[], 0)]
    #[case::root_not_negative(&[0, 0], 0)]
    #[case::depth_jump(&[-1, 0, 2], 2)]
    #[case::negative_below_root(&[-1, 0, -1], 2)]
    #[case::first_child_not_top_level(&[-1, -1], 1)]
    #[case::drop_from_min_depth(&[-1, 0, i32::MIN, 0], 3)]
    #[case::max_depth_below_root(&[-1, i32::MAX], 1)]
    fn given_invalid_depths_when_validating_then_reports_offending_index(
        #[case] depths: &[i32],
        #[case] index: usize,
    ) {
        match validate_depths(depths) {
            Err(DomainError::InvalidStructure { index: got, .. }) => assert_eq!(got, index),
            other => panic!("expected InvalidStructure, got {other:?}"),
        }
    }

    #[test]
    fn given_single_root_when_unflattening_then_root_has_no_children() {
        let (mut arena, seq) = build(&[-1]);

        let root = unflatten(&mut arena, &seq).unwrap();

        assert_eq!(root, seq[0]);
        assert!(!arena[root].children_populated());
        assert_eq!(flatten(&arena, root), seq);
    }

    #[test]
    fn given_nested_sequence_when_unflattening_then_links_follow_depths() {
        //  root
        //  ├── a
        //  │   ├── a1
        //  │   │   └── a1x
        //  │   └── a2
        //  └── b
        let (mut arena, seq) = build(&[-1, 0, 1, 2, 1, 0]);

        let root = unflatten(&mut arena, &seq).unwrap();

        assert_eq!(arena[root].children(), &[seq[1], seq[5]]);
        assert_eq!(arena[seq[1]].children(), &[seq[2], seq[4]]);
        assert_eq!(arena[seq[2]].children(), &[seq[3]]);
        assert_eq!(arena[seq[3]].parent(), Some(seq[2]));
        assert_eq!(arena[seq[5]].parent(), Some(root));
        assert!(arena[root].parent().is_none());
        assert!(!arena[seq[5]].children_populated());
    }

    #[test]
    fn given_stale_links_when_unflattening_then_they_are_replaced() {
        let (mut arena, seq) = build(&[-1, 0, 0]);
        arena[seq[1]].children = Some(vec![seq[2]]);
        arena[seq[2]].parent = Some(seq[1]);

        let root = unflatten(&mut arena, &seq).unwrap();

        assert_eq!(arena[root].children(), &[seq[1], seq[2]]);
        assert_eq!(arena[seq[2]].parent(), Some(root));
        assert!(!arena[seq[1]].children_populated());
    }

    #[test]
    fn given_invalid_sequence_when_unflattening_then_links_are_untouched() {
        let (mut arena, seq) = build(&[-1, 0, 2]);
        arena[seq[1]].children = Some(vec![seq[2]]);

        assert!(unflatten(&mut arena, &seq).is_err());
        assert_eq!(arena[seq[1]].children(), &[seq[2]]);
    }

    #[rstest]
    #[case(&[-1])]
    #[case(&[-1, 0, 0, 0])]
    #[case(&[-1, 0, 1, 2, 3, 0])]
    #[case(&[-1, 0, 1, 1, 2, 0, 1])]
    fn given_valid_sequence_when_round_tripping_then_order_is_preserved(#[case] depths: &[i32]) {
        let (mut arena, seq) = build(depths);

        let root = unflatten(&mut arena, &seq).unwrap();

        assert_eq!(flatten(&arena, root), seq);
        assert_eq!(flatten(&arena, root), flatten(&arena, root));
    }
}

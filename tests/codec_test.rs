//! Tests for the flat <-> tree codec through the public API

use rstest::rstest;

use flattree::domain::{
    flatten, resync_depths, unflatten, validate_depths, DomainError, NodeHandle, NodeRecord,
    TreeArena, TreeNode,
};
use flattree::util::testing::records_from_depths;

fn build(depths: &[i32]) -> (TreeArena, Vec<NodeHandle>) {
    let mut arena = TreeArena::new();
    let handles = records_from_depths(depths)
        .into_iter()
        .map(|r| arena.insert_node(TreeNode::from(r)))
        .collect();
    (arena, handles)
}

#[rstest]
#[case::empty(&[], 0)]
#[case::single_top_level(&[0], 0)]
#[case::jump(&[-1, 0, 2], 2)]
#[case::negative_after_root(&[-1, 0, 1, -2], 3)]
#[case::starts_below_top_level(&[-1, 1], 1)]
#[case::drop_from_min_depth(&[-1, 0, i32::MIN, 0], 3)]
#[case::max_depth_below_root(&[-1, i32::MAX], 1)]
fn given_bad_depths_when_validating_then_reports_offending_index(
    #[case] depths: &[i32],
    #[case] expected: usize,
) {
    match validate_depths(depths) {
        Err(DomainError::InvalidStructure { index, .. }) => assert_eq!(index, expected),
        other => panic!("expected InvalidStructure, got {other:?}"),
    }
}

#[rstest]
#[case::root_only(&[-1])]
#[case::flat(&[-1, 0, 0, 0])]
#[case::deep_chain(&[-1, 0, 1, 2, 3, 4])]
#[case::drop_several_levels(&[-1, 0, 1, 2, 3, 0, 1])]
fn given_valid_sequence_when_unflattening_and_flattening_then_sequence_is_reproduced(
    #[case] depths: &[i32],
) {
    let (mut arena, handles) = build(depths);

    let root = unflatten(&mut arena, &handles).unwrap();

    assert_eq!(root, handles[0]);
    assert_eq!(flatten(&arena, root), handles);
}

#[test]
fn given_relinked_tree_when_resyncing_then_depths_follow_parents() {
    let (mut arena, handles) = build(&[-1, 0, 1, 0]);
    let root = unflatten(&mut arena, &handles).unwrap();
    arena[handles[2]].depth = 7;

    resync_depths(&mut arena, root);

    let depths: Vec<i32> = flatten(&arena, root)
        .into_iter()
        .map(|h| arena[h].depth)
        .collect();
    assert_eq!(depths, vec![-1, 0, 1, 0]);
}

#[test]
fn given_single_root_when_unflattening_then_root_has_no_children() {
    let mut arena = TreeArena::new();
    let root = arena.insert_node(TreeNode::from(NodeRecord::root("Root")));

    let handle = unflatten(&mut arena, &[root]).unwrap();

    assert!(!arena[handle].children_populated());
    assert!(arena[handle].parent().is_none());
}

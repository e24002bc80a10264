//! termtree rendering of a tree model.

use colored::Colorize;
use termtree::Tree;

use crate::domain::{TreeModel, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree(&self) -> Tree<String>;
}

fn node_line(node: &TreeNode) -> String {
    let line = format!("{} [{}]", node.label, node.id);
    if node.enabled {
        line
    } else {
        format!("{} {}", line.dimmed(), "(disabled)".yellow())
    }
}

/// Pops the deepest open subtree and attaches it to the one below it.
fn close_last(open: &mut Vec<(i32, Tree<String>)>) {
    if open.len() > 1 {
        if let Some((_, done)) = open.pop() {
            if let Some((_, parent)) = open.last_mut() {
                parent.push(done);
            }
        }
    }
}

impl TreeNodeConvert for TreeModel {
    /// Built from the flat pre-order sequence with a stack of open subtrees.
    fn to_tree(&self) -> Tree<String> {
        let mut nodes = self.nodes();
        let Some(root) = nodes.next() else {
            return Tree::new("Empty tree".to_string());
        };

        let mut open = vec![(root.depth, Tree::new(root.label.clone()))];
        for node in nodes {
            while open.len() > 1 && open.last().is_some_and(|(depth, _)| *depth >= node.depth) {
                close_last(&mut open);
            }
            open.push((node.depth, Tree::new(node_line(node))));
        }
        while open.len() > 1 {
            close_last(&mut open);
        }

        open.pop()
            .map(|(_, tree)| tree)
            .unwrap_or_else(|| Tree::new("Empty tree".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeRecord;

    #[test]
    fn given_nested_tree_when_rendering_then_children_are_indented() {
        colored::control::set_override(false);
        let model = TreeModel::with_records(vec![
            NodeRecord::root("Root"),
            NodeRecord::new(0, "net", 0),
            NodeRecord::new(1, "http", 1),
            NodeRecord::new(2, "audio", 0),
        ])
        .unwrap();

        let rendered = model.to_tree().to_string();

        assert!(rendered.starts_with("Root\n"));
        assert!(rendered.contains("net [0]"));
        assert!(rendered.contains("│   └── http [1]"));
        assert!(rendered.contains("└── audio [2]"));
    }

    #[test]
    fn given_siblings_after_deep_branch_when_rendering_then_attached_to_right_parent() {
        let model = TreeModel::with_records(vec![
            NodeRecord::root("Root"),
            NodeRecord::new(0, "a", 0),
            NodeRecord::new(1, "b", 1),
            NodeRecord::new(2, "c", 2),
            NodeRecord::new(3, "d", 1),
            NodeRecord::new(4, "e", 0),
        ])
        .unwrap();

        let tree = model.to_tree();

        assert_eq!(tree.leaves.len(), 2);
        assert_eq!(tree.leaves[0].root, "a [0]");
        assert_eq!(tree.leaves[0].leaves.len(), 2);
        assert_eq!(tree.leaves[0].leaves[0].leaves[0].root, "c [2]");
        assert_eq!(tree.leaves[0].leaves[1].root, "d [3]");
        assert_eq!(tree.leaves[1].root, "e [4]");
    }

    #[test]
    fn given_very_deep_chain_when_rendering_then_every_level_is_present() {
        let mut records = vec![NodeRecord::root("Root")];
        records.extend((0..5_000).map(|i| NodeRecord::new(i, format!("n{i}"), i as i32)));
        let model = TreeModel::with_records(records).unwrap();

        let tree = model.to_tree();

        let mut depth = 0;
        let mut current = &tree;
        while let Some(child) = current.leaves.first() {
            depth += 1;
            current = child;
        }
        assert_eq!(depth, 5_000);
        assert_eq!(current.root, "n4999 [4999]");
    }

    #[test]
    fn given_empty_model_when_rendering_then_placeholder() {
        assert_eq!(TreeModel::new().to_tree().root, "Empty tree");
    }
}

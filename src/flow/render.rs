use crossterm::style::{style, Stylize};
use indextree::NodeId;

use crate::flow::tree::FlowTree;
use crate::flow::types::NodeData;

/// Print the finished tree to stdout with tree-drawing characters and
/// per-style colors.
pub fn print(tree: &FlowTree) {
    if let Some(root_id) = tree.root() {
        print!("{}", build_termtree(tree, root_id));
    }
}

fn build_termtree(tree: &FlowTree, node_id: NodeId) -> termtree::Tree<String> {
    let data = tree.get_node(node_id).expect("Node must exist");
    let leaves: Vec<termtree::Tree<String>> = tree
        .get_children(node_id)
        .into_iter()
        .map(|child_id| build_termtree(tree, child_id))
        .collect();
    termtree::Tree::new(styled_label(data)).with_leaves(leaves)
}

fn styled_label(data: &NodeData) -> String {
    let mut content = style(data.label.as_str()).with(data.style.color());
    if data.style.is_bold() {
        content = content.bold();
    }
    content.to_string()
}

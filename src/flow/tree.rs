use indextree::{Arena, NodeId};

use crate::flow::types::NodeData;

/// The output tree under construction. Append-only: nodes are never removed
/// or reordered once attached, so child order is always insertion order.
#[derive(Debug)]
pub struct FlowTree {
    arena: Arena<NodeData>,
    root: Option<NodeId>,
}

impl FlowTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Append a node under `parent_id`, or install it as the root when no
    /// parent is given and no root exists yet.
    pub fn add_node(&mut self, parent_id: Option<NodeId>, data: NodeData) -> NodeId {
        let node_id = self.arena.new_node(data);

        if let Some(parent) = parent_id {
            parent.append(node_id, &mut self.arena);
        } else if self.root.is_none() {
            self.root = Some(node_id);
        }

        node_id
    }

    pub fn get_node(&self, node_id: NodeId) -> Option<&NodeData> {
        self.arena.get(node_id).map(|n| n.get())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get_children(&self, node_id: NodeId) -> Vec<NodeId> {
        node_id.children(&self.arena).collect()
    }

    pub fn node_count(&self) -> usize {
        self.arena.count()
    }
}

impl Default for FlowTree {
    fn default() -> Self {
        Self::new()
    }
}

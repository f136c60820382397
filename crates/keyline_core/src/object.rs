// SPDX-License-Identifier: MIT OR Apache-2.0
//! Minimal scene graph: animatable nodes and their lookup tree.
//!
//! Timeline structures never hold node references, only [`NodeId`]
//! lookups; the tree controls node lifetime.

use crate::timeline::TimeLine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One animatable node of the scene graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectNode {
    /// Unique node ID.
    pub id: NodeId,
    /// Node name.
    pub name: String,
    /// Tree depth, for row indentation.
    pub depth: u32,
    /// Whether this node groups children.
    pub folder: bool,
    /// Animation keys of this node.
    pub timeline: TimeLine,
}

impl ObjectNode {
    /// Create a leaf node.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            depth: 0,
            folder: false,
            timeline: TimeLine::new(),
        }
    }

    /// Mark the node as a folder.
    pub fn with_folder(mut self) -> Self {
        self.folder = true;
        self
    }
}

/// Ordered collection of scene nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectTree {
    nodes: IndexMap<NodeId, ObjectNode>,
}

impl ObjectTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node, returning its ID.
    pub fn add_node(&mut self, node: ObjectNode) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node.
    pub fn remove_node(&mut self, id: NodeId) -> Option<ObjectNode> {
        self.nodes.shift_remove(&id)
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&ObjectNode> {
        self.nodes.get(&id)
    }

    /// Look up a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut ObjectNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &ObjectNode> {
        self.nodes.values()
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_lookup() {
        let mut tree = ObjectTree::new();
        let id = tree.add_node(ObjectNode::new("layer"));
        tree.add_node(ObjectNode::new("group").with_folder());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.node(id).unwrap().name, "layer");
        assert!(tree.node(NodeId::new()).is_none());

        tree.remove_node(id);
        assert_eq!(tree.len(), 1);
    }
}

//! Owned, immutable copies of a tree's shape

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identity of a tree node, assigned once at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single node as it looked when the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotNode {
    pub id: NodeId,
    pub value: i64,
    pub height: i32,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl SnapshotNode {
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Flat, id-addressed copy of a whole tree.
///
/// Holds no reference into the live arena, so later mutations of the tree
/// cannot change it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    pub root: Option<NodeId>,
    pub nodes: BTreeMap<NodeId, SnapshotNode>,
}

impl TreeSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&SnapshotNode> {
        self.nodes.get(&id)
    }

    pub fn root_node(&self) -> Option<&SnapshotNode> {
        self.root.and_then(|id| self.node(id))
    }

    pub fn root_value(&self) -> Option<i64> {
        self.root_node().map(|n| n.value)
    }

    /// Id of the node holding `value`, if any.
    pub fn find(&self, value: i64) -> Option<NodeId> {
        self.nodes.values().find(|n| n.value == value).map(|n| n.id)
    }

    /// Values in left-self-right order.
    pub fn in_order_values(&self) -> Vec<i64> {
        let mut values = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = Vec::new();
        let mut cursor = self.root;

        while cursor.is_some() || !stack.is_empty() {
            while let Some(id) = cursor {
                stack.push(id);
                cursor = self.node(id).and_then(|n| n.left);
            }
            if let Some(id) = stack.pop() {
                if let Some(node) = self.node(id) {
                    values.push(node.value);
                    cursor = node.right;
                }
            }
        }
        values
    }

    /// Number of edges on the longest root-to-leaf path; -1 for an empty tree.
    pub fn height(&self) -> i32 {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, id: Option<NodeId>) -> i32 {
        match id.and_then(|id| self.node(id)) {
            None => -1,
            Some(n) => 1 + self.subtree_height(n.left).max(self.subtree_height(n.right)),
        }
    }
}

use std::collections::BTreeMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::snapshot::{NodeId, SnapshotNode, TreeSnapshot};

/// Tree node in the arena-based binary tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Stable identity, survives value copies and rotations
    pub id: NodeId,
    /// Search key
    pub value: i64,
    /// Cached height of the subtree rooted here (leaf = 0)
    pub height: i32,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

/// Which child slot of a parent a node occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Arena-based binary tree storage.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// The arena owns the id counter, so ids are never handed out twice even
/// after nodes are removed or the tree is cleared.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    next_id: u64,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn id_of(&self, idx: Index) -> Option<NodeId> {
        self.get_node(idx).map(|n| n.id)
    }

    pub fn value_of(&self, idx: Index) -> Option<i64> {
        self.get_node(idx).map(|n| n.value)
    }

    pub fn parent_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.parent)
    }

    pub fn left_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.left)
    }

    pub fn right_of(&self, idx: Index) -> Option<Index> {
        self.get_node(idx).and_then(|n| n.right)
    }

    /// Allocates a detached node with the next id.
    #[instrument(level = "trace", skip(self))]
    pub fn allocate(&mut self, value: i64) -> Index {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.arena.insert(TreeNode {
            id,
            value,
            height: 0,
            parent: None,
            left: None,
            right: None,
        })
    }

    /// Drops a node that is no longer linked into the tree.
    pub fn release(&mut self, idx: Index) -> Option<TreeNode> {
        self.arena.remove(idx)
    }

    /// Removes every node. The id counter keeps counting.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    /// Sets `child` into `parent`'s slot on `side` and fixes the child's parent link.
    pub fn attach(&mut self, parent: Index, side: Side, child: Option<Index>) {
        if let Some(p) = self.get_node_mut(parent) {
            match side {
                Side::Left => p.left = child,
                Side::Right => p.right = child,
            }
        }
        if let Some(c) = child.and_then(|c| self.get_node_mut(c)) {
            c.parent = Some(parent);
        }
    }

    /// Puts `new` where `old` hangs below `parent`; a `None` parent means the root slot.
    pub fn replace_child(&mut self, parent: Option<Index>, old: Index, new: Option<Index>) {
        match parent {
            None => {
                self.root = new;
                if let Some(n) = new.and_then(|n| self.get_node_mut(n)) {
                    n.parent = None;
                }
            }
            Some(p) => {
                let side = if self.left_of(p) == Some(old) {
                    Side::Left
                } else {
                    Side::Right
                };
                self.attach(p, side, new);
            }
        }
    }

    /// Makes `idx` the root of an otherwise empty tree.
    pub fn set_root(&mut self, idx: Index) {
        self.replace_child(None, idx, Some(idx));
    }

    /// Cached height of a subtree; -1 for an empty one.
    pub fn height_of(&self, idx: Option<Index>) -> i32 {
        idx.and_then(|i| self.get_node(i)).map_or(-1, |n| n.height)
    }

    /// Recomputes the cached height from the children's cached heights.
    pub fn update_height(&mut self, idx: Index) -> i32 {
        let height = 1 + self
            .height_of(self.left_of(idx))
            .max(self.height_of(self.right_of(idx)));
        if let Some(node) = self.get_node_mut(idx) {
            node.height = height;
        }
        height
    }

    /// `height(left) - height(right)` from cached heights.
    pub fn balance_factor(&self, idx: Index) -> i32 {
        self.height_of(self.left_of(idx)) - self.height_of(self.right_of(idx))
    }

    /// Height computed by walking the structure instead of trusting the cache.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> i32 {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, idx: Option<Index>) -> i32 {
        match idx.and_then(|i| self.get_node(i)) {
            None => -1,
            Some(node) => {
                1 + self
                    .calculate_depth(node.left)
                    .max(self.calculate_depth(node.right))
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn leaf_count(&self) -> usize {
        self.count_leaves(self.root)
    }

    fn count_leaves(&self, idx: Option<Index>) -> usize {
        match idx.and_then(|i| self.get_node(i)) {
            None => 0,
            Some(node) if node.left.is_none() && node.right.is_none() => 1,
            Some(node) => self.count_leaves(node.left) + self.count_leaves(node.right),
        }
    }

    /// Index of the node holding `value`, following the search order.
    pub fn find(&self, value: i64) -> Option<Index> {
        let mut cursor = self.root;
        while let Some(idx) = cursor {
            let node = self.get_node(idx)?;
            cursor = match value.cmp(&node.value) {
                std::cmp::Ordering::Equal => return Some(idx),
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
            };
        }
        None
    }

    pub fn iter_inorder(&self) -> InOrderIterator<'_> {
        InOrderIterator::new(self)
    }

    /// Deep copy of the current shape.
    pub fn snapshot(&self) -> TreeSnapshot {
        let nodes: BTreeMap<NodeId, SnapshotNode> = self
            .arena
            .iter()
            .map(|(_, node)| {
                (
                    node.id,
                    SnapshotNode {
                        id: node.id,
                        value: node.value,
                        height: node.height,
                        left: node.left.and_then(|l| self.id_of(l)),
                        right: node.right.and_then(|r| self.id_of(r)),
                    },
                )
            })
            .collect();
        TreeSnapshot {
            root: self.root.and_then(|r| self.id_of(r)),
            nodes,
        }
    }
}

/// Stack-based left-self-right iterator over the arena.
pub struct InOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> InOrderIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        let mut iter = Self {
            arena,
            stack: Vec::new(),
        };
        iter.push_left_spine(arena.root());
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<Index>) {
        while let Some(idx) = cursor {
            self.stack.push(idx);
            cursor = self.arena.left_of(idx);
        }
    }
}

impl<'a> Iterator for InOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.stack.pop()?;
        let node = self.arena.get_node(idx)?;
        self.push_left_spine(node.right);
        Some((idx, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    //      2
    //     / \
    //    1   3
    fn small_tree() -> (TreeArena, Index, Index, Index) {
        let mut arena = TreeArena::new();
        let root = arena.allocate(2);
        arena.set_root(root);
        let left = arena.allocate(1);
        let right = arena.allocate(3);
        arena.attach(root, Side::Left, Some(left));
        arena.attach(root, Side::Right, Some(right));
        arena.update_height(root);
        (arena, root, left, right)
    }

    #[test]
    fn given_allocations_when_creating_nodes_then_ids_increase() {
        let (arena, root, left, right) = small_tree();
        assert_eq!(arena.id_of(root), Some(NodeId(0)));
        assert_eq!(arena.id_of(left), Some(NodeId(1)));
        assert_eq!(arena.id_of(right), Some(NodeId(2)));
    }

    #[test]
    fn given_cleared_arena_when_allocating_then_ids_are_not_reused() {
        let (mut arena, ..) = small_tree();
        arena.clear();
        assert!(arena.is_empty());
        let idx = arena.allocate(9);
        assert_eq!(arena.id_of(idx), Some(NodeId(3)));
    }

    #[test]
    fn given_tree_when_iterating_inorder_then_values_are_sorted() {
        let (arena, ..) = small_tree();
        let values: Vec<i64> = arena.iter_inorder().map(|(_, n)| n.value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn given_tree_when_measuring_then_depth_and_leaves_match() {
        let (arena, root, ..) = small_tree();
        assert_eq!(arena.depth(), 1);
        assert_eq!(arena.height_of(Some(root)), 1);
        assert_eq!(arena.leaf_count(), 2);
        assert_eq!(arena.balance_factor(root), 0);
    }

    #[test]
    fn given_root_replacement_when_replacing_then_parent_link_is_cleared() {
        let (mut arena, root, left, _) = small_tree();
        arena.replace_child(None, root, Some(left));
        assert_eq!(arena.root(), Some(left));
        assert_eq!(arena.parent_of(left), None);
    }

    #[test]
    fn given_snapshot_when_arena_mutates_then_snapshot_is_unchanged() {
        let (mut arena, root, ..) = small_tree();
        let before = arena.snapshot();
        if let Some(node) = arena.get_node_mut(root) {
            node.value = 42;
        }
        assert_eq!(before.root_value(), Some(2));
        assert_eq!(arena.snapshot().root_value(), Some(42));
    }

    #[test]
    fn given_empty_arena_when_measuring_then_depth_is_minus_one() {
        let arena = TreeArena::new();
        assert_eq!(arena.depth(), -1);
        assert_eq!(arena.leaf_count(), 0);
        assert!(arena.snapshot().is_empty());
    }
}

//! Instrumented binary search trees
//!
//! [`SearchTree`] holds the walk and step-emission logic shared by every tree
//! flavour. What happens to the ancestors of a structural change is delegated
//! to a [`BalancePolicy`]: the plain BST only refreshes cached heights, the AVL
//! tree rotates.

pub mod avl;
pub mod bst;
pub mod recorder;

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

use clap::ValueEnum;
use generational_arena::Index;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::domain::{DomainError, NodeId, Side, TreeArena, TreeFrame, TreeSnapshot, TreeStep};

pub use avl::{AvlTree, HeightBalanced};
pub use bst::{BinarySearchTree, Unbalanced};
pub use recorder::TreeRecorder;

/// Result of looking a value up, independent of any explanation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(NodeId),
    NotFound,
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// The structural change that triggered a rebalance pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A leaf holding this value was attached
    Inserted(i64),
    /// A node was spliced out
    Removed,
}

/// Selects the tree flavour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    #[default]
    Bst,
    Avl,
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::Bst => write!(f, "bst"),
            TreeKind::Avl => write!(f, "avl"),
        }
    }
}

/// Post-mutation hook applied bottom-up to every ancestor of a change.
pub trait BalancePolicy {
    const NAME: &'static str;

    /// Restores the policy's invariant at `node` and returns the root of the
    /// subtree that now occupies `node`'s former position.
    fn rebalance(
        arena: &mut TreeArena,
        node: Index,
        mutation: Mutation,
        rec: &mut TreeRecorder,
    ) -> Index;

    /// Height of the whole tree (-1 when empty).
    fn height(arena: &TreeArena) -> i32 {
        arena.depth()
    }
}

/// Binary search tree whose balancing behaviour is chosen by `P`.
#[derive(Debug)]
pub struct SearchTree<P: BalancePolicy> {
    arena: TreeArena,
    policy: PhantomData<P>,
}

impl<P: BalancePolicy> Default for SearchTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: BalancePolicy> SearchTree<P> {
    pub fn new() -> Self {
        Self {
            arena: TreeArena::new(),
            policy: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        P::NAME
    }

    pub fn arena(&self) -> &TreeArena {
        &self.arena
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Deep copy of the current tree.
    pub fn snapshot(&self) -> TreeSnapshot {
        self.arena.snapshot()
    }

    /// Values in ascending order.
    pub fn values(&self) -> Vec<i64> {
        self.arena.iter_inorder().map(|(_, n)| n.value).collect()
    }

    /// Silent lookup used by insert and delete to decide whether to proceed.
    pub fn locate(&self, value: i64) -> SearchOutcome {
        self.arena
            .find(value)
            .and_then(|idx| self.arena.id_of(idx))
            .map_or(SearchOutcome::NotFound, SearchOutcome::Found)
    }

    fn id(&self, idx: Index) -> Option<NodeId> {
        self.arena.id_of(idx)
    }

    fn single_step(&self, explanation: String, code_line: Option<u32>) -> Vec<TreeStep> {
        vec![TreeStep::new(
            explanation,
            code_line,
            TreeFrame {
                tree: self.arena.snapshot(),
                ..TreeFrame::default()
            },
        )]
    }

    #[instrument(level = "debug", skip(self))]
    pub fn search(&self, value: i64) -> Vec<TreeStep> {
        self.search_with_outcome(value).1
    }

    #[instrument(level = "debug", skip(self))]
    pub fn search_with_outcome(&self, value: i64) -> (SearchOutcome, Vec<TreeStep>) {
        let mut rec = TreeRecorder::new();
        let arena = &self.arena;
        rec.record(arena, format!("Starting search for value {}.", value), Some(2), None, None);

        let mut cursor = arena.root();
        while let Some(node) = cursor.and_then(|idx| arena.get_node(idx)) {
            rec.visit(Some(node.id));
            rec.record(
                arena,
                format!("Comparing {} with the current node ({}).", value, node.value),
                Some(3),
                Some(node.id),
                None,
            );
            match value.cmp(&node.value) {
                Ordering::Equal => {
                    rec.record(arena, format!("Value {} found.", value), Some(4), Some(node.id), None);
                    debug!(value, id = %node.id, "search hit");
                    return (SearchOutcome::Found(node.id), rec.finish());
                }
                Ordering::Less => {
                    rec.record(
                        arena,
                        format!("{} < {}. Moving to the left subtree.", value, node.value),
                        Some(7),
                        Some(node.id),
                        None,
                    );
                    cursor = node.left;
                }
                Ordering::Greater => {
                    rec.record(
                        arena,
                        format!("{} > {}. Moving to the right subtree.", value, node.value),
                        Some(9),
                        Some(node.id),
                        None,
                    );
                    cursor = node.right;
                }
            }
        }

        rec.record(
            arena,
            format!("Value {} was not found in the tree.", value),
            Some(3),
            None,
            None,
        );
        debug!(value, "search miss");
        (SearchOutcome::NotFound, rec.finish())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, value: i64) -> Vec<TreeStep> {
        if let SearchOutcome::Found(id) = self.locate(value) {
            debug!(value, %id, "duplicate rejected");
            return self.single_step(DomainError::DuplicateValue(value).to_string(), Some(16));
        }

        let mut rec = TreeRecorder::new();
        rec.record(
            &self.arena,
            format!("Starting insertion of value {}.", value),
            Some(5),
            None,
            None,
        );

        let Some(root) = self.arena.root() else {
            rec.record(&self.arena, "The tree is empty.", Some(6), None, None);
            let idx = self.arena.allocate(value);
            self.arena.set_root(idx);
            rec.visit(self.id(idx));
            rec.record(
                &self.arena,
                format!("Created a new node with value {} and made it the root.", value),
                Some(7),
                self.id(idx),
                None,
            );
            return rec.finish();
        };

        let mut cursor = root;
        let (parent, side) = loop {
            let Some(node) = self.arena.get_node(cursor) else {
                return rec.finish();
            };
            let (id, current, left, right) = (node.id, node.value, node.left, node.right);
            rec.visit(Some(id));
            rec.record(
                &self.arena,
                format!("Comparing {} with the current node ({}).", value, current),
                Some(13),
                Some(id),
                None,
            );
            let (side, next) = if value < current {
                rec.record(
                    &self.arena,
                    format!("{} < {}. Moving to the left subtree.", value, current),
                    Some(14),
                    Some(id),
                    None,
                );
                (Side::Left, left)
            } else {
                rec.record(
                    &self.arena,
                    format!("{} > {}. Moving to the right subtree.", value, current),
                    Some(16),
                    Some(id),
                    None,
                );
                (Side::Right, right)
            };
            match next {
                Some(child) => cursor = child,
                None => break (cursor, side),
            }
        };

        rec.record(
            &self.arena,
            "Found an empty position. Inserting the new node.",
            Some(6),
            self.id(parent),
            None,
        );
        let idx = self.arena.allocate(value);
        self.arena.attach(parent, side, Some(idx));
        let parent_value = self.arena.value_of(parent).unwrap_or_default();
        let (label, line) = match side {
            Side::Left => ("left", 15),
            Side::Right => ("right", 17),
        };
        rec.visit(self.id(idx));
        rec.record(
            &self.arena,
            format!("Inserted {} as the {} child of {}.", value, label, parent_value),
            Some(line),
            self.id(idx),
            self.id(parent),
        );
        trace!(value, parent_value, ?side, "attached");

        self.retrace(Some(parent), Mutation::Inserted(value), &mut rec);

        rec.record(
            &self.arena,
            format!("Insertion of {} completed.", value),
            None,
            self.locate_id(value),
            None,
        );
        rec.finish()
    }

    /// Inserts every value in order, concatenating the traces.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_many(&mut self, values: &[i64]) -> Vec<TreeStep> {
        values.iter().flat_map(|&v| self.insert(v)).collect()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, value: i64) -> Vec<TreeStep> {
        if !self.locate(value).is_found() {
            debug!(value, "delete of absent value");
            return self.single_step(DomainError::ValueNotFound(value).to_string(), Some(6));
        }

        let mut rec = TreeRecorder::new();
        rec.record(
            &self.arena,
            format!("Starting deletion of value {}.", value),
            Some(5),
            None,
            None,
        );
        let Some(target) = self.descend(self.arena.root(), value, &mut rec) else {
            return rec.finish();
        };

        let retrace_from = self.remove_node(target, &mut rec);
        self.retrace(retrace_from, Mutation::Removed, &mut rec);

        rec.reset_path();
        rec.record(
            &self.arena,
            format!("Deletion of {} completed.", value),
            Some(28),
            None,
            None,
        );
        rec.finish()
    }

    fn locate_id(&self, value: i64) -> Option<NodeId> {
        match self.locate(value) {
            SearchOutcome::Found(id) => Some(id),
            SearchOutcome::NotFound => None,
        }
    }

    /// Walks down from `from` towards `value`, emitting one comparison and one
    /// direction step per node. Returns the node holding `value`.
    fn descend(&self, from: Option<Index>, value: i64, rec: &mut TreeRecorder) -> Option<Index> {
        let arena = &self.arena;
        let mut cursor = from;
        while let Some(idx) = cursor {
            let node = arena.get_node(idx)?;
            rec.visit(Some(node.id));
            rec.record(
                arena,
                format!("Comparing {} with {}.", value, node.value),
                Some(8),
                Some(node.id),
                None,
            );
            match value.cmp(&node.value) {
                Ordering::Less => {
                    rec.record(
                        arena,
                        format!("{} < {}. Searching the left subtree.", value, node.value),
                        Some(9),
                        Some(node.id),
                        None,
                    );
                    cursor = node.left;
                }
                Ordering::Greater => {
                    rec.record(
                        arena,
                        format!("{} > {}. Searching the right subtree.", value, node.value),
                        Some(11),
                        Some(node.id),
                        None,
                    );
                    cursor = node.right;
                }
                Ordering::Equal => {
                    rec.record(
                        arena,
                        format!("Node with value {} found. Proceeding to delete.", value),
                        Some(13),
                        Some(node.id),
                        None,
                    );
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Unlinks `target` and returns the lowest node whose subtree changed.
    fn remove_node(&mut self, target: Index, rec: &mut TreeRecorder) -> Option<Index> {
        let (id, value, parent, left, right) = {
            let node = self.arena.get_node(target)?;
            (node.id, node.value, node.parent, node.left, node.right)
        };

        match (left, right) {
            (None, child) => {
                rec.record(
                    &self.arena,
                    format!("Node {} has no left child. Replacing it with its right child.", value),
                    Some(14),
                    Some(id),
                    None,
                );
                self.splice(parent, target, child);
                parent
            }
            (child, None) => {
                rec.record(
                    &self.arena,
                    format!("Node {} has no right child. Replacing it with its left child.", value),
                    Some(19),
                    Some(id),
                    None,
                );
                self.splice(parent, target, child);
                parent
            }
            (Some(_), Some(right)) => {
                rec.record(
                    &self.arena,
                    format!("Node {} has two children.", value),
                    Some(24),
                    Some(id),
                    None,
                );
                let successor = self.find_successor(right, id, rec);
                let successor_value = self.arena.value_of(successor)?;
                let successor_id = self.id(successor);

                rec.record(
                    &self.arena,
                    format!(
                        "Copying the successor's value ({}) into the node being deleted.",
                        successor_value
                    ),
                    Some(25),
                    Some(id),
                    successor_id,
                );
                if let Some(node) = self.arena.get_node_mut(target) {
                    node.value = successor_value;
                }
                rec.record(
                    &self.arena,
                    format!(
                        "Now removing the successor ({}) from the right subtree.",
                        successor_value
                    ),
                    Some(26),
                    Some(id),
                    successor_id,
                );
                match self.descend(Some(right), successor_value, rec) {
                    Some(found) => self.remove_node(found, rec),
                    None => Some(target),
                }
            }
        }
    }

    /// Leftmost node of the subtree at `start`, emitting one step per move.
    fn find_successor(&self, start: Index, deleting: NodeId, rec: &mut TreeRecorder) -> Index {
        rec.record(
            &self.arena,
            "Looking for the in-order successor (the minimum of the right subtree).",
            Some(2),
            self.id(start),
            None,
        );
        let mut cursor = start;
        while let Some(left) = self.arena.left_of(cursor) {
            cursor = left;
            rec.record(
                &self.arena,
                format!("Moving left to {}.", self.arena.value_of(cursor).unwrap_or_default()),
                Some(2),
                self.id(cursor),
                None,
            );
        }
        rec.record(
            &self.arena,
            format!(
                "In-order successor found: {}.",
                self.arena.value_of(cursor).unwrap_or_default()
            ),
            Some(3),
            self.id(cursor),
            Some(deleting),
        );
        cursor
    }

    fn splice(&mut self, parent: Option<Index>, target: Index, child: Option<Index>) {
        self.arena.replace_child(parent, target, child);
        self.arena.release(target);
    }

    /// Hands every ancestor from `from` up to the root to the balance policy.
    fn retrace(&mut self, from: Option<Index>, mutation: Mutation, rec: &mut TreeRecorder) {
        let mut cursor = from;
        while let Some(idx) = cursor {
            let subtree_root = P::rebalance(&mut self.arena, idx, mutation, rec);
            cursor = self.arena.parent_of(subtree_root);
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn in_order_traversal(&self) -> Vec<TreeStep> {
        let mut rec = TreeRecorder::new();
        let mut order = Vec::with_capacity(self.arena.len());
        rec.record_traversal(
            &self.arena,
            "Starting in-order traversal from the root.",
            Some(2),
            None,
            &order,
        );
        self.traverse(self.arena.root(), &mut order, &mut rec);
        rec.record_traversal(
            &self.arena,
            format!("In-order traversal completed. Final result: {}.", order.iter().join(", ")),
            Some(1),
            None,
            &order,
        );
        rec.finish()
    }

    fn traverse(&self, idx: Option<Index>, order: &mut Vec<i64>, rec: &mut TreeRecorder) {
        let arena = &self.arena;
        let Some(node) = idx.and_then(|i| arena.get_node(i)) else {
            rec.record_traversal(arena, "Reached an empty subtree, returning.", Some(3), None, order);
            return;
        };

        rec.record_traversal(
            arena,
            format!("Visiting node {}. First, traverse its left subtree.", node.value),
            Some(5),
            Some(node.id),
            order,
        );
        self.traverse(node.left, order, rec);

        order.push(node.value);
        rec.record_traversal(
            arena,
            format!(
                "Processing node {}. Value added to the result: {}.",
                node.value,
                order.iter().join(", ")
            ),
            Some(6),
            Some(node.id),
            order,
        );
        rec.record_traversal(
            arena,
            format!("Now, traverse the right subtree of {}.", node.value),
            Some(7),
            Some(node.id),
            order,
        );
        self.traverse(node.right, order, rec);
    }

    /// Edges on the longest root-to-leaf path; -1 for an empty tree.
    pub fn height(&self) -> i32 {
        P::height(&self.arena)
    }

    pub fn count_leaves(&self) -> usize {
        self.arena.leaf_count()
    }

    pub fn height_steps(&self) -> Vec<TreeStep> {
        self.single_step(format!("The height of the tree is {}.", self.height()), None)
    }

    pub fn leaf_count_steps(&self) -> Vec<TreeStep> {
        self.single_step(
            format!("The number of leaves is {}.", self.count_leaves()),
            None,
        )
    }

    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.arena.clear();
    }
}

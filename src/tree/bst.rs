//! Plain binary search tree

use generational_arena::Index;

use crate::domain::TreeArena;
use crate::tree::{BalancePolicy, Mutation, SearchTree, TreeRecorder};

/// Never rotates. Cached heights are still refreshed so snapshots stay truthful.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbalanced;

impl BalancePolicy for Unbalanced {
    const NAME: &'static str = "BST";

    fn rebalance(
        arena: &mut TreeArena,
        node: Index,
        _mutation: Mutation,
        _rec: &mut TreeRecorder,
    ) -> Index {
        arena.update_height(node);
        node
    }
}

pub type BinarySearchTree = SearchTree<Unbalanced>;

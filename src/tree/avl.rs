//! Height-balanced (AVL) search tree
//!
//! Rebalancing runs bottom-up over the ancestors of every structural change.
//! Rotations relink the arena immediately, so the steps recorded in the
//! middle of a double rotation show a coherent tree.

use generational_arena::Index;
use tracing::debug;

use crate::domain::{Side, TreeArena};
use crate::tree::{BalancePolicy, Mutation, SearchTree, TreeRecorder};

#[derive(Debug, Clone, Copy, Default)]
pub struct HeightBalanced;

pub type AvlTree = SearchTree<HeightBalanced>;

/// Shape of an imbalance, named after the path from the unbalanced node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Imbalance {
    LeftLeft,
    LeftRight,
    RightRight,
    RightLeft,
}

impl Imbalance {
    fn label(&self) -> &'static str {
        match self {
            Imbalance::LeftLeft => "Left-Left",
            Imbalance::LeftRight => "Left-Right",
            Imbalance::RightRight => "Right-Right",
            Imbalance::RightLeft => "Right-Left",
        }
    }

    fn code_line(&self) -> u32 {
        match self {
            Imbalance::LeftLeft => 49,
            Imbalance::RightRight => 53,
            Imbalance::LeftRight => 57,
            Imbalance::RightLeft => 63,
        }
    }
}

impl BalancePolicy for HeightBalanced {
    const NAME: &'static str = "AVL";

    fn rebalance(
        arena: &mut TreeArena,
        node: Index,
        mutation: Mutation,
        rec: &mut TreeRecorder,
    ) -> Index {
        let id = arena.id_of(node);
        let value = arena.value_of(node).unwrap_or_default();

        let height = arena.update_height(node);
        rec.record(
            arena,
            format!("Updating the height of node {} to {}.", value, height),
            Some(44),
            id,
            None,
        );
        let balance = arena.balance_factor(node);
        let check_line = match mutation {
            Mutation::Inserted(_) => 46,
            Mutation::Removed => 36,
        };
        rec.record(
            arena,
            format!("Checking the balance of node {}. Balance factor: {}.", value, balance),
            Some(check_line),
            id,
            None,
        );

        let Some(case) = classify(arena, node, balance, mutation) else {
            return node;
        };
        debug!(value, balance, case = case.label(), "rebalancing");
        rec.record(
            arena,
            format!("{} imbalance detected at node {}.", case.label(), value),
            Some(case.code_line()),
            id,
            None,
        );

        match case {
            Imbalance::LeftLeft => rotate_right(arena, node, rec),
            Imbalance::RightRight => rotate_left(arena, node, rec),
            Imbalance::LeftRight => {
                if let Some(left) = arena.left_of(node) {
                    rotate_left(arena, left, rec);
                }
                rotate_right(arena, node, rec)
            }
            Imbalance::RightLeft => {
                if let Some(right) = arena.right_of(node) {
                    rotate_right(arena, right, rec);
                }
                rotate_left(arena, node, rec)
            }
        }
    }

    fn height(arena: &TreeArena) -> i32 {
        arena.height_of(arena.root())
    }
}

/// Picks the rotation case for `node`, or `None` if it is balanced.
///
/// After an insert the new value tells which grandchild grew; after a removal
/// the value is gone, so the child's own balance decides.
fn classify(arena: &TreeArena, node: Index, balance: i32, mutation: Mutation) -> Option<Imbalance> {
    if balance > 1 {
        let left = arena.left_of(node)?;
        let outer = match mutation {
            Mutation::Inserted(value) => value < arena.value_of(left)?,
            Mutation::Removed => arena.balance_factor(left) >= 0,
        };
        Some(if outer {
            Imbalance::LeftLeft
        } else {
            Imbalance::LeftRight
        })
    } else if balance < -1 {
        let right = arena.right_of(node)?;
        let outer = match mutation {
            Mutation::Inserted(value) => value > arena.value_of(right)?,
            Mutation::Removed => arena.balance_factor(right) <= 0,
        };
        Some(if outer {
            Imbalance::RightRight
        } else {
            Imbalance::RightLeft
        })
    } else {
        None
    }
}

//       y             x
//      / \           / \
//     x   C   ->    A   y
//    / \               / \
//   A   B             B   C
fn rotate_right(arena: &mut TreeArena, y: Index, rec: &mut TreeRecorder) -> Index {
    let Some(x) = arena.left_of(y) else {
        return y;
    };
    rec.record(
        arena,
        format!(
            "Performing a right rotation on node {}.",
            arena.value_of(y).unwrap_or_default()
        ),
        Some(10),
        arena.id_of(y),
        None,
    );
    let parent = arena.parent_of(y);
    let b = arena.right_of(x);

    arena.replace_child(parent, y, Some(x));
    arena.attach(y, Side::Left, b);
    arena.attach(x, Side::Right, Some(y));
    arena.update_height(y);
    arena.update_height(x);

    rec.record(arena, "Rotation completed.", Some(16), arena.id_of(x), None);
    x
}

//     x                 y
//    / \               / \
//   A   y     ->      x   C
//      / \           / \
//     B   C         A   B
fn rotate_left(arena: &mut TreeArena, x: Index, rec: &mut TreeRecorder) -> Index {
    let Some(y) = arena.right_of(x) else {
        return x;
    };
    rec.record(
        arena,
        format!(
            "Performing a left rotation on node {}.",
            arena.value_of(x).unwrap_or_default()
        ),
        Some(19),
        arena.id_of(x),
        None,
    );
    let parent = arena.parent_of(x);
    let b = arena.left_of(y);

    arena.replace_child(parent, x, Some(y));
    arena.attach(x, Side::Right, b);
    arena.attach(y, Side::Left, Some(x));
    arena.update_height(x);
    arena.update_height(y);

    rec.record(arena, "Rotation completed.", Some(25), arena.id_of(y), None);
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TreeSnapshot;
    use rstest::rstest;

    fn assert_balanced(snap: &TreeSnapshot) {
        fn check(snap: &TreeSnapshot, id: Option<crate::domain::NodeId>) -> i32 {
            let Some(node) = id.and_then(|i| snap.node(i)) else {
                return -1;
            };
            let l = check(snap, node.left);
            let r = check(snap, node.right);
            assert!((l - r).abs() <= 1, "node {} unbalanced: {} vs {}", node.value, l, r);
            assert_eq!(node.height, 1 + l.max(r), "stale height at {}", node.value);
            1 + l.max(r)
        }
        check(snap, snap.root);
    }

    #[rstest]
    fn given_ascending_inserts_when_third_arrives_then_left_rotation_on_first() {
        let mut tree = AvlTree::new();
        tree.insert_many(&[10, 20]);
        let steps = tree.insert(30);

        let rotation = steps
            .iter()
            .find(|s| s.explanation.starts_with("Performing a left rotation"))
            .unwrap();
        assert!(rotation.explanation.contains("node 10"));
        assert!(steps.iter().any(|s| s.explanation.contains("Right-Right")));

        let snap = tree.snapshot();
        assert_eq!(snap.root_value(), Some(20));
        assert_eq!(tree.height(), 1);
        let root = snap.root_node().unwrap();
        assert!(snap.node(root.left.unwrap()).unwrap().is_leaf());
        assert!(snap.node(root.right.unwrap()).unwrap().is_leaf());
    }

    #[rstest]
    #[case(&[30, 10, 20], "Left-Right", 20)]
    #[case(&[10, 30, 20], "Right-Left", 20)]
    #[case(&[30, 20, 10], "Left-Left", 20)]
    fn given_three_inserts_when_unbalanced_then_case_is_detected(
        #[case] values: &[i64],
        #[case] label: &str,
        #[case] root: i64,
    ) {
        let mut tree = AvlTree::new();
        let steps = tree.insert_many(values);
        assert!(steps.iter().any(|s| s.explanation.contains(label)));
        assert_eq!(tree.snapshot().root_value(), Some(root));
        assert_balanced(&tree.snapshot());
    }

    #[rstest]
    fn given_rotation_when_replaying_then_every_step_is_a_valid_tree() {
        let mut tree = AvlTree::new();
        let steps = tree.insert_many(&[30, 10, 20]);
        for step in &steps {
            let values = step.frame.tree.in_order_values();
            assert_eq!(values.len(), step.frame.tree.len());
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[rstest]
    fn given_rotation_when_completed_then_new_subtree_root_is_highlighted() {
        let mut tree = AvlTree::new();
        let steps = tree.insert_many(&[1, 2, 3]);
        let done = steps
            .iter()
            .find(|s| s.explanation == "Rotation completed.")
            .unwrap();
        let two = done.frame.tree.find(2);
        assert_eq!(done.frame.highlighted, two);
    }

    #[rstest]
    fn given_deletion_when_tree_tilts_then_it_rebalances() {
        let mut tree = AvlTree::new();
        tree.insert_many(&[20, 10, 30, 40]);
        let steps = tree.delete(10);
        assert!(steps.iter().any(|s| s.explanation.contains("Right-Right")));
        assert_eq!(tree.snapshot().root_value(), Some(30));
        assert_eq!(tree.values(), vec![20, 30, 40]);
        assert_balanced(&tree.snapshot());
    }

    #[rstest]
    fn given_deletion_with_inner_child_when_rebalancing_then_double_rotation() {
        let mut tree = AvlTree::new();
        tree.insert_many(&[20, 10, 30, 25]);
        let steps = tree.delete(10);
        assert!(steps.iter().any(|s| s.explanation.contains("Right-Left")));
        assert_eq!(tree.snapshot().root_value(), Some(25));
        assert_balanced(&tree.snapshot());
    }

    #[rstest]
    fn given_many_inserts_and_deletes_when_done_then_tree_stays_balanced() {
        let mut tree = AvlTree::new();
        tree.insert_many(&(1..=31).collect::<Vec<_>>());
        assert_eq!(tree.height(), 4);
        for v in (1..=31).step_by(3) {
            tree.delete(v);
            assert_balanced(&tree.snapshot());
        }
        assert_eq!(tree.height(), tree.arena().depth());
    }

    #[rstest]
    fn given_duplicate_when_inserting_then_behaves_like_bst() {
        let mut tree = AvlTree::new();
        tree.insert_many(&[1, 2, 3]);
        let before = tree.snapshot();
        let steps = tree.insert(2);
        assert_eq!(steps.len(), 1);
        assert_eq!(tree.snapshot(), before);
    }
}

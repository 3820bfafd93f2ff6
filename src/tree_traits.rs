/*
Snapshots live in the domain layer; terminal rendering via termtree is a presentation
concern, so the conversion is provided as an extension trait.
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::{NodeId, TreeFrame, TreeSnapshot};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for TreeSnapshot {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        render(self, |_, value| value.to_string())
    }
}

// Highlighted node as [v], secondary node (successor, new subtree root) as <v>
impl TreeNodeConvert for TreeFrame {
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        render(&self.tree, |id, value| {
            if Some(id) == self.highlighted {
                format!("[{}]", value)
            } else if Some(id) == self.secondary {
                format!("<{}>", value)
            } else {
                value.to_string()
            }
        })
    }
}

fn render(snapshot: &TreeSnapshot, label: impl Fn(NodeId, i64) -> String) -> Tree<String> {
    fn build(
        snapshot: &TreeSnapshot,
        id: NodeId,
        prefix: &str,
        label: &dyn Fn(NodeId, i64) -> String,
    ) -> Tree<String> {
        let Some(node) = snapshot.node(id) else {
            return Tree::new(format!("{}?", prefix));
        };
        let mut tree = Tree::new(format!("{}{}", prefix, label(id, node.value)));
        if !node.is_leaf() {
            for (side, child) in [("L: ", node.left), ("R: ", node.right)] {
                match child {
                    Some(child) => tree.push(build(snapshot, child, side, label)),
                    None => tree.push(Tree::new(format!("{}·", side))),
                };
            }
        }
        tree
    }

    match snapshot.root {
        Some(root) => build(snapshot, root, "", &label),
        None => Tree::new("(empty tree)".to_string()),
    }
}

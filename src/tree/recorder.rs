//! Step collection for tree operations

use crate::domain::{NodeId, TreeArena, TreeFrame, TreeStep};

/// Collects tree steps, snapshotting the arena at every emission.
///
/// Also tracks the root-to-current path of the running operation so each step
/// can carry it without the caller rebuilding it.
#[derive(Debug, Default)]
pub struct TreeRecorder {
    steps: Vec<TreeStep>,
    path: Vec<NodeId>,
}

impl TreeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node to the current path.
    pub fn visit(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.path.push(id);
        }
    }

    pub fn reset_path(&mut self) {
        self.path.clear();
    }

    pub fn record(
        &mut self,
        arena: &TreeArena,
        explanation: impl Into<String>,
        code_line: Option<u32>,
        highlighted: Option<NodeId>,
        secondary: Option<NodeId>,
    ) {
        self.push(arena, explanation, code_line, highlighted, secondary, None);
    }

    pub fn record_traversal(
        &mut self,
        arena: &TreeArena,
        explanation: impl Into<String>,
        code_line: Option<u32>,
        highlighted: Option<NodeId>,
        order: &[i64],
    ) {
        self.push(
            arena,
            explanation,
            code_line,
            highlighted,
            None,
            Some(order.to_vec()),
        );
    }

    fn push(
        &mut self,
        arena: &TreeArena,
        explanation: impl Into<String>,
        code_line: Option<u32>,
        highlighted: Option<NodeId>,
        secondary: Option<NodeId>,
        traversal: Option<Vec<i64>>,
    ) {
        let frame = TreeFrame {
            tree: arena.snapshot(),
            highlighted,
            secondary,
            path: self.path.clone(),
            traversal,
        };
        self.steps.push(TreeStep::new(explanation, code_line, frame));
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn finish(self) -> Vec<TreeStep> {
        self.steps
    }
}

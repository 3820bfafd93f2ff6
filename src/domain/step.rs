//! Step records: one explanation plus an owned snapshot of the state it describes

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{AdjacencyMatrix, Distance, GraphEdge, GraphNode, MatrixCell};
use crate::domain::snapshot::{NodeId, TreeSnapshot};

/// One replayable frame of an algorithm trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step<F> {
    /// Human readable description of the decision taken
    pub explanation: String,
    /// Line of the reference listing this step corresponds to (opaque to the engine)
    pub code_line: Option<u32>,
    /// Domain specific state at the time of the step
    pub frame: F,
}

impl<F> Step<F> {
    pub fn new(explanation: impl Into<String>, code_line: Option<u32>, frame: F) -> Self {
        Self {
            explanation: explanation.into(),
            code_line,
            frame,
        }
    }
}

pub type TreeStep = Step<TreeFrame>;
pub type GraphStep = Step<GraphFrame>;

/// Tree state plus the overlays a renderer highlights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeFrame {
    pub tree: TreeSnapshot,
    pub highlighted: Option<NodeId>,
    pub secondary: Option<NodeId>,
    /// Nodes visited from the root so far
    pub path: Vec<NodeId>,
    /// Values collected by a traversal so far
    pub traversal: Option<Vec<i64>>,
}

/// Graph state plus algorithm specific overlays.
///
/// Overlays an algorithm does not use stay at their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphFrame {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub matrix: Option<AdjacencyMatrix>,

    pub distances: Option<BTreeMap<i64, Distance>>,
    pub previous: Option<BTreeMap<i64, Option<i64>>>,

    pub current: Option<i64>,
    pub highlighted_node: Option<i64>,
    pub highlighted_cell: Option<MatrixCell>,
    pub highlighted_edge: Option<GraphEdge>,
    pub highlighted_path: Vec<i64>,

    pub visited: Vec<i64>,
    pub queue: Vec<i64>,
    pub traversal: Vec<i64>,

    pub mst_edges: Vec<GraphEdge>,
    pub mst_total_weight: Option<u64>,
}

impl GraphFrame {
    /// Frame carrying deep copies of the structural data and no overlays.
    pub fn of(nodes: &[GraphNode], edges: &[GraphEdge], matrix: Option<&AdjacencyMatrix>) -> Self {
        Self {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
            matrix: matrix.cloned(),
            ..Self::default()
        }
    }
}

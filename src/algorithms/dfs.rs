use itertools::Itertools;
use tracing::{debug, instrument};

use crate::algorithms::{Snapshot, TraversalRun};
use crate::domain::{AdjacencyMatrix, GraphEdge, GraphFrame, GraphNode, GraphStep};

struct DepthFirst<'a> {
    graph: Snapshot<'a>,
    seen: Vec<bool>,
    visited: Vec<i64>,
    steps: Vec<GraphStep>,
}

impl DepthFirst<'_> {
    fn record(&mut self, explanation: String, line: u32, current: Option<i64>) {
        let frame = GraphFrame {
            current,
            highlighted_node: current,
            visited: self.visited.clone(),
            traversal: self.visited.clone(),
            ..self.graph.frame()
        };
        self.steps.push(GraphStep::new(explanation, Some(line), frame));
    }

    fn visit(&mut self, u: usize) {
        let Some(u_id) = self.graph.id(u) else { return };
        self.seen[u] = true;
        self.visited.push(u_id);
        self.record(
            format!(
                "Visiting node {}. It is marked as visited and added to the traversal.",
                u_id
            ),
            8,
            Some(u_id),
        );

        for (v, v_id, _) in self.graph.neighbors(u) {
            if self.seen[v] {
                continue;
            }
            self.record(
                format!("From {}, exploring unvisited neighbor {}.", u_id, v_id),
                11,
                Some(u_id),
            );
            self.visit(v);
            self.record(
                format!(
                    "Returning to {} after finishing the branch of {}.",
                    u_id, v_id
                ),
                8,
                Some(u_id),
            );
        }
    }
}

/// Recursive depth-first traversal from `start`. Unknown `start` gives an empty run.
#[instrument(level = "debug", skip(nodes, edges, matrix))]
pub fn dfs(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    matrix: &AdjacencyMatrix,
    start: i64,
) -> TraversalRun {
    let graph = Snapshot::new(nodes, edges, matrix);
    let Some(start_pos) = graph.position(start) else {
        debug!(start, "unknown start node");
        return TraversalRun::default();
    };

    let mut walk = DepthFirst {
        graph,
        seen: vec![false; nodes.len()],
        visited: Vec::new(),
        steps: Vec::new(),
    };
    walk.record(format!("Starting DFS from node {}.", start), 21, None);
    walk.visit(start_pos);
    let summary = format!(
        "DFS completed. Traversal order: {}.",
        walk.visited.iter().join(" → ")
    );
    walk.record(summary, 21, None);

    debug!(order = ?walk.visited, "dfs finished");
    TraversalRun {
        steps: walk.steps,
        order: walk.visited,
    }
}

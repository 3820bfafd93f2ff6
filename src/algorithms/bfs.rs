use std::collections::VecDeque;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::algorithms::{Snapshot, TraversalRun};
use crate::domain::{AdjacencyMatrix, GraphEdge, GraphFrame, GraphNode, GraphStep};

/// Breadth-first traversal from `start`. Unknown `start` gives an empty run.
#[instrument(level = "debug", skip(nodes, edges, matrix))]
pub fn bfs(
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

    let mut seen = vec![false; nodes.len()];
    let mut visited: Vec<i64> = Vec::new();
    let mut queue: VecDeque<usize> = VecDeque::new();
    let mut order: Vec<i64> = Vec::new();
    let mut steps = Vec::new();

    let step = |explanation: String,
                line: u32,
                current: Option<i64>,
                visited: &[i64],
                queue: &VecDeque<usize>,
                order: &[i64]| {
        GraphStep::new(
            explanation,
            Some(line),
            GraphFrame {
                current,
                highlighted_node: current,
                visited: visited.to_vec(),
                queue: queue.iter().filter_map(|&p| graph.id(p)).collect(),
                traversal: order.to_vec(),
                ..graph.frame()
            },
        )
    };

    seen[start_pos] = true;
    visited.push(start);
    queue.push_back(start_pos);
    steps.push(step(
        format!(
            "Starting BFS from node {}. It is enqueued and marked as visited.",
            start
        ),
        11,
        Some(start),
        &visited,
        &queue,
        &order,
    ));

    while let Some(u) = queue.pop_front() {
        let Some(u_id) = graph.id(u) else { continue };
        order.push(u_id);
        steps.push(step(
            format!("Processing node {} (dequeued).", u_id),
            17,
            Some(u_id),
            &visited,
            &queue,
            &order,
        ));

        for (v, v_id, _) in graph.neighbors(u) {
            if seen[v] {
                continue;
            }
            seen[v] = true;
            visited.push(v_id);
            queue.push_back(v);
            steps.push(step(
                format!(
                    "Discovered unvisited neighbor {}. It is enqueued and marked as visited.",
                    v_id
                ),
                22,
                Some(v_id),
                &visited,
                &queue,
                &order,
            ));
        }
    }

    steps.push(step(
        format!("BFS completed. Traversal order: {}.", order.iter().join(" → ")),
        25,
        None,
        &visited,
        &queue,
        &order,
    ));
    debug!(?order, "bfs finished");
    TraversalRun { steps, order }
}

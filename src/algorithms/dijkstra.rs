//! Single-source shortest paths with a lazy-deletion binary heap

use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

use itertools::Itertools;
use tracing::{debug, instrument, trace};

use crate::algorithms::Snapshot;
use crate::domain::{
    AdjacencyMatrix, Distance, DomainError, GraphEdge, GraphFrame, GraphNode, GraphStep,
    MatrixCell,
};

/// Heap entry. Smaller cost pops first; equal costs pop in push order.
#[derive(Copy, Clone, Eq, PartialEq)]
struct State {
    cost: Distance,
    seq: u64,
    position: usize,
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DijkstraRun {
    pub steps: Vec<GraphStep>,
    /// Final distance per node id; empty if the start was unknown
    pub distances: BTreeMap<i64, Distance>,
    pub previous: BTreeMap<i64, Option<i64>>,
}

impl DijkstraRun {
    pub fn distance_to(&self, id: i64) -> Distance {
        self.distances.get(&id).copied().unwrap_or(Distance::Infinite)
    }
}

/// Dijkstra run plus the reconstructed route to one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortestPath {
    pub steps: Vec<GraphStep>,
    /// Empty when no route exists
    pub path: Vec<i64>,
    pub distance: Distance,
}

struct Tracker<'a> {
    graph: Snapshot<'a>,
    distances: Vec<Distance>,
    previous: Vec<Option<i64>>,
    finalized: Vec<bool>,
    steps: Vec<GraphStep>,
}

impl Tracker<'_> {
    fn distance_map(&self) -> BTreeMap<i64, Distance> {
        self.graph
            .nodes
            .iter()
            .zip(&self.distances)
            .map(|(n, d)| (n.id, *d))
            .collect()
    }

    fn previous_map(&self) -> BTreeMap<i64, Option<i64>> {
        self.graph
            .nodes
            .iter()
            .zip(&self.previous)
            .map(|(n, p)| (n.id, *p))
            .collect()
    }

    fn record(
        &mut self,
        explanation: String,
        line: u32,
        current: Option<i64>,
        cell: Option<MatrixCell>,
    ) {
        let visited = self
            .graph
            .nodes
            .iter()
            .zip(&self.finalized)
            .filter(|(_, done)| **done)
            .map(|(n, _)| n.id)
            .collect();
        let frame = GraphFrame {
            distances: Some(self.distance_map()),
            previous: Some(self.previous_map()),
            current,
            highlighted_node: current,
            highlighted_cell: cell,
            visited,
            ..self.graph.frame()
        };
        self.steps.push(GraphStep::new(explanation, Some(line), frame));
    }
}

/// Shortest distances from `start` to every node.
///
/// An unknown `start` yields a single error step and empty maps.
#[instrument(level = "debug", skip(nodes, edges, matrix))]
pub fn dijkstra(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    matrix: &AdjacencyMatrix,
    start: i64,
) -> DijkstraRun {
    let graph = Snapshot::new(nodes, edges, matrix);
    let Some(start_pos) = graph.position(start) else {
        let error = DomainError::UnknownNode(start);
        debug!(%error, "dijkstra rejected");
        return DijkstraRun {
            steps: vec![GraphStep::new(
                format!("Error: {}", error),
                None,
                graph.frame(),
            )],
            ..DijkstraRun::default()
        };
    };

    let n = nodes.len();
    let mut t = Tracker {
        graph,
        distances: vec![Distance::Infinite; n],
        previous: vec![None; n],
        finalized: vec![false; n],
        steps: Vec::new(),
    };
    t.distances[start_pos] = Distance::ZERO;

    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    heap.push(State {
        cost: Distance::ZERO,
        seq,
        position: start_pos,
    });

    t.record(
        format!(
            "Starting Dijkstra from node {}. The initial distance to {} is 0.",
            start, start
        ),
        10,
        Some(start),
        None,
    );

    while let Some(State { position: u, .. }) = heap.pop() {
        let Some(u_id) = t.graph.id(u) else { continue };
        t.record(
            format!(
                "Processing the priority queue. Node {} has the smallest distance.",
                u_id
            ),
            15,
            None,
            None,
        );

        if t.finalized[u] {
            trace!(node = u_id, "stale heap entry");
            t.record(
                format!("Node {} was already visited. Skipping.", u_id),
                20,
                Some(u_id),
                None,
            );
            continue;
        }

        t.finalized[u] = true;
        t.record(
            format!(
                "Visiting node {}. Its current distance is {}.",
                u_id, t.distances[u]
            ),
            24,
            Some(u_id),
            None,
        );

        for (v, v_id, weight) in t.graph.neighbors(u) {
            let cell = Some(MatrixCell::new(u, v));
            t.record(
                format!(
                    "Evaluating neighbor {} from {}. Weight: {}.",
                    v_id, u_id, weight
                ),
                25,
                Some(u_id),
                cell,
            );

            let candidate = t.distances[u] + Distance::Finite(weight);
            if candidate < t.distances[v] {
                t.distances[v] = candidate;
                t.previous[v] = Some(u_id);
                seq += 1;
                heap.push(State {
                    cost: candidate,
                    seq,
                    position: v,
                });
                t.record(
                    format!(
                        "Shorter path found! New distance to {} is {} (via {}).",
                        v_id, candidate, u_id
                    ),
                    26,
                    Some(v_id),
                    cell,
                );
            } else {
                t.record(
                    format!(
                        "The current path to {} ({}) is better. No update.",
                        v_id, t.distances[v]
                    ),
                    25,
                    Some(v_id),
                    cell,
                );
            }
        }
    }

    t.record(
        "Dijkstra's algorithm completed. Final distances computed.".to_string(),
        30,
        None,
        None,
    );

    let run = DijkstraRun {
        distances: t.distance_map(),
        previous: t.previous_map(),
        steps: t.steps,
    };
    debug!(steps = run.steps.len(), "dijkstra finished");
    run
}

/// Walks predecessors from `end` back to `start`.
///
/// Returns an empty path if the chain never reaches `start`.
pub fn reconstruct_path(previous: &BTreeMap<i64, Option<i64>>, start: i64, end: i64) -> Vec<i64> {
    let mut path = Vec::new();
    let mut cursor = Some(end);
    // a chain longer than the map would be a cycle
    while let Some(id) = cursor.filter(|_| path.len() <= previous.len()) {
        path.push(id);
        if id == start {
            path.reverse();
            return path;
        }
        cursor = previous.get(&id).copied().flatten();
    }
    Vec::new()
}

/// Dijkstra from `start` followed by a final step highlighting the route to `end`.
#[instrument(level = "debug", skip(nodes, edges, matrix))]
pub fn shortest_path(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    matrix: &AdjacencyMatrix,
    start: i64,
    end: i64,
) -> ShortestPath {
    let run = dijkstra(nodes, edges, matrix, start);
    if run.distances.is_empty() {
        return ShortestPath {
            steps: run.steps,
            ..ShortestPath::default()
        };
    }

    let base = run
        .steps
        .last()
        .map(|s| s.frame.clone())
        .unwrap_or_default();
    let mut steps = run.steps.clone();

    if !run.distances.contains_key(&end) {
        steps.push(GraphStep::new(
            format!("Error: {}", DomainError::UnknownNode(end)),
            None,
            base,
        ));
        return ShortestPath {
            steps,
            ..ShortestPath::default()
        };
    }

    let path = reconstruct_path(&run.previous, start, end);
    let distance = run.distance_to(end);
    let explanation = if path.is_empty() {
        DomainError::Unreachable { start, end }.to_string()
    } else {
        format!(
            "Shortest path from {} to {}: {}. Total distance: {}.",
            start,
            end,
            path.iter().join(" → "),
            distance
        )
    };
    steps.push(GraphStep::new(
        explanation,
        None,
        GraphFrame {
            highlighted_path: path.clone(),
            current: None,
            highlighted_node: Some(end),
            highlighted_cell: None,
            ..base
        },
    ));

    ShortestPath {
        steps,
        distance: if path.is_empty() {
            Distance::Infinite
        } else {
            distance
        },
        path,
    }
}

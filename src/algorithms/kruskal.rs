use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::{GraphEdge, GraphFrame, GraphNode, GraphStep};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MstRun {
    pub steps: Vec<GraphStep>,
    /// Accepted edges in acceptance order
    pub edges: Vec<GraphEdge>,
    /// Saturates at `u64::MAX`
    pub total_weight: u64,
}

/// Union-find over node ids with path compression.
#[derive(Debug, Default)]
struct DisjointSet {
    parent: HashMap<i64, i64>,
}

impl DisjointSet {
    fn new(nodes: &[GraphNode]) -> Self {
        Self {
            parent: nodes.iter().map(|n| (n.id, n.id)).collect(),
        }
    }

    fn find(&mut self, id: i64) -> i64 {
        let mut root = id;
        loop {
            let parent = *self.parent.entry(root).or_insert(root);
            if parent == root {
                break;
            }
            root = parent;
        }
        let mut cursor = id;
        while cursor != root {
            let next = self.parent.insert(cursor, root).unwrap_or(root);
            cursor = next;
        }
        root
    }

    /// Hangs `b`'s root under `a`'s root. Returns false if already joined.
    fn union(&mut self, a: i64, b: i64) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        self.parent.insert(root_b, root_a);
        true
    }
}

/// Minimum spanning forest by ascending edge weight.
#[instrument(level = "debug", skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
pub fn kruskal(nodes: &[GraphNode], edges: &[GraphEdge]) -> MstRun {
    let mut sorted = edges.to_vec();
    sorted.sort_by_key(|e| e.weight);

    let mut sets = DisjointSet::new(nodes);
    let mut run = MstRun::default();

    let step = |explanation: String, line: u32, edge: Option<GraphEdge>, run: &MstRun| {
        GraphStep::new(
            explanation,
            Some(line),
            GraphFrame {
                highlighted_edge: edge,
                mst_edges: run.edges.clone(),
                mst_total_weight: Some(run.total_weight),
                ..GraphFrame::of(nodes, edges, None)
            },
        )
    };

    let first = step(
        "Starting Kruskal. All edges are sorted by weight in ascending order.".to_string(),
        26,
        None,
        &run,
    );
    run.steps.push(first);

    for edge in sorted {
        let considering = step(
            format!(
                "Considering edge ({} ↔ {}) with weight {}.",
                edge.source, edge.target, edge.weight
            ),
            33,
            Some(edge),
            &run,
        );
        run.steps.push(considering);

        let outcome = if sets.union(edge.source, edge.target) {
            run.edges.push(edge);
            run.total_weight = run.total_weight.saturating_add(edge.weight);
            step(
                format!(
                    "Nodes {} and {} are in different components. The edge is added to the MST.",
                    edge.source, edge.target
                ),
                35,
                Some(edge),
                &run,
            )
        } else {
            debug!(%edge, "edge closes a cycle");
            step(
                format!(
                    "Nodes {} and {} are already connected. The edge is discarded to avoid a cycle.",
                    edge.source, edge.target
                ),
                33,
                Some(edge),
                &run,
            )
        };
        run.steps.push(outcome);
    }

    let last = step(
        format!(
            "Kruskal's algorithm completed. Total MST weight: {}.",
            run.total_weight
        ),
        38,
        None,
        &run,
    );
    run.steps.push(last);
    debug!(total = run.total_weight, accepted = run.edges.len(), "kruskal finished");
    run
}

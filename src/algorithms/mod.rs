//! Instrumented graph algorithms
//!
//! Every algorithm is a free function over borrowed snapshots of a graph's
//! nodes, edges and adjacency matrix. None of them mutates its input or keeps
//! state between calls. Matrix position `i` belongs to `nodes[i]`.

pub mod bfs;
pub mod dfs;
pub mod dijkstra;
pub mod floyd_warshall;
pub mod kruskal;

use std::collections::HashMap;

use crate::domain::{AdjacencyMatrix, GraphEdge, GraphFrame, GraphNode};

pub use bfs::bfs;
pub use dfs::dfs;
pub use dijkstra::{dijkstra, reconstruct_path, shortest_path, DijkstraRun, ShortestPath};
pub use floyd_warshall::{floyd_warshall, FloydWarshallRun};
pub use kruskal::{kruskal, MstRun};

/// Steps and visiting order of a BFS or DFS run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalRun {
    pub steps: Vec<crate::domain::GraphStep>,
    pub order: Vec<i64>,
}

/// Read-only view shared by the matrix based algorithms.
struct Snapshot<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    matrix: &'a AdjacencyMatrix,
    positions: HashMap<i64, usize>,
}

impl<'a> Snapshot<'a> {
    fn new(nodes: &'a [GraphNode], edges: &'a [GraphEdge], matrix: &'a AdjacencyMatrix) -> Self {
        let positions = nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect();
        Self {
            nodes,
            edges,
            matrix,
            positions,
        }
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    fn id(&self, position: usize) -> Option<i64> {
        self.nodes.get(position).map(|n| n.id)
    }

    /// Adjacent nodes of `position` in matrix order, as (position, id, weight).
    fn neighbors(&self, position: usize) -> Vec<(usize, i64, u64)> {
        self.matrix
            .neighbors(position)
            .filter_map(|(col, w)| self.id(col).map(|id| (col, id, w)))
            .collect()
    }

    fn frame(&self) -> GraphFrame {
        GraphFrame::of(self.nodes, self.edges, Some(self.matrix))
    }
}

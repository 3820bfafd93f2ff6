//! Plain text summary of one graph algorithm run

use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{GraphEdge, GraphNode, GraphStep};

/// The graph operation a report describes, with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Operation {
    Build,
    Bfs { start: i64 },
    Dfs { start: i64 },
    Dijkstra { start: i64, end: i64 },
    FloydWarshall,
    Kruskal,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Build => write!(f, "Graph construction"),
            Operation::Bfs { start } => write!(f, "Breadth-first search (BFS) from {}", start),
            Operation::Dfs { start } => write!(f, "Depth-first search (DFS) from {}", start),
            Operation::Dijkstra { start, end } => {
                write!(f, "Dijkstra shortest path from {} to {}", start, end)
            }
            Operation::FloydWarshall => write!(f, "Floyd-Warshall all-pairs shortest paths"),
            Operation::Kruskal => write!(f, "Kruskal minimum spanning tree"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub operation: Operation,
    pub nodes: Vec<i64>,
    pub edges: Vec<GraphEdge>,
    /// Result lines derived from the final step
    pub results: Vec<String>,
    pub final_explanation: String,
    /// Every explanation of the run, in order
    pub log: Vec<String>,
}

impl Report {
    pub fn new(
        operation: Operation,
        nodes: &[GraphNode],
        edges: &[GraphEdge],
        steps: &[GraphStep],
    ) -> Self {
        let results = steps
            .last()
            .map(|last| Self::results(operation, last))
            .unwrap_or_default();
        Self {
            operation,
            nodes: nodes.iter().map(|n| n.id).collect(),
            edges: edges.to_vec(),
            results,
            final_explanation: steps
                .last()
                .map(|s| s.explanation.clone())
                .unwrap_or_default(),
            log: steps.iter().map(|s| s.explanation.clone()).collect(),
        }
    }

    fn results(operation: Operation, last: &GraphStep) -> Vec<String> {
        let frame = &last.frame;
        match operation {
            Operation::Build => vec![format!(
                "Adjacency matrix: {}x{}",
                frame.nodes.len(),
                frame.nodes.len()
            )],
            Operation::Bfs { .. } | Operation::Dfs { .. } => vec![format!(
                "Traversal order: {}",
                frame.traversal.iter().join(" → ")
            )],
            Operation::Dijkstra { end, .. } => {
                if frame.highlighted_path.is_empty() {
                    vec!["Path: none".to_string()]
                } else {
                    let distance = frame
                        .distances
                        .as_ref()
                        .and_then(|d| d.get(&end))
                        .copied()
                        .unwrap_or_default();
                    vec![
                        format!("Path: {}", frame.highlighted_path.iter().join(" → ")),
                        format!("Total distance: {}", distance),
                    ]
                }
            }
            Operation::FloydWarshall => {
                let mut lines = vec!["Distance matrix:".to_string()];
                if let Some(matrix) = &frame.matrix {
                    lines.extend(matrix.to_string().lines().map(str::to_string));
                }
                lines
            }
            Operation::Kruskal => {
                let mut lines: Vec<String> = frame
                    .mst_edges
                    .iter()
                    .map(|e| format!("MST edge: {}", e))
                    .collect();
                lines.push(format!(
                    "Total weight: {}",
                    frame.mst_total_weight.unwrap_or_default()
                ));
                lines
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Operation: {}", self.operation)?;
        writeln!(
            f,
            "Graph: {} nodes ({}), {} edges",
            self.nodes.len(),
            self.nodes.iter().join(", "),
            self.edges.len()
        )?;
        for edge in &self.edges {
            writeln!(f, "  {}", edge)?;
        }
        writeln!(f)?;
        writeln!(f, "Results:")?;
        for line in &self.results {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f)?;
        writeln!(f, "Conclusion: {}", self.final_explanation)?;
        writeln!(f)?;
        writeln!(f, "Step log:")?;
        for (i, entry) in self.log.iter().enumerate() {
            writeln!(f, "{:>4}. {}", i + 1, entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{kruskal, shortest_path};
    use crate::graph::Graph;
    use rstest::{fixture, rstest};

    #[fixture]
    fn graph() -> Graph {
        let mut g = Graph::new();
        for id in 0..=2 {
            g.add_node(id);
        }
        g.add_edge(0, 1, 1);
        g.add_edge(1, 2, 2);
        g
    }

    #[rstest]
    fn given_dijkstra_run_when_reporting_then_path_and_distance_are_listed(graph: Graph) {
        let (nodes, edges) = (graph.nodes(), graph.edges());
        let run = shortest_path(&nodes, &edges, &graph.adjacency_matrix(), 0, 2);
        let report = Report::new(Operation::Dijkstra { start: 0, end: 2 }, &nodes, &edges, &run.steps);

        assert_eq!(report.results, vec!["Path: 0 → 1 → 2", "Total distance: 3"]);
        assert_eq!(report.log.len(), run.steps.len());
        let text = report.to_string();
        assert!(text.contains("Dijkstra shortest path from 0 to 2"));
        assert!(text.contains("3 nodes (0, 1, 2), 2 edges"));
    }

    #[rstest]
    fn given_kruskal_run_when_reporting_then_total_weight_is_listed(graph: Graph) {
        let (nodes, edges) = (graph.nodes(), graph.edges());
        let run = kruskal(&nodes, &edges);
        let report = Report::new(Operation::Kruskal, &nodes, &edges, &run.steps);
        assert_eq!(report.results.last().map(String::as_str), Some("Total weight: 3"));
        assert!(report.final_explanation.contains("Total MST weight: 3"));
    }

    #[rstest]
    fn given_empty_trace_when_reporting_then_results_are_empty(graph: Graph) {
        let report = Report::new(Operation::Bfs { start: 9 }, &graph.nodes(), &graph.edges(), &[]);
        assert!(report.results.is_empty());
        assert!(report.final_explanation.is_empty());
    }
}

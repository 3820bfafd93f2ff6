//! Undirected weighted graph backed by an adjacency matrix

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::{AdjacencyMatrix, Distance, DomainError, GraphEdge, GraphFrame, GraphNode, GraphStep, MatrixCell};

/// Node and edge registry.
///
/// Node positions in the matrix follow creation order and never move.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    matrix: AdjacencyMatrix,
    index: HashMap<i64, usize>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    /// Matrix position of a node.
    pub fn index_of(&self, id: i64) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn nodes(&self) -> Vec<GraphNode> {
        self.nodes.clone()
    }

    pub fn edges(&self) -> Vec<GraphEdge> {
        self.edges.clone()
    }

    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        self.matrix.clone()
    }

    fn frame(&self) -> GraphFrame {
        GraphFrame::of(&self.nodes, &self.edges, Some(&self.matrix))
    }

    fn step(&self, explanation: impl Into<String>, frame: GraphFrame) -> GraphStep {
        GraphStep::new(explanation, None, frame)
    }

    fn rejection(&self, error: DomainError) -> Vec<GraphStep> {
        debug!(%error, "graph operation rejected");
        vec![self.step(error.to_string(), self.frame())]
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_node(&mut self, id: i64) -> Vec<GraphStep> {
        if self.contains(id) {
            return self.rejection(DomainError::DuplicateNode(id));
        }

        let mut steps = vec![self.step(
            format!(
                "Starting to add node {}. The adjacency matrix must grow by one row and column.",
                id
            ),
            self.frame(),
        )];

        let position = self.matrix.grow();
        self.index.insert(id, position);
        self.nodes.push(GraphNode::new(id));

        let n = self.nodes.len();
        steps.push(self.step(
            format!("Node {} added. The matrix is now {}x{}.", id, n, n),
            GraphFrame {
                highlighted_node: Some(id),
                ..self.frame()
            },
        ));
        steps
    }

    /// Adds the undirected edge `source - target`. A repeated pair takes the new
    /// weight in the matrix and is appended to the edge list again.
    #[instrument(level = "debug", skip(self))]
    pub fn add_edge(&mut self, source: i64, target: i64, weight: u64) -> Vec<GraphStep> {
        let (Some(s), Some(t)) = (self.index_of(source), self.index_of(target)) else {
            return self.rejection(DomainError::MissingEndpoint {
                source_id: source,
                target_id: target,
            });
        };
        if weight == 0 {
            return self.rejection(DomainError::NonPositiveWeight(weight));
        }
        if s == t {
            return self.rejection(DomainError::SelfLoop(source));
        }

        let mut steps = vec![self.step(
            format!(
                "Adding an edge between {} and {} with weight {}.",
                source, target, weight
            ),
            GraphFrame {
                highlighted_node: Some(source),
                ..self.frame()
            },
        )];
        steps.push(self.step(
            format!(
                "The matrix will be updated at cells [{}][{}] and [{}][{}].",
                s, t, t, s
            ),
            GraphFrame {
                highlighted_cell: Some(MatrixCell::new(s, t)),
                ..self.frame()
            },
        ));

        self.matrix.set_symmetric(s, t, Distance::Finite(weight));
        let edge = GraphEdge::new(source, target, weight);
        self.edges.push(edge);

        steps.push(self.step(
            "Edge added successfully. The matrix and the drawing have been updated.",
            GraphFrame {
                highlighted_edge: Some(edge),
                ..self.frame()
            },
        ));
        steps
    }

    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.matrix = AdjacencyMatrix::new();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn triangle() -> Graph {
        let mut g = Graph::new();
        for id in [0, 1, 2] {
            g.add_node(id);
        }
        g.add_edge(0, 1, 4);
        g.add_edge(1, 2, 2);
        g
    }

    #[rstest]
    fn given_new_node_when_adding_then_two_steps_and_matrix_grows() {
        let mut g = Graph::new();
        let steps = g.add_node(7);
        assert_eq!(steps.len(), 2);
        assert!(steps[0].frame.nodes.is_empty());
        assert_eq!(steps[1].frame.nodes, vec![GraphNode::new(7)]);
        assert_eq!(steps[1].frame.highlighted_node, Some(7));
        assert_eq!(g.adjacency_matrix().get(0, 0), Distance::ZERO);
    }

    #[rstest]
    fn given_existing_node_when_adding_then_single_noop_step(mut triangle: Graph) {
        let steps = triangle.add_node(1);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].explanation.contains("already exists"));
        assert_eq!(triangle.len(), 3);
    }

    #[rstest]
    fn given_edge_when_adding_then_three_steps_and_symmetric_cells(triangle: Graph) {
        let mut g = triangle;
        let steps = g.add_edge(0, 2, 9);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].frame.highlighted_cell, Some(MatrixCell::new(0, 2)));
        assert_eq!(
            steps[1].frame.matrix.as_ref().map(|m| m.get(0, 2)),
            Some(Distance::Infinite)
        );
        assert_eq!(steps[2].frame.highlighted_edge, Some(GraphEdge::new(0, 2, 9)));
        let m = g.adjacency_matrix();
        assert_eq!(m.get(0, 2), Distance::Finite(9));
        assert_eq!(m.get(2, 0), Distance::Finite(9));
    }

    #[rstest]
    #[case(0, 5, 1)]
    #[case(5, 0, 1)]
    #[case(0, 1, 0)]
    #[case(2, 2, 3)]
    fn given_invalid_edge_when_adding_then_graph_is_unchanged(
        mut triangle: Graph,
        #[case] a: i64,
        #[case] b: i64,
        #[case] w: u64,
    ) {
        let before = triangle.adjacency_matrix();
        let steps = triangle.add_edge(a, b, w);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].explanation.starts_with("Error"));
        assert_eq!(triangle.adjacency_matrix(), before);
        assert_eq!(triangle.edges().len(), 2);
    }

    #[rstest]
    fn given_duplicate_pair_when_adding_then_matrix_overwritten_and_edge_appended(
        mut triangle: Graph,
    ) {
        triangle.add_edge(1, 0, 11);
        assert_eq!(triangle.edges().len(), 3);
        assert_eq!(triangle.edges()[0], GraphEdge::new(0, 1, 4));
        assert_eq!(triangle.edges()[2], GraphEdge::new(1, 0, 11));
        assert_eq!(triangle.adjacency_matrix().get(0, 1), Distance::Finite(11));
    }

    #[rstest]
    fn given_view_when_graph_mutates_then_view_is_unchanged(mut triangle: Graph) {
        let matrix = triangle.adjacency_matrix();
        triangle.add_node(3);
        assert_eq!(matrix.size(), 3);
        assert_eq!(triangle.adjacency_matrix().size(), 4);
    }

    #[rstest]
    fn given_clear_when_readding_then_positions_restart(mut triangle: Graph) {
        triangle.clear();
        assert!(triangle.is_empty());
        triangle.add_node(42);
        assert_eq!(triangle.index_of(42), Some(0));
        assert!(triangle.edges().is_empty());
    }
}

use tracing::{debug, instrument};

use crate::algorithms::Snapshot;
use crate::domain::{AdjacencyMatrix, GraphEdge, GraphFrame, GraphNode, GraphStep, MatrixCell};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloydWarshallRun {
    pub steps: Vec<GraphStep>,
    /// All-pairs distances, indexed like the input matrix
    pub distances: AdjacencyMatrix,
}

/// All-pairs shortest paths over a working copy of `matrix`.
#[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
pub fn floyd_warshall(
    nodes: &[GraphNode],
    edges: &[GraphEdge],
    matrix: &AdjacencyMatrix,
) -> FloydWarshallRun {
    let graph = Snapshot::new(nodes, edges, matrix);
    let mut dist = matrix.clone();
    let mut steps = Vec::new();

    let step = |explanation: String,
                line: u32,
                dist: &AdjacencyMatrix,
                k: Option<usize>,
                cell: Option<(usize, usize)>| {
        GraphStep::new(
            explanation,
            Some(line),
            GraphFrame {
                matrix: Some(dist.clone()),
                current: k.and_then(|k| graph.id(k)),
                highlighted_node: cell.and_then(|(i, _)| graph.id(i)),
                highlighted_cell: cell.map(|(i, j)| MatrixCell::new(i, j)),
                ..graph.frame()
            },
        )
    };

    steps.push(step(
        "Starting Floyd-Warshall. The initial matrix holds the direct distances.".to_string(),
        5,
        &dist,
        None,
        None,
    ));

    let n = nodes.len();
    let mut improvements = 0usize;
    for k in 0..n {
        let k_id = nodes[k].id;
        steps.push(step(
            format!(
                "Main iteration (k={}): considering node {} as an intermediate.",
                k, k_id
            ),
            7,
            &dist,
            Some(k),
            None,
        ));

        for i in (0..n).filter(|&i| i != k) {
            for j in (0..n).filter(|&j| j != i && j != k) {
                let (i_id, j_id) = (nodes[i].id, nodes[j].id);
                steps.push(step(
                    format!("Evaluating the path from {} to {} via {}.", i_id, j_id, k_id),
                    9,
                    &dist,
                    Some(k),
                    Some((i, j)),
                ));

                let direct = dist.get(i, j);
                let detour = dist.get(i, k) + dist.get(k, j);
                if detour < direct {
                    dist.set(i, j, detour);
                    improvements += 1;
                    steps.push(step(
                        format!(
                            "Updated! New distance from {} to {} is {} (previously {}).",
                            i_id, j_id, detour, direct
                        ),
                        12,
                        &dist,
                        Some(k),
                        Some((i, j)),
                    ));
                }
            }
        }
    }

    steps.push(step(
        "Floyd-Warshall completed. The final distance matrix has been computed.".to_string(),
        17,
        &dist,
        None,
        None,
    ));
    debug!(improvements, "floyd-warshall finished");
    FloydWarshallRun {
        steps,
        distances: dist,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Distance;
    use crate::graph::Graph;
    use rstest::rstest;

    fn square() -> Graph {
        let mut g = Graph::new();
        for id in [10, 20, 30, 40] {
            g.add_node(id);
        }
        g.add_edge(10, 20, 1);
        g.add_edge(20, 30, 1);
        g.add_edge(30, 40, 1);
        g.add_edge(10, 40, 5);
        g
    }

    #[rstest]
    fn given_square_when_running_then_long_edge_is_shortcut() {
        let g = square();
        let run = floyd_warshall(&g.nodes(), &g.edges(), &g.adjacency_matrix());
        assert_eq!(run.distances.get(0, 3), Distance::Finite(3));
        assert_eq!(run.distances.get(3, 0), Distance::Finite(3));
        assert_eq!(run.distances.get(1, 3), Distance::Finite(2));
        assert!(run.distances.is_symmetric());
        assert!(run
            .steps
            .iter()
            .any(|s| s.explanation.contains("(previously ∞)")));
    }

    #[rstest]
    fn given_n_nodes_when_running_then_one_evaluation_per_ordered_triple() {
        let g = square();
        let run = floyd_warshall(&g.nodes(), &g.edges(), &g.adjacency_matrix());
        let evaluations = run
            .steps
            .iter()
            .filter(|s| s.code_line == Some(9))
            .count();
        // n * (n-1) * (n-2)
        assert_eq!(evaluations, 4 * 3 * 2);
        assert_eq!(run.steps.iter().filter(|s| s.code_line == Some(7)).count(), 4);
    }

    #[rstest]
    fn given_run_when_finished_then_input_matrix_is_untouched() {
        let g = square();
        let matrix = g.adjacency_matrix();
        let run = floyd_warshall(&g.nodes(), &g.edges(), &matrix);
        assert_eq!(matrix.get(0, 2), Distance::Infinite);
        assert_eq!(run.steps[0].frame.matrix.as_ref(), Some(&matrix));
        assert_ne!(run.steps.last().unwrap().frame.matrix.as_ref(), Some(&matrix));
    }

    #[rstest]
    fn given_empty_graph_when_running_then_start_and_final_steps_only() {
        let run = floyd_warshall(&[], &[], &AdjacencyMatrix::new());
        assert_eq!(run.steps.len(), 2);
        assert!(run.distances.is_empty());
    }
}

//! Graph construction from command line specs and algorithm dispatch

use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::algorithms::{bfs, dfs, floyd_warshall, kruskal, shortest_path};
use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::GraphStep;
use crate::graph::Graph;
use crate::report::{Operation, Report};

/// One `SOURCE-TARGET:WEIGHT` edge argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSpec {
    pub source: i64,
    pub target: i64,
    pub weight: u64,
}

/// Parses edge specs; node ids may be negative (`-1--2:4`).
#[derive(Debug)]
pub struct EdgeSpecParser {
    pattern: Regex,
}

impl EdgeSpecParser {
    pub fn new() -> ApplicationResult<Self> {
        let pattern = Regex::new(r"^\s*(-?\d+)\s*-\s*(-?\d+)\s*:\s*(\d+)\s*$").map_err(|e| {
            ApplicationError::OperationFailed {
                context: "compile edge pattern".to_string(),
                source: Box::new(e),
            }
        })?;
        Ok(Self { pattern })
    }

    pub fn parse(&self, spec: &str) -> ApplicationResult<EdgeSpec> {
        let invalid = || ApplicationError::InvalidEdgeSpec(spec.to_string());
        let caps = self.pattern.captures(spec).ok_or_else(invalid)?;
        let field = |i: usize| caps.get(i).map(|m| m.as_str()).ok_or_else(invalid);
        Ok(EdgeSpec {
            source: field(1)?.parse().map_err(|_| invalid())?,
            target: field(2)?.parse().map_err(|_| invalid())?,
            weight: field(3)?.parse().map_err(|_| invalid())?,
        })
    }

    pub fn parse_all(&self, specs: &[String]) -> ApplicationResult<Vec<EdgeSpec>> {
        specs.iter().map(|s| self.parse(s)).collect()
    }
}

/// Adds the nodes, then the edges, concatenating the construction steps.
///
/// Rejected additions stay in the trace as explanation steps.
#[instrument(level = "debug", skip_all, fields(nodes = nodes.len(), edges = edges.len()))]
pub fn build_graph(nodes: &[i64], edges: &[EdgeSpec]) -> (Graph, Vec<GraphStep>) {
    let mut graph = Graph::new();
    let mut steps = Vec::new();
    for &id in nodes {
        steps.extend(graph.add_node(id));
    }
    for edge in edges {
        steps.extend(graph.add_edge(edge.source, edge.target, edge.weight));
    }
    (graph, steps)
}

/// Trace and report of one graph operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphRun {
    pub operation: Operation,
    pub steps: Vec<GraphStep>,
    pub report: Report,
}

/// Runs `operation` on snapshots of `graph`; `construction` is the trace of
/// [`Operation::Build`].
#[instrument(level = "debug", skip(graph, construction))]
pub fn run_operation(
    graph: &Graph,
    construction: Vec<GraphStep>,
    operation: Operation,
) -> GraphRun {
    let (nodes, edges, matrix) = (graph.nodes(), graph.edges(), graph.adjacency_matrix());
    let steps = match operation {
        Operation::Build => construction,
        Operation::Bfs { start } => bfs(&nodes, &edges, &matrix, start).steps,
        Operation::Dfs { start } => dfs(&nodes, &edges, &matrix, start).steps,
        Operation::Dijkstra { start, end } => {
            shortest_path(&nodes, &edges, &matrix, start, end).steps
        }
        Operation::FloydWarshall => floyd_warshall(&nodes, &edges, &matrix).steps,
        Operation::Kruskal => kruskal(&nodes, &edges).steps,
    };
    debug!(steps = steps.len(), "operation finished");
    let report = Report::new(operation, &nodes, &edges, &steps);
    GraphRun {
        operation,
        steps,
        report,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn parser() -> EdgeSpecParser {
        EdgeSpecParser::new().unwrap()
    }

    #[rstest]
    #[case("1-2:5", 1, 2, 5)]
    #[case(" 10 - 20 : 3 ", 10, 20, 3)]
    #[case("-1--2:4", -1, -2, 4)]
    fn given_valid_spec_when_parsing_then_fields_match(
        parser: EdgeSpecParser,
        #[case] spec: &str,
        #[case] source: i64,
        #[case] target: i64,
        #[case] weight: u64,
    ) {
        assert_eq!(parser.parse(spec).unwrap(), EdgeSpec { source, target, weight });
    }

    #[rstest]
    #[case("1-2")]
    #[case("1:2:3")]
    #[case("a-b:1")]
    #[case("1-2:-3")]
    #[case("1-2:99999999999999999999999")]
    fn given_malformed_spec_when_parsing_then_error(parser: EdgeSpecParser, #[case] spec: &str) {
        assert!(matches!(parser.parse(spec), Err(ApplicationError::InvalidEdgeSpec(_))));
    }

    #[rstest]
    fn given_specs_when_building_then_construction_steps_are_kept(parser: EdgeSpecParser) {
        let edges = parser.parse_all(&["0-1:1".to_string(), "1-2:2".to_string()]).unwrap();
        let (graph, steps) = build_graph(&[0, 1, 2], &edges);
        assert_eq!(graph.len(), 3);
        // two steps per node, three per edge
        assert_eq!(steps.len(), 3 * 2 + 2 * 3);

        let run = run_operation(&graph, steps, Operation::Dijkstra { start: 0, end: 2 });
        assert_eq!(run.report.results[0], "Path: 0 → 1 → 2");
    }

    #[rstest]
    fn given_edge_to_missing_node_when_building_then_error_step_is_recorded() {
        let (graph, steps) = build_graph(
            &[1],
            &[EdgeSpec {
                source: 1,
                target: 2,
                weight: 1,
            }],
        );
        assert!(graph.edges().is_empty());
        assert!(steps.last().unwrap().explanation.starts_with("Error"));
    }
}

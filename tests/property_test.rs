//! Property tests for the engine invariants

use proptest::prelude::*;

use algotrace::algorithms::{dijkstra, floyd_warshall, kruskal};
use algotrace::domain::{GraphEdge, NodeId, TreeSnapshot};
use algotrace::graph::Graph;
use algotrace::tree::{AvlTree, BinarySearchTree, SearchOutcome};

/// Height of the subtree at `id`, failing if any node is out of AVL balance
/// or carries a stale cached height.
fn checked_height(snapshot: &TreeSnapshot, id: Option<NodeId>) -> Result<i32, String> {
    let Some(node) = id.and_then(|id| snapshot.node(id)) else {
        return Ok(-1);
    };
    let left = checked_height(snapshot, node.left)?;
    let right = checked_height(snapshot, node.right)?;
    if (left - right).abs() > 1 {
        return Err(format!("node {} has balance factor {}", node.value, left - right));
    }
    let height = 1 + left.max(right);
    if height != node.height {
        return Err(format!("node {} caches height {} but is {}", node.value, node.height, height));
    }
    Ok(height)
}

fn strictly_increasing(values: &[i64]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

fn build_graph(n: usize, raw_edges: &[(usize, usize, u64)]) -> Graph {
    let mut graph = Graph::new();
    for id in 0..n as i64 {
        graph.add_node(id * 10);
    }
    for &(a, b, w) in raw_edges {
        graph.add_edge((a % n) as i64 * 10, (b % n) as i64 * 10, w);
    }
    graph
}

fn find(parent: &[usize], x: usize) -> usize {
    let mut root = x;
    while parent[root] != root {
        root = parent[root];
    }
    root
}

/// Edge count of a spanning forest, or None if `edges` contains a cycle.
fn forest_size(nodes: &[i64], edges: &[GraphEdge]) -> Option<usize> {
    let position = |id: i64| nodes.iter().position(|n| *n == id).unwrap_or(0);
    let mut parent: Vec<usize> = (0..nodes.len()).collect();
    for e in edges {
        let (a, b) = (find(&parent, position(e.source)), find(&parent, position(e.target)));
        if a == b {
            return None;
        }
        parent[b] = a;
    }
    Some(edges.len())
}

fn components(nodes: &[i64], edges: &[GraphEdge]) -> usize {
    let position = |id: i64| nodes.iter().position(|n| *n == id).unwrap_or(0);
    let mut parent: Vec<usize> = (0..nodes.len()).collect();
    for e in edges {
        let (a, b) = (find(&parent, position(e.source)), find(&parent, position(e.target)));
        parent[b] = a;
    }
    (0..nodes.len()).filter(|&i| find(&parent, i) == i).count()
}

/// Minimum weight over every spanning forest, by exhaustive search.
fn brute_force_msf(nodes: &[i64], edges: &[GraphEdge]) -> u64 {
    let target = nodes.len() - components(nodes, edges);
    (0u32..1 << edges.len())
        .filter_map(|mask| {
            let chosen: Vec<GraphEdge> = edges
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, e)| *e)
                .collect();
            match forest_size(nodes, &chosen) {
                Some(size) if size == target => Some(chosen.iter().map(|e| e.weight).sum()),
                _ => None,
            }
        })
        .min()
        .unwrap_or(0)
}

proptest! {
    #[test]
    fn given_any_inserts_when_traversing_then_bst_values_are_strictly_increasing(
        values in prop::collection::vec(-100i64..100, 0..40)
    ) {
        let mut tree = BinarySearchTree::new();
        tree.insert_many(&values);
        let order = tree.values();
        prop_assert!(strictly_increasing(&order));

        let steps = tree.in_order_traversal();
        prop_assert_eq!(steps.last().and_then(|s| s.frame.traversal.clone()), Some(order));
    }

    #[test]
    fn given_inserts_and_deletes_when_balancing_then_avl_stays_balanced_and_ordered(
        values in prop::collection::vec(-60i64..60, 0..50),
        removals in prop::collection::vec(-60i64..60, 0..30),
    ) {
        let mut tree = AvlTree::new();
        for v in &values {
            tree.insert(*v);
            let snapshot = tree.snapshot();
            prop_assert!(checked_height(&snapshot, snapshot.root).is_ok());
        }
        for v in &removals {
            tree.delete(*v);
            let snapshot = tree.snapshot();
            let checked = checked_height(&snapshot, snapshot.root);
            prop_assert!(checked.is_ok(), "{:?}", checked);
            prop_assert_eq!(checked.unwrap_or(-2), tree.height());
        }
        prop_assert!(strictly_increasing(&tree.values()));
    }

    #[test]
    fn given_existing_value_when_reinserting_then_tree_is_identical(
        values in prop::collection::vec(-50i64..50, 1..30),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut tree = AvlTree::new();
        tree.insert_many(&values);
        let before = tree.snapshot();
        let steps = tree.insert(values[pick.index(values.len())]);
        prop_assert_eq!(steps.len(), 1);
        prop_assert_eq!(tree.snapshot(), before);
    }

    #[test]
    fn given_insert_then_delete_when_searching_then_found_then_not_found(
        values in prop::collection::vec(-50i64..50, 0..30),
        probe in -50i64..50,
    ) {
        let mut tree = BinarySearchTree::new();
        tree.insert_many(&values);
        tree.insert(probe);
        let (outcome, _) = tree.search_with_outcome(probe);
        prop_assert!(outcome.is_found());

        tree.delete(probe);
        let (outcome, steps) = tree.search_with_outcome(probe);
        prop_assert_eq!(outcome, SearchOutcome::NotFound);
        let last = steps.last().map(|s| s.explanation.clone()).unwrap_or_default();
        prop_assert!(last.contains("not found"));
    }

    #[test]
    fn given_random_graph_when_building_then_matrix_is_symmetric(
        n in 1usize..8,
        raw in prop::collection::vec((0usize..8, 0usize..8, 0u64..20), 0..20),
    ) {
        let graph = build_graph(n, &raw);
        prop_assert!(graph.adjacency_matrix().is_symmetric());
        prop_assert_eq!(graph.adjacency_matrix().size(), n);
    }

    #[test]
    fn given_random_graph_when_comparing_then_dijkstra_matches_floyd_warshall(
        n in 1usize..7,
        raw in prop::collection::vec((0usize..7, 0usize..7, 1u64..20), 0..15),
    ) {
        let graph = build_graph(n, &raw);
        let (nodes, edges, matrix) = (graph.nodes(), graph.edges(), graph.adjacency_matrix());
        let all_pairs = floyd_warshall(&nodes, &edges, &matrix).distances;

        for (i, start) in nodes.iter().enumerate() {
            let run = dijkstra(&nodes, &edges, &matrix, start.id);
            for (j, target) in nodes.iter().enumerate() {
                prop_assert_eq!(run.distance_to(target.id), all_pairs.get(i, j));
            }
        }
    }

    #[test]
    fn given_small_graph_when_running_kruskal_then_minimal_spanning_forest(
        n in 1usize..6,
        raw in prop::collection::vec((0usize..6, 0usize..6, 1u64..10), 0..9),
    ) {
        let graph = build_graph(n, &raw);
        let (nodes, edges) = (graph.nodes(), graph.edges());
        let ids: Vec<i64> = nodes.iter().map(|n| n.id).collect();
        let mst = kruskal(&nodes, &edges);

        prop_assert_eq!(forest_size(&ids, &mst.edges), Some(ids.len() - components(&ids, &edges)));
        prop_assert_eq!(mst.total_weight, brute_force_msf(&ids, &edges));
    }
}

//! Property-based tests over randomly generated graphs.

use proptest::prelude::*;
use rela_graph::{Direction, Edge, GraphData, Node, density};
use std::collections::HashSet;

const RELATIONSHIPS: [&str; 3] = ["uses", "calls", "owns"];

/// Up to 8 nodes and 16 edges; edges are `(from, to, type, bidirectional)`
/// with endpoints taken modulo the node count.
fn arb_graph() -> impl Strategy<Value = GraphData> {
    (1usize..=8)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((0..n, 0..n, 0usize..3, any::<bool>()), 0..16),
            )
        })
        .prop_map(|(n, edges)| {
            let mut graph = GraphData::new();
            for i in 0..n {
                let category = if i % 2 == 0 { "service" } else { "database" };
                graph
                    .add_node(Node::new(format!("n{i}"), category, format!("Node {i}")))
                    .unwrap();
            }
            for (from, to, rel, bidirectional) in edges {
                let mut edge = Edge::new(format!("n{from}"), format!("n{to}"), RELATIONSHIPS[rel]);
                if bidirectional {
                    edge = edge.bidirectional();
                }
                graph.add_edge(edge).unwrap();
            }
            graph
        })
}

fn node_ids(graph: &GraphData) -> Vec<String> {
    graph.node_ids().map(str::to_string).collect()
}

proptest! {
    #[test]
    fn test_fresh_node_has_no_neighbors(graph in arb_graph()) {
        let mut graph = graph;
        graph.add_node(Node::new("fresh", "service", "Fresh")).unwrap();
        for direction in [Direction::Out, Direction::In, Direction::Both] {
            prop_assert!(graph.get_neighbors("fresh", None, direction).unwrap().is_empty());
        }
    }

    #[test]
    fn test_bidirectional_edges_are_out_neighbors_both_ways(graph in arb_graph()) {
        for edge in graph.iter_edges().filter(|e| e.bidirectional) {
            let forward: Vec<String> = graph
                .get_neighbors(&edge.source_id, None, Direction::Out)
                .unwrap()
                .into_iter()
                .map(|n| n.id)
                .collect();
            let backward: Vec<String> = graph
                .get_neighbors(&edge.target_id, None, Direction::Out)
                .unwrap()
                .into_iter()
                .map(|n| n.id)
                .collect();
            prop_assert!(forward.contains(&edge.target_id));
            prop_assert!(backward.contains(&edge.source_id));
        }
    }

    #[test]
    fn test_neighbors_are_unique(graph in arb_graph()) {
        for id in node_ids(&graph) {
            let neighbors = graph.get_neighbors(&id, None, Direction::Both).unwrap();
            let unique: HashSet<&str> = neighbors.iter().map(|n| n.id.as_str()).collect();
            prop_assert_eq!(unique.len(), neighbors.len());
        }
    }

    #[test]
    fn test_self_path_is_trivial(graph in arb_graph()) {
        for id in node_ids(&graph) {
            let path = graph.find_shortest_path(&id, &id).unwrap();
            prop_assert!(path.found);
            prop_assert_eq!(path.distance, 0);
            prop_assert_eq!(path.node_ids(), vec![id.as_str()]);
        }
    }

    #[test]
    fn test_shortest_path_is_optimal(graph in arb_graph()) {
        let ids = node_ids(&graph);
        let max_depth = ids.len();
        for from in &ids {
            for to in &ids {
                let shortest = graph.find_shortest_path(from, to).unwrap();
                let all = graph.find_all_paths(from, to, max_depth).unwrap();
                let min_depth = all.iter().map(|p| p.depth).min();

                if shortest.found {
                    prop_assert_eq!(Some(shortest.distance), min_depth);
                    prop_assert_eq!(shortest.path.len(), shortest.distance + 1);
                    prop_assert_eq!(shortest.edges.len(), shortest.distance);
                } else {
                    prop_assert!(all.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_all_paths_are_bounded_and_simple(graph in arb_graph(), max_depth in 0usize..5) {
        let ids = node_ids(&graph);
        for from in &ids {
            for to in &ids {
                for path in graph.find_all_paths(from, to, max_depth).unwrap() {
                    prop_assert!(path.depth <= max_depth || from == to);
                    prop_assert_eq!(path.nodes.len(), path.depth + 1);
                    let unique: HashSet<&String> = path.nodes.iter().collect();
                    prop_assert_eq!(unique.len(), path.nodes.len());
                    prop_assert_eq!(path.nodes.first(), Some(from));
                    prop_assert_eq!(path.nodes.last(), Some(to));
                }
            }
        }
    }

    #[test]
    fn test_communities_partition_nodes(graph in arb_graph()) {
        let communities = graph.detect_communities().unwrap();
        let total: usize = communities.iter().map(|c| c.len()).sum();
        prop_assert_eq!(total, graph.node_count());

        let union: HashSet<&String> = communities.iter().flatten().collect();
        prop_assert_eq!(union.len(), graph.node_count());

        for community in &communities {
            if let Some(first) = community.iter().next() {
                prop_assert_eq!(&graph.get_connected_component(first).unwrap(), community);
            }
        }
    }

    #[test]
    fn test_density_in_unit_interval(graph in arb_graph()) {
        let stats = graph.get_graph_stats();
        prop_assert!((0.0..=1.0).contains(&stats.density));
        if stats.node_count < 2 {
            prop_assert_eq!(stats.density, 0.0);
        }
    }

    #[test]
    fn test_density_formula(nodes in 0usize..50, edges in 0usize..200) {
        let d = density(nodes, edges);
        prop_assert!((0.0..=1.0).contains(&d));
    }

    #[test]
    fn test_suggestions_sorted_and_positive(graph in arb_graph(), limit in 0usize..6) {
        for id in node_ids(&graph) {
            let suggestions = graph.suggest_relationships(&id, limit).unwrap();
            prop_assert!(suggestions.len() <= limit);
            prop_assert!(suggestions.iter().all(|s| s.similarity > 0.0 && s.node_id != id));
            prop_assert!(
                suggestions
                    .windows(2)
                    .all(|w| w[0].similarity >= w[1].similarity)
            );
        }
    }
}

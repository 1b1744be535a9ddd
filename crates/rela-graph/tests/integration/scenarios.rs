//! End-to-end scenarios over small registries.

use rela_graph::{
    CancelToken, Direction, Edge, GraphData, Node, PathSearch, SuggestOptions, load_graph,
    save_graph,
};
use std::collections::BTreeSet;

use crate::common::{four_cycle, neighbor_ids, platform, service_registry};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ----------------------------------------------------------------------------
// Service registry: A(service) -> B(database), C(service)
// ----------------------------------------------------------------------------

#[test]
fn test_registry_neighbors() {
    let graph = service_registry();

    assert_eq!(neighbor_ids(&graph, "A", None, Direction::Both), vec!["B"]);
    assert!(neighbor_ids(&graph, "B", None, Direction::Out).is_empty());
    assert_eq!(neighbor_ids(&graph, "B", None, Direction::In), vec!["A"]);
    assert!(neighbor_ids(&graph, "C", None, Direction::Both).is_empty());
}

#[test]
fn test_registry_shortest_paths() {
    let graph = service_registry();

    let forward = graph.find_shortest_path("A", "B").unwrap();
    assert!(forward.found);
    assert_eq!(forward.node_ids(), vec!["A", "B"]);
    assert_eq!(forward.distance, 1);
    assert_eq!(forward.total_weight, 1.0);
    assert_eq!(forward.edges[0].relationship_type, "uses");

    let backward = graph.find_shortest_path("B", "A").unwrap();
    assert!(!backward.found);
    assert!(backward.path.is_empty());
}

#[test]
fn test_registry_suggestions_prefer_same_category() {
    let graph = service_registry();
    let suggestions = graph.suggest_relationships("A", 10).unwrap();

    assert_eq!(suggestions[0].node_id, "C");
    assert!(suggestions[0].category_match);
    assert!(suggestions.iter().all(|s| s.node_id != "B"));
}

// ----------------------------------------------------------------------------
// Four-cycle
// ----------------------------------------------------------------------------

#[test]
fn test_cycle_component_ignores_direction() {
    let graph = four_cycle();
    assert_eq!(
        graph.get_connected_component("A").unwrap(),
        set(&["A", "B", "C", "D"])
    );
}

#[test]
fn test_cycle_single_community() {
    let communities = four_cycle().detect_communities().unwrap();
    assert_eq!(communities.len(), 1);
    assert_eq!(communities[0].len(), 4);
}

#[test]
fn test_cycle_paths_follow_direction() {
    let graph = four_cycle();

    let path = graph.find_shortest_path("A", "D").unwrap();
    assert_eq!(path.node_ids(), vec!["A", "B", "C", "D"]);

    let all = graph.find_all_paths("A", "D", 5).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].depth, 3);
    assert!(graph.find_all_paths("A", "D", 2).unwrap().is_empty());
}

#[test]
fn test_cycle_centrality_is_uniform() {
    let graph = four_cycle();
    let reports = graph.analyze_centrality("A").unwrap().unwrap();
    let other = graph.analyze_centrality("C").unwrap().unwrap();

    assert_eq!(reports.degree_centrality, other.degree_centrality);
    assert!((reports.betweenness_centrality - other.betweenness_centrality).abs() < 1e-12);
    // Distances 1, 2, 3 to the other three nodes.
    assert!((reports.closeness_centrality - 0.5).abs() < 1e-12);
}

// ----------------------------------------------------------------------------
// Platform topology
// ----------------------------------------------------------------------------

#[test]
fn test_platform_bidirectional_neighbors() {
    let graph = platform();

    let out = neighbor_ids(&graph, "billing", None, Direction::Out);
    assert_eq!(out, vec!["orders-db", "orders", "ledger"]);

    let peers = neighbor_ids(&graph, "billing", Some("peers"), Direction::Out);
    assert_eq!(peers, vec!["orders"]);

    let incoming = neighbor_ids(&graph, "orders-db", Some("uses"), Direction::In);
    assert_eq!(incoming, vec!["orders", "billing"]);
}

#[test]
fn test_platform_shortest_path_over_reverse_edge() {
    let graph = platform();

    let path = graph.find_shortest_path("billing", "orders").unwrap();
    assert_eq!(path.node_ids(), vec!["billing", "orders"]);
    assert_eq!(path.edges[0].relationship_type, "peers");

    let to_ledger = graph.find_shortest_path("gateway", "ledger").unwrap();
    assert_eq!(to_ledger.node_ids(), vec!["gateway", "billing", "ledger"]);
    assert_eq!(to_ledger.total_weight, 2.0);

    assert!(!graph.find_shortest_path("ledger", "gateway").unwrap().found);
    assert!(!graph.find_shortest_path("gateway", "metrics").unwrap().found);
}

#[test]
fn test_platform_all_paths() {
    let graph = platform();

    let paths = graph.find_all_paths("gateway", "orders-db", 3).unwrap();
    let nodes: Vec<Vec<String>> = paths.iter().map(|p| p.nodes.clone()).collect();
    assert_eq!(
        nodes,
        vec![
            vec!["gateway", "orders", "orders-db"],
            vec!["gateway", "orders", "billing", "orders-db"],
            vec!["gateway", "billing", "orders-db"],
            vec!["gateway", "billing", "orders", "orders-db"],
        ]
    );
    assert_eq!(paths[0].score, 0.5);
    assert!((paths[1].score - 1.0 / 3.0).abs() < 1e-12);

    assert_eq!(graph.find_all_paths("gateway", "orders-db", 2).unwrap().len(), 2);
}

#[test]
fn test_platform_communities() {
    let communities = platform().detect_communities().unwrap();
    assert_eq!(communities.len(), 2);
    assert_eq!(
        communities[0],
        set(&["gateway", "orders", "billing", "orders-db", "ledger"])
    );
    assert_eq!(communities[1], set(&["metrics"]));
}

#[test]
fn test_platform_centrality_ranking() {
    let graph = platform();

    let billing = graph.analyze_centrality("billing").unwrap().unwrap();
    assert_eq!(billing.in_degree, 2);
    assert_eq!(billing.out_degree, 2);
    assert!((billing.degree_centrality - 4.0 / 12.0).abs() < 1e-12);
    assert!(billing.betweenness_centrality > 0.0);

    let ranked = rela_graph::rank_centrality(&graph, 2).unwrap();
    assert_eq!(ranked.len(), 2);
    assert_eq!(ranked[0].node_id, "billing");
    assert_eq!(ranked[1].node_id, "orders");

    let isolated = graph.analyze_centrality("metrics").unwrap().unwrap();
    assert_eq!(isolated.degree_centrality, 0.0);
    assert_eq!(isolated.closeness_centrality, 0.0);

    assert!(graph.analyze_centrality("ghost").unwrap().is_none());
}

#[test]
fn test_platform_suggestions() {
    let graph = platform();

    let ranked: Vec<String> = graph
        .suggest_relationships("orders", 10)
        .unwrap()
        .into_iter()
        .map(|s| s.node_id)
        .collect();
    assert_eq!(ranked, vec!["billing", "gateway", "orders-db"]);

    let options = SuggestOptions {
        exclude_connected: true,
        ..SuggestOptions::default()
    };
    let unconnected = rela_graph::suggest_relationships_with(&graph, "orders", &options).unwrap();
    assert!(unconnected.is_empty());
}

#[test]
fn test_platform_stats() {
    let stats = platform().get_graph_stats();
    assert_eq!(stats.node_count, 6);
    assert_eq!(stats.edge_count, 6);
    assert_eq!(stats.orphan_count, 1);
    assert_eq!(stats.relationship_distribution["routes"], 2);
    assert_eq!(stats.category_distribution["service"], 3);
    assert!((stats.density - 12.0 / 30.0).abs() < 1e-12);
}

#[test]
fn test_platform_remove_node() {
    let mut graph = platform();
    let removed = graph.remove_node("billing").unwrap();
    assert_eq!(removed.id, "billing");

    assert_eq!(graph.edge_count(), 2);
    assert_eq!(neighbor_ids(&graph, "orders", None, Direction::Both), vec!["gateway", "orders-db"]);
    assert!(!graph.find_shortest_path("gateway", "ledger").unwrap().found);
    assert!(graph.remove_node("billing").is_none());
}

#[test]
fn test_cancelled_search_returns_error() {
    let graph = platform();
    let token = CancelToken::new();
    token.cancel();

    let search = PathSearch::new(3).with_cancel(token);
    let err = rela_graph::find_all_paths_with(&graph, "gateway", "orders-db", &search)
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[test]
fn test_roundtrip_after_removal_keeps_tie_breaking() {
    let mut graph = GraphData::new();
    for id in ["a", "b", "c", "t", "x"] {
        graph.add_node(Node::new(id, "service", id)).unwrap();
    }
    graph.add_edge(Edge::new("a", "x", "uses")).unwrap();
    graph.add_edge(Edge::new("a", "b", "uses")).unwrap();
    graph.remove_node("x");
    graph.add_edge(Edge::new("a", "c", "uses")).unwrap();
    graph.add_edge(Edge::new("b", "t", "uses")).unwrap();
    graph.add_edge(Edge::new("c", "t", "uses")).unwrap();

    let before = graph.find_shortest_path("a", "t").unwrap();
    assert_eq!(before.node_ids(), vec!["a", "b", "t"]);

    let (restored, _) = GraphData::from_serializable(graph.to_serializable(None)).unwrap();
    let after = restored.find_shortest_path("a", "t").unwrap();
    assert_eq!(after.node_ids(), before.node_ids());
    assert_eq!(
        neighbor_ids(&restored, "a", None, Direction::Out),
        neighbor_ids(&graph, "a", None, Direction::Out)
    );
}

#[test]
fn test_snapshot_file_roundtrip_preserves_queries() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("platform.json");
    let graph = platform();

    save_graph(&graph, &path, None).unwrap();
    let (restored, stats) = load_graph(&path).unwrap();

    assert_eq!(stats.nodes_restored, 6);
    assert_eq!(stats.edges_restored, 6);
    assert_eq!(
        neighbor_ids(&restored, "billing", None, Direction::Out),
        neighbor_ids(&graph, "billing", None, Direction::Out)
    );
    assert_eq!(
        restored.find_all_paths("gateway", "orders-db", 3).unwrap(),
        graph.find_all_paths("gateway", "orders-db", 3).unwrap()
    );
}

#[test]
fn test_invalid_input_is_rejected() {
    let mut graph = GraphData::new();
    assert!(graph.add_node(Node::new("", "service", "x")).unwrap_err().is_validation());
    assert!(graph.add_node(Node::new("a", " ", "x")).unwrap_err().is_validation());

    graph.add_node(Node::new("a", "service", "A")).unwrap();
    graph.add_node(Node::new("b", "service", "B")).unwrap();
    let negative = Edge::new("a", "b", "uses").with_weight(-1.0);
    assert!(graph.add_edge(negative).unwrap_err().is_validation());
    assert!(graph.add_edge(Edge::new("a", "b", "")).unwrap_err().is_validation());
    assert_eq!(graph.edge_count(), 0);

    assert!(graph.find_shortest_path("", "a").unwrap_err().is_validation());
    assert!(
        graph
            .find_all_paths("a", "b", rela_graph::MAX_PATH_DEPTH + 1)
            .unwrap_err()
            .is_validation()
    );
}

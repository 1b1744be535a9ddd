//! Shared graph fixtures for integration tests.

#![allow(dead_code)]

use rela_graph::{Direction, Edge, GraphData, Node};

/// IDs of the returned nodes, in order.
pub fn ids(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

/// IDs of the neighbors of `id`, in order.
pub fn neighbor_ids(
    graph: &GraphData,
    id: &str,
    relationship: Option<&str>,
    direction: Direction,
) -> Vec<String> {
    ids(&graph.get_neighbors(id, relationship, direction).unwrap())
}

/// `A(service) -> B(database)` via "uses", plus an unconnected `C(service)`.
pub fn service_registry() -> GraphData {
    let mut graph = GraphData::new();
    graph.add_node(Node::new("A", "service", "Service A")).unwrap();
    graph.add_node(Node::new("B", "database", "Database B")).unwrap();
    graph.add_node(Node::new("C", "service", "Service C")).unwrap();
    graph
        .add_edge(Edge::new("A", "B", "uses").with_weight(1.0))
        .unwrap();
    graph
}

/// Directed cycle `A -> B -> C -> D -> A`.
pub fn four_cycle() -> GraphData {
    let mut graph = GraphData::new();
    for id in ["A", "B", "C", "D"] {
        graph.add_node(Node::new(id, "service", id)).unwrap();
    }
    for (from, to) in [("A", "B"), ("B", "C"), ("C", "D"), ("D", "A")] {
        graph.add_edge(Edge::new(from, to, "calls")).unwrap();
    }
    graph
}

/// A small production-like topology with fan-out, a shared database, a
/// bidirectional peer link, and an isolated node.
///
/// ```text
/// gateway -> orders -> orders-db
/// gateway -> billing -> orders-db
/// orders <-> billing (peers)
/// billing -> ledger
/// metrics (isolated)
/// ```
pub fn platform() -> GraphData {
    let mut graph = GraphData::new();
    graph
        .add_node(Node::new("gateway", "service", "Gateway").with_attribute("team", "edge"))
        .unwrap();
    graph
        .add_node(
            Node::new("orders", "service", "Orders")
                .with_attribute("team", "commerce")
                .with_attribute("language", "rust"),
        )
        .unwrap();
    graph
        .add_node(
            Node::new("billing", "service", "Billing")
                .with_attribute("team", "finance")
                .with_attribute("language", "rust"),
        )
        .unwrap();
    graph
        .add_node(
            Node::new("orders-db", "database", "Orders DB")
                .with_attribute("team", "commerce"),
        )
        .unwrap();
    graph
        .add_node(Node::new("ledger", "database", "Ledger"))
        .unwrap();
    graph
        .add_node(Node::new("metrics", "stream", "Metrics"))
        .unwrap();

    graph.add_edge(Edge::new("gateway", "orders", "routes")).unwrap();
    graph.add_edge(Edge::new("gateway", "billing", "routes")).unwrap();
    graph.add_edge(Edge::new("orders", "orders-db", "uses")).unwrap();
    graph
        .add_edge(Edge::new("billing", "orders-db", "uses").with_weight(0.5))
        .unwrap();
    graph
        .add_edge(Edge::new("orders", "billing", "peers").bidirectional())
        .unwrap();
    graph.add_edge(Edge::new("billing", "ledger", "writes")).unwrap();
    graph
}

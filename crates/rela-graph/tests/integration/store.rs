//! Concurrent access through `GraphStore`.

use rela_graph::{Direction, Edge, GraphStore, Node};

use crate::common::platform;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration() {
    let store = GraphStore::new();
    store.add_node(Node::new("hub", "service", "Hub")).await.unwrap();

    let mut tasks = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let id = format!("svc-{i}");
            store.add_node(Node::new(id.as_str(), "service", id.as_str())).await.unwrap();
            store
                .add_edge(Edge::new("hub", id.as_str(), "routes").bidirectional())
                .await
                .unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(store.node_count().await, 17);
    assert_eq!(store.edge_count().await, 16);
    assert_eq!(store.get_neighbors("hub", None, Direction::Out).await.unwrap().len(), 16);
    for i in 0..16 {
        let back = store
            .get_neighbors(&format!("svc-{i}"), None, Direction::Out)
            .await
            .unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].id, "hub");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_readers_see_consistent_bidirectional_edges() {
    let store = GraphStore::new();
    store.add_node(Node::new("left", "service", "Left")).await.unwrap();

    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for i in 0..32 {
                let id = format!("right-{i}");
                store.add_node(Node::new(id.as_str(), "service", id.as_str())).await.unwrap();
                store
                    .add_edge(Edge::new("left", id.as_str(), "peers").bidirectional())
                    .await
                    .unwrap();
            }
        })
    };

    let reader = {
        let store = store.clone();
        tokio::spawn(async move {
            for _ in 0..64 {
                let graph = store.read().await;
                for node in graph.get_neighbors("left", None, Direction::Out).unwrap() {
                    let back = graph.get_neighbors(&node.id, None, Direction::Out).unwrap();
                    assert!(back.iter().any(|n| n.id == "left"));
                }
                drop(graph);
                tokio::task::yield_now().await;
            }
        })
    };

    writer.await.unwrap();
    reader.await.unwrap();
    assert_eq!(store.edge_count().await, 32);
}

#[tokio::test]
async fn test_store_over_existing_graph() {
    let store = GraphStore::with_graph(platform());

    let path = store.find_shortest_path("gateway", "ledger").await.unwrap();
    assert_eq!(path.distance, 2);

    let communities = store.detect_communities().await.unwrap();
    assert_eq!(communities.len(), 2);

    let snapshot = store.snapshot(None).await;
    assert_eq!(snapshot.nodes.len(), 6);
    assert_eq!(snapshot.edges.len(), 6);
}

//! Shared, lock-guarded graph handle.
//!
//! [`GraphStore`] is what a host application constructs and hands to the
//! services that register entities or query the graph. It wraps
//! [`GraphData`] in an `Arc<RwLock<_>>`: registration takes the write lock,
//! so a bidirectional edge's forward and reverse adjacency entries become
//! visible together, while any number of queries share the read lock.
//!
//! # Example
//!
//! ```rust
//! use rela_graph::{Direction, Edge, GraphStore, Node};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = GraphStore::new();
//! store.add_node(Node::new("api", "service", "API")).await.unwrap();
//! store.add_node(Node::new("db", "database", "DB")).await.unwrap();
//! store.add_edge(Edge::new("api", "db", "uses")).await.unwrap();
//!
//! let neighbors = store.get_neighbors("api", None, Direction::Out).await.unwrap();
//! assert_eq!(neighbors[0].id, "db");
//! # }
//! ```

use crate::algorithms::{self, CentralityReport, PathResult, PathSearch, ScoredPath};
use crate::persistence::{GraphMetadata, RestoreStats, SerializableGraph};
use crate::stats::{self, GraphStats};
use crate::suggest::{self, SuggestOptions, Suggestion};
use crate::{Direction, Edge, GraphData, Node};
use rela_core::{Error, Result};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Cloneable handle to a shared relationship graph.
///
/// Clones share the same graph.
#[derive(Clone, Debug, Default)]
pub struct GraphStore {
    graph: Arc<RwLock<GraphData>>,
}

impl GraphStore {
    /// Create a store over an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that owns the given graph.
    pub fn with_graph(graph: GraphData) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
        }
    }

    /// Create a store over an existing shared graph.
    pub fn with_shared(graph: Arc<RwLock<GraphData>>) -> Self {
        Self { graph }
    }

    /// Hold the read lock for several queries against one consistent snapshot.
    pub async fn read(&self) -> RwLockReadGuard<'_, GraphData> {
        self.graph.read().await
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// See [`GraphData::add_node`].
    pub async fn add_node(&self, node: Node) -> Result<bool> {
        self.graph.write().await.add_node(node)
    }

    /// See [`GraphData::add_edge`].
    pub async fn add_edge(&self, edge: Edge) -> Result<bool> {
        self.graph.write().await.add_edge(edge)
    }

    /// See [`GraphData::remove_node`].
    pub async fn remove_node(&self, id: &str) -> Option<Node> {
        self.graph.write().await.remove_node(id)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Look up a node by ID.
    pub async fn get_node(&self, id: &str) -> Option<Node> {
        self.graph.read().await.get_node(id).cloned()
    }

    /// Number of registered nodes.
    pub async fn node_count(&self) -> usize {
        self.graph.read().await.node_count()
    }

    /// Number of stored edges.
    pub async fn edge_count(&self) -> usize {
        self.graph.read().await.edge_count()
    }

    /// See [`GraphData::get_neighbors`].
    pub async fn get_neighbors(
        &self,
        node_id: &str,
        relationship_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Node>> {
        self.graph
            .read()
            .await
            .get_neighbors(node_id, relationship_type, direction)
    }

    /// See [`stats::compute_stats`].
    pub async fn get_graph_stats(&self) -> GraphStats {
        stats::compute_stats(&*self.graph.read().await)
    }

    /// See [`algorithms::find_shortest_path`].
    pub async fn find_shortest_path(&self, source_id: &str, target_id: &str) -> Result<PathResult> {
        algorithms::find_shortest_path(&*self.graph.read().await, source_id, target_id)
    }

    /// See [`algorithms::find_all_paths`].
    pub async fn find_all_paths(
        &self,
        source_id: &str,
        target_id: &str,
        max_depth: usize,
    ) -> Result<Vec<ScoredPath>> {
        self.find_all_paths_with(source_id, target_id, &PathSearch::new(max_depth))
            .await
    }

    /// See [`algorithms::find_all_paths_with`].
    ///
    /// The search runs on tokio's blocking pool so it never stalls a worker
    /// thread. It holds the read lock until it finishes, so writers queue
    /// behind it; set a deadline or cancel token on large graphs.
    pub async fn find_all_paths_with(
        &self,
        source_id: &str,
        target_id: &str,
        search: &PathSearch,
    ) -> Result<Vec<ScoredPath>> {
        let graph = Arc::clone(&self.graph).read_owned().await;
        let source_id = source_id.to_string();
        let target_id = target_id.to_string();
        let search = search.clone();

        tokio::task::spawn_blocking(move || {
            algorithms::find_all_paths_with(&graph, &source_id, &target_id, &search)
        })
        .await
        .map_err(|e| Error::internal(format!("path search task failed: {e}")))?
    }

    /// See [`algorithms::get_connected_component`].
    pub async fn get_connected_component(&self, node_id: &str) -> Result<BTreeSet<String>> {
        algorithms::get_connected_component(&*self.graph.read().await, node_id)
    }

    /// See [`algorithms::detect_communities`].
    pub async fn detect_communities(&self) -> Result<Vec<BTreeSet<String>>> {
        algorithms::detect_communities(&*self.graph.read().await)
    }

    /// See [`algorithms::analyze_centrality`].
    pub async fn analyze_centrality(&self, node_id: &str) -> Result<Option<CentralityReport>> {
        algorithms::analyze_centrality(&*self.graph.read().await, node_id)
    }

    /// See [`algorithms::rank_centrality`].
    pub async fn rank_centrality(&self, limit: usize) -> Result<Vec<CentralityReport>> {
        algorithms::rank_centrality(&*self.graph.read().await, limit)
    }

    /// See [`suggest::suggest_relationships`].
    pub async fn suggest_relationships(
        &self,
        node_id: &str,
        limit: usize,
    ) -> Result<Vec<Suggestion>> {
        suggest::suggest_relationships(&*self.graph.read().await, node_id, limit)
    }

    /// See [`suggest::suggest_relationships_with`].
    pub async fn suggest_relationships_with(
        &self,
        node_id: &str,
        options: &SuggestOptions,
    ) -> Result<Vec<Suggestion>> {
        suggest::suggest_relationships_with(&*self.graph.read().await, node_id, options)
    }

    // ========================================================================
    // Snapshot / restore
    // ========================================================================

    /// Take a serializable snapshot of the current graph.
    pub async fn snapshot(&self, metadata: Option<GraphMetadata>) -> SerializableGraph {
        self.graph.read().await.to_serializable(metadata)
    }

    /// Replace the whole graph with the contents of a snapshot.
    ///
    /// The snapshot is rebuilt before the write lock is taken, so a failed
    /// restore leaves the current graph untouched.
    pub async fn restore(&self, snapshot: SerializableGraph) -> Result<RestoreStats> {
        let (graph, stats) = GraphData::from_serializable(snapshot)?;
        *self.graph.write().await = graph;
        Ok(stats)
    }
}

//! Graph snapshots.
//!
//! The engine itself is in-memory. A persistence collaborator can take a
//! [`SerializableGraph`] snapshot, store it however it likes, and restore it
//! into a fresh graph at startup. JSON file helpers are provided for the
//! common case.

use crate::{Edge, GraphData, Node};
use chrono::{DateTime, Utc};
use rela_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Serializable types
// ============================================================================

/// Serializable representation of graph data.
///
/// Nodes and edges are listed in graph iteration order; the adjacency index
/// is rebuilt on restore.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SerializableGraph {
    /// All nodes in the graph.
    pub nodes: Vec<Node>,
    /// All edges in the graph.
    pub edges: Vec<Edge>,
    /// Optional metadata about the snapshot.
    #[serde(default)]
    pub metadata: Option<GraphMetadata>,
}

/// Metadata about a persisted graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Version of the engine that wrote it.
    pub engine_version: String,
    /// Free-form description of where the graph came from.
    pub source: Option<String>,
}

impl Default for GraphMetadata {
    fn default() -> Self {
        Self {
            saved_at: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            source: None,
        }
    }
}

/// Outcome of restoring a snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestoreStats {
    /// Nodes inserted.
    pub nodes_restored: usize,
    /// Duplicate node ids ignored.
    pub duplicate_nodes: usize,
    /// Edges inserted.
    pub edges_restored: usize,
    /// Edges naming a node that is not in the snapshot.
    pub edges_skipped: usize,
}

// ============================================================================
// Conversion
// ============================================================================

impl GraphData {
    /// Snapshot the graph.
    pub fn to_serializable(&self, metadata: Option<GraphMetadata>) -> SerializableGraph {
        SerializableGraph {
            nodes: self.iter_nodes().cloned().collect(),
            edges: self.iter_edges().cloned().collect(),
            metadata,
        }
    }

    /// Build a graph from a snapshot.
    ///
    /// Edges with missing endpoints are skipped and counted; invalid nodes
    /// or edges (empty ids, negative weights) fail the whole restore.
    pub fn from_serializable(snapshot: SerializableGraph) -> Result<(GraphData, RestoreStats)> {
        let mut graph = GraphData::new();
        let mut stats = RestoreStats::default();

        for node in snapshot.nodes {
            if graph.add_node(node)? {
                stats.nodes_restored += 1;
            } else {
                stats.duplicate_nodes += 1;
            }
        }

        for edge in snapshot.edges {
            if graph.add_edge(edge)? {
                stats.edges_restored += 1;
            } else {
                stats.edges_skipped += 1;
            }
        }

        if stats.edges_skipped > 0 {
            log::warn!(
                "Snapshot restore skipped {} edge(s) with missing endpoints",
                stats.edges_skipped
            );
        }
        log::info!(
            "Restored graph: {} nodes, {} edges",
            stats.nodes_restored,
            stats.edges_restored
        );

        Ok((graph, stats))
    }
}

// ============================================================================
// Save / Load
// ============================================================================

/// Save a graph to a JSON file.
pub fn save_graph(
    graph: &GraphData,
    path: impl AsRef<Path>,
    metadata: Option<GraphMetadata>,
) -> Result<()> {
    let snapshot = graph.to_serializable(metadata);
    let json = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| Error::serialization(format!("Failed to serialize graph: {e}")))?;

    std::fs::write(path.as_ref(), json).map_err(|e| Error::io_with_path(e, path.as_ref()))?;
    log::info!(
        "Saved graph ({} nodes, {} edges) to {}",
        graph.node_count(),
        graph.edge_count(),
        path.as_ref().display()
    );

    Ok(())
}

/// Load a graph from a JSON file.
pub fn load_graph(path: impl AsRef<Path>) -> Result<(GraphData, RestoreStats)> {
    let json = std::fs::read_to_string(path.as_ref())
        .map_err(|e| Error::io_with_path(e, path.as_ref()))?;

    load_graph_from_str(&json)
}

/// Load a graph from a JSON string.
pub fn load_graph_from_str(json: &str) -> Result<(GraphData, RestoreStats)> {
    let snapshot: SerializableGraph = serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("Failed to parse graph JSON: {e}")))?;

    GraphData::from_serializable(snapshot)
}

// ============================================================================
// Tests
// ============================================================================

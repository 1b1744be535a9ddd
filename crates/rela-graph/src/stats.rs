//! Graph statistics.
//!
//! Summarises graph size and composition: counts, observed relationship
//! types, density, and category/relationship breakdowns.

use crate::GraphData;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Types
// ============================================================================

/// Statistics about a graph snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Total number of nodes.
    pub node_count: usize,
    /// Total number of stored edges.
    pub edge_count: usize,
    /// Distinct relationship types observed on edges.
    pub relationship_types: BTreeSet<String>,
    /// `2·|E| / (|V|·(|V|−1))`, 0 below two nodes, capped at 1.
    pub density: f64,
    /// Nodes per category.
    pub category_distribution: BTreeMap<String, usize>,
    /// Edges per relationship type.
    pub relationship_distribution: BTreeMap<String, usize>,
    /// Nodes without any edges.
    pub orphan_count: usize,
    /// Average incident edges per node (in + out).
    pub avg_degree: f64,
}

// ============================================================================
// Functions
// ============================================================================

/// Graph density `2·|E| / (|V|·(|V|−1))`.
///
/// Zero for fewer than two nodes. Parallel edges can push the raw ratio past
/// one, so the result is capped.
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let n = node_count as f64;
    (2.0 * edge_count as f64 / (n * (n - 1.0))).min(1.0)
}

/// Compute statistics for a graph.
pub fn compute_stats(graph: &GraphData) -> GraphStats {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for node in graph.iter_nodes() {
        *category_distribution.entry(node.category.clone()).or_insert(0) += 1;
    }

    let mut relationship_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for edge in graph.iter_edges() {
        *relationship_distribution
            .entry(edge.relationship_type.clone())
            .or_insert(0) += 1;
    }
    let relationship_types = relationship_distribution.keys().cloned().collect();

    let orphan_count = graph
        .node_ids()
        .filter(|id| graph.in_degree(id) == 0 && graph.out_degree(id) == 0)
        .count();

    let avg_degree = if node_count > 0 {
        (2 * edge_count) as f64 / node_count as f64
    } else {
        0.0
    };

    GraphStats {
        node_count,
        edge_count,
        relationship_types,
        density: density(node_count, edge_count),
        category_distribution,
        relationship_distribution,
        orphan_count,
        avg_degree,
    }
}

impl GraphData {
    /// See [`compute_stats`].
    pub fn get_graph_stats(&self) -> GraphStats {
        compute_stats(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

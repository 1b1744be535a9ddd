//! Rela Graph: entity relationship graph engine.
//!
//! This crate provides the graph store, traversal algorithms, the
//! relationship suggestion heuristic, statistics, and JSON snapshots, built
//! on petgraph's `StableDiGraph`.
//!
//! # Modules
//!
//! - [`types`]: `Node`, `Edge`, `Direction`, and the `GraphData` store
//! - [`algorithms`]: shortest/all paths, components, communities, centrality
//! - [`suggest`]: category and attribute-overlap similarity
//! - [`stats`]: counts, density, distributions
//! - [`persistence`]: snapshot types and JSON save/load
//! - [`store`]: `GraphStore`, the shared lock-guarded handle

#![doc = include_str!("../README.md")]

pub mod algorithms;
pub mod persistence;
pub mod stats;
pub mod store;
pub mod suggest;
pub mod types;

// Re-export key types at crate root for convenience
pub use types::{DEFAULT_EDGE_WEIGHT, Direction, Edge, GraphData, Node};

pub use algorithms::{
    CancelToken, CentralityReport, DEFAULT_PATH_DEPTH, MAX_PATH_DEPTH, PathResult, PathSearch,
    ScoredPath, analyze_centrality, detect_communities, find_all_paths, find_all_paths_with,
    find_shortest_path, get_connected_component, rank_centrality,
};
pub use persistence::{
    GraphMetadata, RestoreStats, SerializableGraph, load_graph, load_graph_from_str, save_graph,
};
pub use stats::{GraphStats, compute_stats, density};
pub use store::GraphStore;
pub use suggest::{
    DEFAULT_SUGGESTION_LIMIT, SuggestOptions, Suggestion, similarity, suggest_relationships,
    suggest_relationships_with,
};

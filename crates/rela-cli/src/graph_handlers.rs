//! Handler functions for graph CLI commands.
//!
//! Each handler runs one query against a [`GraphStore`] and returns the
//! rendered output, either as text or as pretty-printed JSON of the result
//! type.

use crate::cli::OutputFormat;
use crate::config::RelaConfig;
use rela_core::{Error, Result};
use rela_graph::{CentralityReport, Direction, GraphStore, Node, load_graph};
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Option types
// ============================================================================

/// Options for `graph paths`.
#[derive(Debug, Clone)]
pub struct PathsOptions {
    /// Source node ID.
    pub from: String,
    /// Target node ID.
    pub to: String,
    /// Overrides `graph.max_path_depth`.
    pub max_depth: Option<usize>,
    /// Overrides `graph.path_timeout_ms`.
    pub timeout_ms: Option<u64>,
}

/// Options for `graph suggest`.
#[derive(Debug, Clone)]
pub struct SuggestArgs {
    /// Node to find suggestions for.
    pub id: String,
    /// Overrides `suggest.limit`.
    pub limit: Option<usize>,
    /// Overrides `suggest.min_similarity`.
    pub min_similarity: Option<f64>,
    /// Forces `suggest.exclude_connected` on.
    pub exclude_connected: bool,
}

// ============================================================================
// Loading
// ============================================================================

/// Restore a snapshot file into a fresh store.
pub fn open_store(path: &Path) -> Result<GraphStore> {
    let (graph, stats) = load_graph(path)?;
    tracing::debug!(
        nodes = stats.nodes_restored,
        edges = stats.edges_restored,
        skipped = stats.edges_skipped,
        "Loaded snapshot {}",
        path.display()
    );
    if stats.edges_skipped > 0 {
        tracing::warn!(
            "{} edge(s) in {} reference missing nodes and were skipped",
            stats.edges_skipped,
            path.display()
        );
    }
    Ok(GraphStore::with_graph(graph))
}

// ============================================================================
// Handlers
// ============================================================================

/// Show graph statistics.
pub async fn handle_stats(store: &GraphStore, format: OutputFormat) -> Result<String> {
    let stats = store.get_graph_stats().await;
    if format == OutputFormat::Json {
        return to_json(&stats);
    }

    let mut lines = vec![
        "Graph Statistics".to_string(),
        "================".to_string(),
        format!("Nodes:      {}", stats.node_count),
        format!("  Orphans:  {}", stats.orphan_count),
        format!("Edges:      {}", stats.edge_count),
        format!("Density:    {:.4}", stats.density),
        format!("Avg degree: {:.2}", stats.avg_degree),
    ];

    if !stats.category_distribution.is_empty() {
        lines.push(String::new());
        lines.push("Categories:".to_string());
        lines.extend(by_count(&stats.category_distribution));
    }

    if !stats.relationship_distribution.is_empty() {
        lines.push(String::new());
        lines.push("Relationships:".to_string());
        lines.extend(by_count(&stats.relationship_distribution));
    }

    Ok(lines.join("\n"))
}

/// List neighbors of a node.
pub async fn handle_neighbors(
    store: &GraphStore,
    id: &str,
    relationship: Option<&str>,
    direction: Direction,
    format: OutputFormat,
) -> Result<String> {
    let neighbors = store.get_neighbors(id, relationship, direction).await?;
    if format == OutputFormat::Json {
        return to_json(&neighbors);
    }

    let filter = relationship
        .map(|r| format!(", type '{r}'"))
        .unwrap_or_default();
    let mut lines = vec![format!("Neighbors of '{id}' ({direction}{filter}):")];
    if neighbors.is_empty() {
        lines.push("  (no neighbors)".to_string());
    } else {
        lines.extend(neighbors.iter().map(|n| format!("  - {}", describe(n))));
    }
    lines.push(String::new());
    lines.push(format!("{} neighbor(s)", neighbors.len()));
    Ok(lines.join("\n"))
}

/// Show the shortest path between two nodes.
pub async fn handle_path(
    store: &GraphStore,
    from: &str,
    to: &str,
    format: OutputFormat,
) -> Result<String> {
    let result = store.find_shortest_path(from, to).await?;
    if format == OutputFormat::Json {
        return to_json(&result);
    }

    if !result.found {
        return Ok(format!("No path found from '{from}' to '{to}'."));
    }

    let mut lines = vec![format!("Path from '{from}' to '{to}':")];
    for (i, node) in result.path.iter().enumerate() {
        if i > 0
            && let Some(edge) = result.edges.get(i - 1)
        {
            lines.push(format!("    --[{}]-->", edge.relationship_type));
        }
        lines.push(format!("  {}. {}", i + 1, describe(node)));
    }
    lines.push(String::new());
    lines.push(format!(
        "Distance: {}, total weight: {:.2}",
        result.distance, result.total_weight
    ));
    Ok(lines.join("\n"))
}

/// Enumerate all simple paths between two nodes.
pub async fn handle_paths(
    store: &GraphStore,
    config: &RelaConfig,
    options: PathsOptions,
    format: OutputFormat,
) -> Result<String> {
    let search = config.path_search(options.max_depth, options.timeout_ms);
    let paths = store
        .find_all_paths_with(&options.from, &options.to, &search)
        .await?;
    if format == OutputFormat::Json {
        return to_json(&paths);
    }

    let mut lines = vec![format!(
        "Paths from '{}' to '{}' (max depth {}):",
        options.from, options.to, search.max_depth
    )];
    if paths.is_empty() {
        lines.push("  (no paths)".to_string());
    }
    for path in &paths {
        lines.push(format!("  [{:.2}] {}", path.score, path.nodes.join(" -> ")));
    }
    lines.push(String::new());
    lines.push(format!("{} path(s)", paths.len()));
    Ok(lines.join("\n"))
}

/// Show the connected component containing a node.
pub async fn handle_component(
    store: &GraphStore,
    id: &str,
    format: OutputFormat,
) -> Result<String> {
    let component = store.get_connected_component(id).await?;
    if format == OutputFormat::Json {
        return to_json(&component);
    }

    if component.is_empty() {
        return Ok(format!("Node '{id}' not found."));
    }
    let mut lines = vec![format!("Component of '{id}' ({} nodes):", component.len())];
    lines.extend(component.iter().map(|member| format!("  - {member}")));
    Ok(lines.join("\n"))
}

/// Partition the graph into communities.
pub async fn handle_communities(store: &GraphStore, format: OutputFormat) -> Result<String> {
    let communities = store.detect_communities().await?;
    if format == OutputFormat::Json {
        return to_json(&communities);
    }

    let mut lines: Vec<String> = communities
        .iter()
        .enumerate()
        .map(|(i, members)| {
            let names: Vec<&str> = members.iter().map(String::as_str).collect();
            format!("  {}. ({}) {}", i + 1, members.len(), names.join(", "))
        })
        .collect();
    lines.insert(0, format!("{} community(ies):", communities.len()));
    Ok(lines.join("\n"))
}

/// Centrality for one node, or the top `limit` nodes.
pub async fn handle_centrality(
    store: &GraphStore,
    id: Option<&str>,
    limit: usize,
    format: OutputFormat,
) -> Result<String> {
    let Some(id) = id else {
        let ranked = store.rank_centrality(limit).await?;
        if format == OutputFormat::Json {
            return to_json(&ranked);
        }
        let mut lines = vec![format!(
            "{:<24} {:>8} {:>8} {:>8} {:>4} {:>4}",
            "node", "degree", "between", "close", "in", "out"
        )];
        lines.extend(ranked.iter().map(centrality_row));
        return Ok(lines.join("\n"));
    };

    let report = store.analyze_centrality(id).await?;
    if format == OutputFormat::Json {
        return to_json(&report);
    }
    let Some(report) = report else {
        return Ok(format!("Node '{id}' not found."));
    };

    Ok([
        format!("Centrality of '{}':", report.node_id),
        format!("  Degree:      {:.4}", report.degree_centrality),
        format!("  Betweenness: {:.4}", report.betweenness_centrality),
        format!("  Closeness:   {:.4}", report.closeness_centrality),
        format!("  In-degree:   {}", report.in_degree),
        format!("  Out-degree:  {}", report.out_degree),
    ]
    .join("\n"))
}

/// Suggest likely relationships for a node.
pub async fn handle_suggest(
    store: &GraphStore,
    config: &RelaConfig,
    args: SuggestArgs,
    format: OutputFormat,
) -> Result<String> {
    let mut options = config.suggest.clone();
    if let Some(limit) = args.limit {
        options.limit = limit;
    }
    if let Some(min) = args.min_similarity {
        options.min_similarity = min;
    }
    options.exclude_connected |= args.exclude_connected;

    let suggestions = store.suggest_relationships_with(&args.id, &options).await?;
    if format == OutputFormat::Json {
        return to_json(&suggestions);
    }

    let mut lines = vec![format!("Suggested relationships for '{}':", args.id)];
    if suggestions.is_empty() {
        lines.push("  (no suggestions)".to_string());
    }
    for (i, s) in suggestions.iter().enumerate() {
        let mut reasons = Vec::new();
        if s.category_match {
            reasons.push("same category".to_string());
        }
        if !s.shared_attributes.is_empty() {
            reasons.push(format!("shared: {}", s.shared_attributes.join(", ")));
        }
        lines.push(format!(
            "  {}. {} {:.3} ({})",
            i + 1,
            s.node_id,
            s.similarity,
            reasons.join("; ")
        ));
    }
    Ok(lines.join("\n"))
}

// ============================================================================
// Helpers
// ============================================================================

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::serialization(format!("Failed to render JSON: {e}")))
}

fn describe(node: &Node) -> String {
    format!("{} ({}) [{}]", node.id, node.title, node.category)
}

/// Distribution entries, largest first.
fn by_count(distribution: &std::collections::BTreeMap<String, usize>) -> Vec<String> {
    let mut entries: Vec<_> = distribution.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));
    entries
        .into_iter()
        .map(|(name, count)| format!("  {name}: {count}"))
        .collect()
}

fn centrality_row(report: &CentralityReport) -> String {
    format!(
        "{:<24} {:>8.4} {:>8.4} {:>8.4} {:>4} {:>4}",
        report.node_id,
        report.degree_centrality,
        report.betweenness_centrality,
        report.closeness_centrality,
        report.in_degree,
        report.out_degree
    )
}

// ============================================================================
// Tests
// ============================================================================

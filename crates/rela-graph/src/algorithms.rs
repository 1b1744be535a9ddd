//! Graph algorithms for relationship analysis.
//!
//! Provides algorithms for:
//! - Pathfinding (hop-count shortest path, bounded all-simple-paths)
//! - Connectivity (connected component, community partitioning)
//! - Centrality analysis (degree, betweenness, closeness)
//!
//! All algorithms are read-only functions of a `GraphData` snapshot. Unknown
//! or unreachable nodes produce empty results; malformed input produces
//! `Error::Validation`.

use crate::{Edge, GraphData, Node};
use petgraph::stable_graph::NodeIndex;
use rela_core::{Error, Result, validate_id};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Largest `max_depth` accepted by all-paths search.
pub const MAX_PATH_DEPTH: usize = 32;

/// Default `max_depth` for all-paths search.
pub const DEFAULT_PATH_DEPTH: usize = 5;

/// How many DFS steps run between deadline/cancel checks.
const CANCEL_CHECK_INTERVAL: usize = 256;

// ============================================================================
// Result types
// ============================================================================

/// Result of a shortest path query.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathResult {
    /// Nodes along the path, in order.
    pub path: Vec<Node>,
    /// The edge followed for each hop (first registered edge for that hop).
    pub edges: Vec<Edge>,
    /// Number of hops.
    pub distance: usize,
    /// Sum of the weights of `edges`.
    pub total_weight: f64,
    /// Whether a path was found.
    pub found: bool,
}

impl PathResult {
    /// Creates an empty result indicating no path found.
    pub fn not_found() -> Self {
        Self {
            path: Vec::new(),
            edges: Vec::new(),
            distance: 0,
            total_weight: 0.0,
            found: false,
        }
    }

    /// IDs of the nodes along the path.
    pub fn node_ids(&self) -> Vec<&str> {
        self.path.iter().map(|n| n.id.as_str()).collect()
    }
}

/// One simple path found by [`find_all_paths`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredPath {
    /// Node IDs along the path, source first.
    pub nodes: Vec<String>,
    /// Number of edges in the path.
    pub depth: usize,
    /// `1 / depth`; shorter paths score higher. The zero-length path scores 1.
    pub score: f64,
}

impl ScoredPath {
    fn new(nodes: Vec<String>) -> Self {
        let depth = nodes.len().saturating_sub(1);
        let score = if depth == 0 { 1.0 } else { 1.0 / depth as f64 };
        Self {
            nodes,
            depth,
            score,
        }
    }
}

/// Structural importance scores for one node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CentralityReport {
    /// Node ID.
    pub node_id: String,
    /// `(in + out) / (2·|V|)`.
    pub degree_centrality: f64,
    /// Share of shortest paths between other node pairs that pass through
    /// this node, normalised by `|V|·(|V|−1)`.
    pub betweenness_centrality: f64,
    /// Reachable node count divided by the sum of distances to them.
    pub closeness_centrality: f64,
    /// Number of stored edges ending at this node.
    pub in_degree: usize,
    /// Number of stored edges starting at this node.
    pub out_degree: usize,
}

// ============================================================================
// Cancellation
// ============================================================================

/// Cooperative cancellation flag for long path searches.
///
/// Cheap to clone; every clone observes the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Bounds for [`find_all_paths_with`].
#[derive(Clone, Debug)]
pub struct PathSearch {
    /// Maximum number of edges per path.
    pub max_depth: usize,
    /// Abort with `Error::Cancelled` once this instant has passed.
    pub deadline: Option<Instant>,
    /// Abort with `Error::Cancelled` once this token is cancelled.
    pub cancel: Option<CancelToken>,
}

impl PathSearch {
    /// A search bounded only by depth.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            deadline: None,
            cancel: None,
        }
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Attaches a cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn check(&self) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(Error::cancelled("path search cancelled"));
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Error::cancelled("path search deadline exceeded"));
        }
        Ok(())
    }
}

impl Default for PathSearch {
    fn default() -> Self {
        Self::new(DEFAULT_PATH_DEPTH)
    }
}

// ============================================================================
// BFS helpers
// ============================================================================

/// BFS tree from `source` over the adjacency index: node → (parent, depth).
///
/// Parents are assigned at first discovery, so the tree path to any node is
/// the same path an early-terminating BFS toward that node would return.
fn bfs_tree(graph: &GraphData, source: NodeIndex) -> HashMap<NodeIndex, (NodeIndex, usize)> {
    let mut tree: HashMap<NodeIndex, (NodeIndex, usize)> = HashMap::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    tree.insert(source, (source, 0));
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let depth = tree[&current].1;
        for &next in graph.adjacent(current) {
            if let std::collections::hash_map::Entry::Vacant(slot) = tree.entry(next) {
                slot.insert((current, depth + 1));
                queue.push_back(next);
            }
        }
    }

    tree
}

/// Walk a BFS tree back from `target` to the root.
fn tree_path(
    tree: &HashMap<NodeIndex, (NodeIndex, usize)>,
    target: NodeIndex,
) -> Option<Vec<NodeIndex>> {
    let mut path = vec![target];
    let mut current = target;
    loop {
        let &(parent, depth) = tree.get(&current)?;
        if depth == 0 {
            break;
        }
        path.push(parent);
        current = parent;
    }
    path.reverse();
    Some(path)
}

/// Hop-count shortest path between two indices, stopping at the target.
fn bfs_path(graph: &GraphData, source: NodeIndex, target: NodeIndex) -> Option<Vec<NodeIndex>> {
    if source == target {
        return Some(vec![source]);
    }

    let mut parents: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut visited: HashSet<NodeIndex> = HashSet::from([source]);
    let mut queue: VecDeque<NodeIndex> = VecDeque::from([source]);

    'search: while let Some(current) = queue.pop_front() {
        for &next in graph.adjacent(current) {
            if visited.insert(next) {
                parents.insert(next, current);
                if next == target {
                    break 'search;
                }
                queue.push_back(next);
            }
        }
    }

    if !parents.contains_key(&target) {
        return None;
    }

    let mut path = vec![target];
    let mut current = target;
    while let Some(&parent) = parents.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    Some(path)
}

// ============================================================================
// Pathfinding
// ============================================================================

/// Find the shortest path (fewest hops) between two nodes.
///
/// Breadth-first search over the adjacency index, so bidirectional edges
/// are followed both ways. Ties between equally short paths go to the one
/// BFS discovers first, which is determined by edge insertion order. Edge
/// weights are reported but do not influence the search.
pub fn find_shortest_path(
    graph: &GraphData,
    source_id: &str,
    target_id: &str,
) -> Result<PathResult> {
    validate_id(source_id)?;
    validate_id(target_id)?;

    let (Some(from_idx), Some(to_idx)) = (graph.get_index(source_id), graph.get_index(target_id))
    else {
        return Ok(PathResult::not_found());
    };

    let Some(indices) = bfs_path(graph, from_idx, to_idx) else {
        return Ok(PathResult::not_found());
    };

    let path = indices
        .iter()
        .map(|&idx| graph.node_at(idx).cloned())
        .collect::<Result<Vec<Node>>>()?;

    let mut edges = Vec::with_capacity(indices.len().saturating_sub(1));
    for window in indices.windows(2) {
        if let [from, to] = window {
            let edge = graph.first_edge_between(*from, *to).ok_or_else(|| {
                Error::internal(format!(
                    "adjacency index links {} -> {} without an edge",
                    from.index(),
                    to.index()
                ))
            })?;
            edges.push(edge.clone());
        }
    }

    let total_weight = edges.iter().map(|e| e.weight).sum();

    Ok(PathResult {
        distance: edges.len(),
        path,
        edges,
        total_weight,
        found: true,
    })
}

/// Enumerate every simple path from `source_id` to `target_id` with at most
/// `max_depth` edges.
///
/// See [`find_all_paths_with`] for cost notes and the deadline/cancel variant.
pub fn find_all_paths(
    graph: &GraphData,
    source_id: &str,
    target_id: &str,
    max_depth: usize,
) -> Result<Vec<ScoredPath>> {
    find_all_paths_with(graph, source_id, target_id, &PathSearch::new(max_depth))
}

/// Enumerate every simple path between two nodes under `search` bounds.
///
/// Depth-first, in adjacency order, using an explicit stack. Paths end at
/// the first arrival at the target and never revisit a node. The number of
/// simple paths grows exponentially with depth on dense graphs; the work is
/// bounded only by `max_depth`, so callers should keep it small and set a
/// deadline or cancel token when the graph is large. Exceeding either
/// returns `Error::Cancelled` and discards partial results.
///
/// When `source_id == target_id` the single zero-length path is returned.
pub fn find_all_paths_with(
    graph: &GraphData,
    source_id: &str,
    target_id: &str,
    search: &PathSearch,
) -> Result<Vec<ScoredPath>> {
    validate_id(source_id)?;
    validate_id(target_id)?;
    if search.max_depth > MAX_PATH_DEPTH {
        return Err(Error::validation(format!(
            "max_depth {} exceeds the limit of {MAX_PATH_DEPTH}",
            search.max_depth
        )));
    }
    search.check()?;

    let (Some(from_idx), Some(to_idx)) = (graph.get_index(source_id), graph.get_index(target_id))
    else {
        return Ok(Vec::new());
    };

    if from_idx == to_idx {
        return Ok(vec![ScoredPath::new(vec![source_id.to_string()])]);
    }

    let mut found: Vec<Vec<NodeIndex>> = Vec::new();
    let mut path: Vec<NodeIndex> = vec![from_idx];
    let mut on_path: HashSet<NodeIndex> = HashSet::from([from_idx]);
    // Next adjacency position to try, one cursor per node on `path`.
    let mut cursors: Vec<usize> = vec![0];
    let mut steps = 0usize;

    while let (Some(&current), Some(cursor)) = (path.last(), cursors.last_mut()) {
        if steps % CANCEL_CHECK_INTERVAL == 0 {
            search.check()?;
        }
        steps += 1;

        let depth = path.len() - 1;
        let neighbors = graph.adjacent(current);
        if depth >= search.max_depth || *cursor >= neighbors.len() {
            path.pop();
            cursors.pop();
            on_path.remove(&current);
            continue;
        }

        let next = neighbors[*cursor];
        *cursor += 1;

        if on_path.contains(&next) {
            continue;
        }
        if next == to_idx {
            let mut complete = path.clone();
            complete.push(next);
            found.push(complete);
            continue;
        }

        path.push(next);
        cursors.push(0);
        on_path.insert(next);
    }

    found
        .into_iter()
        .map(|indices| {
            let ids = indices
                .into_iter()
                .map(|idx| graph.node_at(idx).map(|n| n.id.clone()))
                .collect::<Result<Vec<String>>>()?;
            Ok(ScoredPath::new(ids))
        })
        .collect()
}

// ============================================================================
// Connectivity
// ============================================================================

fn component_indices(
    graph: &GraphData,
    start: NodeIndex,
    visited: &mut HashSet<NodeIndex>,
) -> Vec<NodeIndex> {
    let mut component = Vec::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();
    if visited.insert(start) {
        queue.push_back(start);
    }

    while let Some(current) = queue.pop_front() {
        component.push(current);
        for next in graph.undirected_neighbors(current) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    component
}

fn to_id_set(graph: &GraphData, indices: Vec<NodeIndex>) -> Result<BTreeSet<String>> {
    indices
        .into_iter()
        .map(|idx| graph.node_at(idx).map(|n| n.id.clone()))
        .collect()
}

/// All nodes reachable from `node_id` when edge direction is ignored,
/// including `node_id` itself. Unknown ids yield an empty set.
pub fn get_connected_component(graph: &GraphData, node_id: &str) -> Result<BTreeSet<String>> {
    validate_id(node_id)?;
    let Some(start) = graph.get_index(node_id) else {
        return Ok(BTreeSet::new());
    };
    let mut visited = HashSet::new();
    to_id_set(graph, component_indices(graph, start, &mut visited))
}

/// Partition every node into connected components (direction ignored).
///
/// Communities are listed in order of their earliest node; together they
/// cover the node set exactly once.
pub fn detect_communities(graph: &GraphData) -> Result<Vec<BTreeSet<String>>> {
    let mut visited: HashSet<NodeIndex> = HashSet::new();
    let mut communities = Vec::new();

    for idx in graph.indices() {
        if visited.contains(&idx) {
            continue;
        }
        let members = component_indices(graph, idx, &mut visited);
        communities.push(to_id_set(graph, members)?);
    }

    log::debug!(
        "Detected {} communities over {} nodes",
        communities.len(),
        graph.node_count()
    );
    Ok(communities)
}

// ============================================================================
// Centrality
// ============================================================================

/// Degree, betweenness, and closeness centrality for one node.
///
/// Betweenness considers every ordered pair of other nodes and checks
/// whether the BFS shortest path between them (the one
/// [`find_shortest_path`] would return) passes through `node_id`. That is
/// one BFS per source node, O(|V|·(|V|+|E|)) per call, recomputed every
/// time; fine for registries of hundreds of entities, not for millions.
///
/// Returns `Ok(None)` for an unknown node.
pub fn analyze_centrality(graph: &GraphData, node_id: &str) -> Result<Option<CentralityReport>> {
    validate_id(node_id)?;
    let Some(idx) = graph.get_index(node_id) else {
        return Ok(None);
    };

    let n = graph.node_count();
    let in_degree = graph.in_degree(node_id);
    let out_degree = graph.out_degree(node_id);

    let degree_centrality = if n <= 1 {
        0.0
    } else {
        (in_degree + out_degree) as f64 / (2.0 * n as f64)
    };

    Ok(Some(CentralityReport {
        node_id: node_id.to_string(),
        degree_centrality,
        betweenness_centrality: betweenness(graph, idx),
        closeness_centrality: closeness(graph, idx),
        in_degree,
        out_degree,
    }))
}

fn betweenness(graph: &GraphData, through: NodeIndex) -> f64 {
    let n = graph.node_count();
    if n < 2 {
        return 0.0;
    }

    let others: Vec<NodeIndex> = graph.indices().filter(|&i| i != through).collect();
    let mut passing = 0usize;

    for &source in &others {
        let tree = bfs_tree(graph, source);
        for &target in &others {
            if target == source {
                continue;
            }
            if let Some(path) = tree_path(&tree, target)
                && path.len() > 2
                && path[1..path.len() - 1].contains(&through)
            {
                passing += 1;
            }
        }
    }

    passing as f64 / (n as f64 * (n as f64 - 1.0))
}

fn closeness(graph: &GraphData, from: NodeIndex) -> f64 {
    let tree = bfs_tree(graph, from);
    let (reachable, total) = tree
        .iter()
        .filter(|(idx, _)| **idx != from)
        .fold((0usize, 0usize), |(count, sum), (_, &(_, depth))| {
            (count + 1, sum + depth)
        });

    if total == 0 {
        0.0
    } else {
        reachable as f64 / total as f64
    }
}

/// Centrality reports for every node, most connected first.
///
/// Sorted by degree centrality, then betweenness; ties keep node order.
/// Runs [`analyze_centrality`] per node, so the cost is |V| times its cost.
pub fn rank_centrality(graph: &GraphData, limit: usize) -> Result<Vec<CentralityReport>> {
    let mut reports = Vec::with_capacity(graph.node_count());
    for id in graph.node_ids() {
        if let Some(report) = analyze_centrality(graph, id)? {
            reports.push(report);
        }
    }

    reports.sort_by(|a, b| {
        b.degree_centrality
            .total_cmp(&a.degree_centrality)
            .then(b.betweenness_centrality.total_cmp(&a.betweenness_centrality))
    });
    reports.truncate(limit);
    Ok(reports)
}

// ============================================================================
// Convenience methods on GraphData
// ============================================================================

impl GraphData {
    /// See [`find_shortest_path`].
    pub fn find_shortest_path(&self, source_id: &str, target_id: &str) -> Result<PathResult> {
        find_shortest_path(self, source_id, target_id)
    }

    /// See [`find_all_paths`].
    pub fn find_all_paths(
        &self,
        source_id: &str,
        target_id: &str,
        max_depth: usize,
    ) -> Result<Vec<ScoredPath>> {
        find_all_paths(self, source_id, target_id, max_depth)
    }

    /// See [`get_connected_component`].
    pub fn get_connected_component(&self, node_id: &str) -> Result<BTreeSet<String>> {
        get_connected_component(self, node_id)
    }

    /// See [`detect_communities`].
    pub fn detect_communities(&self) -> Result<Vec<BTreeSet<String>>> {
        detect_communities(self)
    }

    /// See [`analyze_centrality`].
    pub fn analyze_centrality(&self, node_id: &str) -> Result<Option<CentralityReport>> {
        analyze_centrality(self, node_id)
    }
}

// ============================================================================
// Tests
// ============================================================================

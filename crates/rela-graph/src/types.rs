//! Core graph types for the relationship registry.
//!
//! Nodes are registered entities (services, databases, queues, ...) and edges
//! are typed, weighted relationship instances between them. Categories and
//! relationship types are open labels rather than enums: the registry treats
//! them as free-form tags.
//!
//! [`GraphData`] is an arena of edges (petgraph's `StableDiGraph`, so indices
//! survive removals) plus an adjacency index kept in sync on every mutation.
//! The adjacency index answers "where can I go from here" for traversal; edge
//! detail (type, weight, metadata) is read from the arena when needed.
//! Removals free arena slots for reuse, so edge order is tracked with an
//! insertion sequence rather than read off edge indices.

use chrono::{DateTime, Utc};
use petgraph::Direction as PgDirection;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use rela_core::{Error, Result, generate_id, validate_id, validate_label, validate_weight};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Default weight for edges created without an explicit weight.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

// ============================================================================
// Node struct
// ============================================================================

/// A registered entity in the graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, stable identifier.
    pub id: String,
    /// Classification label (e.g. "service", "database").
    pub category: String,
    /// Human-readable name.
    pub title: String,
    /// Open attribute map, used for similarity scoring and display.
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl Node {
    /// Creates a node with the given id, category, and title.
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            title: title.into(),
            attributes: HashMap::new(),
        }
    }

    /// Creates a node with a freshly minted UUID.
    pub fn with_generated_id(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(generate_id(), category, title)
    }

    /// Adds an attribute key-value pair.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the set of attribute keys.
    pub fn attribute_keys(&self) -> HashSet<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    fn validate(&self) -> Result<()> {
        validate_id(&self.id)?;
        validate_label("category", &self.category)
    }
}

// ============================================================================
// Edge struct
// ============================================================================

/// A directed relationship instance from `source_id` to `target_id`.
///
/// When `bidirectional` is set the edge is also traversable from target to
/// source; no second edge is stored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node ID.
    pub source_id: String,
    /// Target node ID.
    pub target_id: String,
    /// Free-form relationship label (e.g. "depends_on", "caches").
    pub relationship_type: String,
    /// Relevance/strength signal; not a traversal cost.
    #[serde(default = "default_weight")]
    pub weight: f64,
    /// Whether the edge can also be followed from target to source.
    #[serde(default)]
    pub bidirectional: bool,
    /// When the relationship was registered.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Discovery context attached by the registering collaborator.
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

fn default_weight() -> f64 {
    DEFAULT_EDGE_WEIGHT
}

impl Edge {
    /// Creates a one-way edge with the default weight, stamped now.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type: relationship_type.into(),
            weight: DEFAULT_EDGE_WEIGHT,
            bidirectional: false,
            created_at: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Sets an explicit weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Marks the edge as traversable in both directions.
    pub fn bidirectional(mut self) -> Self {
        self.bidirectional = true;
        self
    }

    /// Adds a metadata key-value pair.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if this edge can be followed from `from` to `to`.
    pub fn connects(&self, from: &str, to: &str) -> bool {
        (self.source_id == from && self.target_id == to)
            || (self.bidirectional && self.source_id == to && self.target_id == from)
    }

    fn validate(&self) -> Result<()> {
        validate_id(&self.source_id)?;
        validate_id(&self.target_id)?;
        validate_label("relationship type", &self.relationship_type)?;
        validate_weight(self.weight)
    }
}

// ============================================================================
// Direction enum
// ============================================================================

/// Which way to look from a node when collecting neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Nodes this node can reach in one hop.
    Out,
    /// Nodes that can reach this node in one hop.
    In,
    /// Either of the above.
    #[default]
    Both,
}

impl Direction {
    fn includes_out(self) -> bool {
        matches!(self, Self::Out | Self::Both)
    }

    fn includes_in(self) -> bool {
        matches!(self, Self::In | Self::Both)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Out => write!(f, "out"),
            Self::In => write!(f, "in"),
            Self::Both => write!(f, "both"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "out" | "outgoing" => Ok(Self::Out),
            "in" | "incoming" => Ok(Self::In),
            "both" | "any" => Ok(Self::Both),
            other => Err(Error::validation(format!(
                "unknown direction '{other}' (expected out, in, or both)"
            ))),
        }
    }
}

// ============================================================================
// GraphData struct
// ============================================================================

/// The canonical node set, edge arena, and adjacency index.
///
/// All mutation goes through [`add_node`](Self::add_node),
/// [`add_edge`](Self::add_edge) and [`remove_node`](Self::remove_node), which
/// keep the adjacency index consistent with the edge set. Node iteration
/// follows petgraph index order, which is insertion order until a removal
/// frees a slot for reuse.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    graph: StableDiGraph<Node, Edge>,
    node_indices: HashMap<String, NodeIndex>,
    /// node → nodes reachable in one hop, unique, in edge insertion order.
    adjacency: HashMap<NodeIndex, Vec<NodeIndex>>,
    /// edge → insertion sequence number.
    edge_seq: HashMap<EdgeIndex, u64>,
    next_edge_seq: u64,
}

impl GraphData {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of stored edges (a bidirectional edge counts once).
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Gets a node by ID.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.get_index(id).and_then(|idx| self.graph.node_weight(idx))
    }

    /// Gets the petgraph NodeIndex for a node ID.
    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Checks if a node exists.
    pub fn contains_node(&self, id: &str) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Returns an iterator over all node IDs.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.iter_nodes().map(|n| n.id.as_str())
    }

    /// Returns an iterator over all nodes.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Returns an iterator over all edges, in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        let mut ids: Vec<EdgeIndex> = self.graph.edge_indices().collect();
        ids.sort_by_key(|&e| self.seq_of(e));
        ids.into_iter().filter_map(move |e| self.graph.edge_weight(e))
    }

    /// Edges that can be followed from `from` to `to`, in insertion order.
    ///
    /// Includes `from → to` edges and bidirectional `to → from` edges.
    pub fn edges_between(&self, from: &str, to: &str) -> Vec<&Edge> {
        let (Some(a), Some(b)) = (self.get_index(from), self.get_index(to)) else {
            return Vec::new();
        };
        self.edge_indices_between(a, b)
            .into_iter()
            .filter_map(|e| self.graph.edge_weight(e))
            .collect()
    }

    /// Number of stored edges whose target is `id`.
    pub fn in_degree(&self, id: &str) -> usize {
        self.get_index(id)
            .map(|idx| self.graph.edges_directed(idx, PgDirection::Incoming).count())
            .unwrap_or(0)
    }

    /// Number of stored edges whose source is `id`.
    pub fn out_degree(&self, id: &str) -> usize {
        self.get_index(id)
            .map(|idx| self.graph.edges_directed(idx, PgDirection::Outgoing).count())
            .unwrap_or(0)
    }

    // ========================================================================
    // Crate-internal accessors for the traversal engine
    // ========================================================================

    /// All node indices in iteration order.
    pub(crate) fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    /// Nodes reachable in one hop from `idx`, per the adjacency index.
    pub(crate) fn adjacent(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.adjacency.get(&idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbors of `idx` ignoring edge direction.
    pub(crate) fn undirected_neighbors(
        &self,
        idx: NodeIndex,
    ) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_undirected(idx)
    }

    /// Resolve an index to its node, failing loudly on a dangling index.
    pub(crate) fn node_at(&self, idx: NodeIndex) -> Result<&Node> {
        self.graph.node_weight(idx).ok_or_else(|| {
            Error::internal(format!("adjacency index refers to missing node {}", idx.index()))
        })
    }

    /// Earliest-inserted edge that can be followed from `a` to `b`.
    pub(crate) fn first_edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        self.edge_indices_between(a, b)
            .first()
            .and_then(|&e| self.graph.edge_weight(e))
    }

    fn edge_indices_between(&self, a: NodeIndex, b: NodeIndex) -> Vec<EdgeIndex> {
        let forward = self.graph.edges_connecting(a, b).map(|e| e.id());
        let reverse = self
            .graph
            .edges_connecting(b, a)
            .filter(|e| e.weight().bidirectional)
            .map(|e| e.id());
        let mut ids: Vec<EdgeIndex> = forward.chain(reverse).collect();
        ids.sort_by_key(|&e| self.seq_of(e));
        ids.dedup();
        ids
    }

    fn seq_of(&self, edge: EdgeIndex) -> u64 {
        self.edge_seq.get(&edge).copied().unwrap_or(u64::MAX)
    }

    // ========================================================================
    // Mutation API
    // ========================================================================

    /// Insert a node if no node with the same ID exists.
    ///
    /// Returns `Ok(true)` when inserted and `Ok(false)` when the ID was
    /// already registered (the existing node is kept untouched).
    pub fn add_node(&mut self, node: Node) -> Result<bool> {
        node.validate()?;
        if self.node_indices.contains_key(&node.id) {
            log::debug!("Node '{}' already registered; keeping existing", node.id);
            return Ok(false);
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(id.clone(), idx);
        self.adjacency.insert(idx, Vec::new());
        log::debug!("Registered node '{id}'");
        Ok(true)
    }

    /// Append an edge and update the adjacency index.
    ///
    /// An edge naming an unknown node is a logged no-op returning
    /// `Ok(false)`, so out-of-order discovery events never corrupt the graph.
    pub fn add_edge(&mut self, edge: Edge) -> Result<bool> {
        edge.validate()?;
        let (Some(from_idx), Some(to_idx)) =
            (self.get_index(&edge.source_id), self.get_index(&edge.target_id))
        else {
            log::warn!(
                "Ignoring edge '{}' {} -> {}: endpoint not registered",
                edge.relationship_type,
                edge.source_id,
                edge.target_id
            );
            return Ok(false);
        };

        let bidirectional = edge.bidirectional;
        log::debug!(
            "Registered edge '{}' {} -> {}{}",
            edge.relationship_type,
            edge.source_id,
            edge.target_id,
            if bidirectional { " (bidirectional)" } else { "" }
        );
        let edge_idx = self.graph.add_edge(from_idx, to_idx, edge);
        self.edge_seq.insert(edge_idx, self.next_edge_seq);
        self.next_edge_seq += 1;
        self.link(from_idx, to_idx);
        if bidirectional {
            self.link(to_idx, from_idx);
        }
        Ok(true)
    }

    /// Remove a node and every edge touching it.
    ///
    /// Returns the removed node, or `None` if the node didn't exist.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let idx = self.node_indices.remove(id)?;
        let incident: Vec<EdgeIndex> = self
            .graph
            .edges_directed(idx, PgDirection::Outgoing)
            .chain(self.graph.edges_directed(idx, PgDirection::Incoming))
            .map(|e| e.id())
            .collect();
        let node = self.graph.remove_node(idx)?;

        for edge_idx in incident {
            self.edge_seq.remove(&edge_idx);
        }

        self.adjacency.remove(&idx);
        for targets in self.adjacency.values_mut() {
            targets.retain(|&t| t != idx);
        }
        log::debug!("Removed node '{id}'");
        Some(node)
    }

    fn link(&mut self, from: NodeIndex, to: NodeIndex) {
        let targets = self.adjacency.entry(from).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    // ========================================================================
    // Neighbor queries
    // ========================================================================

    /// Nodes one hop away from `node_id`.
    ///
    /// `Out` follows stored edges forward and bidirectional edges backward;
    /// `In` is the mirror image; `Both` is the union. Filtered by
    /// `relationship_type` when given. Deduplicated by node, ordered by the
    /// earliest-inserted edge reaching each neighbor. Unknown ids yield an
    /// empty list; an empty id is a validation error.
    pub fn get_neighbors(
        &self,
        node_id: &str,
        relationship_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Node>> {
        validate_id(node_id)?;
        let Some(idx) = self.get_index(node_id) else {
            return Ok(Vec::new());
        };

        let matches = |edge: &Edge| relationship_type.is_none_or(|t| edge.relationship_type == t);
        let mut hits: Vec<(EdgeIndex, NodeIndex)> = Vec::new();

        for edge_ref in self.graph.edges_directed(idx, PgDirection::Outgoing) {
            let edge = edge_ref.weight();
            if !matches(edge) {
                continue;
            }
            if direction.includes_out() || (direction.includes_in() && edge.bidirectional) {
                hits.push((edge_ref.id(), edge_ref.target()));
            }
        }

        for edge_ref in self.graph.edges_directed(idx, PgDirection::Incoming) {
            let edge = edge_ref.weight();
            if !matches(edge) {
                continue;
            }
            if direction.includes_in() || (direction.includes_out() && edge.bidirectional) {
                hits.push((edge_ref.id(), edge_ref.source()));
            }
        }

        hits.sort_by_key(|&(edge_idx, _)| self.seq_of(edge_idx));

        let mut seen: HashSet<NodeIndex> = HashSet::new();
        Ok(hits
            .into_iter()
            .filter(|&(_, n)| seen.insert(n))
            .filter_map(|(_, n)| self.graph.node_weight(n).cloned())
            .collect())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Relationship suggestions from category and attribute overlap.
//!
//! For a target node every other node is scored as
//!
//! ```text
//! similarity = 0.5 · [same category] + 0.5 · |K₁ ∩ K₂| / |K₁ ∪ K₂|
//! ```
//!
//! where `K` is a node's set of attribute keys (the Jaccard term is 0 when
//! both nodes have no attributes). The score is a deterministic heuristic;
//! each suggestion carries the facts that produced it.

use crate::{Direction, GraphData, Node};
use rela_core::{Result, validate_id};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weight of the category-match term.
const CATEGORY_WEIGHT: f64 = 0.5;

/// Weight of the attribute-key Jaccard term.
const ATTRIBUTE_WEIGHT: f64 = 0.5;

/// Default number of suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

/// A proposed relationship between the queried node and `node_id`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The candidate node.
    pub node_id: String,
    /// Similarity in `(0, 1]`.
    pub similarity: f64,
    /// Whether both nodes share a category.
    pub category_match: bool,
    /// Attribute keys present on both nodes, sorted.
    pub shared_attributes: Vec<String>,
}

/// Tuning for [`suggest_relationships_with`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestOptions {
    /// Maximum number of suggestions.
    pub limit: usize,
    /// Only candidates scoring strictly above this are returned.
    pub min_similarity: f64,
    /// Skip nodes already one hop away in either direction.
    pub exclude_connected: bool,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUGGESTION_LIMIT,
            min_similarity: 0.0,
            exclude_connected: false,
        }
    }
}

impl SuggestOptions {
    /// Default options with the given limit.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
}

/// Score `candidate` against `target`.
pub fn similarity(target: &Node, candidate: &Node) -> Suggestion {
    let category_match = target.category == candidate.category;

    let target_keys = target.attribute_keys();
    let candidate_keys = candidate.attribute_keys();
    let union = target_keys.union(&candidate_keys).count();
    let mut shared: Vec<String> = target_keys
        .intersection(&candidate_keys)
        .map(|k| (*k).to_string())
        .collect();
    shared.sort();

    let jaccard = if union == 0 {
        0.0
    } else {
        shared.len() as f64 / union as f64
    };
    let category_term = if category_match { 1.0 } else { 0.0 };

    Suggestion {
        node_id: candidate.id.clone(),
        similarity: CATEGORY_WEIGHT * category_term + ATTRIBUTE_WEIGHT * jaccard,
        category_match,
        shared_attributes: shared,
    }
}

/// Rank other nodes by similarity to `node_id`, returning the top `limit`.
///
/// Only candidates with similarity above zero are returned. Ties keep node
/// order. Unknown ids yield an empty list.
pub fn suggest_relationships(
    graph: &GraphData,
    node_id: &str,
    limit: usize,
) -> Result<Vec<Suggestion>> {
    suggest_relationships_with(graph, node_id, &SuggestOptions::with_limit(limit))
}

/// Rank other nodes by similarity to `node_id` under `options`.
pub fn suggest_relationships_with(
    graph: &GraphData,
    node_id: &str,
    options: &SuggestOptions,
) -> Result<Vec<Suggestion>> {
    validate_id(node_id)?;
    let Some(target) = graph.get_node(node_id) else {
        return Ok(Vec::new());
    };

    let connected: HashSet<String> = if options.exclude_connected {
        graph
            .get_neighbors(node_id, None, Direction::Both)?
            .into_iter()
            .map(|n| n.id)
            .collect()
    } else {
        HashSet::new()
    };

    let mut suggestions: Vec<Suggestion> = graph
        .iter_nodes()
        .filter(|candidate| candidate.id != target.id && !connected.contains(&candidate.id))
        .map(|candidate| similarity(target, candidate))
        .filter(|s| s.similarity > options.min_similarity.max(0.0))
        .collect();

    // Stable sort keeps node order among equal scores.
    suggestions.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    suggestions.truncate(options.limit);
    Ok(suggestions)
}

impl GraphData {
    /// See [`suggest_relationships`].
    pub fn suggest_relationships(&self, node_id: &str, limit: usize) -> Result<Vec<Suggestion>> {
        suggest_relationships(self, node_id, limit)
    }
}

use context_graph::{EdgeType, ReadonlyGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Edge as shown in a graph excerpt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExcerptEdge {
    pub from: String,
    pub to: String,

    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

/// Subgraph touched by one expansion call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExcerpt {
    /// Unique node ids in first-touched order
    pub nodes: Vec<String>,

    /// Edges between excerpt nodes, deduplicated by `(from, to, type)`
    pub edges: Vec<ExcerptEdge>,
}

impl GraphExcerpt {
    /// Collect the excerpt for a set of primary ids and related ids.
    ///
    /// Primary nodes contribute all their outgoing and incoming edges, related
    /// nodes their outgoing edges; only edges with both endpoints inside the
    /// node set are kept.
    pub fn collect(graph: &dyn ReadonlyGraph, primary_ids: &[&str], related_ids: &[&str]) -> Self {
        let mut nodes: Vec<String> = Vec::new();
        let mut node_set: HashSet<&str> = HashSet::new();
        for id in primary_ids.iter().chain(related_ids) {
            if node_set.insert(*id) {
                nodes.push((*id).to_string());
            }
        }

        let primary_edges = primary_ids
            .iter()
            .flat_map(|id| graph.edges(id).iter().chain(graph.incoming_edges(id)));
        let related_edges = related_ids.iter().flat_map(|id| graph.edges(id).iter());

        let mut seen: HashSet<ExcerptEdge> = HashSet::new();
        let mut edges = Vec::new();
        for edge in primary_edges.chain(related_edges) {
            if !node_set.contains(edge.source.as_str()) || !node_set.contains(edge.target.as_str()) {
                continue;
            }
            let excerpt_edge = ExcerptEdge {
                from: edge.source.clone(),
                to: edge.target.clone(),
                edge_type: edge.edge_type,
            };
            if seen.insert(excerpt_edge.clone()) {
                edges.push(excerpt_edge);
            }
        }

        Self { nodes, edges }
    }

    /// True when the expansion touched no node at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

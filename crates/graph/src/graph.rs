use crate::types::{EdgeType, GraphEdge, GraphNode, GraphSnapshot};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};

/// Default hop limit for related-node discovery
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Lookup-only view of a dependency graph.
///
/// Query-time components receive this instead of `DependencyGraph` so they
/// cannot mutate the snapshot they are serving from.
pub trait ReadonlyGraph: Send + Sync {
    fn node(&self, id: &str) -> Option<&GraphNode>;

    /// Outgoing edges of `id`, in insertion order
    fn edges(&self, id: &str) -> &[GraphEdge];

    /// Incoming edges of `id`, in insertion order
    fn incoming_edges(&self, id: &str) -> &[GraphEdge];

    /// Breadth-first search treating every edge as an undirected hop.
    ///
    /// Returns `(id, distance)` in discovery order. The root is never part of
    /// the result; a node found at `max_depth` is recorded but not expanded.
    fn related_with_distance(&self, id: &str, max_depth: usize) -> Vec<(String, usize)> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

        visited.insert(id);
        queue.push_back((id, 0));

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }

            let outgoing = self.edges(current).iter().map(|e| e.target.as_str());
            let incoming = self.incoming_edges(current).iter().map(|e| e.source.as_str());

            for neighbor in outgoing.chain(incoming) {
                if visited.insert(neighbor) {
                    result.push((neighbor.to_string(), depth + 1));
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }

        result
    }
}

/// In-memory directed multigraph of code artifacts
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, GraphNode>,
    node_order: Vec<String>,
    edges: Vec<GraphEdge>,
    outgoing: HashMap<String, Vec<GraphEdge>>,
    incoming: HashMap<String, Vec<GraphEdge>>,
}

impl DependencyGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node (last write wins)
    pub fn add_node(&mut self, node: GraphNode) {
        if !self.nodes.contains_key(&node.id) {
            self.node_order.push(node.id.clone());
        }
        self.nodes.insert(node.id.clone(), node);
    }

    /// Append an edge to both adjacency indices. Duplicates are kept.
    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.outgoing
            .entry(edge.source.clone())
            .or_default()
            .push(edge.clone());
        self.incoming
            .entry(edge.target.clone())
            .or_default()
            .push(edge.clone());
        self.edges.push(edge);
    }

    #[must_use]
    pub fn get_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    #[must_use]
    pub fn get_edges(&self, id: &str) -> &[GraphEdge] {
        self.outgoing.get(id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn get_incoming_edges(&self, id: &str) -> &[GraphEdge] {
        self.incoming.get(id).map_or(&[], Vec::as_slice)
    }

    /// Targets of the outgoing edges of `id`
    #[must_use]
    pub fn get_dependencies(&self, id: &str) -> Vec<&str> {
        self.get_edges(id).iter().map(|e| e.target.as_str()).collect()
    }

    /// Sources of the incoming edges of `id`
    #[must_use]
    pub fn get_dependents(&self, id: &str) -> Vec<&str> {
        self.get_incoming_edges(id)
            .iter()
            .map(|e| e.source.as_str())
            .collect()
    }

    /// Every node reachable from `id` within `max_depth` undirected hops,
    /// excluding `id` itself, in BFS discovery order.
    #[must_use]
    pub fn get_related_nodes(&self, id: &str, max_depth: usize) -> Vec<String> {
        self.related_with_distance(id, max_depth)
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// Nodes in first-insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// All edges in insertion order
    #[must_use]
    pub fn all_edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Groups of files that import each other in a cycle.
    ///
    /// Each group is sorted by id, groups are sorted by their first id.
    #[must_use]
    pub fn import_cycles(&self) -> Vec<Vec<String>> {
        let mut graph: DiGraph<&str, ()> = DiGraph::new();
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for edge in self.edges.iter().filter(|e| e.edge_type == EdgeType::Imports) {
            let from = *index
                .entry(edge.source.as_str())
                .or_insert_with(|| graph.add_node(edge.source.as_str()));
            let to = *index
                .entry(edge.target.as_str())
                .or_insert_with(|| graph.add_node(edge.target.as_str()));
            graph.add_edge(from, to, ());
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut ids: Vec<String> = component
                    .into_iter()
                    .filter_map(|idx| graph.node_weight(idx).map(|id| (*id).to_string()))
                    .collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Full node set and edge list; edges keep insertion order
    #[must_use]
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.nodes().cloned().collect(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuild a graph by replaying a snapshot
    #[must_use]
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let mut graph = Self::new();
        for node in snapshot.nodes {
            graph.add_node(node);
        }
        for edge in snapshot.edges {
            graph.add_edge(edge);
        }
        graph
    }
}

impl ReadonlyGraph for DependencyGraph {
    fn node(&self, id: &str) -> Option<&GraphNode> {
        self.get_node(id)
    }

    fn edges(&self, id: &str) -> &[GraphEdge] {
        self.get_edges(id)
    }

    fn incoming_edges(&self, id: &str) -> &[GraphEdge] {
        self.get_incoming_edges(id)
    }
}

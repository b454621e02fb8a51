use crate::excerpt::GraphExcerpt;
use crate::lookup::ChunkLookup;
use context_graph::{file_name, parent_dir, EdgeType, NodeType, ReadonlyGraph, DEFAULT_MAX_DEPTH};
use context_search::SearchResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// How a related chunk relates to the primary result that reached it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Imports,
    ImportedBy,
    TestFor,
    InterfaceOf,
    Sibling,
    Backlog,
}

impl Relationship {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::ImportedBy => "imported_by",
            Self::TestFor => "test_for",
            Self::InterfaceOf => "interface_of",
            Self::Sibling => "sibling",
            Self::Backlog => "backlog",
        }
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedChunk {
    pub chunk: SearchResult,
    pub relationship: Relationship,

    /// Undirected hop count from the primary result
    pub distance: usize,
}

/// Primary results plus graph-derived context, ready for budgeting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpandedContext {
    pub primary_results: Vec<SearchResult>,
    pub related_chunks: Vec<RelatedChunk>,
    pub graph_excerpt: GraphExcerpt,
}

/// Finds code related to search hits through the dependency graph
pub struct ContextExpander<'a> {
    graph: &'a dyn ReadonlyGraph,
    lookup: &'a dyn ChunkLookup,
    max_depth: usize,
}

impl<'a> ContextExpander<'a> {
    pub fn new(graph: &'a dyn ReadonlyGraph, lookup: &'a dyn ChunkLookup) -> Self {
        Self {
            graph,
            lookup,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Expand primary results with up to `max_related` related chunks.
    ///
    /// Roots are processed in the given order. The first root to reach an id
    /// owns it: a later root never replaces the entry, even from closer.
    /// Ids the lookup cannot resolve are skipped.
    pub async fn expand(&self, results: Vec<SearchResult>, max_related: usize) -> ExpandedContext {
        let primary_ids: HashSet<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
        let mut recorded: HashSet<String> = HashSet::new();
        let mut related_ids: Vec<String> = Vec::new();
        let mut related: Vec<RelatedChunk> = Vec::new();

        for root in &results {
            let reached = self.graph.related_with_distance(&root.chunk_id, self.max_depth);

            for (id, distance) in reached {
                if primary_ids.contains(id.as_str()) || recorded.contains(&id) {
                    continue;
                }

                let Some(chunk) = self.lookup.lookup(&id).await else {
                    log::debug!("No chunk found for related node {id}, skipping");
                    continue;
                };

                let relationship = classify_relationship(
                    self.graph,
                    &root.chunk_id,
                    root.file_path(),
                    &id,
                    chunk.file_path(),
                );
                recorded.insert(id.clone());
                related_ids.push(id);
                related.push(RelatedChunk {
                    chunk,
                    relationship,
                    distance,
                });
            }
        }

        let primary: Vec<&str> = results.iter().map(|r| r.chunk_id.as_str()).collect();
        let reached: Vec<&str> = related_ids.iter().map(String::as_str).collect();
        let graph_excerpt = GraphExcerpt::collect(self.graph, &primary, &reached);

        related.sort_by_key(|r| r.distance);
        related.truncate(max_related);

        log::info!(
            "Expanded {} primary results with {} related chunks ({} excerpt edges)",
            results.len(),
            related.len(),
            graph_excerpt.edges.len()
        );

        ExpandedContext {
            primary_results: results,
            related_chunks: related,
            graph_excerpt,
        }
    }
}

/// Label the relationship between a root and a candidate.
///
/// Priority: backlog node, test/source pair, direct edge (either direction),
/// same directory, and `imports` for anything else, including candidates
/// reached only transitively. Graph node paths win over the supplied fallback
/// paths when the node exists.
pub fn classify_relationship(
    graph: &dyn ReadonlyGraph,
    root_id: &str,
    root_fallback_path: &str,
    candidate_id: &str,
    candidate_fallback_path: &str,
) -> Relationship {
    let root_node = graph.node(root_id);
    let candidate_node = graph.node(candidate_id);

    let is_backlog = |node: Option<&context_graph::GraphNode>| {
        node.is_some_and(|n| n.node_type == NodeType::Backlog)
    };
    if is_backlog(root_node) || is_backlog(candidate_node) {
        return Relationship::Backlog;
    }

    let root_path = root_node.map_or(root_fallback_path, |n| n.file_path.as_str());
    let candidate_path = candidate_node.map_or(candidate_fallback_path, |n| n.file_path.as_str());

    if is_test_pair(root_path, candidate_path) {
        return Relationship::TestFor;
    }

    if let Some(edge) = graph.edges(root_id).iter().find(|e| e.target == candidate_id) {
        return match edge.edge_type {
            EdgeType::Implements => Relationship::InterfaceOf,
            _ => Relationship::Imports,
        };
    }
    if let Some(edge) = graph
        .incoming_edges(root_id)
        .iter()
        .find(|e| e.source == candidate_id)
    {
        return match edge.edge_type {
            EdgeType::Implements => Relationship::InterfaceOf,
            _ => Relationship::ImportedBy,
        };
    }

    if !root_path.is_empty()
        && !candidate_path.is_empty()
        && parent_dir(root_path) == parent_dir(candidate_path)
    {
        return Relationship::Sibling;
    }

    Relationship::Imports
}

/// Whether the path looks like a test file (`.test.`, `.spec.` or a `__tests__` directory)
#[must_use]
pub fn is_test_path(path: &str) -> bool {
    path.contains(".test.")
        || path.contains(".spec.")
        || path.contains("/__tests__/")
        || path.starts_with("__tests__/")
}

/// One of the two paths is a test and both share a file name once test markers are removed
#[must_use]
pub fn is_test_pair(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() || a == b {
        return false;
    }
    (is_test_path(a) || is_test_path(b)) && test_subject_name(a) == test_subject_name(b)
}

fn test_subject_name(path: &str) -> String {
    file_name(path).replace(".test.", ".").replace(".spec.", ".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_graph::{DependencyGraph, GraphEdge, GraphNode};
    use context_search::{ChunkMetadata, SearchMethod};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn result(id: &str, score: f32) -> SearchResult {
        SearchResult {
            chunk_id: id.to_string(),
            content: format!("// {id}"),
            nl_summary: String::new(),
            score,
            method: SearchMethod::Hybrid,
            metadata: ChunkMetadata {
                file_path: id.to_string(),
                ..ChunkMetadata::default()
            },
            chunk: None,
        }
    }

    fn graph_of(paths: &[&str], edges: &[(&str, &str, EdgeType)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for path in paths {
            graph.add_node(GraphNode::module(*path, vec![]));
        }
        for (from, to, edge_type) in edges {
            graph.add_edge(GraphEdge::new(*from, *to, *edge_type));
        }
        graph
    }

    fn lookup_for(ids: &[&str]) -> HashMap<String, SearchResult> {
        ids.iter()
            .map(|id| (id.to_string(), result(id, 0.0)))
            .collect()
    }

    #[tokio::test]
    async fn direct_import_is_related_at_distance_one() {
        let graph = graph_of(&["src/a.ts", "lib/b.ts"], &[("src/a.ts", "lib/b.ts", EdgeType::Imports)]);
        let lookup = lookup_for(&["lib/b.ts"]);

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("src/a.ts", 0.9)], 10)
            .await;

        assert_eq!(expanded.related_chunks.len(), 1);
        let related = &expanded.related_chunks[0];
        assert_eq!(related.chunk.chunk_id, "lib/b.ts");
        assert_eq!(related.relationship, Relationship::Imports);
        assert_eq!(related.distance, 1);
        assert_eq!(expanded.graph_excerpt.nodes, vec!["src/a.ts", "lib/b.ts"]);
        assert_eq!(expanded.graph_excerpt.edges.len(), 1);
    }

    #[tokio::test]
    async fn incoming_edge_is_imported_by() {
        let graph = graph_of(&["src/a.ts", "app/main.ts"], &[("app/main.ts", "src/a.ts", EdgeType::Imports)]);
        let lookup = lookup_for(&["app/main.ts"]);

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("src/a.ts", 0.9)], 10)
            .await;

        assert_eq!(expanded.related_chunks[0].relationship, Relationship::ImportedBy);
    }

    #[tokio::test]
    async fn primary_results_are_never_related() {
        let graph = graph_of(&["a.ts", "b.ts"], &[("a.ts", "b.ts", EdgeType::Imports)]);
        let lookup = lookup_for(&["a.ts", "b.ts"]);

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("a.ts", 0.9), result("b.ts", 0.5)], 10)
            .await;

        assert!(expanded.related_chunks.is_empty());
        assert_eq!(expanded.graph_excerpt.edges.len(), 1);
    }

    #[tokio::test]
    async fn first_root_wins_even_when_later_root_is_closer() {
        // r1 -> x -> c ; r2 -> c
        let graph = graph_of(
            &["p/r1.ts", "q/x.ts", "z/c.ts", "w/r2.ts"],
            &[
                ("p/r1.ts", "q/x.ts", EdgeType::Imports),
                ("q/x.ts", "z/c.ts", EdgeType::Imports),
                ("w/r2.ts", "z/c.ts", EdgeType::Imports),
            ],
        );
        let lookup = lookup_for(&["q/x.ts", "z/c.ts"]);

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("p/r1.ts", 0.9), result("w/r2.ts", 0.8)], 10)
            .await;

        let c = expanded
            .related_chunks
            .iter()
            .find(|r| r.chunk.chunk_id == "z/c.ts")
            .unwrap();
        assert_eq!(c.distance, 2);
        // transitive-only candidate falls back to imports
        assert_eq!(c.relationship, Relationship::Imports);
    }

    #[tokio::test]
    async fn unresolved_lookups_are_skipped() {
        let graph = graph_of(&["a.ts", "b.ts"], &[("a.ts", "b.ts", EdgeType::Imports)]);
        let lookup: HashMap<String, SearchResult> = HashMap::new();

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("a.ts", 0.9)], 10)
            .await;

        assert!(expanded.related_chunks.is_empty());
        assert_eq!(expanded.graph_excerpt.nodes, vec!["a.ts"]);
    }

    #[tokio::test]
    async fn sorts_by_distance_and_truncates() {
        // far <- mid <- root -> near
        let graph = graph_of(
            &["d1/root.ts", "d2/mid.ts", "d3/far.ts", "d4/near.ts"],
            &[
                ("d1/root.ts", "d2/mid.ts", EdgeType::Imports),
                ("d2/mid.ts", "d3/far.ts", EdgeType::Imports),
                ("d1/root.ts", "d4/near.ts", EdgeType::Imports),
            ],
        );
        let lookup = lookup_for(&["d2/mid.ts", "d3/far.ts", "d4/near.ts"]);

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("d1/root.ts", 0.9)], 2)
            .await;

        let ids: Vec<&str> = expanded
            .related_chunks
            .iter()
            .map(|r| r.chunk.chunk_id.as_str())
            .collect();
        assert_eq!(ids, vec!["d2/mid.ts", "d4/near.ts"]);
        assert!(expanded.related_chunks.iter().all(|r| r.distance == 1));
    }

    #[tokio::test]
    async fn depth_limit_bounds_discovery() {
        let graph = graph_of(
            &["a/a.ts", "b/b.ts", "c/c.ts"],
            &[
                ("a/a.ts", "b/b.ts", EdgeType::Imports),
                ("b/b.ts", "c/c.ts", EdgeType::Imports),
            ],
        );
        let lookup = lookup_for(&["b/b.ts", "c/c.ts"]);

        let expanded = ContextExpander::new(&graph, &lookup)
            .with_max_depth(1)
            .expand(vec![result("a/a.ts", 0.9)], 10)
            .await;

        assert_eq!(expanded.related_chunks.len(), 1);
    }

    /// Yields to the runtime before answering, like a remote chunk store
    struct DeferredLookup {
        chunks: HashMap<String, SearchResult>,
        calls: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl ChunkLookup for DeferredLookup {
        async fn lookup(&self, chunk_id: &str) -> Option<SearchResult> {
            tokio::task::yield_now().await;
            self.calls.lock().unwrap().push(chunk_id.to_string());
            tokio::task::yield_now().await;
            self.chunks.get(chunk_id).cloned()
        }
    }

    #[tokio::test]
    async fn awaits_asynchronous_lookups() {
        let graph = graph_of(
            &["src/a.ts", "src/a.test.ts", "lib/b.ts", "lib/c.ts"],
            &[
                ("src/a.ts", "lib/b.ts", EdgeType::Imports),
                ("src/a.test.ts", "src/a.ts", EdgeType::Imports),
                ("lib/b.ts", "lib/c.ts", EdgeType::Imports),
            ],
        );
        let lookup = DeferredLookup {
            chunks: lookup_for(&["lib/b.ts", "src/a.test.ts"]),
            calls: std::sync::Mutex::new(Vec::new()),
        };

        let expanded = ContextExpander::new(&graph, &lookup)
            .expand(vec![result("src/a.ts", 0.9)], 10)
            .await;

        let related: Vec<(&str, Relationship, usize)> = expanded
            .related_chunks
            .iter()
            .map(|r| (r.chunk.chunk_id.as_str(), r.relationship, r.distance))
            .collect();
        assert_eq!(
            related,
            vec![
                ("lib/b.ts", Relationship::Imports, 1),
                ("src/a.test.ts", Relationship::TestFor, 1),
            ]
        );
        assert_eq!(
            *lookup.calls.lock().unwrap(),
            vec!["lib/b.ts", "src/a.test.ts", "lib/c.ts"]
        );
    }

    #[test]
    fn test_file_is_classified_regardless_of_edges() {
        let graph = graph_of(
            &["src/math.ts", "src/math.test.ts"],
            &[("src/math.ts", "src/math.test.ts", EdgeType::Imports)],
        );
        assert_eq!(
            classify_relationship(&graph, "src/math.ts", "", "src/math.test.ts", ""),
            Relationship::TestFor
        );
        assert_eq!(
            classify_relationship(&graph, "src/math.test.ts", "", "src/math.ts", ""),
            Relationship::TestFor
        );
    }

    #[test]
    fn tests_directory_pairs_with_source() {
        assert!(is_test_pair("src/math.ts", "src/__tests__/math.ts"));
        assert!(is_test_pair("lib/parse.js", "test/parse.spec.js"));
        assert!(!is_test_pair("src/math.ts", "src/physics.test.ts"));
        assert!(!is_test_pair("src/math.ts", "lib/math.ts"));
    }

    #[test]
    fn backlog_takes_priority() {
        let mut graph = graph_of(&["src/math.ts"], &[]);
        graph.add_node(GraphNode {
            id: "backlog/42".to_string(),
            file_path: "src/math.test.ts".to_string(),
            symbols: vec![],
            node_type: NodeType::Backlog,
        });
        assert_eq!(
            classify_relationship(&graph, "src/math.ts", "", "backlog/42", ""),
            Relationship::Backlog
        );
    }

    #[test]
    fn implements_edges_are_interface_of_in_both_directions() {
        let graph = graph_of(
            &["a/impl.ts", "b/iface.ts", "c/other.ts"],
            &[
                ("a/impl.ts", "b/iface.ts", EdgeType::Implements),
                ("c/other.ts", "a/impl.ts", EdgeType::Implements),
            ],
        );
        assert_eq!(
            classify_relationship(&graph, "a/impl.ts", "", "b/iface.ts", ""),
            Relationship::InterfaceOf
        );
        assert_eq!(
            classify_relationship(&graph, "a/impl.ts", "", "c/other.ts", ""),
            Relationship::InterfaceOf
        );
    }

    #[test]
    fn same_directory_without_edge_is_sibling() {
        let graph = graph_of(&["src/a.ts", "src/b.ts"], &[]);
        assert_eq!(
            classify_relationship(&graph, "src/a.ts", "", "src/b.ts", ""),
            Relationship::Sibling
        );
    }

    #[test]
    fn fallback_paths_are_used_without_graph_nodes() {
        let graph = DependencyGraph::new();
        assert_eq!(
            classify_relationship(&graph, "x", "src/math.ts", "y", "src/math.test.ts"),
            Relationship::TestFor
        );
        assert_eq!(
            classify_relationship(&graph, "x", "src/a.ts", "y", "lib/b.ts"),
            Relationship::Imports
        );
    }
}

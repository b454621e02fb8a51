use crate::error::{GraphError, Result};
use crate::graph::DependencyGraph;
use crate::paths::{has_extension, node_id_for_path, parent_dir, resolve_relative};
use crate::types::{EdgeType, GraphEdge, GraphNode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Extensions tried, in order, when an import omits or rewrites one
pub const RESOLVE_EXTENSIONS: [&str; 6] = [".ts", ".tsx", ".js", ".jsx", ".py", ".go"];

/// Extensions stripped before retrying (ESM imports of compiled TS name the `.js` output)
const JS_STYLE_EXTENSIONS: [&str; 4] = [".js", ".jsx", ".mjs", ".cjs"];

/// A source file as produced by the parsing stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedFile {
    pub file_path: String,
    pub language: String,
    pub content: String,

    /// Top-level declaration names
    #[serde(default)]
    pub declarations: Vec<String>,
}

/// One import statement found in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRef {
    /// Raw specifier as written (`./util`, `react`, `../lib/index.js`)
    pub source: String,

    /// Imported names, when the extractor reports them
    #[serde(default)]
    pub names: Vec<String>,
}

impl ImportRef {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            names: Vec::new(),
        }
    }
}

/// Extracts import specifiers from file content
pub trait ImportExtractor {
    fn extract(&self, content: &str, language: &str) -> anyhow::Result<Vec<ImportRef>>;
}

impl<F> ImportExtractor for F
where
    F: Fn(&str, &str) -> anyhow::Result<Vec<ImportRef>>,
{
    fn extract(&self, content: &str, language: &str) -> anyhow::Result<Vec<ImportRef>> {
        self(content, language)
    }
}

/// Build a file-level dependency graph from parsed files
pub struct GraphBuilder<E> {
    extractor: E,
}

impl<E: ImportExtractor> GraphBuilder<E> {
    pub const fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Build the graph, or fail as a whole with [`GraphError::Build`]
    pub fn build(&self, files: &[ParsedFile]) -> Result<DependencyGraph> {
        let mut graph = DependencyGraph::new();

        // Phase 1: one module node per file
        let mut known_files: HashMap<String, String> = HashMap::new();
        for file in files {
            let node = GraphNode::module(file.file_path.clone(), file.declarations.clone());
            known_files.insert(node_id_for_path(&file.file_path), node.id.clone());
            graph.add_node(node);
        }

        // Phase 2: resolve relative imports into edges
        for file in files {
            let from_id = node_id_for_path(&file.file_path);
            let imports = self
                .extractor
                .extract(&file.content, &file.language)
                .map_err(|e| {
                    GraphError::Build(format!(
                        "Failed to extract imports from {}: {e:#}",
                        file.file_path
                    ))
                })?;

            for import in imports {
                if !is_relative_specifier(&import.source) {
                    continue;
                }

                match resolve_import(&file.file_path, &import.source, &known_files) {
                    Some(to_id) => {
                        graph.add_edge(GraphEdge::new(from_id.clone(), to_id, EdgeType::Imports));
                    }
                    None => {
                        log::debug!(
                            "Unresolved import '{}' in {}",
                            import.source,
                            file.file_path
                        );
                    }
                }
            }
        }

        log::info!(
            "Built dependency graph: {} nodes, {} edges",
            graph.node_count(),
            graph.edge_count()
        );

        Ok(graph)
    }
}

/// Only `./x`, `../x` and `/x` style specifiers are resolved; bare package names are not.
#[must_use]
pub fn is_relative_specifier(source: &str) -> bool {
    source.starts_with('.') || source.starts_with('/')
}

/// Resolve an import specifier to the node id of a known file.
///
/// Tried in order, first hit wins: the exact path, the path with a JS-style
/// extension swapped for each of [`RESOLVE_EXTENSIONS`], the same with an
/// `/index` segment, then (extension-less specifiers only) the unmodified
/// path with each extension and `/index` variant.
#[must_use]
pub fn resolve_import(
    importer_path: &str,
    source: &str,
    known_files: &HashMap<String, String>,
) -> Option<String> {
    let resolved = resolve_relative(parent_dir(importer_path), source);
    let stripped = strip_js_extension(&resolved);

    let mut candidates = vec![resolved.clone()];
    candidates.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{stripped}{ext}")));
    candidates.extend(
        RESOLVE_EXTENSIONS
            .iter()
            .map(|ext| format!("{stripped}/index{ext}")),
    );
    if !has_extension(source) {
        candidates.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!("{resolved}{ext}")));
        candidates.extend(
            RESOLVE_EXTENSIONS
                .iter()
                .map(|ext| format!("{resolved}/index{ext}")),
        );
    }

    candidates
        .iter()
        .find_map(|candidate| known_files.get(candidate))
        .cloned()
}

fn strip_js_extension(path: &str) -> &str {
    JS_STYLE_EXTENSIONS
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path)
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of code artifact a node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Module,
    Class,
    Function,
    Backlog,
}

/// Type of relationship carried by an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeType {
    /// A imports B (import statement)
    Imports,

    /// A extends B (inheritance)
    Extends,

    /// A implements interface B
    Implements,

    /// A calls B (function call)
    Calls,

    /// A references B (type or symbol usage)
    References,
}

impl EdgeType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Imports => "imports",
            Self::Extends => "extends",
            Self::Implements => "implements",
            Self::Calls => "calls",
            Self::References => "references",
        }
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node in the dependency graph (one per indexed file or artifact)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique id, derived from the normalized file path
    pub id: String,

    /// Source file path as indexed
    pub file_path: String,

    /// Declared symbol names, in declaration order
    #[serde(default)]
    pub symbols: Vec<String>,

    #[serde(rename = "type")]
    pub node_type: NodeType,
}

impl GraphNode {
    /// Module node for a file, with the id derived from its path
    #[must_use]
    pub fn module(file_path: impl Into<String>, symbols: Vec<String>) -> Self {
        let file_path = file_path.into();
        Self {
            id: crate::paths::node_id_for_path(&file_path),
            file_path,
            symbols,
            node_type: NodeType::Module,
        }
    }
}

/// Directed, typed edge. Parallel edges between the same pair are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,

    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl GraphEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
        }
    }
}

/// Persisted graph snapshot: `{ "nodes": [...], "edges": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

//! # Context Graph
//!
//! File-level dependency graph used to enrich search hits with related code.
//!
//! ## Architecture
//!
//! ```text
//! ParsedFile[] + ImportExtractor
//!     │
//!     ├──> Graph Builder
//!     │      ├─ One module node per file
//!     │      ├─ Resolve relative imports against known files
//!     │      └─ Emit `imports` edges
//!     │
//!     ├──> Dependency Graph
//!     │      ├─ Outgoing and incoming adjacency per node
//!     │      ├─ Bounded undirected BFS (related nodes + hop distance)
//!     │      └─ JSON snapshot round trip
//!     │
//!     └──> ReadonlyGraph
//!            └─ Lookup-only view handed to query-time components
//! ```

mod builder;
mod error;
mod graph;
mod paths;
mod snapshot;
mod types;

pub use builder::{
    is_relative_specifier, resolve_import, GraphBuilder, ImportExtractor, ImportRef, ParsedFile,
    RESOLVE_EXTENSIONS,
};
pub use error::{GraphError, Result};
pub use graph::{DependencyGraph, ReadonlyGraph, DEFAULT_MAX_DEPTH};
pub use paths::{file_name, node_id_for_path, parent_dir};
pub use types::{EdgeType, GraphEdge, GraphNode, GraphSnapshot, NodeType};

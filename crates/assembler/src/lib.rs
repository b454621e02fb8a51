//! # Context Assembler
//!
//! Turns ranked search hits into a prompt-ready, token-budgeted context.
//!
//! ## Architecture
//!
//! ```text
//! SearchResult[] (from context-search)
//!     │
//!     ├──> Context Expander
//!     │      ├─ Bounded BFS over the dependency graph per hit
//!     │      ├─ Resolve reached nodes via ChunkLookup
//!     │      ├─ Classify relationship (test_for, imports, ...)
//!     │      └─ Collect graph excerpt
//!     │
//!     └──> Token Budget Optimizer
//!            ├─ Split available tokens across sections by weight
//!            ├─ Greedy fill: primary, related, graph
//!            └─ AssembledContext (content + truncation flag)
//! ```

mod budget;
mod config;
mod excerpt;
mod expander;
mod format;
mod lookup;
mod pipeline;
mod tokens;

pub use budget::{AssembledContext, SectionBudgets, TokenBudgetConfig, TokenBudgetOptimizer};
pub use config::{EngineConfig, ExpansionConfig};
pub use excerpt::{ExcerptEdge, GraphExcerpt};
pub use expander::{
    classify_relationship, is_test_pair, is_test_path, ContextExpander, ExpandedContext,
    RelatedChunk, Relationship,
};
pub use format::{
    format_graph, format_primary, format_related, section, GRAPH_HEADER, PRIMARY_HEADER,
    RELATED_HEADER,
};
pub use lookup::ChunkLookup;
pub use pipeline::RagPipeline;
pub use tokens::{estimate_tokens, CHARS_PER_TOKEN};

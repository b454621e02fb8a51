//! # Context Search
//!
//! Hybrid retrieval over indexed code chunks.
//!
//! ```text
//! query
//!   ├──> EmbeddingProvider ──> VectorStore (fetch 2×top_k)
//!   ├──> LexicalIndex (fetch 2×top_k)
//!   └──> RRF fusion (weighted, k = 60) ──> top_k SearchResult
//! ```

mod config;
mod error;
mod fusion;
mod hybrid;
mod metadata;
mod providers;
mod types;

pub use config::{SearchConfig, SearchOptions};
pub use error::{EmbedError, Result, SearchError, StoreError};
pub use fusion::{FusedCandidate, FusionWeights, RRFFusion, RRF_K};
pub use hybrid::HybridSearch;
pub use metadata::{hydrate_vector_hit, FieldError, VectorMetadata, UNKNOWN_LANGUAGE};
pub use providers::{EmbeddingProvider, LexicalIndex, VectorHit, VectorStore};
pub use types::{ChunkMetadata, ChunkRecord, ChunkType, SearchMethod, SearchResult};

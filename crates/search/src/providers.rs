//! Collaborators the hybrid searcher talks to.
//!
//! Embedding and vector storage are remote and may fail; the lexical index is
//! local and has no failure mode.

use crate::error::{EmbedError, StoreError};
use crate::types::SearchResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// One vector per input text, in input order
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Nearest-neighbor hit as returned by a vector store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    pub id: String,
    pub score: f32,

    /// Untyped payload stored alongside the vector
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Up to `top_k` nearest neighbors, best first
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<VectorHit>, StoreError>;
}

pub trait LexicalIndex: Send + Sync {
    /// Up to `limit` keyword matches, best first
    fn search(&self, query: &str, limit: usize) -> Vec<SearchResult>;
}

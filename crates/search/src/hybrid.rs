use crate::config::{SearchConfig, SearchOptions};
use crate::error::{EmbedError, Result};
use crate::fusion::RRFFusion;
use crate::metadata::hydrate_vector_hit;
use crate::providers::{EmbeddingProvider, LexicalIndex, VectorStore};
use crate::types::SearchResult;
use std::sync::Arc;

/// Hybrid search combining vector retrieval and lexical retrieval via RRF fusion
pub struct HybridSearch {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    lexical: Arc<dyn LexicalIndex>,
    fusion: RRFFusion,
    config: SearchConfig,
}

impl HybridSearch {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        lexical: Arc<dyn LexicalIndex>,
        config: SearchConfig,
    ) -> Self {
        Self {
            embedder,
            store,
            lexical,
            fusion: RRFFusion::default(),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Rank indexed chunks against `query`.
    ///
    /// Both retrievers are asked for twice the requested count. An embedding or
    /// vector-store failure aborts the call; there is no lexical-only mode.
    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let (top_k, weights) = self.config.resolve(options);
        let fetch_k = top_k.saturating_mul(2);

        log::debug!(
            "Hybrid search: query='{}', top_k={}, fetch_k={}",
            query,
            top_k,
            fetch_k
        );

        // 1. Vector retrieval
        let vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = vectors
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::new("embedding provider returned no vector for the query"))?;
        let vector_hits = self.store.query(&query_vector, fetch_k).await?;
        log::debug!("Vector: {} results", vector_hits.len());

        // 2. Lexical retrieval
        let lexical_hits = self.lexical.search(query, fetch_k);
        log::debug!("Lexical: {} results", lexical_hits.len());

        // 3. RRF fusion
        let fused = self.fusion.fuse(vector_hits, lexical_hits, weights);
        log::debug!("Fused: {} results", fused.len());

        // 4. Materialize results, hydrating vector-only hits from stored metadata
        let results: Vec<SearchResult> = fused
            .into_iter()
            .take(top_k)
            .map(|(candidate, score)| {
                let method = candidate.method();
                match candidate.lexical {
                    Some(result) => result.rescored(score, method),
                    None => hydrate_vector_hit(
                        &candidate.id,
                        candidate.vector_metadata.as_ref(),
                        score,
                        method,
                    ),
                }
            })
            .collect();

        log::info!("Hybrid search completed: {} final results", results.len());

        Ok(results)
    }
}

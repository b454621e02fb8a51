use crate::budget::{AssembledContext, TokenBudgetOptimizer};
use crate::config::{EngineConfig, ExpansionConfig};
use crate::expander::{ContextExpander, ExpandedContext};
use crate::lookup::ChunkLookup;
use context_graph::DependencyGraph;
use context_search::{
    EmbeddingProvider, HybridSearch, LexicalIndex, Result, SearchOptions, SearchResult, VectorStore,
};
use std::sync::Arc;

/// Query-to-prompt pipeline: hybrid search, graph expansion, budgeted assembly.
///
/// The graph is an immutable snapshot shared with whoever rebuilds it;
/// swapping in a new snapshot is the caller's job.
pub struct RagPipeline {
    search: HybridSearch,
    graph: Arc<DependencyGraph>,
    lookup: Arc<dyn ChunkLookup>,
    expansion: ExpansionConfig,
    optimizer: TokenBudgetOptimizer,
}

impl RagPipeline {
    pub fn new(
        search: HybridSearch,
        graph: Arc<DependencyGraph>,
        lookup: Arc<dyn ChunkLookup>,
        expansion: ExpansionConfig,
        optimizer: TokenBudgetOptimizer,
    ) -> Self {
        Self {
            search,
            graph,
            lookup,
            expansion,
            optimizer,
        }
    }

    /// Wire every stage from one engine config
    pub fn from_config(
        config: EngineConfig,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        lexical: Arc<dyn LexicalIndex>,
        graph: Arc<DependencyGraph>,
        lookup: Arc<dyn ChunkLookup>,
    ) -> Self {
        let search = HybridSearch::new(embedder, store, lexical, config.search);
        Self::new(
            search,
            graph,
            lookup,
            config.expansion,
            TokenBudgetOptimizer::new(config.budget),
        )
    }

    #[must_use]
    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        self.search.search(query, options).await
    }

    pub async fn expand(&self, results: Vec<SearchResult>) -> ExpandedContext {
        ContextExpander::new(self.graph.as_ref(), self.lookup.as_ref())
            .with_max_depth(self.expansion.max_depth)
            .expand(results, self.expansion.max_related)
            .await
    }

    /// Run the whole flow. Only the search stage can fail.
    pub async fn query(&self, query: &str, options: &SearchOptions) -> Result<AssembledContext> {
        let results = self.search(query, options).await?;
        let expanded = self.expand(results).await;
        let assembled = self.optimizer.assemble(&expanded);

        log::info!(
            "Assembled context for '{}': {} primary, {} related, {} tokens{}",
            query,
            assembled.primary_chunks.len(),
            assembled.related_chunks.len(),
            assembled.token_count,
            if assembled.truncated { " (truncated)" } else { "" }
        );

        Ok(assembled)
    }
}

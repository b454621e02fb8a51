use async_trait::async_trait;
use context_search::SearchResult;
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves a graph node id to the chunk indexed for it.
///
/// Synchronous backends simply return without awaiting anything.
#[async_trait]
pub trait ChunkLookup: Send + Sync {
    async fn lookup(&self, chunk_id: &str) -> Option<SearchResult>;
}

#[async_trait]
impl ChunkLookup for HashMap<String, SearchResult> {
    async fn lookup(&self, chunk_id: &str) -> Option<SearchResult> {
        self.get(chunk_id).cloned()
    }
}

#[async_trait]
impl<T: ChunkLookup + ?Sized> ChunkLookup for Arc<T> {
    async fn lookup(&self, chunk_id: &str) -> Option<SearchResult> {
        (**self).lookup(chunk_id).await
    }
}

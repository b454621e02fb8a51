use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Failure reported by an embedding provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Embedding error: {0}")]
pub struct EmbedError(pub String);

impl EmbedError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Failure reported by a vector store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Vector store error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

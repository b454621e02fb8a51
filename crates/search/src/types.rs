use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which retriever produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMethod {
    Vector,
    Bm25,
    Hybrid,
}

/// Kind of indexed chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkType {
    #[default]
    Function,
    Method,
    Class,
    Interface,
    Type,
    Module,
    Config,
    Doc,
}

impl ChunkType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Type => "type",
            Self::Module => "module",
            Self::Config => "config",
            Self::Doc => "doc",
        }
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" => Ok(Self::Function),
            "method" => Ok(Self::Method),
            "class" => Ok(Self::Class),
            "interface" => Ok(Self::Interface),
            "type" => Ok(Self::Type),
            "module" => Ok(Self::Module),
            "config" => Ok(Self::Config),
            "doc" => Ok(Self::Doc),
            other => Err(format!("unknown chunk type '{other}'")),
        }
    }
}

/// Location and kind of a chunk
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkMetadata {
    pub file_path: String,

    /// Start line (1-indexed, 0 when unknown)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    pub language: String,
    pub chunk_type: ChunkType,

    /// Symbol name, empty for anonymous chunks
    #[serde(default)]
    pub name: String,
}

/// Full stored record of an indexed chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRecord {
    pub id: String,
    pub content: String,
    pub nl_summary: String,
    pub metadata: ChunkMetadata,
}

/// One ranked hit for a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub chunk_id: String,
    pub content: String,
    pub nl_summary: String,
    pub score: f32,
    pub method: SearchMethod,
    pub metadata: ChunkMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<ChunkRecord>,
}

impl SearchResult {
    /// Result carrying the given record, scored by `method`
    #[must_use]
    pub fn from_record(record: ChunkRecord, score: f32, method: SearchMethod) -> Self {
        Self {
            chunk_id: record.id.clone(),
            content: record.content.clone(),
            nl_summary: record.nl_summary.clone(),
            score,
            method,
            metadata: record.metadata.clone(),
            chunk: Some(record),
        }
    }

    #[must_use]
    pub fn file_path(&self) -> &str {
        &self.metadata.file_path
    }

    /// Same result with a new score and method; content is untouched
    #[must_use]
    pub fn rescored(mut self, score: f32, method: SearchMethod) -> Self {
        self.score = score;
        self.method = method;
        self
    }
}

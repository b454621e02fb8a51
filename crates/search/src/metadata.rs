//! Decoding of untyped vector-store payloads.
//!
//! Every field is decoded on its own into a `Result`; the caller decides the
//! fallback. Keys are accepted in `snake_case` or `camelCase`.

use crate::types::{ChunkMetadata, ChunkRecord, ChunkType, SearchMethod, SearchResult};
use serde_json::{Map, Value};
use thiserror::Error;

pub const UNKNOWN_LANGUAGE: &str = "unknown";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` is not a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` has unsupported value `{value}`")]
    Invalid { field: &'static str, value: String },
}

/// Typed view over an optional metadata object
#[derive(Debug, Clone, Copy)]
pub struct VectorMetadata<'a> {
    map: Option<&'a Map<String, Value>>,
}

impl<'a> VectorMetadata<'a> {
    #[must_use]
    pub const fn new(map: Option<&'a Map<String, Value>>) -> Self {
        Self { map }
    }

    fn get(&self, field: &'static str, alias: Option<&'static str>) -> Result<&'a Value, FieldError> {
        let map = self.map.ok_or(FieldError::Missing(field))?;
        map.get(field)
            .or_else(|| alias.and_then(|a| map.get(a)))
            .filter(|v| !v.is_null())
            .ok_or(FieldError::Missing(field))
    }

    pub fn string(&self, field: &'static str, alias: Option<&'static str>) -> Result<String, FieldError> {
        match self.get(field, alias)? {
            Value::String(s) => Ok(s.clone()),
            _ => Err(FieldError::WrongType {
                field,
                expected: "string",
            }),
        }
    }

    pub fn line(&self, field: &'static str, alias: Option<&'static str>) -> Result<usize, FieldError> {
        let value = self.get(field, alias)?;
        value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or(FieldError::WrongType {
                field,
                expected: "non-negative integer",
            })
    }

    pub fn chunk_type(&self) -> Result<ChunkType, FieldError> {
        let raw = self.string("chunk_type", Some("chunkType"))?;
        raw.parse().map_err(|_| FieldError::Invalid {
            field: "chunk_type",
            value: raw,
        })
    }
}

/// Build a result for an id that only the vector store returned.
///
/// Undecodable fields fall back to an empty string, `"unknown"` language,
/// `function` chunk type or line 0, so every id yields a well-formed result.
#[must_use]
pub fn hydrate_vector_hit(
    id: &str,
    metadata: Option<&Map<String, Value>>,
    score: f32,
    method: SearchMethod,
) -> SearchResult {
    let meta = VectorMetadata::new(metadata);

    let content = or_fallback(id, meta.string("content", None), String::new());
    let nl_summary = or_fallback(id, meta.string("nl_summary", Some("nlSummary")), String::new());
    let chunk_metadata = ChunkMetadata {
        file_path: or_fallback(id, meta.string("file_path", Some("filePath")), String::new()),
        start_line: or_fallback(id, meta.line("start_line", Some("startLine")), 0),
        end_line: or_fallback(id, meta.line("end_line", Some("endLine")), 0),
        language: or_fallback(
            id,
            meta.string("language", None),
            UNKNOWN_LANGUAGE.to_string(),
        ),
        chunk_type: or_fallback(id, meta.chunk_type(), ChunkType::Function),
        name: or_fallback(id, meta.string("name", None), String::new()),
    };

    let record = ChunkRecord {
        id: id.to_string(),
        content,
        nl_summary,
        metadata: chunk_metadata,
    };
    SearchResult::from_record(record, score, method)
}

fn or_fallback<T>(id: &str, decoded: Result<T, FieldError>, fallback: T) -> T {
    decoded.unwrap_or_else(|err| {
        log::debug!("Vector metadata for {id}: {err}, using fallback");
        fallback
    })
}

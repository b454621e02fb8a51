//! Markdown rendering of context items.

use crate::excerpt::GraphExcerpt;
use crate::expander::RelatedChunk;
use context_search::{SearchResult, UNKNOWN_LANGUAGE};
use std::fmt::Write;

pub const PRIMARY_HEADER: &str = "## Primary Results";
pub const RELATED_HEADER: &str = "## Related Context";
pub const GRAPH_HEADER: &str = "## Dependency Graph";

/// `[rank] title (score)` header, location, summary and fenced content
#[must_use]
pub fn format_primary(rank: usize, result: &SearchResult) -> String {
    let mut out = format!(
        "### [{rank}] {} (score: {:.4})\n",
        title(result),
        result.score
    );
    write_body(&mut out, result);
    out
}

/// `title (relationship, distance N)` header, location, summary and fenced content
#[must_use]
pub fn format_related(related: &RelatedChunk) -> String {
    let mut out = format!(
        "### {} ({}, distance {})\n",
        title(&related.chunk),
        related.relationship,
        related.distance
    );
    write_body(&mut out, &related.chunk);
    out
}

/// Flat node list followed by one `from --[type]--> to` line per edge
#[must_use]
pub fn format_graph(excerpt: &GraphExcerpt) -> String {
    let mut out = format!("Nodes: {}\n", excerpt.nodes.join(", "));
    for edge in &excerpt.edges {
        let _ = writeln!(out, "{} --[{}]--> {}", edge.from, edge.edge_type, edge.to);
    }
    out
}

/// Section header followed by its items
#[must_use]
pub fn section(header: &str, items: &[String]) -> String {
    format!("{header}\n\n{}", items.join("\n"))
}

fn title(result: &SearchResult) -> &str {
    if result.metadata.name.is_empty() {
        &result.chunk_id
    } else {
        &result.metadata.name
    }
}

fn write_body(out: &mut String, result: &SearchResult) {
    let meta = &result.metadata;
    if !meta.file_path.is_empty() {
        if meta.start_line > 0 {
            let _ = writeln!(out, "File: {}:{}-{}", meta.file_path, meta.start_line, meta.end_line);
        } else {
            let _ = writeln!(out, "File: {}", meta.file_path);
        }
    }
    if !result.nl_summary.is_empty() {
        let _ = writeln!(out, "Summary: {}", result.nl_summary);
    }

    let language = if meta.language == UNKNOWN_LANGUAGE {
        ""
    } else {
        meta.language.as_str()
    };
    let _ = writeln!(out, "```{language}\n{}\n```", result.content.trim_end());
}

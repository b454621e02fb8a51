use crate::expander::{ExpandedContext, RelatedChunk};
use crate::format::{
    format_graph, format_primary, format_related, section, GRAPH_HEADER, PRIMARY_HEADER,
    RELATED_HEADER,
};
use crate::tokens::estimate_tokens;
use context_search::SearchResult;
use serde::{Deserialize, Serialize};

/// Token ceiling and its split across context sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenBudgetConfig {
    /// Hard ceiling for prompt context plus answer
    pub max_tokens: usize,

    /// Tokens kept free for the model's answer
    pub reserve_for_answer: usize,

    pub primary_weight: f64,
    pub related_weight: f64,
    pub graph_weight: f64,
}

impl Default for TokenBudgetConfig {
    fn default() -> Self {
        Self {
            max_tokens: 8000,
            reserve_for_answer: 2000,
            primary_weight: 0.6,
            related_weight: 0.3,
            graph_weight: 0.1,
        }
    }
}

impl TokenBudgetConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("budget.primary_weight", self.primary_weight),
            ("budget.related_weight", self.related_weight),
            ("budget.graph_weight", self.graph_weight),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {weight}"));
            }
        }

        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if total > 1.0 + 1e-9 {
            return Err(format!("budget weights must sum to at most 1.0, got {total}"));
        }

        Ok(())
    }

    /// Split the available tokens. Flooring residue is left unused.
    #[must_use]
    pub fn budgets(&self) -> SectionBudgets {
        let available = self.max_tokens.saturating_sub(self.reserve_for_answer);
        let share = |weight: f64| (available as f64 * weight).floor().max(0.0) as usize;

        SectionBudgets {
            available,
            primary: share(self.primary_weight),
            related: share(self.related_weight),
            graph: share(self.graph_weight),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionBudgets {
    pub available: usize,
    pub primary: usize,
    pub related: usize,
    pub graph: usize,
}

/// Final prompt-ready context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub content: String,

    /// Primary results that made it into `content`, best first
    pub primary_chunks: Vec<SearchResult>,

    /// Related chunks that made it into `content`, nearest first
    pub related_chunks: Vec<RelatedChunk>,

    /// Estimated tokens of the included items and graph excerpt
    pub token_count: usize,

    /// True when any offered item or the graph excerpt was left out for budget reasons
    pub truncated: bool,
}

/// Packs an expanded context into one string under a token ceiling
#[derive(Debug, Clone, Default)]
pub struct TokenBudgetOptimizer {
    config: TokenBudgetConfig,
}

impl TokenBudgetOptimizer {
    #[must_use]
    pub const fn new(config: TokenBudgetConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &TokenBudgetConfig {
        &self.config
    }

    /// Greedy, section-by-section fill.
    ///
    /// Within a section items are added in order until the first one that
    /// would overflow the section budget; no item is ever cut in half.
    #[must_use]
    pub fn assemble(&self, context: &ExpandedContext) -> AssembledContext {
        let budgets = self.config.budgets();

        let mut primary: Vec<&SearchResult> = context.primary_results.iter().collect();
        primary.sort_by(|a, b| b.score.total_cmp(&a.score));
        let primary_fill = fill(&primary, budgets.primary, |rank, result| {
            format_primary(rank + 1, result)
        });

        let mut related: Vec<&RelatedChunk> = context.related_chunks.iter().collect();
        related.sort_by_key(|r| r.distance);
        let related_fill = fill(&related, budgets.related, |_, chunk| format_related(chunk));

        let graph_text = if context.graph_excerpt.is_empty() {
            None
        } else {
            Some(format_graph(&context.graph_excerpt))
        };
        let graph_tokens = graph_text.as_deref().map_or(0, estimate_tokens);
        let graph_included = graph_text.is_some() && graph_tokens <= budgets.graph;

        let mut sections = Vec::new();
        if !primary_fill.rendered.is_empty() {
            sections.push(section(PRIMARY_HEADER, &primary_fill.rendered));
        }
        if !related_fill.rendered.is_empty() {
            sections.push(section(RELATED_HEADER, &related_fill.rendered));
        }
        if let Some(text) = graph_text.as_ref().filter(|_| graph_included) {
            sections.push(format!("{GRAPH_HEADER}\n\n{text}"));
        }

        let token_count = primary_fill.tokens
            + related_fill.tokens
            + if graph_included { graph_tokens } else { 0 };
        let truncated = primary_fill.included < primary.len()
            || related_fill.included < related.len()
            || (graph_text.is_some() && !graph_included);

        log::debug!(
            "Token budgets: available={}, primary {}/{}, related {}/{}, graph {}/{}",
            budgets.available,
            primary_fill.tokens,
            budgets.primary,
            related_fill.tokens,
            budgets.related,
            if graph_included { graph_tokens } else { 0 },
            budgets.graph
        );
        if truncated {
            log::info!(
                "Context truncated: {}/{} primary, {}/{} related, graph {}",
                primary_fill.included,
                primary.len(),
                related_fill.included,
                related.len(),
                if graph_included { "kept" } else { "dropped" }
            );
        }

        AssembledContext {
            content: sections.join("\n"),
            primary_chunks: primary[..primary_fill.included]
                .iter()
                .map(|r| (*r).clone())
                .collect(),
            related_chunks: related[..related_fill.included]
                .iter()
                .map(|r| (*r).clone())
                .collect(),
            token_count,
            truncated,
        }
    }
}

struct Fill {
    rendered: Vec<String>,
    tokens: usize,
    included: usize,
}

fn fill<T>(items: &[&T], budget: usize, render: impl Fn(usize, &T) -> String) -> Fill {
    let mut out = Fill {
        rendered: Vec::new(),
        tokens: 0,
        included: 0,
    };

    for (idx, item) in items.iter().enumerate() {
        let text = render(idx, *item);
        let cost = estimate_tokens(&text);
        if out.tokens + cost > budget {
            break;
        }
        out.tokens += cost;
        out.rendered.push(text);
        out.included += 1;
    }

    out
}

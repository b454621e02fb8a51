use crate::budget::TokenBudgetConfig;
use anyhow::{anyhow, Context, Result};
use context_graph::DEFAULT_MAX_DEPTH;
use context_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Graph expansion limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    /// Related chunks kept after sorting by distance
    pub max_related: usize,

    /// BFS hop limit
    pub max_depth: usize,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            max_related: 10,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Engine configuration, typically read from a TOML file:
///
/// ```toml
/// [search]
/// top_k = 8
/// vector_weight = 0.6
/// bm25_weight = 0.4
///
/// [budget]
/// max_tokens = 12000
/// reserve_for_answer = 3000
///
/// [expansion]
/// max_related = 6
/// ```
///
/// Missing sections and keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub budget: TokenBudgetConfig,
    pub expansion: ExpansionConfig,
}

impl EngineConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).context("Failed to parse engine config")?;
        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read engine config {}", path.display()))?;
        let config = Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid engine config {}", path.display()))?;
        log::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.search.validate().map_err(|e| anyhow!(e))?;
        self.budget.validate().map_err(|e| anyhow!(e))?;
        if self.expansion.max_depth == 0 {
            return Err(anyhow!("expansion.max_depth must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.budget.max_tokens, 8000);
        assert_eq!(config.expansion.max_related, 10);
        assert_eq!(config.search.top_k, 10);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            [search]
            top_k = 4

            [budget]
            max_tokens = 2000
            reserve_for_answer = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.search.top_k, 4);
        assert_eq!(config.search.vector_weight, 0.7);
        assert_eq!(config.budget.budgets().primary, 900);
        assert_eq!(config.expansion, ExpansionConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = EngineConfig::from_toml_str("[budget]\nprimary_weight = 0.9\nrelated_weight = 0.5\n")
            .unwrap_err();
        assert!(err.to_string().contains("sum to at most 1.0"));

        assert!(EngineConfig::from_toml_str("[expansion]\nmax_depth = 0\n").is_err());
        assert!(EngineConfig::from_toml_str("[search]\ntop_k = \"many\"\n").is_err());
    }

    #[tokio::test]
    async fn loads_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("engine.toml");
        tokio::fs::write(&path, "[expansion]\nmax_related = 3\n").await.unwrap();

        let config = EngineConfig::load(&path).await.unwrap();
        assert_eq!(config.expansion.max_related, 3);

        let missing = EngineConfig::load(tmp.path().join("missing.toml")).await;
        assert!(missing.is_err());
    }
}

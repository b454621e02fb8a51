use crate::fusion::FusionWeights;
use serde::{Deserialize, Serialize};

/// Default ranking parameters for hybrid search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results returned per query
    pub top_k: usize,

    /// Weight of the vector ranking in RRF fusion
    pub vector_weight: f32,

    /// Weight of the lexical ranking in RRF fusion
    pub bm25_weight: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            vector_weight: 0.7,
            bm25_weight: 0.3,
        }
    }
}

impl SearchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.top_k == 0 {
            return Err("search.top_k must be > 0".to_string());
        }

        for (name, weight) in [
            ("search.vector_weight", self.vector_weight),
            ("search.bm25_weight", self.bm25_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} must be a non-negative number, got {weight}"));
            }
        }

        Ok(())
    }

    /// Effective parameters for one call
    #[must_use]
    pub fn resolve(&self, options: &SearchOptions) -> (usize, FusionWeights) {
        let top_k = options.top_k.unwrap_or(self.top_k);
        let weights = FusionWeights {
            vector: options.vector_weight.unwrap_or(self.vector_weight),
            bm25: options.bm25_weight.unwrap_or(self.bm25_weight),
        };
        (top_k, weights)
    }
}

/// Per-call overrides of [`SearchConfig`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    pub top_k: Option<usize>,
    pub vector_weight: Option<f32>,
    pub bm25_weight: Option<f32>,
}

impl SearchOptions {
    #[must_use]
    pub const fn top_k(mut self, top_k: usize) -> Self {
        self.top_k = Some(top_k);
        self
    }

    #[must_use]
    pub const fn weights(mut self, vector: f32, bm25: f32) -> Self {
        self.vector_weight = Some(vector);
        self.bm25_weight = Some(bm25);
        self
    }
}

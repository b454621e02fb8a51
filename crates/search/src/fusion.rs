use crate::providers::VectorHit;
use crate::types::{SearchMethod, SearchResult};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// RRF smoothing constant
pub const RRF_K: f32 = 60.0;

/// Weights applied to each modality's RRF contribution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionWeights {
    pub vector: f32,
    pub bm25: f32,
}

/// Per-id fusion state
#[derive(Debug, Clone, Default)]
pub struct FusedCandidate {
    pub id: String,
    pub vector_rrf: f32,
    pub bm25_rrf: f32,

    /// Payload from the lexical side, preferred when present
    pub lexical: Option<SearchResult>,

    /// Raw payload from the vector side, used to hydrate vector-only hits
    pub vector_metadata: Option<Map<String, Value>>,

    in_vector: bool,
    in_lexical: bool,
}

impl FusedCandidate {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn fused_score(&self, weights: FusionWeights) -> f32 {
        weights.vector * self.vector_rrf + weights.bm25 * self.bm25_rrf
    }

    #[must_use]
    pub const fn method(&self) -> SearchMethod {
        match (self.in_vector, self.in_lexical) {
            (true, true) => SearchMethod::Hybrid,
            (false, true) => SearchMethod::Bm25,
            _ => SearchMethod::Vector,
        }
    }
}

/// Reciprocal Rank Fusion over a vector ranking and a lexical ranking.
///
/// RRF formula: score(d) = Σ weight_i / (k + rank_i(d) + 1), rank 0-based.
///
/// Candidates live in an insertion-ordered table (vector hits first, then
/// lexical-only hits) and are sorted with a stable sort, so equal scores keep
/// first-seen order.
#[derive(Debug, Clone)]
pub struct RRFFusion {
    k: f32,
}

impl RRFFusion {
    #[must_use]
    pub const fn new(k: f32) -> Self {
        Self { k }
    }

    /// Contribution of the item at 0-based `rank`
    #[must_use]
    pub fn rrf_score(&self, rank: usize) -> f32 {
        1.0 / (self.k + rank as f32 + 1.0)
    }

    /// Merge both rankings by id. A repeated id within one ranking keeps its best rank.
    #[must_use]
    pub fn merge(&self, vector_hits: Vec<VectorHit>, lexical_hits: Vec<SearchResult>) -> Vec<FusedCandidate> {
        let mut table = FusionTable::default();

        for (rank, hit) in vector_hits.into_iter().enumerate() {
            let rrf = self.rrf_score(rank);
            let candidate = table.entry(&hit.id);
            if candidate.in_vector {
                continue;
            }
            candidate.in_vector = true;
            candidate.vector_rrf = rrf;
            candidate.vector_metadata = hit.metadata;
        }

        for (rank, result) in lexical_hits.into_iter().enumerate() {
            let rrf = self.rrf_score(rank);
            let candidate = table.entry(&result.chunk_id);
            if candidate.in_lexical {
                continue;
            }
            candidate.in_lexical = true;
            candidate.bm25_rrf = rrf;
            candidate.lexical = Some(result);
        }

        table.entries
    }

    /// Merge, score and sort descending by fused score
    #[must_use]
    pub fn fuse(
        &self,
        vector_hits: Vec<VectorHit>,
        lexical_hits: Vec<SearchResult>,
        weights: FusionWeights,
    ) -> Vec<(FusedCandidate, f32)> {
        let mut scored: Vec<(FusedCandidate, f32)> = self
            .merge(vector_hits, lexical_hits)
            .into_iter()
            .map(|candidate| {
                let score = candidate.fused_score(weights);
                (candidate, score)
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }
}

impl Default for RRFFusion {
    fn default() -> Self {
        Self::new(RRF_K)
    }
}

#[derive(Default)]
struct FusionTable {
    entries: Vec<FusedCandidate>,
    slots: HashMap<String, usize>,
}

impl FusionTable {
    fn entry(&mut self, id: &str) -> &mut FusedCandidate {
        let slot = match self.slots.get(id) {
            Some(&slot) => slot,
            None => {
                self.entries.push(FusedCandidate::new(id));
                let slot = self.entries.len() - 1;
                self.slots.insert(id.to_string(), slot);
                slot
            }
        };
        &mut self.entries[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn vector_hit(id: &str) -> VectorHit {
        VectorHit {
            id: id.to_string(),
            score: 0.9,
            metadata: None,
        }
    }

    fn lexical_hit(id: &str) -> SearchResult {
        SearchResult {
            chunk_id: id.to_string(),
            content: format!("content of {id}"),
            nl_summary: String::new(),
            score: 3.2,
            method: SearchMethod::Bm25,
            metadata: ChunkMetadata::default(),
            chunk: None,
        }
    }

    const EVEN: FusionWeights = FusionWeights {
        vector: 0.5,
        bm25: 0.5,
    };

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn vector_only_score_follows_rank() {
        let fusion = RRFFusion::default();
        let weights = FusionWeights {
            vector: 0.7,
            bm25: 0.3,
        };
        let fused = fusion.fuse(
            vec![vector_hit("a"), vector_hit("b"), vector_hit("c")],
            vec![],
            weights,
        );

        assert_eq!(fused.len(), 3);
        assert_eq!(fused[2].0.id, "c");
        assert!(close(fused[2].1, 0.7 / 63.0));
        assert_eq!(fused[2].0.method(), SearchMethod::Vector);
    }

    #[test]
    fn lexical_only_score_follows_rank() {
        let fused = RRFFusion::default().fuse(
            vec![],
            vec![lexical_hit("x"), lexical_hit("y")],
            FusionWeights {
                vector: 0.7,
                bm25: 0.3,
            },
        );
        assert!(close(fused[1].1, 0.3 / 62.0));
        assert_eq!(fused[1].0.method(), SearchMethod::Bm25);
    }

    #[test]
    fn shared_ids_accumulate_both_contributions() {
        let fused = RRFFusion::default().fuse(
            vec![vector_hit("a"), vector_hit("b")],
            vec![lexical_hit("c"), lexical_hit("b")],
            FusionWeights {
                vector: 0.6,
                bm25: 0.4,
            },
        );

        let (b, score) = fused.iter().find(|(c, _)| c.id == "b").unwrap();
        assert!(close(*score, 0.6 / 62.0 + 0.4 / 62.0));
        assert_eq!(b.method(), SearchMethod::Hybrid);
        assert!(b.lexical.is_some());
        assert_eq!(fused[0].0.id, "b");
    }

    #[test]
    fn ties_keep_first_seen_order() {
        // a (vector rank 0) and z (lexical rank 0) tie under equal weights
        let fused = RRFFusion::default().fuse(vec![vector_hit("a")], vec![lexical_hit("z")], EVEN);
        let ids: Vec<&str> = fused.iter().map(|(c, _)| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "z"]);
    }

    #[test]
    fn duplicate_id_in_one_list_keeps_best_rank() {
        let fused = RRFFusion::default().fuse(vec![vector_hit("a"), vector_hit("a")], vec![], EVEN);
        assert_eq!(fused.len(), 1);
        assert!(close(fused[0].1, 0.5 / 61.0));
    }

    #[test]
    fn heavier_weight_wins_between_single_source_hits() {
        let fused = RRFFusion::default().fuse(
            vec![vector_hit("v")],
            vec![lexical_hit("l")],
            FusionWeights {
                vector: 0.9,
                bm25: 0.1,
            },
        );
        assert_eq!(fused[0].0.id, "v");
    }

    #[test]
    fn nan_weights_still_yield_every_candidate() {
        let vector: Vec<VectorHit> = (0..40).map(|i| vector_hit(&format!("v{i}"))).collect();
        let lexical: Vec<SearchResult> = (0..40).map(|i| lexical_hit(&format!("l{i}"))).collect();
        let fused = RRFFusion::default().fuse(
            vector,
            lexical,
            FusionWeights {
                vector: f32::NAN,
                bm25: 0.3,
            },
        );

        assert_eq!(fused.len(), 80);
        // lexical-only scores stay finite and keep rank order after the NaN block
        let finite: Vec<&str> = fused
            .iter()
            .filter(|(_, score)| !score.is_nan())
            .map(|(c, _)| c.id.as_str())
            .collect();
        assert_eq!(finite[0], "l0");
        assert_eq!(finite.len(), 40);
    }

    proptest! {
        #[test]
        fn fused_scores_are_positive_and_bounded(
            vector_ids in prop::collection::vec("[a-f]", 0..12),
            lexical_ids in prop::collection::vec("[a-f]", 0..12),
            vw in 0.01f32..1.0,
            bw in 0.01f32..1.0,
        ) {
            let fused = RRFFusion::default().fuse(
                vector_ids.iter().map(|id| vector_hit(id)).collect(),
                lexical_ids.iter().map(|id| lexical_hit(id)).collect(),
                FusionWeights { vector: vw, bm25: bw },
            );
            for window in fused.windows(2) {
                prop_assert!(window[0].1 >= window[1].1);
            }
            for (_, score) in &fused {
                prop_assert!(*score > 0.0);
                prop_assert!(*score <= (vw + bw) / 61.0 + 1e-6);
            }
        }
    }
}

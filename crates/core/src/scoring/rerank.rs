//! Batch reranking with ambiguity-driven category adjustments.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::scorer::{CandidateScorer, ScoreBreakdown, SemanticSignal};
use crate::domain::{Candidate, PreferenceContext};

/// Category guidance from an external disambiguation step, supplied when
/// the query was flagged ambiguous.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AmbiguityHint {
    pub boost_categories: Vec<String>,
    pub exclude_categories: Vec<String>,
}

impl AmbiguityHint {
    /// Additive adjustment for a category: +0.15 on a boost match, -0.15
    /// on an exclude match, 0 otherwise.
    fn adjustment(&self, category: &str) -> f64 {
        if self.boost_categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            0.15
        } else if self.exclude_categories.iter().any(|c| c.eq_ignore_ascii_case(category)) {
            -0.15
        } else {
            0.0
        }
    }
}

/// A candidate with its score attached, as returned by the batch reranker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
}

impl CandidateScorer {
    /// Score a batch using each candidate's own search relevance as the
    /// semantic signal, apply any ambiguity adjustment, and sort
    /// descending by final score. Ties break on product id for stable
    /// output.
    pub fn rerank_batch(
        &self,
        candidates: &[Candidate],
        budget: Option<Decimal>,
        prefs: &PreferenceContext,
        hint: Option<&AmbiguityHint>,
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .iter()
            .map(|candidate| {
                let mut breakdown = self.score(
                    candidate,
                    SemanticSignal::Relevance(candidate.relevance),
                    budget,
                    prefs,
                );
                if let Some(hint) = hint {
                    breakdown.final_score = (breakdown.final_score
                        + hint.adjustment(&candidate.category))
                    .clamp(0.0, 1.0);
                }
                RankedCandidate { candidate: candidate.clone(), breakdown }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.breakdown
                .final_score
                .partial_cmp(&a.breakdown.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.candidate.id.0.cmp(&b.candidate.id.0))
        });
        ranked
    }
}

//! Multi-signal candidate scoring.
//!
//! Four signals (semantic, price fit, quality, preference alignment) are
//! fused with archetype-specific weights into a final score in 0..=1.

mod rerank;
mod scorer;

pub use rerank::{AmbiguityHint, RankedCandidate};
pub use scorer::{CandidateScorer, ScoreBreakdown, SemanticSignal};

use serde::{Deserialize, Serialize};

use crate::domain::Archetype;

/// Fusion weights for the four scoring signals. Every profile sums to 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub semantic: f64,
    pub price_fit: f64,
    pub quality: f64,
    pub alignment: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

/// Weights used when the archetype has no dedicated profile.
pub const DEFAULT_WEIGHTS: ScoringWeights =
    ScoringWeights { semantic: 0.40, price_fit: 0.30, quality: 0.20, alignment: 0.10 };

/// Fusion profile for an archetype. Six archetypes carry dedicated
/// profiles; the rest use the default.
pub fn archetype_weights(archetype: Archetype) -> ScoringWeights {
    match archetype {
        Archetype::BudgetConscious => {
            ScoringWeights { semantic: 0.30, price_fit: 0.40, quality: 0.15, alignment: 0.15 }
        }
        Archetype::QualitySeeker => {
            ScoringWeights { semantic: 0.30, price_fit: 0.10, quality: 0.40, alignment: 0.20 }
        }
        Archetype::ConvenienceBuyer => {
            ScoringWeights { semantic: 0.40, price_fit: 0.20, quality: 0.15, alignment: 0.25 }
        }
        Archetype::EarlyAdopter => {
            ScoringWeights { semantic: 0.45, price_fit: 0.15, quality: 0.20, alignment: 0.20 }
        }
        Archetype::DealHunter => {
            ScoringWeights { semantic: 0.30, price_fit: 0.45, quality: 0.10, alignment: 0.15 }
        }
        Archetype::ValueBalanced => {
            ScoringWeights { semantic: 0.35, price_fit: 0.30, quality: 0.20, alignment: 0.15 }
        }
        Archetype::ImpulseBuyer | Archetype::Researcher | Archetype::Default => DEFAULT_WEIGHTS,
    }
}

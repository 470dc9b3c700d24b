use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{archetype_weights, ScoringWeights};
use crate::domain::{Archetype, Candidate, Condition, PreferenceContext};

/// Semantic relevance input for one candidate.
///
/// Missing or malformed inputs never fail a score; they degrade to the
/// neutral 0.5.
#[derive(Clone, Copy, Debug)]
pub enum SemanticSignal<'a> {
    /// Precomputed relevance from the external search service, 0..=1.
    Relevance(f64),
    /// Pre-normalized embedding vectors to compare directly.
    Vectors { query: &'a [f64], product: &'a [f64] },
    /// No signal available.
    Unavailable,
}

/// Per-signal breakdown of one candidate's score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub semantic: f64,
    pub price_fit: f64,
    pub quality: f64,
    pub preference_alignment: f64,
    /// Weighted sum of the four signals, 0..=1.
    pub final_score: f64,
    pub weights_used: ScoringWeights,
    pub archetype: Archetype,
}

/// Premium brands per category; brands here earn a quality boost scaled
/// by the shopper's brand sensitivity.
const PREMIUM_BRANDS: &[(&str, &[&str])] = &[
    ("laptop", &["apple", "dell", "lenovo", "asus"]),
    ("desktop", &["apple", "dell", "hp"]),
    ("monitor", &["dell", "lg", "samsung"]),
    ("headset", &["sony", "bose", "sennheiser"]),
    ("keyboard", &["logitech", "keychron", "corsair"]),
    ("mouse", &["logitech", "razer"]),
    ("chair", &["herman miller", "steelcase"]),
];

const DEFAULT_PREMIUM_BRANDS: &[&str] = &["apple", "sony", "samsung", "dell", "logitech"];

fn is_premium_brand(category: &str, brand: &str) -> bool {
    let list = PREMIUM_BRANDS
        .iter()
        .find(|(cat, _)| *cat == category)
        .map(|(_, brands)| *brands)
        .unwrap_or(DEFAULT_PREMIUM_BRANDS);
    list.contains(&brand)
}

/// Pure multi-signal scorer. Stateless; safe to share across requests.
pub struct CandidateScorer;

impl CandidateScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score one candidate. Pure, no I/O; every component and the final
    /// score lie in 0..=1.
    pub fn score(
        &self,
        candidate: &Candidate,
        semantic: SemanticSignal<'_>,
        budget: Option<Decimal>,
        prefs: &PreferenceContext,
    ) -> ScoreBreakdown {
        let semantic = semantic_score(semantic);
        let price_fit = price_fit_score(candidate.price, budget, prefs.risk_tolerance);
        let quality = quality_score(candidate, prefs);
        let preference_alignment = alignment_score(candidate, prefs);

        let weights_used = archetype_weights(prefs.archetype);
        let final_score = (weights_used.semantic * semantic
            + weights_used.price_fit * price_fit
            + weights_used.quality * quality
            + weights_used.alignment * preference_alignment)
            .clamp(0.0, 1.0);

        ScoreBreakdown {
            semantic,
            price_fit,
            quality,
            preference_alignment,
            final_score,
            weights_used,
            archetype: prefs.archetype,
        }
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rescale an external relevance value with a sub-linear curve that
/// compresses low scores and rewards high ones.
fn rescale_relevance(value: f64) -> f64 {
    let base = ((value - 0.35) / 0.35).max(0.0);
    base.powf(0.7).clamp(0.0, 1.0)
}

fn semantic_score(signal: SemanticSignal<'_>) -> f64 {
    match signal {
        SemanticSignal::Relevance(value) if value.is_finite() => rescale_relevance(value),
        SemanticSignal::Vectors { query, product }
            if !query.is_empty() && query.len() == product.len() =>
        {
            let dot: f64 = query.iter().zip(product).map(|(a, b)| a * b).sum();
            let query_norm = query.iter().map(|v| v * v).sum::<f64>().sqrt();
            let product_norm = product.iter().map(|v| v * v).sum::<f64>().sqrt();
            if query_norm == 0.0 || product_norm == 0.0 {
                return 0.5;
            }
            let cosine = (dot / (query_norm * product_norm)).clamp(-1.0, 1.0);
            (cosine + 1.0) / 2.0
        }
        // Mismatched dimensions or missing vectors are neutral, never an
        // error.
        _ => 0.5,
    }
}

/// Piecewise fit of price against budget. The sweet spot is 50-90% of
/// budget; very cheap items are mildly suspicious and over-budget items
/// are penalized in proportion to the shopper's risk tolerance.
fn price_fit_score(price: Decimal, budget: Option<Decimal>, risk_tolerance: f64) -> f64 {
    let Some(budget) = budget.filter(|b| *b > Decimal::ZERO) else {
        return 0.5;
    };
    let r = (price / budget).to_f64().unwrap_or(f64::MAX);

    if r <= 0.3 {
        0.5 + 0.3 * (r / 0.3)
    } else if r <= 0.5 {
        0.8 + 0.2 * ((r - 0.3) / 0.2)
    } else if r <= 0.9 {
        1.0
    } else if r <= 1.0 {
        1.0 - 0.2 * ((r - 0.9) / 0.1)
    } else if r <= 1.2 {
        (0.8 - (r - 1.0) * (1.5 - risk_tolerance)).max(0.4)
    } else {
        (0.4 - (r - 1.2) * 0.5).max(0.1)
    }
}

fn quality_score(candidate: &Candidate, prefs: &PreferenceContext) -> f64 {
    let base = match candidate.rating {
        Some(rating) if (1.0..=5.0).contains(&rating) => (rating - 1.0) / 4.0,
        _ => 0.5,
    };
    let boost = if is_premium_brand(&candidate.category, &candidate.brand) {
        0.15 * prefs.brand_sensitivity
    } else {
        0.0
    };
    (base + boost).clamp(0.0, 1.0)
}

fn alignment_score(candidate: &Candidate, prefs: &PreferenceContext) -> f64 {
    let mut score: f64 = 0.5;
    if prefs.recently_engaged(&candidate.category) {
        score += 0.2;
    }
    if prefs.is_preferred_brand(&candidate.brand) {
        score += 0.25;
    }
    score += match candidate.condition {
        Condition::Refurbished | Condition::OpenBox => {
            if prefs.promo_sensitivity >= 0.6 {
                0.10
            } else {
                -0.05
            }
        }
        Condition::New => {
            if prefs.promo_sensitivity < 0.6 {
                0.05
            } else {
                0.0
            }
        }
        Condition::Other => 0.0,
    };
    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ProductId;

    fn candidate() -> Candidate {
        Candidate {
            id: ProductId("kb-1".to_owned()),
            name: "Tenkeyless Keyboard".to_owned(),
            price: Decimal::from(700),
            category: "keyboard".to_owned(),
            brand: "generic".to_owned(),
            rating: Some(4.0),
            in_stock: true,
            condition: Condition::New,
            relevance: 0.7,
            utility: None,
        }
    }

    fn score_of(candidate: &Candidate, prefs: &PreferenceContext) -> ScoreBreakdown {
        CandidateScorer::new().score(
            candidate,
            SemanticSignal::Relevance(candidate.relevance),
            Some(Decimal::from(1000)),
            prefs,
        )
    }

    #[test]
    fn all_components_stay_in_the_unit_interval() {
        let scorer = CandidateScorer::new();
        let prefs = PreferenceContext::default();
        let prices = [1, 50, 290, 450, 700, 920, 1000, 1100, 1500, 9000];
        let ratings = [None, Some(1.0), Some(3.2), Some(5.0)];
        for price in prices {
            for rating in ratings {
                let mut c = candidate();
                c.price = Decimal::from(price);
                c.rating = rating;
                let breakdown = scorer.score(
                    &c,
                    SemanticSignal::Relevance(c.relevance),
                    Some(Decimal::from(1000)),
                    &prefs,
                );
                for value in [
                    breakdown.semantic,
                    breakdown.price_fit,
                    breakdown.quality,
                    breakdown.preference_alignment,
                    breakdown.final_score,
                ] {
                    assert!((0.0..=1.0).contains(&value), "component {value} out of range");
                }
            }
        }
    }

    #[test]
    fn relevance_rescale_compresses_low_and_rewards_high() {
        assert_eq!(rescale_relevance(0.35), 0.0);
        assert_eq!(rescale_relevance(0.10), 0.0);
        assert_eq!(rescale_relevance(0.70), 1.0);
        assert_eq!(rescale_relevance(0.95), 1.0);
        let mid = rescale_relevance(0.5);
        assert!(mid > 0.0 && mid < 1.0);
        // Sub-linear: the curve sits above the straight line through the
        // same endpoints.
        assert!(mid > (0.5 - 0.35) / 0.35);
    }

    #[test]
    fn cosine_path_rescales_to_the_unit_interval() {
        let query = [0.6, 0.8];
        let same = semantic_score(SemanticSignal::Vectors { query: &query, product: &query });
        assert!((same - 1.0).abs() < 1e-9);
        let opposite =
            semantic_score(SemanticSignal::Vectors { query: &query, product: &[-0.6, -0.8] });
        assert!(opposite.abs() < 1e-9);
    }

    #[test]
    fn mismatched_vector_dimensions_are_neutral() {
        let score =
            semantic_score(SemanticSignal::Vectors { query: &[1.0, 0.0], product: &[1.0] });
        assert_eq!(score, 0.5);
        assert_eq!(semantic_score(SemanticSignal::Unavailable), 0.5);
    }

    #[test]
    fn price_sweet_spot_scores_full_marks() {
        let budget = Some(Decimal::from(1000));
        assert_eq!(price_fit_score(Decimal::from(500), budget, 0.5), 1.0);
        assert_eq!(price_fit_score(Decimal::from(900), budget, 0.5), 1.0);
    }

    #[test]
    fn suspiciously_cheap_items_score_lower_than_the_sweet_spot() {
        let budget = Some(Decimal::from(1000));
        let cheap = price_fit_score(Decimal::from(100), budget, 0.5);
        assert!(cheap < 1.0);
        assert!(cheap >= 0.5);
    }

    #[test]
    fn over_budget_penalty_respects_risk_tolerance() {
        let budget = Some(Decimal::from(1000));
        let cautious = price_fit_score(Decimal::from(1100), budget, 0.1);
        let bold = price_fit_score(Decimal::from(1100), budget, 0.9);
        assert!(bold > cautious);
        // r = 1.1, risk 0.5: 0.8 - 0.1 * 1.0 = 0.7
        assert!((price_fit_score(Decimal::from(1100), budget, 0.5) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn far_over_budget_floors_at_one_tenth() {
        let budget = Some(Decimal::from(1000));
        assert_eq!(price_fit_score(Decimal::from(5000), budget, 0.5), 0.1);
    }

    #[test]
    fn missing_budget_is_neutral() {
        assert_eq!(price_fit_score(Decimal::from(500), None, 0.5), 0.5);
    }

    #[test]
    fn premium_brand_boost_scales_with_brand_sensitivity() {
        let mut premium = candidate();
        premium.brand = "logitech".to_owned();
        let sensitive = PreferenceContext { brand_sensitivity: 1.0, ..PreferenceContext::default() };
        let indifferent =
            PreferenceContext { brand_sensitivity: 0.0, ..PreferenceContext::default() };
        assert!(
            score_of(&premium, &sensitive).quality > score_of(&premium, &indifferent).quality
        );
        assert_eq!(score_of(&candidate(), &sensitive).quality, 0.75);
    }

    #[test]
    fn alignment_rewards_recent_categories_and_preferred_brands() {
        let mut liked = candidate();
        liked.brand = "keychron".to_owned();
        let prefs = PreferenceContext {
            recent_categories: vec!["keyboard".to_owned()],
            brand_preferences: std::collections::HashMap::from([("keychron".to_owned(), 0.9)]),
            promo_sensitivity: 0.3,
            ..PreferenceContext::default()
        };
        // 0.5 + 0.2 (recent) + 0.25 (brand) + 0.05 (new, promo-insensitive),
        // capped at 1.0.
        assert_eq!(score_of(&liked, &prefs).preference_alignment, 1.0);
    }

    #[test]
    fn promo_sensitive_shoppers_favor_refurbished() {
        let mut refurb = candidate();
        refurb.condition = Condition::Refurbished;
        let promo = PreferenceContext { promo_sensitivity: 0.9, ..PreferenceContext::default() };
        let averse = PreferenceContext { promo_sensitivity: 0.1, ..PreferenceContext::default() };
        assert!(
            score_of(&refurb, &promo).preference_alignment
                > score_of(&refurb, &averse).preference_alignment
        );
    }

    #[test]
    fn final_score_uses_the_archetype_profile() {
        let mut pricey = candidate();
        pricey.price = Decimal::from(1150);
        let frugal = PreferenceContext {
            archetype: Archetype::BudgetConscious,
            ..PreferenceContext::default()
        };
        let balanced = PreferenceContext::default();
        // Over-budget hurts the budget-conscious profile more.
        assert!(score_of(&pricey, &frugal).final_score < score_of(&pricey, &balanced).final_score);
        assert_eq!(score_of(&pricey, &frugal).archetype, Archetype::BudgetConscious);
    }
}

//! Hard and soft constraint checks for candidate products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::GateConfig;
use crate::domain::{Archetype, Candidate, Condition, PreferenceContext};

/// How a violated constraint affects the candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationSeverity {
    /// Excludes the candidate outright.
    Hard,
    /// Penalizes the candidate's utility without excluding it.
    Soft,
}

/// A single violated constraint, with a stable code for callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub severity: ViolationSeverity,
    pub message: String,
}

impl Violation {
    fn hard(code: &str, message: String) -> Self {
        Self { code: code.to_owned(), severity: ViolationSeverity::Hard, message }
    }

    fn soft(code: &str, message: String) -> Self {
        Self { code: code.to_owned(), severity: ViolationSeverity::Soft, message }
    }
}

/// Outcome of a feasibility check.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub is_feasible: bool,
    pub violations: Vec<Violation>,
    /// Base utility after the soft penalty, 0..=1. Zero when infeasible.
    pub adjusted_utility: f64,
    /// Soft penalty capped at the configured cap; 1.0 for hard failures.
    pub penalty: f64,
}

/// Weights for the base-utility blend, per archetype.
#[derive(Clone, Copy, Debug, PartialEq)]
struct UtilityWeights {
    relevance: f64,
    quality: f64,
    price: f64,
    category: f64,
}

fn utility_weights(archetype: Archetype) -> UtilityWeights {
    match archetype {
        Archetype::BudgetConscious => {
            UtilityWeights { relevance: 0.25, quality: 0.15, price: 0.40, category: 0.20 }
        }
        Archetype::QualitySeeker => {
            UtilityWeights { relevance: 0.30, quality: 0.40, price: 0.10, category: 0.20 }
        }
        _ => UtilityWeights { relevance: 0.35, quality: 0.25, price: 0.25, category: 0.15 },
    }
}

/// Feasibility gate: pure affordability and quality screening.
pub struct FeasibilityGate {
    config: GateConfig,
}

impl FeasibilityGate {
    pub fn new() -> Self {
        Self::with_config(GateConfig::default())
    }

    pub fn with_config(config: GateConfig) -> Self {
        Self { config }
    }

    /// Check one candidate against the budget and preference profile.
    ///
    /// The budget comparison is against the *full* request budget even in
    /// multi-category flows; per-category discipline is the optimizer's
    /// job (see `allocate_category_budgets` for callers who pre-split).
    pub fn check(
        &self,
        candidate: &Candidate,
        prefs: &PreferenceContext,
        budget: Decimal,
    ) -> FeasibilityResult {
        // Hard constraints short-circuit: the first failure excludes the
        // candidate without evaluating anything further.
        if candidate.price > budget {
            return FeasibilityResult {
                is_feasible: false,
                violations: vec![Violation::hard(
                    "OVER_BUDGET",
                    format!("price {} exceeds budget {}", candidate.price, budget),
                )],
                adjusted_utility: 0.0,
                penalty: 1.0,
            };
        }
        if !candidate.in_stock {
            return FeasibilityResult {
                is_feasible: false,
                violations: vec![Violation::hard(
                    "OUT_OF_STOCK",
                    format!("{} is out of stock", candidate.id.0),
                )],
                adjusted_utility: 0.0,
                penalty: 1.0,
            };
        }

        let mut violations = Vec::new();
        let mut penalty = 0.0;

        let min_rating =
            if prefs.min_rating > 0.0 { prefs.min_rating } else { self.config.default_min_rating };
        if let Some(rating) = candidate.rating {
            if rating < min_rating {
                penalty += self.config.low_rating_penalty;
                violations.push(Violation::soft(
                    "LOW_RATING",
                    format!("rating {rating:.1} below threshold {min_rating:.1}"),
                ));
            }
        }

        if !prefs.prefers_condition(candidate.condition) {
            // Budget-conscious shoppers only half-mind refurbished gear.
            let amount = if prefs.archetype == Archetype::BudgetConscious
                && candidate.condition == Condition::Refurbished
            {
                self.config.condition_penalty / 2.0
            } else {
                self.config.condition_penalty
            };
            penalty += amount;
            violations.push(Violation::soft(
                "CONDITION_MISMATCH",
                format!("condition {} outside the preferred set", candidate.condition.as_str()),
            ));
        }

        if let Some(brand_score) = prefs.brand_preference(&candidate.brand) {
            if brand_score < 0.5 {
                penalty += self.config.brand_penalty_scale * (1.0 - brand_score);
                violations.push(Violation::soft(
                    "DISFAVORED_BRAND",
                    format!("brand {} scored {brand_score:.2} by the shopper", candidate.brand),
                ));
            }
        }

        let penalty = penalty.min(self.config.penalty_cap);
        let adjusted_utility = self.base_utility(candidate, prefs) * (1.0 - penalty);

        FeasibilityResult { is_feasible: true, violations, adjusted_utility, penalty }
    }

    /// Keep only feasible candidates, decorated with their adjusted
    /// utility and sorted by it descending. Ties break on product id so
    /// results are stable across runs.
    pub fn filter_candidates(
        &self,
        candidates: &[Candidate],
        prefs: &PreferenceContext,
        budget: Decimal,
        required_categories: Option<&[String]>,
    ) -> Vec<Candidate> {
        let mut feasible: Vec<Candidate> = candidates
            .iter()
            .filter_map(|candidate| {
                let result = self.check(candidate, prefs, budget);
                result.is_feasible.then(|| candidate.with_utility(result.adjusted_utility))
            })
            .collect();

        feasible.sort_by(|a, b| {
            b.utility_or_zero()
                .partial_cmp(&a.utility_or_zero())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });

        if let Some(required) = required_categories {
            for category in required {
                if !feasible.iter().any(|c| c.category.eq_ignore_ascii_case(category)) {
                    warn!(category, "required category has no feasible candidate");
                }
            }
        }

        debug!(
            total = candidates.len(),
            feasible = feasible.len(),
            "filtered candidates against budget and preferences"
        );
        feasible
    }

    /// Weighted blend of relevance, quality, price efficiency, and
    /// category preference, before any penalty.
    fn base_utility(&self, candidate: &Candidate, prefs: &PreferenceContext) -> f64 {
        let weights = utility_weights(prefs.archetype);
        let quality = candidate.rating.map(|r| r / 5.0).unwrap_or(0.5);
        let price_efficiency =
            (1.0 - candidate.price_f64() / self.config.price_reference).clamp(0.2, 1.0);
        let category = prefs.category_preference(&candidate.category);

        let utility = weights.relevance * candidate.relevance
            + weights.quality * quality
            + weights.price * price_efficiency
            + weights.category * category;
        utility.clamp(0.0, 1.0)
    }
}

impl Default for FeasibilityGate {
    fn default() -> Self {
        Self::new()
    }
}

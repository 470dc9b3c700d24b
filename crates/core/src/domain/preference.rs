use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::candidate::Condition;

/// Named shopper-behavior profile that parameterizes scoring and
/// feasibility weight tables.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    BudgetConscious,
    QualitySeeker,
    ConvenienceBuyer,
    EarlyAdopter,
    ValueBalanced,
    DealHunter,
    ImpulseBuyer,
    Researcher,
    #[default]
    Default,
}

impl Archetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archetype::BudgetConscious => "budget_conscious",
            Archetype::QualitySeeker => "quality_seeker",
            Archetype::ConvenienceBuyer => "convenience_buyer",
            Archetype::EarlyAdopter => "early_adopter",
            Archetype::ValueBalanced => "value_balanced",
            Archetype::DealHunter => "deal_hunter",
            Archetype::ImpulseBuyer => "impulse_buyer",
            Archetype::Researcher => "researcher",
            Archetype::Default => "default",
        }
    }
}

/// Reconciled shopper preference profile.
///
/// Supplied read-only by the profile layer; the core never updates it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PreferenceContext {
    pub archetype: Archetype,
    /// Willingness to stretch past the budget, 0..=1.
    pub risk_tolerance: f64,
    /// Per-brand preference scores, 0..=1, lowercase brand keys.
    pub brand_preferences: HashMap<String, f64>,
    /// Per-category preference scores, 0..=1, lowercase category keys.
    pub category_preferences: HashMap<String, f64>,
    /// Categories the shopper engaged with recently, lowercase.
    pub recent_categories: Vec<String>,
    /// Responsiveness to deals and discounted conditions, 0..=1.
    pub promo_sensitivity: f64,
    /// How much brand reputation matters to this shopper, 0..=1.
    pub brand_sensitivity: f64,
    /// Ratings below this threshold incur a soft penalty.
    pub min_rating: f64,
    pub preferred_conditions: HashSet<Condition>,
}

impl Default for PreferenceContext {
    fn default() -> Self {
        Self {
            archetype: Archetype::Default,
            risk_tolerance: 0.5,
            brand_preferences: HashMap::new(),
            category_preferences: HashMap::new(),
            recent_categories: Vec::new(),
            promo_sensitivity: 0.5,
            brand_sensitivity: 0.5,
            min_rating: 3.5,
            preferred_conditions: HashSet::from([Condition::New]),
        }
    }
}

impl PreferenceContext {
    /// Explicit brand preference score, if the shopper has one.
    pub fn brand_preference(&self, brand: &str) -> Option<f64> {
        self.brand_preferences.get(&brand.to_lowercase()).copied()
    }

    /// Category preference score; 0.5 is neutral when unknown.
    pub fn category_preference(&self, category: &str) -> f64 {
        self.category_preferences.get(&category.to_lowercase()).copied().unwrap_or(0.5)
    }

    pub fn is_preferred_brand(&self, brand: &str) -> bool {
        self.brand_preference(brand).is_some_and(|score| score >= 0.7)
    }

    pub fn recently_engaged(&self, category: &str) -> bool {
        let category = category.to_lowercase();
        self.recent_categories.iter().any(|recent| recent.eq_ignore_ascii_case(&category))
    }

    pub fn prefers_condition(&self, condition: Condition) -> bool {
        self.preferred_conditions.contains(&condition)
    }
}

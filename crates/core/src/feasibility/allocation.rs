//! Proportional budget allocation across target categories.

use std::collections::HashMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::PreferenceContext;

/// Default share of a bundle budget by category role. Unlisted categories
/// get the fallback share before renormalization.
fn default_weight(category: &str) -> f64 {
    match category {
        "laptop" | "desktop" | "computer" | "tablet" => 0.40,
        "monitor" | "display" => 0.25,
        "chair" | "seating" => 0.25,
        "mouse" | "keyboard" | "headset" | "webcam" | "speaker" | "microphone" => 0.05,
        _ => 0.10,
    }
}

/// Split `total_budget` across `categories` proportionally to fixed
/// per-category default weights, nudged by the shopper's category
/// preferences and renormalized to sum to the full budget.
///
/// Empty input or a non-positive budget yields an empty map.
pub fn allocate_category_budgets(
    categories: &[String],
    total_budget: Decimal,
    prefs: &PreferenceContext,
) -> HashMap<String, Decimal> {
    if categories.is_empty() || total_budget <= Decimal::ZERO {
        return HashMap::new();
    }

    let weights: Vec<(String, f64)> = categories
        .iter()
        .map(|category| {
            let category = category.to_lowercase();
            // A neutral preference (0.5) leaves the default weight as-is.
            let nudge = 0.5 + prefs.category_preference(&category);
            (category.clone(), default_weight(&category) * nudge)
        })
        .collect();

    let total_weight: f64 = weights.iter().map(|(_, w)| w).sum();
    if total_weight <= 0.0 {
        return HashMap::new();
    }

    weights
        .into_iter()
        .map(|(category, weight)| {
            let share = weight / total_weight;
            let amount = Decimal::from_f64(share)
                .map(|s| (total_budget * s).round_dp(2))
                .unwrap_or(Decimal::ZERO);
            (category, amount)
        })
        .collect()
}

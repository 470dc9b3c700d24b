use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Stable identifier for a product candidate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// Physical condition of a listed product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Refurbished,
    OpenBox,
    Other,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Refurbished => "refurbished",
            Condition::OpenBox => "open_box",
            Condition::Other => "other",
        }
    }

    /// Lenient parse for boundary input; unrecognized tags map to `Other`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "new" => Condition::New,
            "refurbished" | "refurb" | "renewed" => Condition::Refurbished,
            "open_box" | "open-box" | "openbox" | "open box" => Condition::OpenBox,
            _ => Condition::Other,
        }
    }
}

/// A product under consideration for display or inclusion in a bundle.
///
/// Immutable per request: the gate and scorer return decorated copies and
/// never mutate a candidate in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ProductId,
    pub name: String,
    /// Unit price; always positive (enforced by the boundary adapter).
    pub price: Decimal,
    pub category: String,
    pub brand: String,
    /// Average review rating in 1.0..=5.0 when known.
    pub rating: Option<f64>,
    pub in_stock: bool,
    pub condition: Condition,
    /// Relevance from the external search service, 0..=1.
    pub relevance: f64,
    /// Derived desirability used as the optimization objective, 0..=1.
    /// `None` until the gate or scorer has decorated the candidate; a
    /// genuine score of zero stays `Some(0.0)`.
    pub utility: Option<f64>,
}

impl Candidate {
    /// Decorated copy with the derived utility attached.
    pub fn with_utility(&self, utility: f64) -> Self {
        Self { utility: Some(utility), ..self.clone() }
    }

    /// Utility for objective arithmetic; an undecorated candidate counts
    /// as zero.
    pub fn utility_or_zero(&self) -> f64 {
        self.utility.unwrap_or(0.0)
    }

    pub fn price_f64(&self) -> f64 {
        self.price.to_f64().unwrap_or(0.0)
    }

    /// Price scaled to integer cents for the exact solver.
    pub fn price_cents(&self) -> i64 {
        (self.price * Decimal::ONE_HUNDRED).round().to_i64().unwrap_or(i64::MAX)
    }
}

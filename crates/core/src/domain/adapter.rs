//! Boundary adapter for externally supplied candidates.
//!
//! Search services disagree on field names (`product_id` vs `id`,
//! `price` vs `unit_price`, and so on). That variability is absorbed here
//! with serde aliases and defaults; the core only ever sees a validated
//! [`Candidate`].

use rust_decimal::Decimal;
use serde::Deserialize;

use super::candidate::{Candidate, Condition, ProductId};
use crate::errors::AdapterError;

/// Wire-shape candidate as supplied by the retrieval layer.
#[derive(Clone, Debug, Deserialize)]
pub struct RawCandidate {
    #[serde(alias = "id", alias = "sku")]
    pub product_id: String,
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(alias = "unit_price", alias = "price_usd")]
    pub price: Decimal,
    #[serde(default = "default_category", alias = "product_category")]
    pub category: String,
    #[serde(default, alias = "manufacturer")]
    pub brand: String,
    #[serde(default, alias = "stars", alias = "avg_rating")]
    pub rating: Option<f64>,
    #[serde(default = "default_in_stock", alias = "available")]
    pub in_stock: bool,
    #[serde(default, alias = "item_condition")]
    pub condition: Option<String>,
    #[serde(default = "default_relevance", alias = "similarity", alias = "search_score")]
    pub relevance: f64,
}

fn default_category() -> String {
    "general".to_owned()
}

fn default_in_stock() -> bool {
    true
}

fn default_relevance() -> f64 {
    0.5
}

impl TryFrom<RawCandidate> for Candidate {
    type Error = AdapterError;

    fn try_from(raw: RawCandidate) -> Result<Self, Self::Error> {
        let product_id = raw.product_id.trim().to_owned();
        if product_id.is_empty() {
            return Err(AdapterError::EmptyProductId);
        }
        if raw.price <= Decimal::ZERO {
            return Err(AdapterError::NonPositivePrice { product_id });
        }

        // Out-of-range numeric inputs degrade to safe values rather than
        // failing the request.
        let rating = raw.rating.filter(|r| (1.0..=5.0).contains(r) && r.is_finite());
        let relevance =
            if raw.relevance.is_finite() { raw.relevance.clamp(0.0, 1.0) } else { 0.5 };
        let condition =
            raw.condition.as_deref().map(Condition::parse_lenient).unwrap_or(Condition::Other);

        Ok(Candidate {
            id: ProductId(product_id),
            name: raw.name.trim().to_owned(),
            price: raw.price,
            category: raw.category.trim().to_lowercase(),
            brand: raw.brand.trim().to_lowercase(),
            rating,
            in_stock: raw.in_stock,
            condition,
            relevance,
            utility: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorbs_alternate_field_names() {
        let raw: RawCandidate = serde_json::from_str(
            r#"{
                "id": "lap-42",
                "title": "Ultralight Laptop",
                "unit_price": "1299.00",
                "product_category": "Laptop",
                "manufacturer": "Dell",
                "stars": 4.6,
                "available": true,
                "item_condition": "Refurbished",
                "similarity": 0.83
            }"#,
        )
        .unwrap();

        let candidate = Candidate::try_from(raw).unwrap();
        assert_eq!(candidate.id, ProductId("lap-42".to_owned()));
        assert_eq!(candidate.category, "laptop");
        assert_eq!(candidate.brand, "dell");
        assert_eq!(candidate.condition, Condition::Refurbished);
        assert_eq!(candidate.relevance, 0.83);
    }

    #[test]
    fn defaults_fill_missing_optional_fields() {
        let raw: RawCandidate =
            serde_json::from_str(r#"{"product_id": "m-1", "price": "25.00"}"#).unwrap();
        let candidate = Candidate::try_from(raw).unwrap();
        assert_eq!(candidate.category, "general");
        assert!(candidate.in_stock);
        assert_eq!(candidate.relevance, 0.5);
        assert_eq!(candidate.rating, None);
        assert_eq!(candidate.condition, Condition::Other);
    }

    #[test]
    fn rejects_non_positive_price() {
        let raw: RawCandidate =
            serde_json::from_str(r#"{"product_id": "m-1", "price": "0"}"#).unwrap();
        assert_eq!(
            Candidate::try_from(raw),
            Err(AdapterError::NonPositivePrice { product_id: "m-1".to_owned() })
        );
    }

    #[test]
    fn clamps_out_of_range_signals() {
        let raw: RawCandidate = serde_json::from_str(
            r#"{"product_id": "m-1", "price": "10", "similarity": 3.2, "stars": 9.0}"#,
        )
        .unwrap();
        let candidate = Candidate::try_from(raw).unwrap();
        assert_eq!(candidate.relevance, 1.0);
        assert_eq!(candidate.rating, None);
    }
}

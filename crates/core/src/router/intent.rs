//! Keyword and regex tables shared by complexity estimation and intent
//! extraction.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Words that signal a multi-step or comparative request.
pub(crate) const COMPLEX_KEYWORDS: &[&str] =
    &["setup", "bundle", "build", "workstation", "compare", "vs", "complete", "combo"];

/// Words that signal a simple popularity lookup.
pub(crate) const SIMPLE_KEYWORDS: &[&str] = &["popular", "trending", "bestseller", "top"];

/// Connectors that suggest the shopper wants more than one item.
pub(crate) const MULTI_ITEM_CONNECTORS: &[&str] = &[" and ", " with "];

const BUNDLE_KEYWORDS: &[&str] = &["setup", "bundle", "build", "workstation", "kit", "combo"];

const CATEGORY_KEYWORDS: &[&str] = &[
    "laptop", "desktop", "computer", "monitor", "keyboard", "mouse", "chair", "desk", "headset",
    "webcam", "tablet", "phone", "speaker", "microphone",
];

const BRAND_KEYWORDS: &[&str] = &[
    "apple", "dell", "lenovo", "asus", "hp", "acer", "logitech", "samsung", "lg", "sony", "razer",
    "corsair", "bose", "microsoft",
];

/// Budget-amount patterns, tried in order; the first match wins.
fn budget_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"under\s+\$?(\d+(?:\.\d{1,2})?)",
            r"budget\s+of\s+\$?(\d+(?:\.\d{1,2})?)",
            r"max\s+\$?(\d+(?:\.\d{1,2})?)",
            r"up\s+to\s+\$?(\d+(?:\.\d{1,2})?)",
            r"(\d+(?:\.\d{1,2})?)\s+dollars",
            r"\$\s?(\d+(?:\.\d{1,2})?)",
        ]
        .into_iter()
        .map(|pattern| Regex::new(pattern).expect("budget pattern compiles"))
        .collect()
    })
}

/// Structured intent extracted from the raw query text.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    /// Budget amount mentioned in the query, if any.
    pub budget: Option<Decimal>,
    /// Whether the shopper appears to want a multi-item bundle.
    pub wants_bundle: bool,
    /// Known product categories mentioned in the query.
    pub categories: Vec<String>,
    /// Known brands mentioned in the query.
    pub brands: Vec<String>,
}

/// Extract a budget amount from the query text. First matching pattern
/// wins; unparseable numbers are skipped.
pub fn extract_budget(query: &str) -> Option<Decimal> {
    let query = query.to_lowercase();
    for pattern in budget_patterns() {
        if let Some(captures) = pattern.captures(&query) {
            if let Some(amount) = captures.get(1) {
                if let Ok(value) = amount.as_str().parse::<Decimal>() {
                    if value > Decimal::ZERO {
                        return Some(value);
                    }
                }
            }
        }
    }
    None
}

pub(crate) fn contains_connector(query: &str) -> bool {
    MULTI_ITEM_CONNECTORS.iter().any(|connector| query.contains(connector))
}

/// Extract structured intent using the same tables the complexity
/// estimator uses. Never fails; an unparseable query yields an empty
/// intent.
pub fn extract_intent(query: &str) -> QueryIntent {
    let lowered = query.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .collect();

    let mut categories: Vec<String> = Vec::new();
    for word in &words {
        let singular = word.trim_end_matches('s');
        if let Some(category) =
            CATEGORY_KEYWORDS.iter().find(|keyword| **keyword == *word || **keyword == singular)
        {
            if !categories.iter().any(|existing| existing == category) {
                categories.push((*category).to_owned());
            }
        }
    }

    let mut brands: Vec<String> = Vec::new();
    for word in &words {
        if let Some(brand) = BRAND_KEYWORDS.iter().find(|keyword| **keyword == *word) {
            if !brands.iter().any(|existing| existing == brand) {
                brands.push((*brand).to_owned());
            }
        }
    }

    let wants_bundle = words.iter().any(|word| BUNDLE_KEYWORDS.contains(word))
        || (contains_connector(&lowered) && categories.len() >= 2);

    QueryIntent { budget: extract_budget(&lowered), wants_bundle, categories, brands }
}

//! Query router: assigns each query a latency tier.
//!
//! Pure and deterministic: the decision depends only on the query text,
//! the budget, and fixed keyword tables. Sub-millisecond, no I/O. The
//! only state is optional telemetry counters.

mod intent;
mod stats;

pub use intent::{extract_budget, extract_intent, QueryIntent};
pub use stats::{RouterStats, RouterStatsSnapshot};

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::RouterConfig;
use crate::domain::{Archetype, RouteDecision, RoutePath};

/// Per-branch confidences. Fixed constants, not computed probabilities.
const FAST_CONFIDENCE: f64 = 0.9;
const SMART_CONFIDENCE: f64 = 0.8;
const DEEP_CONFIDENCE: f64 = 0.85;

pub struct QueryRouter {
    config: RouterConfig,
    stats: RouterStats,
}

impl QueryRouter {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self { config, stats: RouterStats::default() }
    }

    /// Decide the latency tier for a query. Never fails: an empty or
    /// malformed query falls back to SMART, the safe middle path.
    pub fn route(&self, query: &str, budget: Option<Decimal>) -> RouteDecision {
        let started = Instant::now();
        let decision = if query.trim().is_empty() {
            RouteDecision {
                path: RoutePath::Smart,
                confidence: SMART_CONFIDENCE,
                complexity_score: 0.0,
                reason: "empty query; defaulting to the standard path".to_owned(),
                estimated_latency_ms: RoutePath::Smart.estimated_latency_ms(),
            }
        } else {
            let complexity = self.complexity(query, budget);
            let (path, confidence, reason) = if complexity < self.config.smart_threshold {
                (RoutePath::Fast, FAST_CONFIDENCE, "simple lookup query")
            } else if complexity < self.config.deep_threshold {
                (RoutePath::Smart, SMART_CONFIDENCE, "moderate complexity; ranked retrieval")
            } else {
                (RoutePath::Deep, DEEP_CONFIDENCE, "multi-item or budget-constrained request")
            };
            RouteDecision {
                path,
                confidence,
                complexity_score: complexity,
                reason: reason.to_owned(),
                estimated_latency_ms: path.estimated_latency_ms(),
            }
        };

        self.stats.record(decision.path, started.elapsed());
        debug!(
            path = decision.path.as_str(),
            complexity = decision.complexity_score,
            "routed query"
        );
        decision
    }

    /// Estimate query complexity in 0..=1.
    pub fn complexity(&self, query: &str, budget: Option<Decimal>) -> f64 {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .collect();

        let mut score: f64 = match words.len() {
            0..=2 => 0.1,
            3..=5 => 0.3,
            _ => 0.5,
        };

        for word in &words {
            if intent::COMPLEX_KEYWORDS.contains(word) {
                score += 0.2;
            }
            if intent::SIMPLE_KEYWORDS.contains(word) {
                score -= 0.1;
            }
        }

        if budget.is_some() || intent::extract_budget(&lowered).is_some() {
            score += 0.15;
        }

        if intent::contains_connector(&lowered) {
            score += 0.15;
        }

        score.clamp(0.0, 1.0)
    }

    /// Telemetry snapshot of path counts and routing latency.
    pub fn stats(&self) -> RouterStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Default for QueryRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic cache key for a (query, budget, archetype) triple.
///
/// The query is trimmed and lowercased and the budget bucketed to the
/// nearest 100 so near-identical requests share an entry. First 8 hex
/// characters of the digest, which is plenty for a TTL cache namespace.
pub fn route_cache_key(query: &str, budget: Option<Decimal>, archetype: Archetype) -> String {
    let normalized = query.trim().to_lowercase();
    let bucket = match budget {
        Some(amount) => ((amount / Decimal::ONE_HUNDRED).round() * Decimal::ONE_HUNDRED).to_string(),
        None => "none".to_owned(),
    };
    let mut hasher = blake3::Hasher::new();
    hasher.update(normalized.as_bytes());
    hasher.update(b"|");
    hasher.update(bucket.as_bytes());
    hasher.update(b"|");
    hasher.update(archetype.as_str().as_bytes());
    hasher.finalize().to_hex()[..8].to_string()
}

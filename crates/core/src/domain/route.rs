use serde::{Deserialize, Serialize};

/// Latency tier assigned to a query by the router.
///
/// The tier tells the orchestration layer which downstream components to
/// invoke and under what deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoutePath {
    /// Lookup-style queries; candidate supply only.
    Fast,
    /// Ranked retrieval with feasibility filtering and scoring.
    Smart,
    /// Full pipeline including bundle optimization.
    Deep,
}

impl RoutePath {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoutePath::Fast => "FAST",
            RoutePath::Smart => "SMART",
            RoutePath::Deep => "DEEP",
        }
    }

    /// Expected end-to-end latency for the tier.
    pub fn estimated_latency_ms(&self) -> u64 {
        match self {
            RoutePath::Fast => 50,
            RoutePath::Smart => 250,
            RoutePath::Deep => 1000,
        }
    }
}

/// Routing decision for one query. Produced fresh per request, never
/// persisted by the core.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub path: RoutePath,
    /// Fixed per-branch confidence, not a computed probability.
    pub confidence: f64,
    /// Estimated query complexity, clamped to 0..=1.
    pub complexity_score: f64,
    pub reason: String,
    pub estimated_latency_ms: u64,
}

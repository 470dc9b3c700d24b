//! Curator core: the shopping decision pipeline.
//!
//! Four components cooperate per request: the query router classifies a
//! query onto a FAST, SMART, or DEEP path; the feasibility gate filters
//! candidates against budget, stock, and preference constraints; the
//! candidate scorer blends semantic, price-fit, quality, and alignment
//! signals into a final score; and the bundle optimizer assembles a
//! budget-respecting bundle from the survivors. Everything here is
//! synchronous and deterministic apart from deadline-truncated exact
//! solves.

pub mod config;
pub mod deadline;
pub mod domain;
pub mod errors;
pub mod feasibility;
pub mod interfaces;
pub mod optimizer;
pub mod router;
pub mod scoring;

pub use config::{CoreConfig, GateConfig, OptimizerConfig, RouterConfig};
pub use deadline::Deadline;
pub use domain::{
    Archetype, Candidate, Condition, PreferenceContext, ProductId, RawCandidate, RouteDecision,
    RoutePath,
};
pub use errors::{AdapterError, ConfigError};
pub use feasibility::{FeasibilityGate, FeasibilityResult, Violation, ViolationSeverity};
pub use interfaces::{CandidateSource, PreferenceSource};
pub use optimizer::{BundleOptimizer, OptimizationResult, OptimizationStatus, SolveMethod};
pub use router::{QueryRouter, RouterStats};
pub use scoring::{
    AmbiguityHint, CandidateScorer, RankedCandidate, ScoreBreakdown, ScoringWeights,
    SemanticSignal,
};

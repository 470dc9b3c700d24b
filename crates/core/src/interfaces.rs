//! Seams to the collaborators this core depends on but does not own.
//!
//! The orchestration layer implements these; the core itself performs no
//! network or disk I/O.

use rust_decimal::Decimal;

use crate::domain::{Candidate, PreferenceContext};

/// Supplies candidate products for a query, already adapted into
/// [`Candidate`] values. Backed by the vector-similarity search service.
pub trait CandidateSource: Send + Sync {
    fn candidates(&self, query: &str, budget: Option<Decimal>, limit: usize) -> Vec<Candidate>;
}

/// Supplies the reconciled, read-only preference profile for a shopper.
pub trait PreferenceSource: Send + Sync {
    fn preferences(&self, shopper_id: &str) -> PreferenceContext;
}

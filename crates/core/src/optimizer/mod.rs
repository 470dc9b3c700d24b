//! Bundle optimizer: selects a budget-respecting subset of candidates
//! maximizing total utility.
//!
//! Per call the flow is: affordable filter → exact attempt (small sets
//! only) → single automatic greedy fallback on timeout or solver error.
//! Nothing is cached between calls.

mod exact;
mod greedy;

pub use exact::{
    BranchAndBoundOptimizer, ExactOptimizer, ExactOutcome, ExactStatus, SelectionItem,
    SelectionProblem,
};

use std::time::Instant;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::OptimizerConfig;
use crate::deadline::Deadline;
use crate::domain::{Candidate, PreferenceContext};

/// Outcome status of one optimization call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationStatus {
    /// Proven best bundle.
    Optimal,
    /// Valid bundle, optimality not proven.
    Feasible,
    /// No valid bundle exists under the constraints.
    Infeasible,
    /// The deadline expired before any bundle could be produced.
    Timeout,
    /// Internal failure; the bundle is empty.
    Error,
}

/// Which solver produced the bundle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveMethod {
    Exact,
    Greedy,
}

/// The primary payload the API layer serializes to a client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub status: OptimizationStatus,
    pub bundle: Vec<Candidate>,
    pub total_price: Decimal,
    pub total_utility: f64,
    /// Share of the budget consumed, 0..=1 for valid bundles.
    pub budget_used: f64,
    pub solve_time_ms: u64,
    pub method: SolveMethod,
}

impl OptimizationResult {
    fn empty(status: OptimizationStatus, method: SolveMethod, started: Instant) -> Self {
        Self {
            status,
            bundle: Vec::new(),
            total_price: Decimal::ZERO,
            total_utility: 0.0,
            budget_used: 0.0,
            solve_time_ms: elapsed_ms(started),
            method,
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis().min(u64::MAX as u128) as u64
}

/// Budget-constrained bundle assembly over scored candidates.
pub struct BundleOptimizer {
    config: OptimizerConfig,
    exact: Box<dyn ExactOptimizer>,
}

impl BundleOptimizer {
    pub fn new() -> Self {
        Self::with_config(OptimizerConfig::default())
    }

    pub fn with_config(config: OptimizerConfig) -> Self {
        Self { config, exact: Box::new(BranchAndBoundOptimizer::new()) }
    }

    /// Swap in a different exact solver (for instance a native ILP
    /// binding, or a stub in tests).
    pub fn with_exact_optimizer(config: OptimizerConfig, exact: Box<dyn ExactOptimizer>) -> Self {
        Self { config, exact }
    }

    /// Select a bundle under `budget`. `max_items = 0` means the
    /// configured default. The caller's deadline is composed with the
    /// internal exact-solve limit; on expiry this returns promptly with
    /// a TIMEOUT result instead of blocking.
    pub fn optimize(
        &self,
        candidates: &[Candidate],
        budget: Decimal,
        prefs: &PreferenceContext,
        required_categories: Option<&[String]>,
        max_items: usize,
        deadline: &Deadline,
    ) -> OptimizationResult {
        let started = Instant::now();
        let max_items =
            if max_items == 0 { self.config.default_max_items } else { max_items };
        let required = required_categories.unwrap_or(&[]);

        if deadline.is_expired() {
            warn!("optimize called with an already expired deadline");
            return OptimizationResult::empty(
                OptimizationStatus::Timeout,
                SolveMethod::Greedy,
                started,
            );
        }

        // Candidates that arrive undecorated fall back to a relevance and
        // category-preference blend so the objective stays meaningful. A
        // candidate genuinely scored 0.0 keeps its zero.
        let affordable: Vec<Candidate> = candidates
            .iter()
            .filter(|candidate| candidate.price <= budget)
            .map(|candidate| match candidate.utility {
                Some(_) => candidate.clone(),
                None => candidate.with_utility(
                    (0.7 * candidate.relevance
                        + 0.3 * prefs.category_preference(&candidate.category))
                    .clamp(0.0, 1.0),
                ),
            })
            .collect();

        if affordable.is_empty() {
            return OptimizationResult::empty(
                OptimizationStatus::Infeasible,
                SolveMethod::Greedy,
                started,
            );
        }

        if affordable.len() <= self.config.max_exact_candidates {
            let problem = self.build_problem(&affordable, budget, max_items, required);
            let solve_deadline = deadline.tightened(self.config.exact_time_limit());
            let outcome = self.exact.solve(&problem, &solve_deadline);
            match outcome.status {
                ExactStatus::Optimal | ExactStatus::Feasible => {
                    let status = if outcome.status == ExactStatus::Optimal {
                        OptimizationStatus::Optimal
                    } else {
                        OptimizationStatus::Feasible
                    };
                    debug!(
                        selected = outcome.selected.len(),
                        status = ?status,
                        "exact solve succeeded"
                    );
                    return self.assemble(
                        &affordable,
                        &outcome.selected,
                        budget,
                        status,
                        SolveMethod::Exact,
                        started,
                    );
                }
                ExactStatus::Infeasible => {
                    return OptimizationResult::empty(
                        OptimizationStatus::Infeasible,
                        SolveMethod::Exact,
                        started,
                    );
                }
                ExactStatus::Timeout | ExactStatus::Error => {
                    // The single automatic fallback; visible to callers
                    // only as method = GREEDY.
                    warn!(outcome = ?outcome.status, "exact solve failed, falling back to greedy");
                }
            }
        }

        let selected = greedy::greedy_select(
            &affordable,
            budget,
            max_items,
            required,
            &self.config.single_item_categories,
        );
        if selected.is_empty() {
            return OptimizationResult::empty(
                OptimizationStatus::Infeasible,
                SolveMethod::Greedy,
                started,
            );
        }
        self.assemble(
            &affordable,
            &selected,
            budget,
            OptimizationStatus::Feasible,
            SolveMethod::Greedy,
            started,
        )
    }

    fn build_problem(
        &self,
        affordable: &[Candidate],
        budget: Decimal,
        max_items: usize,
        required: &[String],
    ) -> SelectionProblem {
        SelectionProblem {
            items: affordable
                .iter()
                .map(|candidate| SelectionItem {
                    price_cents: candidate.price_cents(),
                    utility_scaled: (candidate.utility_or_zero()
                        * self.config.utility_scale as f64)
                        .round() as i64,
                    category: candidate.category.clone(),
                })
                .collect(),
            budget_cents: (budget * Decimal::ONE_HUNDRED)
                .round()
                .to_i64()
                .unwrap_or(i64::MAX),
            max_items,
            single_item_categories: self.config.single_item_categories.clone(),
            required_categories: required.to_vec(),
        }
    }

    fn assemble(
        &self,
        affordable: &[Candidate],
        selected: &[usize],
        budget: Decimal,
        status: OptimizationStatus,
        method: SolveMethod,
        started: Instant,
    ) -> OptimizationResult {
        let bundle: Vec<Candidate> =
            selected.iter().map(|&index| affordable[index].clone()).collect();
        let total_price: Decimal = bundle.iter().map(|c| c.price).sum();
        let total_utility: f64 = bundle.iter().map(Candidate::utility_or_zero).sum();
        let budget_used = if budget > Decimal::ZERO {
            (total_price / budget).to_f64().unwrap_or(0.0)
        } else {
            0.0
        };
        OptimizationResult {
            status,
            bundle,
            total_price,
            total_utility,
            budget_used,
            solve_time_ms: elapsed_ms(started),
            method,
        }
    }
}

impl Default for BundleOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

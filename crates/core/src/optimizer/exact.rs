//! Exact boolean-selection solver.
//!
//! The optimizer proposes a selection problem (maximize total utility under
//! a budget, an item cap, and category constraints) through the
//! [`ExactOptimizer`] seam. The bundled implementation is a bounded
//! depth-first branch and bound with a fractional-knapsack upper bound;
//! candidate counts are capped before this path is attempted, so no native
//! ILP library is needed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::deadline::Deadline;

/// One selectable item, already scaled to integer domains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionItem {
    pub price_cents: i64,
    pub utility_scaled: i64,
    pub category: String,
}

/// A boolean-selection problem over a small candidate set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectionProblem {
    pub items: Vec<SelectionItem>,
    pub budget_cents: i64,
    pub max_items: usize,
    /// Categories limited to at most one selected item.
    pub single_item_categories: HashSet<String>,
    /// Categories that must appear in any valid selection.
    pub required_categories: Vec<String>,
}

/// Solver verdict for one problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExactStatus {
    /// Proven best selection.
    Optimal,
    /// Valid selection found, but the deadline cut the proof short.
    /// Which incumbent survives near the limit is accepted
    /// non-determinism.
    Feasible,
    /// No valid selection exists.
    Infeasible,
    /// Deadline expired before any valid selection was found.
    Timeout,
    /// Internal solver failure.
    Error,
}

/// Solver output: verdict plus the selected item indices (positions in
/// `SelectionProblem::items`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExactOutcome {
    pub status: ExactStatus,
    pub selected: Vec<usize>,
}

impl ExactOutcome {
    fn empty(status: ExactStatus) -> Self {
        Self { status, selected: Vec::new() }
    }
}

/// Seam for exact solvers. Implementations must honor the deadline
/// cooperatively and return promptly on expiry.
pub trait ExactOptimizer: Send + Sync {
    fn solve(&self, problem: &SelectionProblem, deadline: &Deadline) -> ExactOutcome;
}

/// Depth-first branch and bound over items in value-density order.
#[derive(Clone, Debug, Default)]
pub struct BranchAndBoundOptimizer;

impl BranchAndBoundOptimizer {
    pub fn new() -> Self {
        Self
    }
}

impl ExactOptimizer for BranchAndBoundOptimizer {
    fn solve(&self, problem: &SelectionProblem, deadline: &Deadline) -> ExactOutcome {
        if problem.items.is_empty() || problem.budget_cents <= 0 {
            return ExactOutcome::empty(ExactStatus::Infeasible);
        }
        if deadline.is_expired() {
            return ExactOutcome::empty(ExactStatus::Timeout);
        }

        // Density ordering tightens the fractional bound and finds good
        // incumbents early.
        let mut order: Vec<usize> = (0..problem.items.len()).collect();
        order.sort_by(|&a, &b| {
            density(&problem.items[b])
                .partial_cmp(&density(&problem.items[a]))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut search = Search {
            problem,
            order: &order,
            deadline,
            current: Vec::new(),
            current_price: 0,
            current_utility: 0,
            category_counts: HashMap::new(),
            best: None,
            timed_out: false,
        };
        search.explore(0);

        match (search.timed_out, search.best) {
            (false, Some((_, selected))) => ExactOutcome { status: ExactStatus::Optimal, selected },
            (false, None) => ExactOutcome::empty(ExactStatus::Infeasible),
            (true, Some((_, selected))) => {
                ExactOutcome { status: ExactStatus::Feasible, selected }
            }
            (true, None) => ExactOutcome::empty(ExactStatus::Timeout),
        }
    }
}

fn density(item: &SelectionItem) -> f64 {
    item.utility_scaled as f64 / item.price_cents.max(1) as f64
}

struct Search<'a> {
    problem: &'a SelectionProblem,
    order: &'a [usize],
    deadline: &'a Deadline,
    current: Vec<usize>,
    current_price: i64,
    current_utility: i64,
    category_counts: HashMap<&'a str, usize>,
    /// Best valid incumbent: (utility, selected original indices).
    best: Option<(i64, Vec<usize>)>,
    timed_out: bool,
}

impl<'a> Search<'a> {
    fn explore(&mut self, pos: usize) {
        if self.timed_out {
            return;
        }
        if self.deadline.is_expired() {
            self.timed_out = true;
            return;
        }

        if !self.current.is_empty() && self.covers_required() {
            let better = self.best.as_ref().map_or(true, |(utility, _)| {
                self.current_utility > *utility
            });
            if better {
                self.best = Some((self.current_utility, self.current.clone()));
            }
        }

        if pos == self.order.len() || self.current.len() == self.problem.max_items {
            return;
        }

        // Prune when even an unconstrained fractional fill cannot beat the
        // incumbent, or when the remaining items cannot cover a still
        // missing required category.
        if let Some((best_utility, _)) = &self.best {
            if self.upper_bound(pos) <= *best_utility {
                return;
            }
        }
        if !self.required_reachable(pos) {
            return;
        }

        let index = self.order[pos];
        let item = &self.problem.items[index];
        let single = self.problem.single_item_categories.contains(&item.category);
        let used = self.category_counts.get(item.category.as_str()).copied().unwrap_or(0);
        let fits = self.current_price + item.price_cents <= self.problem.budget_cents
            && !(single && used >= 1);

        if fits {
            self.current.push(index);
            self.current_price += item.price_cents;
            self.current_utility += item.utility_scaled;
            *self.category_counts.entry(item.category.as_str()).or_insert(0) += 1;

            self.explore(pos + 1);

            self.current.pop();
            self.current_price -= item.price_cents;
            self.current_utility -= item.utility_scaled;
            if let Some(count) = self.category_counts.get_mut(item.category.as_str()) {
                *count -= 1;
            }
        }

        self.explore(pos + 1);
    }

    fn covers_required(&self) -> bool {
        self.problem.required_categories.iter().all(|category| {
            self.category_counts.get(category.as_str()).copied().unwrap_or(0) > 0
        })
    }

    /// Fractional-knapsack bound over the remaining items, relaxing the
    /// item cap and the category constraints. The cap must not enter the
    /// fill: a cheap dense item could exhaust the slots and leave a later
    /// expensive high-utility item uncounted, turning the overestimate
    /// into an underestimate. Budget-only, this always overestimates.
    fn upper_bound(&self, pos: usize) -> i64 {
        let mut bound = self.current_utility as f64;
        let mut remaining_budget = self.problem.budget_cents - self.current_price;

        for &index in &self.order[pos..] {
            if remaining_budget <= 0 {
                break;
            }
            let item = &self.problem.items[index];
            if item.price_cents <= remaining_budget {
                bound += item.utility_scaled as f64;
                remaining_budget -= item.price_cents;
            } else {
                bound +=
                    item.utility_scaled as f64 * remaining_budget as f64 / item.price_cents as f64;
                break;
            }
        }
        bound.ceil() as i64
    }

    fn required_reachable(&self, pos: usize) -> bool {
        self.problem.required_categories.iter().all(|category| {
            self.category_counts.get(category.as_str()).copied().unwrap_or(0) > 0
                || self.order[pos..]
                    .iter()
                    .any(|&index| self.problem.items[index].category == *category)
        })
    }
}

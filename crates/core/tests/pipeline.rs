//! End-to-end pipeline tests over in-memory sources.
//!
//! Drives the full request flow the orchestration layer performs:
//! route the query, pull candidates, gate them against budget and
//! preferences, rerank the survivors, and assemble a bundle.

use std::collections::HashMap;

use rust_decimal::Decimal;

use curator_core::domain::{Archetype, Candidate, Condition, ProductId};
use curator_core::{
    BundleOptimizer, CandidateScorer, CandidateSource, Deadline, FeasibilityGate,
    OptimizationStatus, PreferenceContext, PreferenceSource, QueryRouter, RoutePath, SolveMethod,
};

struct InMemoryCatalog {
    products: Vec<Candidate>,
}

impl CandidateSource for InMemoryCatalog {
    fn candidates(&self, _query: &str, budget: Option<Decimal>, limit: usize) -> Vec<Candidate> {
        self.products
            .iter()
            .filter(|p| budget.map_or(true, |b| p.price <= b))
            .take(limit)
            .cloned()
            .collect()
    }
}

struct StaticPreferences {
    profiles: HashMap<String, PreferenceContext>,
}

impl PreferenceSource for StaticPreferences {
    fn preferences(&self, shopper_id: &str) -> PreferenceContext {
        self.profiles.get(shopper_id).cloned().unwrap_or_default()
    }
}

fn product(id: &str, price: i64, category: &str, rating: f64, relevance: f64) -> Candidate {
    Candidate {
        id: ProductId(id.to_owned()),
        name: id.to_owned(),
        price: Decimal::from(price),
        category: category.to_owned(),
        brand: "generic".to_owned(),
        rating: Some(rating),
        in_stock: true,
        condition: Condition::New,
        relevance,
        utility: None,
    }
}

fn desk_catalog() -> InMemoryCatalog {
    let mut out_of_stock = product("monitor-oos", 349, "monitor", 4.8, 0.9);
    out_of_stock.in_stock = false;
    InMemoryCatalog {
        products: vec![
            product("laptop-pro", 999, "laptop", 4.6, 0.9),
            product("laptop-air", 1099, "laptop", 4.4, 0.85),
            product("mouse-basic", 49, "mouse", 4.2, 0.7),
            product("keyboard-mech", 99, "keyboard", 4.5, 0.8),
            product("monitor-27", 399, "monitor", 4.3, 0.85),
            product("monitor-32", 1500, "monitor", 4.7, 0.8),
            out_of_stock,
        ],
    }
}

#[test]
fn full_flow_assembles_a_valid_bundle() {
    let catalog = desk_catalog();
    let prefs_source =
        StaticPreferences { profiles: HashMap::from([("s-1".to_owned(), PreferenceContext::default())]) };
    let budget = Decimal::from(1200);

    let router = QueryRouter::new();
    let decision = router.route("complete desk setup with monitor and keyboard", Some(budget));
    assert_eq!(decision.path, RoutePath::Deep);

    let prefs = prefs_source.preferences("s-1");
    let raw = catalog.candidates("desk setup", Some(budget), 50);
    assert!(raw.iter().all(|c| c.price <= budget));

    let gate = FeasibilityGate::new();
    let feasible = gate.filter_candidates(&raw, &prefs, budget, None);
    assert!(feasible.iter().all(|c| c.in_stock));
    assert!(feasible.iter().all(|c| c.utility.is_some_and(|u| u > 0.0)));
    // Sorted descending by adjusted utility.
    for pair in feasible.windows(2) {
        assert!(pair[0].utility_or_zero() >= pair[1].utility_or_zero());
    }

    let scorer = CandidateScorer::new();
    let ranked = scorer.rerank_batch(&feasible, Some(budget), &prefs, None);
    let scored: Vec<Candidate> = ranked
        .iter()
        .map(|r| r.candidate.with_utility(r.breakdown.final_score))
        .collect();

    let optimizer = BundleOptimizer::new();
    let result = optimizer.optimize(&scored, budget, &prefs, None, 5, &Deadline::none());

    assert_eq!(result.status, OptimizationStatus::Optimal);
    assert_eq!(result.method, SolveMethod::Exact);
    assert!(!result.bundle.is_empty());
    assert!(result.total_price <= budget);
    assert!(result.bundle.iter().all(|c| c.price <= budget));
    let laptops = result.bundle.iter().filter(|c| c.category == "laptop").count();
    assert!(laptops <= 1);
    assert!(result.budget_used <= 1.0);
}

#[test]
fn budget_conscious_profile_shifts_the_bundle() {
    let catalog = desk_catalog();
    let mut thrifty = PreferenceContext::default();
    thrifty.archetype = Archetype::BudgetConscious;
    let budget = Decimal::from(1200);

    let gate = FeasibilityGate::new();
    let raw = catalog.candidates("desk setup", Some(budget), 50);

    let default_order: Vec<String> = gate
        .filter_candidates(&raw, &PreferenceContext::default(), budget, None)
        .iter()
        .map(|c| c.id.0.clone())
        .collect();
    let thrifty_order: Vec<String> = gate
        .filter_candidates(&raw, &thrifty, budget, None)
        .iter()
        .map(|c| c.id.0.clone())
        .collect();

    assert_eq!(default_order.len(), thrifty_order.len());
    // Price efficiency weighs heavier for the thrifty profile: the cheap
    // mouse overtakes the monitor it trails under the balanced blend.
    assert_ne!(default_order, thrifty_order);
    let position = |order: &[String], id: &str| order.iter().position(|x| x == id).unwrap();
    assert!(position(&default_order, "monitor-27") < position(&default_order, "mouse-basic"));
    assert!(position(&thrifty_order, "mouse-basic") < position(&thrifty_order, "monitor-27"));
}

#[test]
fn infeasible_budget_yields_an_empty_bundle() {
    let catalog = desk_catalog();
    let prefs = PreferenceContext::default();
    let budget = Decimal::from(10);

    let raw = catalog.candidates("desk setup", Some(budget), 50);
    let gate = FeasibilityGate::new();
    let feasible = gate.filter_candidates(&raw, &prefs, budget, None);
    assert!(feasible.is_empty());

    let optimizer = BundleOptimizer::new();
    let result = optimizer.optimize(&feasible, budget, &prefs, None, 5, &Deadline::none());
    assert_eq!(result.status, OptimizationStatus::Infeasible);
    assert!(result.bundle.is_empty());
    assert_eq!(result.total_price, Decimal::ZERO);
}

#[test]
fn required_categories_survive_end_to_end() {
    let catalog = desk_catalog();
    let prefs = PreferenceContext::default();
    let budget = Decimal::from(1200);
    let required = vec!["monitor".to_owned()];

    let raw = catalog.candidates("desk setup with a monitor", Some(budget), 50);
    let gate = FeasibilityGate::new();
    let feasible = gate.filter_candidates(&raw, &prefs, budget, Some(&required));

    let optimizer = BundleOptimizer::new();
    let result =
        optimizer.optimize(&feasible, budget, &prefs, Some(&required), 5, &Deadline::none());

    assert_eq!(result.status, OptimizationStatus::Optimal);
    assert!(result.bundle.iter().any(|c| c.category == "monitor"));
    assert!(result.total_price <= budget);
}

#[test]
fn fast_path_returns_ranked_candidates_without_optimization() {
    let catalog = desk_catalog();
    let prefs = PreferenceContext::default();

    let router = QueryRouter::new();
    let decision = router.route("laptop", None);
    assert_eq!(decision.path, RoutePath::Fast);

    let raw = catalog.candidates("laptop", None, 10);
    let scorer = CandidateScorer::new();
    let ranked = scorer.rerank_batch(&raw, None, &prefs, None);
    assert!(!ranked.is_empty());
    for pair in ranked.windows(2) {
        assert!(pair[0].breakdown.final_score >= pair[1].breakdown.final_score);
    }
}

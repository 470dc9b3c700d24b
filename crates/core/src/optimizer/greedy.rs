//! Greedy value-density fallback for bundle selection.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;

use crate::domain::Candidate;

/// Select candidate indices greedily by utility-per-price, honoring the
/// budget, the item cap, and single-item categories. Required categories
/// get a first pass that commits the highest-utility affordable item of
/// each. Bounded by construction; completes in one walk of the list.
pub(crate) fn greedy_select(
    candidates: &[Candidate],
    budget: Decimal,
    max_items: usize,
    required_categories: &[String],
    single_item_categories: &HashSet<String>,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| {
        density(&candidates[b])
            .partial_cmp(&density(&candidates[a]))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| candidates[a].id.0.cmp(&candidates[b].id.0))
    });

    let mut selected: Vec<usize> = Vec::new();
    let mut remaining = budget;
    let mut category_counts: HashMap<&str, usize> = HashMap::new();

    // First pass: cover required categories with their best item.
    for category in required_categories {
        if selected.len() == max_items {
            break;
        }
        if category_counts.get(category.as_str()).copied().unwrap_or(0) > 0 {
            continue;
        }
        let best = (0..candidates.len())
            .filter(|&i| {
                candidates[i].category.eq_ignore_ascii_case(category)
                    && candidates[i].price <= remaining
                    && !selected.contains(&i)
            })
            .max_by(|&a, &b| {
                candidates[a]
                    .utility_or_zero()
                    .partial_cmp(&candidates[b].utility_or_zero())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(index) = best {
            commit(candidates, index, &mut remaining, &mut selected, &mut category_counts);
        }
    }

    // Second pass: fill with the densest remaining items that fit.
    for &index in &order {
        if selected.len() == max_items {
            break;
        }
        if selected.contains(&index) {
            continue;
        }
        let candidate = &candidates[index];
        let used = category_counts.get(candidate.category.as_str()).copied().unwrap_or(0);
        if single_item_categories.contains(&candidate.category) && used >= 1 {
            continue;
        }
        if candidate.price > remaining {
            continue;
        }
        commit(candidates, index, &mut remaining, &mut selected, &mut category_counts);
    }

    selected
}

fn commit<'a>(
    candidates: &'a [Candidate],
    index: usize,
    remaining: &mut Decimal,
    selected: &mut Vec<usize>,
    category_counts: &mut HashMap<&'a str, usize>,
) {
    *remaining -= candidates[index].price;
    *category_counts.entry(candidates[index].category.as_str()).or_insert(0) += 1;
    selected.push(index);
}

fn density(candidate: &Candidate) -> f64 {
    // Price floor of 1 avoids division by zero on degenerate inputs.
    candidate.utility_or_zero() / candidate.price_f64().max(1.0)
}

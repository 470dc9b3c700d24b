//! Feasibility gate: affordability and quality screening for candidates.

mod allocation;
mod gate;

pub use allocation::allocate_category_budgets;
pub use gate::{FeasibilityGate, FeasibilityResult, Violation, ViolationSeverity};

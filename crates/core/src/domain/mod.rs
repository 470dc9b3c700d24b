pub mod adapter;
pub mod candidate;
pub mod preference;
pub mod route;

pub use adapter::RawCandidate;
pub use candidate::{Candidate, Condition, ProductId};
pub use preference::{Archetype, PreferenceContext};
pub use route::{RouteDecision, RoutePath};

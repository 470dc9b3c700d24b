//! Optional routing telemetry.
//!
//! The counters here are the only shared mutable state in the core; they
//! are updated with atomics and are never required for correctness.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::RoutePath;

#[derive(Debug, Default)]
pub struct RouterStats {
    fast: AtomicU64,
    smart: AtomicU64,
    deep: AtomicU64,
    route_nanos: AtomicU64,
    routes: AtomicU64,
}

impl RouterStats {
    pub(crate) fn record(&self, path: RoutePath, elapsed: Duration) {
        let counter = match path {
            RoutePath::Fast => &self.fast,
            RoutePath::Smart => &self.smart,
            RoutePath::Deep => &self.deep,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.routes.fetch_add(1, Ordering::Relaxed);
        self.route_nanos.fetch_add(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters. Counts taken during concurrent
    /// routing may be momentarily inconsistent with each other; that is
    /// acceptable for telemetry.
    pub fn snapshot(&self) -> RouterStatsSnapshot {
        let routes = self.routes.load(Ordering::Relaxed);
        let route_nanos = self.route_nanos.load(Ordering::Relaxed);
        RouterStatsSnapshot {
            fast: self.fast.load(Ordering::Relaxed),
            smart: self.smart.load(Ordering::Relaxed),
            deep: self.deep.load(Ordering::Relaxed),
            total: routes,
            avg_route_micros: if routes == 0 {
                0.0
            } else {
                route_nanos as f64 / routes as f64 / 1_000.0
            },
            captured_at: Utc::now(),
        }
    }
}

/// Serializable view of the router counters.
#[derive(Clone, Debug, Serialize)]
pub struct RouterStatsSnapshot {
    pub fast: u64,
    pub smart: u64,
    pub deep: u64,
    pub total: u64,
    pub avg_route_micros: f64,
    pub captured_at: DateTime<Utc>,
}

//! Cooperative deadline and cancellation context.
//!
//! A single [`Deadline`] is threaded from the orchestrator into the bundle
//! optimizer so the caller's path-level budget and the solver's internal
//! limit compose instead of racing independently. Clones share one
//! cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct Deadline {
    expires_at: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl Deadline {
    /// No expiry; only explicit cancellation can stop work.
    pub fn none() -> Self {
        Self::default()
    }

    /// Expires `limit` from now.
    pub fn within(limit: Duration) -> Self {
        Self { expires_at: Some(Instant::now() + limit), cancelled: Arc::new(AtomicBool::new(false)) }
    }

    /// A deadline no later than `limit` from now, sharing this deadline's
    /// cancellation flag. The sooner of the two expiries wins.
    pub fn tightened(&self, limit: Duration) -> Self {
        let candidate = Instant::now() + limit;
        let expires_at = match self.expires_at {
            Some(existing) => Some(existing.min(candidate)),
            None => Some(candidate),
        };
        Self { expires_at, cancelled: Arc::clone(&self.cancelled) }
    }

    /// Request cooperative cancellation; observed by all clones.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// True once cancelled or past the expiry instant.
    pub fn is_expired(&self) -> bool {
        if self.is_cancelled() {
            return true;
        }
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left before expiry; `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at.map(|at| at.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_deadline_never_expires_on_its_own() {
        let deadline = Deadline::none();
        assert!(!deadline.is_expired());
        assert_eq!(deadline.remaining(), None);
    }

    #[test]
    fn cancellation_is_shared_across_clones() {
        let deadline = Deadline::none();
        let clone = deadline.clone();
        clone.cancel();
        assert!(deadline.is_cancelled());
        assert!(deadline.is_expired());
    }

    #[test]
    fn tightened_keeps_the_sooner_expiry() {
        let outer = Deadline::within(Duration::from_millis(5));
        let inner = outer.tightened(Duration::from_secs(60));
        assert!(inner.remaining().unwrap() <= Duration::from_millis(5));

        let unbounded = Deadline::none();
        let bounded = unbounded.tightened(Duration::from_millis(50));
        assert!(bounded.remaining().is_some());
    }

    #[test]
    fn tightened_shares_the_cancellation_flag() {
        let outer = Deadline::none();
        let inner = outer.tightened(Duration::from_secs(1));
        outer.cancel();
        assert!(inner.is_expired());
    }

    #[test]
    fn expired_after_the_limit_elapses() {
        let deadline = Deadline::within(Duration::from_millis(0));
        std::thread::sleep(Duration::from_millis(2));
        assert!(deadline.is_expired());
    }
}

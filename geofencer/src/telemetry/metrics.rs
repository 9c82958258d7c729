//! Atomic session counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::snapshot::TelemetrySnapshot;

/// Lock-free counters for coordinator activity.
///
/// Recorded from the session service with relaxed ordering; exact
/// cross-counter consistency is not required, snapshots are advisory.
#[derive(Debug)]
pub struct CoordinatorMetrics {
    started_at: Instant,
    requests_accepted: AtomicU64,
    requests_rejected: AtomicU64,
    sessions_completed: AtomicU64,
    sessions_failed: AtomicU64,
    sessions_timed_out: AtomicU64,
    resolutions_requested: AtomicU64,
    fences_added: AtomicU64,
    fences_removed: AtomicU64,
}

impl CoordinatorMetrics {
    /// Create zeroed metrics with the uptime clock started.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests_accepted: AtomicU64::new(0),
            requests_rejected: AtomicU64::new(0),
            sessions_completed: AtomicU64::new(0),
            sessions_failed: AtomicU64::new(0),
            sessions_timed_out: AtomicU64::new(0),
            resolutions_requested: AtomicU64::new(0),
            fences_added: AtomicU64::new(0),
            fences_removed: AtomicU64::new(0),
        }
    }

    /// A request opened a session.
    pub fn record_request_accepted(&self) {
        self.requests_accepted.fetch_add(1, Ordering::Relaxed);
    }

    /// A request was dropped by the in-flight guard.
    pub fn record_request_rejected(&self) {
        self.requests_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// A session completed with an operation result.
    pub fn record_session_completed(&self) {
        self.sessions_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// A session ended with a connection or preparation failure.
    pub fn record_session_failed(&self) {
        self.sessions_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A session was cancelled by a phase deadline.
    pub fn record_session_timed_out(&self) {
        self.sessions_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// A resolvable failure was surfaced to the host.
    pub fn record_resolution_requested(&self) {
        self.resolutions_requested.fetch_add(1, Ordering::Relaxed);
    }

    /// Fences successfully registered.
    pub fn record_fences_added(&self, count: u64) {
        self.fences_added.fetch_add(count, Ordering::Relaxed);
    }

    /// Fences successfully removed.
    pub fn record_fences_removed(&self, count: u64) {
        self.fences_removed.fetch_add(count, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot for display.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            uptime: self.started_at.elapsed(),
            requests_accepted: self.requests_accepted.load(Ordering::Relaxed),
            requests_rejected: self.requests_rejected.load(Ordering::Relaxed),
            sessions_completed: self.sessions_completed.load(Ordering::Relaxed),
            sessions_failed: self.sessions_failed.load(Ordering::Relaxed),
            sessions_timed_out: self.sessions_timed_out.load(Ordering::Relaxed),
            resolutions_requested: self.resolutions_requested.load(Ordering::Relaxed),
            fences_added: self.fences_added.load(Ordering::Relaxed),
            fences_removed: self.fences_removed.load(Ordering::Relaxed),
        }
    }
}

impl Default for CoordinatorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = CoordinatorMetrics::new();
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.requests_accepted, 0);
        assert_eq!(snapshot.requests_rejected, 0);
        assert_eq!(snapshot.sessions_completed, 0);
        assert_eq!(snapshot.fences_added, 0);
    }

    #[test]
    fn test_counters_accumulate() {
        let metrics = CoordinatorMetrics::new();

        metrics.record_request_accepted();
        metrics.record_request_accepted();
        metrics.record_request_rejected();
        metrics.record_session_completed();
        metrics.record_fences_added(1);
        metrics.record_fences_removed(1);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.requests_accepted, 2);
        assert_eq!(snapshot.requests_rejected, 1);
        assert_eq!(snapshot.sessions_completed, 1);
        assert_eq!(snapshot.fences_added, 1);
        assert_eq!(snapshot.fences_removed, 1);
    }
}

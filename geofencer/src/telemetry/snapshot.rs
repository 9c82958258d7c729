//! Point-in-time telemetry snapshot.

use std::time::Duration;

/// Copy of the coordinator counters at a single point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    /// Time since the metrics were created.
    pub uptime: Duration,
    /// Requests that opened a session.
    pub requests_accepted: u64,
    /// Requests dropped by the in-flight guard.
    pub requests_rejected: u64,
    /// Sessions that finished with an operation result.
    pub sessions_completed: u64,
    /// Sessions that ended with a connection or preparation failure.
    pub sessions_failed: u64,
    /// Sessions cancelled by a phase deadline.
    pub sessions_timed_out: u64,
    /// Resolvable failures surfaced to the host.
    pub resolutions_requested: u64,
    /// Fences successfully registered.
    pub fences_added: u64,
    /// Fences successfully removed.
    pub fences_removed: u64,
}

impl TelemetrySnapshot {
    /// Total requests submitted, accepted or not.
    pub fn requests_total(&self) -> u64 {
        self.requests_accepted + self.requests_rejected
    }

    /// Fraction of requests dropped by the guard (0.0 to 1.0).
    pub fn rejection_rate(&self) -> f64 {
        let total = self.requests_total();
        if total == 0 {
            0.0
        } else {
            self.requests_rejected as f64 / total as f64
        }
    }

    /// Uptime formatted as `HHh MMm SSs`.
    pub fn uptime_human(&self) -> String {
        let secs = self.uptime.as_secs();
        format!("{:02}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_rate_empty() {
        let snapshot = TelemetrySnapshot::default();
        assert_eq!(snapshot.rejection_rate(), 0.0);
    }

    #[test]
    fn test_rejection_rate() {
        let snapshot = TelemetrySnapshot {
            requests_accepted: 3,
            requests_rejected: 1,
            ..Default::default()
        };
        assert_eq!(snapshot.requests_total(), 4);
        assert_eq!(snapshot.rejection_rate(), 0.25);
    }

    #[test]
    fn test_uptime_human() {
        let snapshot = TelemetrySnapshot {
            uptime: Duration::from_secs(3723),
            ..Default::default()
        };
        assert_eq!(snapshot.uptime_human(), "01h 02m 03s");
    }
}

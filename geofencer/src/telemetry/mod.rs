//! Session telemetry for observability and user feedback.
//!
//! Lock-free atomic counters recorded by the session service, copied into
//! point-in-time snapshots for display.
//!
//! ```text
//! GeofenceService ─────► CoordinatorMetrics ─────► TelemetrySnapshot ─────► Views
//!                        (atomic counters)         (point-in-time copy)     (CLI, etc.)
//! ```

mod metrics;
mod snapshot;

pub use metrics::CoordinatorMetrics;
pub use snapshot::TelemetrySnapshot;

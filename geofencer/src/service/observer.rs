//! Host notification hooks.

use tracing::{info, warn};

use crate::backend::{BoxFuture, ConnectFailure};
use crate::coordinator::SessionOutcome;

/// Out-of-band notifications from the session service to its host.
///
/// The host mediates resolvable connection failures (e.g. prompting the
/// user to update the backing service) and receives every terminal session
/// outcome for display.
pub trait HostObserver: Send + Sync {
    /// A resolvable connection failure occurred.
    ///
    /// Returns whether the failure was resolved; `true` re-arms the pending
    /// operation for a single retry, `false` abandons the request.
    fn resolution_required(&self, failure: ConnectFailure) -> BoxFuture<'_, bool>;

    /// A session reached its terminal state.
    fn session_closed(&self, outcome: &SessionOutcome);
}

/// Sample-grade observer: failures produce log lines, resolutions are
/// declined.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl HostObserver for LoggingObserver {
    fn resolution_required(&self, failure: ConnectFailure) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            warn!(%failure, "Backend requested user-mediated resolution; no host UI to run it");
            false
        })
    }

    fn session_closed(&self, outcome: &SessionOutcome) {
        match outcome {
            SessionOutcome::Completed { .. } => info!(%outcome, "Session closed"),
            SessionOutcome::Failed(_) => warn!(%outcome, "Session closed"),
        }
    }
}

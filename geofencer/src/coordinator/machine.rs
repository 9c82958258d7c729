//! The request coordinator state machine.

use tracing::{debug, info, warn};

use crate::backend::{ConnectFailure, OperationOutcome};
use crate::fence::{GeofenceSpec, TriggerAction};

use super::outcome::{SessionError, SessionOutcome, TimeoutPhase};
use super::session::{ConnectionSession, PendingOperation, SessionState};

/// Side effect the adapter must execute after a machine transition.
///
/// The machine never touches the backend itself; it describes what to do
/// and the session service does it. Effects are executed in emission order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open a connection to the location backend.
    Connect,
    /// Run the asynchronous fence preparation step for a pending add.
    PrepareFence(GeofenceSpec),
    /// Register the given fences, firing the trigger on matching
    /// transitions.
    AddFences(Vec<GeofenceSpec>, TriggerAction),
    /// Remove the fences with the given request ids.
    RemoveFences(Vec<String>),
    /// Tear down the backend connection.
    Disconnect,
    /// Ask the host to resolve a recoverable connection failure.
    NotifyResolution(ConnectFailure),
    /// Report the session's terminal outcome to the host.
    NotifyClosed(SessionOutcome),
}

/// Whether a caller request opened a session.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestAck {
    /// A session was opened; the adapter must execute the effects.
    Accepted(Vec<Effect>),
    /// A session is already in flight; the request was silently dropped.
    Rejected,
}

impl RequestAck {
    /// Whether the request opened a session.
    pub fn is_accepted(&self) -> bool {
        matches!(self, RequestAck::Accepted(_))
    }
}

/// Resolution ticket retained across a resolvable connection failure.
///
/// Holds the operation that was in flight so a successful resolution can
/// re-arm it. Superseded (dropped) if the caller issues a new request
/// before the resolution concludes.
#[derive(Debug)]
struct ResolutionTicket {
    pending: PendingOperation,
    failure: ConnectFailure,
}

/// Serializes geofence requests against a location backend.
///
/// Owns at most one [`ConnectionSession`] at a time. Caller-facing requests
/// return a [`RequestAck`]; backend-facing callbacks consume events and
/// emit [`Effect`]s. All methods take `&mut self`: callbacks are expected
/// to arrive on a single delivery context, and the session service
/// serializes access.
#[derive(Debug, Default)]
pub struct RequestCoordinator {
    session: Option<ConnectionSession>,
    resolution: Option<ResolutionTicket>,
}

impl RequestCoordinator {
    /// Create a coordinator with no session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    ///
    /// `Failed` while a resolution ticket is outstanding, `Disconnected`
    /// when idle.
    pub fn state(&self) -> SessionState {
        match &self.session {
            Some(session) => session.state(),
            None if self.resolution.is_some() => SessionState::Failed,
            None => SessionState::Disconnected,
        }
    }

    /// Whether a session is in flight.
    pub fn in_progress(&self) -> bool {
        self.session.is_some()
    }

    /// Request registration of the given fence.
    ///
    /// Silently rejected if a session is already in flight: no queuing, no
    /// error surfaced.
    pub fn request_add(&mut self, spec: GeofenceSpec) -> RequestAck {
        self.open_session(PendingOperation::Add(spec))
    }

    /// Request removal of the fence with the given request id.
    ///
    /// Same guard as [`RequestCoordinator::request_add`].
    pub fn request_remove(&mut self, request_id: impl Into<String>) -> RequestAck {
        self.open_session(PendingOperation::Remove(request_id.into()))
    }

    fn open_session(&mut self, pending: PendingOperation) -> RequestAck {
        if self.session.is_some() {
            debug!(kind = pending.kind(), "Request dropped: session already in flight");
            return RequestAck::Rejected;
        }

        if self.resolution.take().is_some() {
            debug!("Outstanding resolution ticket superseded by new request");
        }

        info!(kind = pending.kind(), "Opening session");
        self.session = Some(ConnectionSession::open(pending));
        RequestAck::Accepted(vec![Effect::Connect])
    }

    /// Backend callback: the connection is established.
    ///
    /// Dispatches on the pending operation kind. An add enters the
    /// asynchronous preparation step; a remove executes immediately. A
    /// session with no recognized pending operation is a no-op.
    pub fn on_connected(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            warn!("Connected callback without a session");
            return Vec::new();
        };

        if session.state() != SessionState::Connecting {
            warn!(state = %session.state(), "Connected callback in unexpected state");
            return Vec::new();
        }

        match session.pending() {
            Some(PendingOperation::Add(spec)) => {
                let spec = spec.clone();
                session.set_state(SessionState::Preparing);
                vec![Effect::PrepareFence(spec)]
            }
            Some(PendingOperation::Remove(id)) => {
                let id = id.clone();
                session.set_state(SessionState::Connected);
                vec![Effect::RemoveFences(vec![id])]
            }
            None => {
                session.set_state(SessionState::Connected);
                Vec::new()
            }
        }
    }

    /// Preparation step finished; register the prepared fence.
    pub fn on_prepared(&mut self, spec: GeofenceSpec) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            warn!("Prepared callback without a session");
            return Vec::new();
        };

        if session.state() != SessionState::Preparing {
            warn!(state = %session.state(), "Prepared callback in unexpected state");
            return Vec::new();
        }

        session.set_state(SessionState::Connected);
        let trigger = spec.trigger().clone();
        vec![Effect::AddFences(vec![spec], trigger)]
    }

    /// Preparation step failed; the session is terminal.
    pub fn on_prepare_failed(&mut self, reason: impl Into<String>) -> Vec<Effect> {
        if self.session.take().is_none() {
            warn!("Prepare-failed callback without a session");
            return Vec::new();
        }

        let reason = reason.into();
        warn!(reason = reason.as_str(), "Fence preparation failed");
        vec![
            Effect::Disconnect,
            Effect::NotifyClosed(SessionOutcome::Failed(SessionError::PrepareFailed {
                reason,
            })),
        ]
    }

    /// Backend callback: the connection dropped.
    ///
    /// Clears the in-flight state; the backend handle is discarded, never
    /// reused.
    pub fn on_disconnected(&mut self) -> Vec<Effect> {
        if self.session.take().is_some() {
            debug!("Session disconnected");
        }
        Vec::new()
    }

    /// Backend callback: the connection attempt failed.
    ///
    /// Resolvable failures retain the pending operation in a resolution
    /// ticket and surface a resolution request to the host, exactly once
    /// per failure. A session that already consumed its resolution retry
    /// treats a second resolvable failure as terminal. Unresolvable
    /// failures are logged and terminate the request without retry.
    pub fn on_connection_failed(&mut self, failure: ConnectFailure) -> Vec<Effect> {
        let Some(mut session) = self.session.take() else {
            warn!(%failure, "Connection-failed callback without a session");
            return Vec::new();
        };

        if failure.has_resolution() && !session.resumed_after_resolution() {
            if let Some(pending) = session.take_pending() {
                info!(%failure, kind = pending.kind(), "Resolvable connection failure; requesting resolution");
                self.resolution = Some(ResolutionTicket { pending, failure });
                return vec![Effect::NotifyResolution(failure)];
            }
        }

        warn!(%failure, "Connection failed");
        vec![Effect::NotifyClosed(SessionOutcome::Failed(
            SessionError::ConnectionFailed { failure },
        ))]
    }

    /// Host callback: the out-of-band resolution concluded.
    ///
    /// On success the retained operation is re-armed and the connection
    /// retried, once. On failure (or when the ticket was superseded by a
    /// newer request) the request is abandoned.
    pub fn on_resolution(&mut self, resolved: bool) -> Vec<Effect> {
        let Some(ticket) = self.resolution.take() else {
            debug!("Resolution callback without an outstanding ticket");
            return Vec::new();
        };

        if self.session.is_some() {
            debug!("Resolution ticket superseded by an in-flight session");
            return Vec::new();
        }

        if !resolved {
            info!(failure = %ticket.failure, "Backend offered no resolution");
            return vec![Effect::NotifyClosed(SessionOutcome::Failed(
                SessionError::BackendUnavailable {
                    failure: ticket.failure,
                },
            ))];
        }

        info!(kind = ticket.pending.kind(), "Resolution succeeded; re-arming request");
        self.session = Some(ConnectionSession::resumed(ticket.pending));
        vec![Effect::Connect]
    }

    /// Backend callback: the add/remove operation finished.
    ///
    /// Success and failure result codes follow the identical path: clear
    /// state, disconnect explicitly, report the outcome. The connection is
    /// never kept alive across requests.
    pub fn on_operation_result(&mut self, outcome: OperationOutcome) -> Vec<Effect> {
        if self.session.take().is_none() {
            warn!("Operation-result callback without a session");
            return Vec::new();
        }

        info!(result = %outcome.result, affected = outcome.affected_ids.len(), "Operation finished");
        vec![
            Effect::Disconnect,
            Effect::NotifyClosed(SessionOutcome::Completed {
                result: outcome.result,
                affected_ids: outcome.affected_ids,
            }),
        ]
    }

    /// A phase deadline expired; cancel the pending operation.
    pub fn on_timeout(&mut self, phase: TimeoutPhase) -> Vec<Effect> {
        if self.session.take().is_none() {
            return Vec::new();
        }

        warn!(%phase, "Session timed out");
        vec![
            Effect::Disconnect,
            Effect::NotifyClosed(SessionOutcome::Failed(SessionError::TimedOut { phase })),
        ]
    }
}

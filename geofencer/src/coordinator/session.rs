//! Connection session model.

use std::fmt;

use crate::fence::GeofenceSpec;

/// Observable state of a connection session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session, or the previous session reached its terminal state.
    #[default]
    Disconnected,
    /// Connection to the location backend is being established.
    Connecting,
    /// Connected; the fence for a pending add is being prepared
    /// asynchronously before registration.
    Preparing,
    /// Connected; the pending operation is executing on the backend.
    Connected,
    /// A resolvable connection failure occurred; the machine is paused
    /// until the host resolves or abandons it.
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Disconnected => write!(f, "disconnected"),
            SessionState::Connecting => write!(f, "connecting"),
            SessionState::Preparing => write!(f, "preparing"),
            SessionState::Connected => write!(f, "connected"),
            SessionState::Failed => write!(f, "failed"),
        }
    }
}

/// The single operation a session carries.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingOperation {
    /// Register the given fence.
    Add(GeofenceSpec),
    /// Remove the fence with the given request id.
    Remove(String),
}

impl PendingOperation {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PendingOperation::Add(_) => "add",
            PendingOperation::Remove(_) => "remove",
        }
    }
}

/// One logical attempt to talk to the location backend.
///
/// A session is created on a user-triggered request, carries at most one
/// pending operation, and is discarded on every terminal transition. It is
/// never reused: a new request creates a fresh session.
#[derive(Debug)]
pub struct ConnectionSession {
    state: SessionState,
    pending: Option<PendingOperation>,
    /// Set when this session was re-armed after a user-mediated
    /// resolution; a second resolvable failure is then terminal.
    resumed_after_resolution: bool,
}

impl ConnectionSession {
    /// Open a session in `Connecting` state carrying the given operation.
    pub fn open(pending: PendingOperation) -> Self {
        Self {
            state: SessionState::Connecting,
            pending: Some(pending),
            resumed_after_resolution: false,
        }
    }

    /// Open a session re-armed after a resolution succeeded.
    pub fn resumed(pending: PendingOperation) -> Self {
        Self {
            state: SessionState::Connecting,
            pending: Some(pending),
            resumed_after_resolution: true,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The pending operation, if any.
    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    /// Whether this session already consumed its single resolution retry.
    pub fn resumed_after_resolution(&self) -> bool {
        self.resumed_after_resolution
    }

    /// Transition to a new state, logging the change.
    pub fn set_state(&mut self, state: SessionState) {
        if state != self.state {
            tracing::debug!(from = %self.state, to = %state, "Session state transition");
            self.state = state;
        }
    }

    /// Take the pending operation out of the session.
    pub fn take_pending(&mut self) -> Option<PendingOperation> {
        self.pending.take()
    }
}

//! Terminal session outcomes.

use std::fmt;

use thiserror::Error;

use crate::backend::{ConnectFailure, ResultCode};

/// Which phase of a session a timeout cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    /// Establishing the backend connection.
    Connect,
    /// Preparing or executing the pending operation.
    Operation,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeoutPhase::Connect => write!(f, "connect"),
            TimeoutPhase::Operation => write!(f, "operation"),
        }
    }
}

/// Errors that terminate a session before an operation result arrives.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The backend is unavailable and the host declined or failed to
    /// resolve it.
    #[error("backend unavailable: {failure}")]
    BackendUnavailable { failure: ConnectFailure },

    /// Connection failed with no resolution path.
    #[error("{failure}")]
    ConnectionFailed { failure: ConnectFailure },

    /// Asynchronous fence preparation failed.
    #[error("fence preparation failed: {reason}")]
    PrepareFailed { reason: String },

    /// The connect or operation phase exceeded its deadline.
    #[error("{phase} phase timed out")]
    TimedOut { phase: TimeoutPhase },
}

/// Typed terminal result of a session, surfaced to the host.
///
/// An operation-level failure (non-success result code from the backend) is
/// not a [`SessionError`]: both result codes travel through `Completed` and
/// follow the identical disconnect path. Callers that care can inspect
/// [`SessionOutcome::result_code`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    /// The pending operation ran and the backend reported a result.
    Completed {
        /// Result code reported by the backend.
        result: ResultCode,
        /// Fence ids the operation affected.
        affected_ids: Vec<String>,
    },
    /// The session ended before the operation could run.
    Failed(SessionError),
}

impl SessionOutcome {
    /// Whether the session completed with a success result code.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SessionOutcome::Completed {
                result: ResultCode::Success,
                ..
            }
        )
    }

    /// The backend result code, if the operation ran.
    pub fn result_code(&self) -> Option<ResultCode> {
        match self {
            SessionOutcome::Completed { result, .. } => Some(*result),
            SessionOutcome::Failed(_) => None,
        }
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Completed {
                result,
                affected_ids,
            } => {
                write!(f, "completed ({}, fences: {})", result, affected_ids.join(", "))
            }
            SessionOutcome::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}

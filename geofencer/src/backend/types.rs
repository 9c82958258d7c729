//! Backend contract types.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::fence::{GeofenceSpec, TriggerAction};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A failed attempt to connect to the location backend.
///
/// Mirrors the connection-result shape platform clients report: an opaque
/// error code plus whether the backend offers a user-mediated resolution
/// (e.g. prompting to install or update the backing service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectFailure {
    /// Backend-specific error code.
    pub code: i32,
    /// Whether the failure can be resolved through user action.
    pub resolvable: bool,
}

impl ConnectFailure {
    /// A failure the backend can resolve through user action.
    pub fn resolvable(code: i32) -> Self {
        Self {
            code,
            resolvable: true,
        }
    }

    /// A failure with no resolution path.
    pub fn unresolvable(code: i32) -> Self {
        Self {
            code,
            resolvable: false,
        }
    }

    /// Whether the backend offers a resolution for this failure.
    pub fn has_resolution(&self) -> bool {
        self.resolvable
    }
}

impl fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.resolvable {
            write!(f, "connection failed (code {}, resolvable)", self.code)
        } else {
            write!(f, "connection failed (code {})", self.code)
        }
    }
}

/// Result code the backend reports for an add/remove operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    /// Operation accepted by the backend.
    Success,
    /// Operation rejected with a backend-specific code.
    Error(i32),
}

impl ResultCode {
    /// Whether the operation was accepted.
    pub fn is_success(&self) -> bool {
        matches!(self, ResultCode::Success)
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultCode::Success => write!(f, "success"),
            ResultCode::Error(code) => write!(f, "error {}", code),
        }
    }
}

/// Outcome of a fence add/remove operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationOutcome {
    /// Result code reported by the backend.
    pub result: ResultCode,
    /// Fence ids the operation affected.
    pub affected_ids: Vec<String>,
}

impl OperationOutcome {
    /// A successful outcome affecting the given fence ids.
    pub fn success(affected_ids: Vec<String>) -> Self {
        Self {
            result: ResultCode::Success,
            affected_ids,
        }
    }

    /// A failed outcome with the given backend error code.
    pub fn error(code: i32, affected_ids: Vec<String>) -> Self {
        Self {
            result: ResultCode::Error(code),
            affected_ids,
        }
    }
}

/// Capability set the coordinator requires from a location backend.
///
/// Implementations must be `Send + Sync`; the session service holds the
/// backend behind `Arc<dyn LocationBackend>` and calls it from async tasks.
/// The connection handle semantics follow the platform contract: `connect`
/// establishes one logical session, `disconnect` tears it down, and a
/// disconnected handle is never reused; the service reconnects for every
/// new request.
pub trait LocationBackend: Send + Sync {
    /// Establish a connection to the backend.
    fn connect(&self) -> BoxFuture<'_, Result<(), ConnectFailure>>;

    /// Tear down the connection.
    ///
    /// Infallible by contract: tearing down an already-disconnected handle
    /// is a no-op.
    fn disconnect(&self) -> BoxFuture<'_, ()>;

    /// Register the given fences, attaching the trigger action to fire on
    /// matching transitions.
    fn add_fences(
        &self,
        fences: Vec<GeofenceSpec>,
        trigger: TriggerAction,
    ) -> BoxFuture<'_, OperationOutcome>;

    /// Remove the fences with the given request ids.
    fn remove_fences(&self, ids: Vec<String>) -> BoxFuture<'_, OperationOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_failure_resolution() {
        assert!(ConnectFailure::resolvable(2).has_resolution());
        assert!(!ConnectFailure::unresolvable(8).has_resolution());
    }

    #[test]
    fn test_connect_failure_display() {
        let failure = ConnectFailure::resolvable(2);
        assert_eq!(
            failure.to_string(),
            "connection failed (code 2, resolvable)"
        );
    }

    #[test]
    fn test_result_code() {
        assert!(ResultCode::Success.is_success());
        assert!(!ResultCode::Error(1000).is_success());
        assert_eq!(ResultCode::Error(1000).to_string(), "error 1000");
    }

    #[test]
    fn test_operation_outcome_constructors() {
        let ok = OperationOutcome::success(vec!["a".to_string()]);
        assert!(ok.result.is_success());
        assert_eq!(ok.affected_ids, vec!["a"]);

        let err = OperationOutcome::error(1000, vec![]);
        assert_eq!(err.result, ResultCode::Error(1000));
        assert!(err.affected_ids.is_empty());
    }
}

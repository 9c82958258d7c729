//! Integration tests for the geofence session lifecycle.
//!
//! These tests exercise the complete flow over real components:
//! - request → connect → prepare → register → result → disconnect
//! - the in-flight guard dropping concurrent requests
//! - resolvable connection failures and user-mediated resolution
//! - phase deadlines cancelling stuck sessions
//!
//! Run with: `cargo test --test session_lifecycle`

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use geofencer::backend::{BoxFuture, ConnectFailure, SimulatedBackend};
use geofencer::coordinator::{SessionError, SessionOutcome, SessionState, TimeoutPhase};
use geofencer::fence::{Expiration, GeofenceSpec, Transition, TransitionMask, TriggerAction};
use geofencer::service::{GeofenceService, HostObserver, ServiceConfig, SubmitResult};

// ============================================================================
// Helpers
// ============================================================================

/// The demo fence around the Tokyo Skytree.
const SKYTREE_ID: &str = "tokyo_skytree";
const SKYTREE_LAT: f64 = 35.710057714926265;
const SKYTREE_LON: f64 = 139.81071829999996;
const SKYTREE_RADIUS_M: f32 = 200.0;
const SKYTREE_URL: &str = "http://www.tokyo-skytree.jp/";

/// Build the demo fence spec.
fn skytree_spec() -> GeofenceSpec {
    GeofenceSpec::builder(SKYTREE_ID)
        .with_center(SKYTREE_LAT, SKYTREE_LON)
        .with_radius_meters(SKYTREE_RADIUS_M)
        .with_expiration(Expiration::Never)
        .with_transitions(TransitionMask::ENTER)
        .with_trigger(TriggerAction::open_uri(SKYTREE_URL))
        .build()
        .expect("demo spec is valid")
}

/// Observer that counts resolution requests and answers with a fixed value.
struct ScriptedObserver {
    resolutions: AtomicUsize,
    answer: bool,
}

impl ScriptedObserver {
    fn answering(answer: bool) -> Self {
        Self {
            resolutions: AtomicUsize::new(0),
            answer,
        }
    }

    fn resolution_count(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

impl HostObserver for ScriptedObserver {
    fn resolution_required(&self, _failure: ConnectFailure) -> BoxFuture<'_, bool> {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        let answer = self.answer;
        Box::pin(async move { answer })
    }

    fn session_closed(&self, _outcome: &SessionOutcome) {}
}

// ============================================================================
// Integration Tests
// ============================================================================

/// The spec round-trips unchanged into the backend registry.
#[tokio::test]
async fn test_add_registers_exact_spec() {
    let backend = Arc::new(SimulatedBackend::new());
    let service = GeofenceService::new(Arc::clone(&backend));
    let spec = skytree_spec();

    let result = service.add_fence(spec.clone()).await;

    assert!(matches!(result, SubmitResult::Completed(ref o) if o.is_success()));
    let registered = backend.registered_fences();
    assert_eq!(registered.len(), 1);
    assert_eq!(registered[0], spec);
    assert_eq!(registered[0].latitude(), SKYTREE_LAT);
    assert_eq!(registered[0].longitude(), SKYTREE_LON);
    assert_eq!(registered[0].radius_meters(), SKYTREE_RADIUS_M);
    assert!(registered[0].transitions().contains(Transition::Enter));
}

/// Full lifecycle: add, then remove, ending disconnected both times.
#[tokio::test]
async fn test_add_then_remove_lifecycle() {
    let backend = Arc::new(SimulatedBackend::new());
    let service = GeofenceService::new(Arc::clone(&backend));

    let added = service.add_fence(skytree_spec()).await;
    assert_eq!(
        added,
        SubmitResult::Completed(SessionOutcome::Completed {
            result: geofencer::backend::ResultCode::Success,
            affected_ids: vec![SKYTREE_ID.to_string()],
        })
    );
    assert_eq!(service.state(), SessionState::Disconnected);
    assert!(backend.holds_fence(SKYTREE_ID));

    let removed = service.remove_fence(SKYTREE_ID).await;
    assert!(matches!(removed, SubmitResult::Completed(ref o) if o.is_success()));
    assert_eq!(service.state(), SessionState::Disconnected);
    assert!(!backend.holds_fence(SKYTREE_ID));
    assert_eq!(backend.fence_count(), 0);
}

/// Removing a fence the backend does not hold completes with an error
/// result code but follows the identical disconnect path.
#[tokio::test]
async fn test_remove_unknown_fence_still_disconnects() {
    let backend = Arc::new(SimulatedBackend::new());
    let service = GeofenceService::new(Arc::clone(&backend));

    let result = service.remove_fence("nowhere").await;

    match result {
        SubmitResult::Completed(outcome) => {
            assert!(!outcome.is_success());
            assert!(outcome.result_code().is_some());
        }
        other => panic!("expected a completed session, got {:?}", other),
    }
    assert_eq!(service.state(), SessionState::Disconnected);
    assert!(!service.in_progress());
}

/// A second request while a session is in flight is dropped without any
/// backend effect.
#[tokio::test]
async fn test_concurrent_request_is_dropped() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.set_connect_delay(Duration::from_millis(200));
    let service = Arc::new(GeofenceService::new(Arc::clone(&backend)));

    let first = {
        let service = Arc::clone(&service);
        tokio::spawn(async move { service.add_fence(skytree_spec()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(service.in_progress());

    let second = service.remove_fence(SKYTREE_ID).await;
    assert_eq!(second, SubmitResult::Busy);

    let first = first.await.expect("first session completes");
    assert!(matches!(first, SubmitResult::Completed(ref o) if o.is_success()));

    // Only the first request reached the backend.
    assert!(backend.holds_fence(SKYTREE_ID));
    let snapshot = service.metrics().snapshot();
    assert_eq!(snapshot.requests_accepted, 1);
    assert_eq!(snapshot.requests_rejected, 1);
}

/// A resolvable connection failure surfaces exactly one resolution request
/// and, when declined, ends the session without backend operations.
#[tokio::test]
async fn test_resolvable_failure_declined() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.inject_connect_failure(ConnectFailure::resolvable(2));
    let observer = Arc::new(ScriptedObserver::answering(false));
    let service = GeofenceService::new(Arc::clone(&backend))
        .with_observer(Arc::clone(&observer) as Arc<dyn HostObserver>);

    let result = service.add_fence(skytree_spec()).await;

    assert_eq!(observer.resolution_count(), 1);
    assert_eq!(backend.fence_count(), 0);
    assert_eq!(
        result,
        SubmitResult::Completed(SessionOutcome::Failed(SessionError::BackendUnavailable {
            failure: ConnectFailure::resolvable(2),
        }))
    );
    assert_eq!(service.state(), SessionState::Disconnected);
}

/// After a successful resolution the pending operation is re-armed and the
/// retried session completes.
#[tokio::test]
async fn test_resolvable_failure_resolved_and_retried() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.inject_connect_failure(ConnectFailure::resolvable(2));
    let observer = Arc::new(ScriptedObserver::answering(true));
    let service = GeofenceService::new(Arc::clone(&backend))
        .with_observer(Arc::clone(&observer) as Arc<dyn HostObserver>);

    let result = service.add_fence(skytree_spec()).await;

    assert_eq!(observer.resolution_count(), 1);
    assert!(matches!(result, SubmitResult::Completed(ref o) if o.is_success()));
    assert!(backend.holds_fence(SKYTREE_ID));
}

/// An unresolvable failure never consults the host for resolution.
#[tokio::test]
async fn test_unresolvable_failure_is_terminal() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.inject_connect_failure(ConnectFailure::unresolvable(8));
    let observer = Arc::new(ScriptedObserver::answering(true));
    let service = GeofenceService::new(Arc::clone(&backend))
        .with_observer(Arc::clone(&observer) as Arc<dyn HostObserver>);

    let result = service.add_fence(skytree_spec()).await;

    assert_eq!(observer.resolution_count(), 0);
    assert_eq!(
        result,
        SubmitResult::Completed(SessionOutcome::Failed(SessionError::ConnectionFailed {
            failure: ConnectFailure::unresolvable(8),
        }))
    );
    assert_eq!(backend.fence_count(), 0);
}

/// A connect that exceeds its deadline cancels the pending operation.
#[tokio::test]
async fn test_connect_deadline_cancels_session() {
    let backend = Arc::new(SimulatedBackend::new());
    backend.set_connect_delay(Duration::from_millis(500));
    let config = ServiceConfig::default().with_connect_timeout(Duration::from_millis(50));
    let service = GeofenceService::new(Arc::clone(&backend)).with_config(config);

    let result = service.add_fence(skytree_spec()).await;

    assert_eq!(
        result,
        SubmitResult::Completed(SessionOutcome::Failed(SessionError::TimedOut {
            phase: TimeoutPhase::Connect,
        }))
    );
    assert_eq!(service.state(), SessionState::Disconnected);
    assert!(!service.in_progress());
    assert_eq!(backend.fence_count(), 0);

    // The service re-arms for a fresh request once the backend recovers.
    backend.set_connect_delay(Duration::from_millis(0));
    let retry = service.add_fence(skytree_spec()).await;
    assert!(matches!(retry, SubmitResult::Completed(ref o) if o.is_success()));
}

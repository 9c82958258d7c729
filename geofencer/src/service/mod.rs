//! Async session service
//!
//! [`GeofenceService`] executes [`RequestCoordinator`](crate::coordinator::RequestCoordinator)
//! effects against a [`LocationBackend`], owning the concurrency and
//! resource model:
//!
//! - one logical session at a time; a request submitted while another is in
//!   flight returns [`SubmitResult::Busy`] immediately
//! - each connect and operation phase runs under a deadline; expiry cancels
//!   the pending operation and tears the session down
//! - a [`CancellationToken`] aborts in-flight sessions on shutdown
//! - resolvable connection failures are routed to the [`HostObserver`] and
//!   re-armed once on success
//!
//! ```text
//! caller ──► GeofenceService ──► RequestCoordinator (machine)
//!                 │                      │ effects
//!                 ▼                      ▼
//!           LocationBackend ◄── Connect/AddFences/RemoveFences/Disconnect
//!           FenceSource     ◄── PrepareFence
//!           HostObserver    ◄── NotifyResolution/NotifyClosed
//! ```

mod observer;
mod source;

pub use observer::{HostObserver, LoggingObserver};
pub use source::{FenceSource, ImmediateFenceSource, PrepareError};

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::backend::LocationBackend;
use crate::coordinator::{
    Effect, RequestAck, RequestCoordinator, SessionOutcome, SessionState, TimeoutPhase,
};
use crate::fence::GeofenceSpec;
use crate::telemetry::CoordinatorMetrics;

/// Default deadline for establishing the backend connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default deadline for preparing and executing the pending operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the session service.
#[derive(Debug, Clone, Copy)]
pub struct ServiceConfig {
    /// Deadline for the connect phase.
    pub connect_timeout: Duration,

    /// Deadline for the preparation and operation phases combined.
    pub operation_timeout: Duration,
}

impl ServiceConfig {
    /// Set the connect deadline.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the operation deadline.
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }
}

/// Result of submitting a request to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// A session is already in flight; the request was dropped.
    Busy,
    /// The session ran to a terminal state.
    Completed(SessionOutcome),
    /// The request was abandoned without a terminal outcome (its resolution
    /// ticket was superseded by a newer request).
    Abandoned,
    /// The service was shut down while the session was in flight.
    Cancelled,
}

/// Outcome of a single timed phase.
enum Step<T> {
    Done(T),
    TimedOut,
    Cancelled,
}

/// Drives geofence request sessions against a location backend.
///
/// Thread-safe: submission methods take `&self` and the machine lock is
/// held only across individual state transitions, so concurrent callers
/// observe the guard semantics (second request rejected) rather than
/// blocking behind each other's sessions.
pub struct GeofenceService<B: LocationBackend> {
    backend: Arc<B>,
    source: Arc<dyn FenceSource>,
    observer: Arc<dyn HostObserver>,
    metrics: Arc<CoordinatorMetrics>,
    machine: Mutex<RequestCoordinator>,
    config: ServiceConfig,
    shutdown: CancellationToken,
}

impl<B: LocationBackend> GeofenceService<B> {
    /// Create a service over the given backend with default collaborators:
    /// immediate fence preparation and a logging observer.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            source: Arc::new(ImmediateFenceSource),
            observer: Arc::new(LoggingObserver),
            metrics: Arc::new(CoordinatorMetrics::new()),
            machine: Mutex::new(RequestCoordinator::new()),
            config: ServiceConfig::default(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the service configuration.
    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the fence preparation source.
    pub fn with_source(mut self, source: Arc<dyn FenceSource>) -> Self {
        self.source = source;
        self
    }

    /// Replace the host observer.
    pub fn with_observer(mut self, observer: Arc<dyn HostObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Share an externally owned metrics instance.
    pub fn with_metrics(mut self, metrics: Arc<CoordinatorMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Session metrics.
    pub fn metrics(&self) -> Arc<CoordinatorMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.machine.lock().state()
    }

    /// Whether a session is in flight.
    pub fn in_progress(&self) -> bool {
        self.machine.lock().in_progress()
    }

    /// Token cancelled when the service shuts down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Abort any in-flight session and refuse further work.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    /// Submit a fence registration and drive it to completion.
    pub async fn add_fence(&self, spec: GeofenceSpec) -> SubmitResult {
        let effects = match self.machine.lock().request_add(spec) {
            RequestAck::Accepted(effects) => {
                self.metrics.record_request_accepted();
                effects
            }
            RequestAck::Rejected => {
                self.metrics.record_request_rejected();
                return SubmitResult::Busy;
            }
        };
        self.drive(effects).await
    }

    /// Submit a fence removal and drive it to completion.
    pub async fn remove_fence(&self, request_id: impl Into<String>) -> SubmitResult {
        let effects = match self.machine.lock().request_remove(request_id) {
            RequestAck::Accepted(effects) => {
                self.metrics.record_request_accepted();
                effects
            }
            RequestAck::Rejected => {
                self.metrics.record_request_rejected();
                return SubmitResult::Busy;
            }
        };
        self.drive(effects).await
    }

    /// Execute effects until the session reaches a terminal state.
    async fn drive(&self, initial: Vec<Effect>) -> SubmitResult {
        let mut queue: VecDeque<Effect> = initial.into();
        let mut outcome: Option<SessionOutcome> = None;

        while let Some(effect) = queue.pop_front() {
            let produced = match effect {
                Effect::Connect => {
                    match self
                        .timed(self.config.connect_timeout, self.backend.connect())
                        .await
                    {
                        Step::Done(Ok(())) => self.machine.lock().on_connected(),
                        Step::Done(Err(failure)) => {
                            self.machine.lock().on_connection_failed(failure)
                        }
                        Step::TimedOut => self.machine.lock().on_timeout(TimeoutPhase::Connect),
                        Step::Cancelled => return self.abort_session().await,
                    }
                }
                Effect::PrepareFence(spec) => {
                    match self
                        .timed(self.config.operation_timeout, self.source.prepare(spec))
                        .await
                    {
                        Step::Done(Ok(prepared)) => self.machine.lock().on_prepared(prepared),
                        Step::Done(Err(e)) => self.machine.lock().on_prepare_failed(e.to_string()),
                        Step::TimedOut => {
                            self.machine.lock().on_timeout(TimeoutPhase::Operation)
                        }
                        Step::Cancelled => return self.abort_session().await,
                    }
                }
                Effect::AddFences(fences, trigger) => {
                    let count = fences.len() as u64;
                    match self
                        .timed(
                            self.config.operation_timeout,
                            self.backend.add_fences(fences, trigger),
                        )
                        .await
                    {
                        Step::Done(result) => {
                            if result.result.is_success() {
                                self.metrics.record_fences_added(count);
                            }
                            self.machine.lock().on_operation_result(result)
                        }
                        Step::TimedOut => {
                            self.machine.lock().on_timeout(TimeoutPhase::Operation)
                        }
                        Step::Cancelled => return self.abort_session().await,
                    }
                }
                Effect::RemoveFences(ids) => {
                    match self
                        .timed(self.config.operation_timeout, self.backend.remove_fences(ids))
                        .await
                    {
                        Step::Done(result) => {
                            if result.result.is_success() {
                                self.metrics
                                    .record_fences_removed(result.affected_ids.len() as u64);
                            }
                            self.machine.lock().on_operation_result(result)
                        }
                        Step::TimedOut => {
                            self.machine.lock().on_timeout(TimeoutPhase::Operation)
                        }
                        Step::Cancelled => return self.abort_session().await,
                    }
                }
                Effect::Disconnect => {
                    self.backend.disconnect().await;
                    Vec::new()
                }
                Effect::NotifyResolution(failure) => {
                    self.metrics.record_resolution_requested();
                    let resolved = self.observer.resolution_required(failure).await;
                    self.machine.lock().on_resolution(resolved)
                }
                Effect::NotifyClosed(closed) => {
                    self.record_closed(&closed);
                    self.observer.session_closed(&closed);
                    outcome = Some(closed);
                    Vec::new()
                }
            };

            queue.extend(produced);
        }

        match outcome {
            Some(outcome) => SubmitResult::Completed(outcome),
            None => {
                debug!("Session ended without a terminal outcome");
                SubmitResult::Abandoned
            }
        }
    }

    /// Run a phase future under its deadline, aborting on shutdown.
    async fn timed<T>(&self, limit: Duration, fut: impl Future<Output = T>) -> Step<T> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Step::Cancelled,
            result = tokio::time::timeout(limit, fut) => match result {
                Ok(value) => Step::Done(value),
                Err(_) => Step::TimedOut,
            },
        }
    }

    /// Tear down the in-flight session after a shutdown cancellation.
    async fn abort_session(&self) -> SubmitResult {
        warn!("Service shut down with a session in flight");
        self.machine.lock().on_disconnected();
        self.backend.disconnect().await;
        SubmitResult::Cancelled
    }

    fn record_closed(&self, outcome: &SessionOutcome) {
        use crate::coordinator::SessionError;

        match outcome {
            SessionOutcome::Completed { .. } => self.metrics.record_session_completed(),
            SessionOutcome::Failed(SessionError::TimedOut { .. }) => {
                self.metrics.record_session_timed_out()
            }
            SessionOutcome::Failed(_) => self.metrics.record_session_failed(),
        }
    }
}

//! In-process simulated location backend.
//!
//! Stands in for the platform location service in the demo CLI and in
//! integration tests. It stores registered fences in a concurrent registry
//! and reports operation outcomes; it performs no spatial evaluation and
//! never fires triggers; that behavior belongs to a real backend.

use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::fence::{GeofenceSpec, TriggerAction};

use super::types::{BoxFuture, ConnectFailure, LocationBackend, OperationOutcome};

/// Error code the simulated backend reports when asked to remove fences it
/// does not hold.
pub(crate) const ERROR_UNKNOWN_FENCE: i32 = 1000;

/// Simulated location backend backed by an in-memory fence registry.
///
/// Connect behavior is configurable for tests: an injected failure makes the
/// next `connect` fail once, and a connect delay exercises timeout paths.
///
/// # Example
///
/// ```ignore
/// let backend = SimulatedBackend::new();
/// backend.inject_connect_failure(ConnectFailure::resolvable(2));
/// ```
pub struct SimulatedBackend {
    fences: DashMap<String, GeofenceSpec>,
    next_connect_failure: Mutex<Option<ConnectFailure>>,
    connect_delay: Mutex<Option<Duration>>,
}

impl SimulatedBackend {
    /// Create an empty simulated backend.
    pub fn new() -> Self {
        Self {
            fences: DashMap::new(),
            next_connect_failure: Mutex::new(None),
            connect_delay: Mutex::new(None),
        }
    }

    /// Make the next `connect` call fail with the given failure.
    ///
    /// The injection is consumed by that call; subsequent connects succeed.
    pub fn inject_connect_failure(&self, failure: ConnectFailure) {
        *self.next_connect_failure.lock() = Some(failure);
    }

    /// Delay every `connect` call by the given duration.
    pub fn set_connect_delay(&self, delay: Duration) {
        *self.connect_delay.lock() = Some(delay);
    }

    /// Number of fences currently registered.
    pub fn fence_count(&self) -> usize {
        self.fences.len()
    }

    /// Whether a fence with the given id is registered.
    pub fn holds_fence(&self, request_id: &str) -> bool {
        self.fences.contains_key(request_id)
    }

    /// Snapshot of the registered fences.
    pub fn registered_fences(&self) -> Vec<GeofenceSpec> {
        self.fences.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationBackend for SimulatedBackend {
    fn connect(&self) -> BoxFuture<'_, Result<(), ConnectFailure>> {
        Box::pin(async move {
            let delay = *self.connect_delay.lock();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            if let Some(failure) = self.next_connect_failure.lock().take() {
                debug!(code = failure.code, resolvable = failure.resolvable, "Injected connect failure");
                return Err(failure);
            }

            debug!("Simulated backend connected");
            Ok(())
        })
    }

    fn disconnect(&self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            debug!("Simulated backend disconnected");
        })
    }

    fn add_fences(
        &self,
        fences: Vec<GeofenceSpec>,
        trigger: TriggerAction,
    ) -> BoxFuture<'_, OperationOutcome> {
        Box::pin(async move {
            let mut affected = Vec::with_capacity(fences.len());
            for fence in fences {
                info!(
                    id = fence.request_id(),
                    lat = fence.latitude(),
                    lon = fence.longitude(),
                    radius_m = fence.radius_meters(),
                    trigger = %trigger,
                    "Fence registered"
                );
                affected.push(fence.request_id().to_string());
                self.fences.insert(fence.request_id().to_string(), fence);
            }
            OperationOutcome::success(affected)
        })
    }

    fn remove_fences(&self, ids: Vec<String>) -> BoxFuture<'_, OperationOutcome> {
        Box::pin(async move {
            let mut removed = Vec::new();
            for id in &ids {
                if self.fences.remove(id).is_some() {
                    info!(id = id.as_str(), "Fence removed");
                    removed.push(id.clone());
                }
            }

            if removed.is_empty() {
                debug!(requested = ids.len(), "No matching fences to remove");
                OperationOutcome::error(ERROR_UNKNOWN_FENCE, removed)
            } else {
                OperationOutcome::success(removed)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::TransitionMask;

    fn fence(id: &str) -> GeofenceSpec {
        GeofenceSpec::builder(id)
            .with_center(35.710057714926265, 139.81071829999996)
            .with_radius_meters(200.0)
            .with_transitions(TransitionMask::ENTER)
            .with_trigger(TriggerAction::open_uri("http://www.tokyo-skytree.jp/"))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_succeeds_by_default() {
        let backend = SimulatedBackend::new();
        assert!(backend.connect().await.is_ok());
    }

    #[tokio::test]
    async fn test_injected_failure_consumed_by_one_connect() {
        let backend = SimulatedBackend::new();
        backend.inject_connect_failure(ConnectFailure::unresolvable(8));

        assert_eq!(
            backend.connect().await,
            Err(ConnectFailure::unresolvable(8))
        );
        // The injection is one-shot.
        assert!(backend.connect().await.is_ok());
    }

    #[tokio::test]
    async fn test_add_registers_fence() {
        let backend = SimulatedBackend::new();
        let outcome = backend
            .add_fences(
                vec![fence("tokyo_skytree")],
                TriggerAction::open_uri("http://www.tokyo-skytree.jp/"),
            )
            .await;

        assert!(outcome.result.is_success());
        assert_eq!(outcome.affected_ids, vec!["tokyo_skytree"]);
        assert!(backend.holds_fence("tokyo_skytree"));
        assert_eq!(backend.fence_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_deletes_fence() {
        let backend = SimulatedBackend::new();
        backend
            .add_fences(
                vec![fence("tokyo_skytree")],
                TriggerAction::open_uri("http://www.tokyo-skytree.jp/"),
            )
            .await;

        let outcome = backend
            .remove_fences(vec!["tokyo_skytree".to_string()])
            .await;

        assert!(outcome.result.is_success());
        assert!(!backend.holds_fence("tokyo_skytree"));
        assert_eq!(backend.fence_count(), 0);
    }

    #[tokio::test]
    async fn test_remove_unknown_fence_reports_error() {
        let backend = SimulatedBackend::new();
        let outcome = backend.remove_fences(vec!["missing".to_string()]).await;

        assert_eq!(
            outcome.result,
            crate::backend::ResultCode::Error(ERROR_UNKNOWN_FENCE)
        );
        assert!(outcome.affected_ids.is_empty());
    }
}

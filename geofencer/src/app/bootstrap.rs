//! Application bootstrap implementation.

use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing::info;

use crate::backend::SimulatedBackend;
use crate::service::{GeofenceService, SubmitResult};
use crate::telemetry::TelemetrySnapshot;

use super::config::AppConfig;
use super::error::AppError;

/// Geofencer application with service lifecycle management.
///
/// Owns the simulated backend, the session service, and a dedicated Tokio
/// runtime so CLI command handlers (which are synchronous) can drive
/// sessions with blocking calls. The runtime lives as long as the app.
pub struct GeofencerApp {
    backend: Arc<SimulatedBackend>,
    service: Arc<GeofenceService<SimulatedBackend>>,
    config: AppConfig,
    runtime: Runtime,
}

impl GeofencerApp {
    /// Start the application with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the Tokio runtime cannot be created.
    pub fn start(config: AppConfig) -> Result<Self, AppError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| AppError::RuntimeCreation(e.to_string()))?;

        let backend = Arc::new(SimulatedBackend::new());
        let service = Arc::new(
            GeofenceService::new(Arc::clone(&backend)).with_config(config.service),
        );

        info!(fence = config.fence.request_id(), "Geofencer application started");

        Ok(Self {
            backend,
            service,
            config,
            runtime,
        })
    }

    /// The session service.
    pub fn service(&self) -> Arc<GeofenceService<SimulatedBackend>> {
        Arc::clone(&self.service)
    }

    /// The simulated backend (for registry inspection).
    pub fn backend(&self) -> Arc<SimulatedBackend> {
        Arc::clone(&self.backend)
    }

    /// The application configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register the configured fence, blocking until the session ends.
    pub fn add_fence_blocking(&self) -> SubmitResult {
        let spec = self.config.fence.clone();
        self.runtime.block_on(self.service.add_fence(spec))
    }

    /// Remove the fence with the given id, blocking until the session ends.
    pub fn remove_fence_blocking(&self, request_id: &str) -> SubmitResult {
        self.runtime
            .block_on(self.service.remove_fence(request_id.to_string()))
    }

    /// Current telemetry snapshot.
    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.service.metrics().snapshot()
    }

    /// Abort any in-flight session and refuse further work.
    pub fn shutdown(&self) {
        self.service.shutdown();
    }
}

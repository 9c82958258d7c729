//! Application configuration for GeofencerApp.
//!
//! This module defines `AppConfig` which combines all configuration needed
//! to bootstrap the application: the fence to operate on and the session
//! service settings.

use crate::config::ConfigFile;
use crate::fence::GeofenceSpec;
use crate::service::ServiceConfig;

use super::error::AppError;

/// Application configuration combining all component configs.
///
/// This is the top-level configuration passed to `GeofencerApp::start()`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// The fence the application operates on.
    pub fence: GeofenceSpec,

    /// Session service configuration (timeouts).
    pub service: ServiceConfig,
}

impl AppConfig {
    /// Create an application config for the given fence with default
    /// service settings.
    pub fn new(fence: GeofenceSpec) -> Self {
        Self {
            fence,
            service: ServiceConfig::default(),
        }
    }

    /// Set the service configuration.
    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.service = service;
        self
    }

    /// Create application config from the CLI configuration file.
    ///
    /// Keeps the configuration translation logic in one place rather than
    /// scattered in CLI code.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, AppError> {
        Ok(Self {
            fence: config.fence_spec()?,
            service: config.service_config(),
        })
    }
}

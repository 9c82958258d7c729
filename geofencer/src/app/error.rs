//! Application error types.

use std::fmt;

use crate::config::ConfigError;
use crate::fence::FenceError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Configuration error.
    Config(String),

    /// The configured fence definition is invalid.
    Fence(FenceError),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => {
                write!(f, "Configuration error: {}", msg)
            }
            AppError::Fence(e) => {
                write!(f, "Invalid fence definition: {}", e)
            }
            AppError::RuntimeCreation(msg) => {
                write!(f, "Failed to create Tokio runtime: {}", msg)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Fence(e) => Some(e),
            AppError::Config(_) | AppError::RuntimeCreation(_) => None,
        }
    }
}

impl From<FenceError> for AppError {
    fn from(e: FenceError) -> Self {
        AppError::Fence(e)
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidFence(fence) => AppError::Fence(fence),
            other => AppError::Config(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config("missing fence id".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing fence id"));
    }

    #[test]
    fn test_app_error_from_fence_error() {
        let fence_err = FenceError::EmptyRequestId;
        let app_err: AppError = fence_err.into();
        assert!(matches!(app_err, AppError::Fence(_)));
    }

    #[test]
    fn test_app_error_from_config_error() {
        let config_err = ConfigError::InvalidFence(FenceError::InvalidRadius(-1.0));
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Fence(_)));
    }
}

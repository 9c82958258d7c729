//! Application bootstrap and lifecycle management.
//!
//! This module provides the `GeofencerApp` type which wires the simulated
//! backend, session service, and telemetry together for the CLI, and
//! manages the Tokio runtime so synchronous callers (CLI command handlers)
//! can drive sessions with blocking calls.
//!
//! # Example
//!
//! ```ignore
//! use geofencer::app::{AppConfig, GeofencerApp};
//!
//! let app = GeofencerApp::start(config)?;
//! let result = app.add_fence_blocking(spec);
//! app.shutdown();
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::GeofencerApp;
pub use config::AppConfig;
pub use error::AppError;

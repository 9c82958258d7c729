//! Geofencer - Geofence request coordination for external location backends
//!
//! This library mediates between a caller's intent ("add this fence" /
//! "remove this fence by id") and an external location backend. It owns the
//! connection lifecycle, serializes exactly one pending geofence operation at
//! a time, and reports completion or failure back to a host observer.
//!
//! The actual geofence evaluation (entry/exit detection, background location
//! sensing, trigger delivery) is the responsibility of the backend; this
//! crate only registers and removes fences through it.

pub mod app;
pub mod backend;
pub mod config;
pub mod coordinator;
pub mod fence;
pub mod logging;
pub mod service;
pub mod telemetry;

/// Crate version, for CLI banners and logs.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Location backend abstraction
//!
//! The backend is the external collaborator that actually evaluates
//! geofences: it owns connection management on its side, background location
//! sensing, and trigger delivery. This crate only registers and removes
//! fences through it.
//!
//! The [`LocationBackend`] trait is dyn-compatible (`Pin<Box<dyn Future>>`
//! returns) so the session service can hold any backend behind
//! `Arc<dyn LocationBackend>`. Future resolution plays the role of the
//! platform's result callbacks; the service translates each resolution into
//! the matching coordinator callback.

mod simulated;
mod types;

pub use simulated::SimulatedBackend;
pub use types::{
    BoxFuture, ConnectFailure, LocationBackend, OperationOutcome, ResultCode,
};

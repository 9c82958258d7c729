//! Geofence data model
//!
//! Provides the value types describing a single circular fenced region:
//! the fence specification itself, the transition events it reports, its
//! expiration policy, and the opaque action the backend fires when a
//! transition matches.

mod spec;
mod transition;
mod trigger;

pub use spec::{FenceError, GeofenceSpec, GeofenceSpecBuilder, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
pub use transition::{Expiration, Transition, TransitionMask};
pub use trigger::TriggerAction;

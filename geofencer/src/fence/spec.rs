//! Geofence specification and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::transition::{Expiration, TransitionMask};
use super::trigger::TriggerAction;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors that can occur while building a geofence specification.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FenceError {
    /// Latitude outside [-90, 90] degrees.
    #[error("invalid latitude: {0} (must be between -90 and 90 degrees)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] degrees.
    #[error("invalid longitude: {0} (must be between -180 and 180 degrees)")]
    InvalidLongitude(f64),

    /// Radius not strictly positive and finite.
    #[error("invalid radius: {0} meters (must be positive and finite)")]
    InvalidRadius(f32),

    /// Request id is empty.
    #[error("fence request id must not be empty")]
    EmptyRequestId,

    /// Transition mask selects no events; the fence could never fire.
    #[error("transition mask must select at least one event")]
    EmptyTransitionMask,
}

/// Specification of a single circular fenced region.
///
/// A spec is a pure value: the coordinator stores it, hands it to the
/// backend at registration time, and never mutates it. Construction goes
/// through [`GeofenceSpec::builder`], which validates coordinates, radius,
/// and the transition mask.
///
/// # Example
///
/// ```
/// use geofencer::fence::{GeofenceSpec, TransitionMask, TriggerAction};
///
/// let spec = GeofenceSpec::builder("tokyo_skytree")
///     .with_center(35.710057714926265, 139.81071829999996)
///     .with_radius_meters(200.0)
///     .with_transitions(TransitionMask::ENTER)
///     .with_trigger(TriggerAction::open_uri("http://www.tokyo-skytree.jp/"))
///     .build()
///     .unwrap();
///
/// assert_eq!(spec.request_id(), "tokyo_skytree");
/// assert_eq!(spec.radius_meters(), 200.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceSpec {
    request_id: String,
    latitude: f64,
    longitude: f64,
    radius_meters: f32,
    expiration: Expiration,
    transitions: TransitionMask,
    trigger: TriggerAction,
}

impl GeofenceSpec {
    /// Start building a fence specification with the given request id.
    pub fn builder(request_id: impl Into<String>) -> GeofenceSpecBuilder {
        GeofenceSpecBuilder::new(request_id)
    }

    /// Unique identifier for this fence.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Center latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Center longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Fence radius in meters.
    pub fn radius_meters(&self) -> f32 {
        self.radius_meters
    }

    /// Expiration policy.
    pub fn expiration(&self) -> Expiration {
        self.expiration
    }

    /// Transition events this fence reports.
    pub fn transitions(&self) -> TransitionMask {
        self.transitions
    }

    /// Action the backend fires when a selected transition occurs.
    pub fn trigger(&self) -> &TriggerAction {
        &self.trigger
    }
}

/// Builder for [`GeofenceSpec`].
///
/// Defaults: expiration never, transitions enter-only, trigger opens an
/// empty URI (callers registering a real fence set their own).
#[derive(Debug, Clone)]
pub struct GeofenceSpecBuilder {
    request_id: String,
    latitude: f64,
    longitude: f64,
    radius_meters: f32,
    expiration: Expiration,
    transitions: TransitionMask,
    trigger: TriggerAction,
}

impl GeofenceSpecBuilder {
    fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            latitude: 0.0,
            longitude: 0.0,
            radius_meters: 0.0,
            expiration: Expiration::Never,
            transitions: TransitionMask::ENTER,
            trigger: TriggerAction::open_uri(""),
        }
    }

    /// Set the center coordinates in degrees.
    pub fn with_center(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Set the radius in meters.
    pub fn with_radius_meters(mut self, radius: f32) -> Self {
        self.radius_meters = radius;
        self
    }

    /// Set the expiration policy.
    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Set the transition mask.
    pub fn with_transitions(mut self, transitions: TransitionMask) -> Self {
        self.transitions = transitions;
        self
    }

    /// Set the trigger action.
    pub fn with_trigger(mut self, trigger: TriggerAction) -> Self {
        self.trigger = trigger;
        self
    }

    /// Validate and build the specification.
    ///
    /// # Errors
    ///
    /// Returns a [`FenceError`] if the request id is empty, coordinates are
    /// out of range, the radius is not strictly positive and finite, or the
    /// transition mask is empty.
    pub fn build(self) -> Result<GeofenceSpec, FenceError> {
        if self.request_id.is_empty() {
            return Err(FenceError::EmptyRequestId);
        }
        if !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(FenceError::InvalidLatitude(self.latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(FenceError::InvalidLongitude(self.longitude));
        }
        if !(self.radius_meters.is_finite() && self.radius_meters > 0.0) {
            return Err(FenceError::InvalidRadius(self.radius_meters));
        }
        if self.transitions.is_empty() {
            return Err(FenceError::EmptyTransitionMask);
        }

        Ok(GeofenceSpec {
            request_id: self.request_id,
            latitude: self.latitude,
            longitude: self.longitude,
            radius_meters: self.radius_meters,
            expiration: self.expiration,
            transitions: self.transitions,
            trigger: self.trigger,
        })
    }
}

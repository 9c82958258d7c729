//! Asynchronous fence preparation.

use thiserror::Error;

use crate::backend::BoxFuture;
use crate::fence::GeofenceSpec;

/// Errors that can occur while preparing a fence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PrepareError {
    /// The fence data could not be produced.
    #[error("fence data unavailable: {0}")]
    Unavailable(String),
}

/// Produces the final fence specification for a pending add.
///
/// Registration flows through an explicit preparation step so that sources
/// which fetch fence data from elsewhere (a network service, a database)
/// compose with the session lifecycle: cancellation and the operation
/// timeout cover preparation like any other phase.
pub trait FenceSource: Send + Sync {
    /// Prepare the fence to register.
    ///
    /// Sources may return the spec unchanged, refine it, or replace it
    /// entirely; the returned spec is what gets registered.
    fn prepare(&self, spec: GeofenceSpec) -> BoxFuture<'_, Result<GeofenceSpec, PrepareError>>;
}

/// Source that registers the requested spec as-is, without any fetch.
#[derive(Debug, Default)]
pub struct ImmediateFenceSource;

impl FenceSource for ImmediateFenceSource {
    fn prepare(&self, spec: GeofenceSpec) -> BoxFuture<'_, Result<GeofenceSpec, PrepareError>> {
        Box::pin(async move { Ok(spec) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::{TransitionMask, TriggerAction};

    #[tokio::test]
    async fn test_immediate_source_returns_spec_unchanged() {
        let spec = GeofenceSpec::builder("fence")
            .with_center(10.0, 20.0)
            .with_radius_meters(100.0)
            .with_transitions(TransitionMask::ENTER)
            .with_trigger(TriggerAction::open_uri("http://example.com/"))
            .build()
            .unwrap();

        let prepared = ImmediateFenceSource.prepare(spec.clone()).await.unwrap();
        assert_eq!(prepared, spec);
    }
}

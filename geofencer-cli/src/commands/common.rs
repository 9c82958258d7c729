//! Common utilities shared across CLI commands.

use geofencer::config::ConfigFile;
use geofencer::coordinator::SessionOutcome;
use geofencer::fence::{GeofenceSpec, TransitionMask, TriggerAction};
use geofencer::service::SubmitResult;

use crate::error::CliError;

/// Fence overrides accepted by the add command.
///
/// CLI arguments win over config file values when specified, matching the
/// resolution order of the other settings.
#[derive(Debug, Default)]
pub struct FenceOverrides {
    pub id: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f32>,
    pub trigger_url: Option<String>,
}

/// Resolve the fence spec from CLI overrides and the config file.
pub fn resolve_fence_spec(
    overrides: FenceOverrides,
    config: &ConfigFile,
) -> Result<GeofenceSpec, CliError> {
    let spec = GeofenceSpec::builder(overrides.id.unwrap_or_else(|| config.fence.id.clone()))
        .with_center(
            overrides.latitude.unwrap_or(config.fence.latitude),
            overrides.longitude.unwrap_or(config.fence.longitude),
        )
        .with_radius_meters(overrides.radius.unwrap_or(config.fence.radius))
        .with_transitions(TransitionMask::ENTER)
        .with_trigger(TriggerAction::open_uri(
            overrides
                .trigger_url
                .unwrap_or_else(|| config.fence.trigger_url.clone()),
        ))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(spec)
}

/// Print a submitted session's result.
pub fn print_result(result: &SubmitResult) {
    match result {
        SubmitResult::Completed(SessionOutcome::Completed {
            result,
            affected_ids,
        }) => {
            println!("Session completed: {}", result);
            if !affected_ids.is_empty() {
                println!("Affected fences: {}", affected_ids.join(", "));
            }
        }
        SubmitResult::Completed(SessionOutcome::Failed(err)) => {
            println!("Session failed: {}", err);
        }
        SubmitResult::Busy => {
            println!("Dropped: another request is already in flight");
        }
        SubmitResult::Abandoned => {
            println!("Abandoned: the request was superseded before completing");
        }
        SubmitResult::Cancelled => {
            println!("Cancelled: the service shut down mid-session");
        }
    }
}

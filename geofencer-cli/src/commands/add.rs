//! Add command - register a geofence.

use clap::Args;
use tracing::debug;

use geofencer::app::{AppConfig, GeofencerApp};
use geofencer::config::ConfigFile;

use super::common::{print_result, resolve_fence_spec, FenceOverrides};
use crate::error::CliError;

/// Arguments for the add command.
#[derive(Debug, Args)]
pub struct AddArgs {
    /// Fence id (default: configured fence)
    #[arg(long)]
    pub id: Option<String>,

    /// Center latitude in degrees
    #[arg(long)]
    pub lat: Option<f64>,

    /// Center longitude in degrees
    #[arg(long)]
    pub lon: Option<f64>,

    /// Radius in meters
    #[arg(long)]
    pub radius: Option<f32>,

    /// URI to open when the fence is entered
    #[arg(long)]
    pub trigger_url: Option<String>,
}

/// Run the add command.
pub fn run(args: AddArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let spec = resolve_fence_spec(
        FenceOverrides {
            id: args.id,
            latitude: args.lat,
            longitude: args.lon,
            radius: args.radius,
            trigger_url: args.trigger_url,
        },
        &config,
    )?;
    debug!(id = spec.request_id(), "Resolved fence specification");

    println!("Geofencer v{}", geofencer::VERSION);
    println!();
    println!("Registering fence:");
    println!("  Id:       {}", spec.request_id());
    println!("  Center:   {}, {}", spec.latitude(), spec.longitude());
    println!("  Radius:   {} m", spec.radius_meters());
    println!("  Trigger:  {}", spec.trigger());
    println!();

    let app_config = AppConfig::new(spec).with_service(config.service_config());
    let app = GeofencerApp::start(app_config)?;

    let result = app.add_fence_blocking();
    print_result(&result);

    Ok(())
}

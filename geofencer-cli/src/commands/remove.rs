//! Remove command - deregister a geofence by id.

use clap::Args;

use geofencer::app::{AppConfig, GeofencerApp};
use geofencer::config::ConfigFile;

use super::common::print_result;
use crate::error::CliError;

/// Arguments for the remove command.
#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Fence id to remove (default: configured fence)
    pub id: Option<String>,
}

/// Run the remove command.
pub fn run(args: RemoveArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let id = args.id.unwrap_or_else(|| config.fence.id.clone());

    println!("Geofencer v{}", geofencer::VERSION);
    println!();
    println!("Removing fence: {}", id);
    println!();

    let app_config = AppConfig::from_config_file(&config)?;
    let app = GeofencerApp::start(app_config)?;

    let result = app.remove_fence_blocking(&id);
    print_result(&result);

    Ok(())
}

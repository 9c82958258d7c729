//! Init command - initialize configuration file.

use geofencer::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Run the init command.
pub fn run() -> Result<(), CliError> {
    // Load existing config or create the defaults (the Tokyo Skytree demo
    // fence), then write it out.
    let config = ConfigFile::load().unwrap_or_default();
    config.save()?;

    let path = config_file_path()?;
    println!("Configuration file: {}", path.display());
    println!();
    println!("Fence: {} ({} m around {}, {})",
        config.fence.id,
        config.fence.radius,
        config.fence.latitude,
        config.fence.longitude,
    );
    println!();
    println!("Edit this file to customize geofencer settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

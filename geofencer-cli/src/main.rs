//! Geofencer CLI - Command-line interface
//!
//! This binary provides a command-line interface to the geofencer library:
//! registering and removing fences against the simulated backend, a full
//! lifecycle demonstration, and configuration management.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use geofencer::config::ConfigFile;

#[derive(Parser)]
#[command(
    name = "geofencer",
    version = geofencer::VERSION,
    about = "Register and remove geofences through a location backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a geofence
    Add(commands::add::AddArgs),

    /// Remove a registered geofence by id
    Remove(commands::remove::RemoveArgs),

    /// Run the full register/remove demonstration lifecycle
    Demo(commands::demo::DemoArgs),

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Initialize the configuration file
    Init,
}

fn main() {
    let cli = Cli::parse();

    // Logging is configured before dispatch; the appender guard must stay
    // alive until exit.
    let config = ConfigFile::load().unwrap_or_default();
    let _guard = match config.logging.directory.as_deref() {
        Some(dir) => Some(geofencer::logging::init_with_file(&config.logging.level, dir)),
        None => {
            geofencer::logging::init(&config.logging.level);
            None
        }
    };

    let result = match cli.command {
        Commands::Add(args) => commands::add::run(args),
        Commands::Remove(args) => commands::remove::run(args),
        Commands::Demo(args) => commands::demo::run(args),
        Commands::Config { command } => commands::config::run(command),
        Commands::Init => commands::init::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

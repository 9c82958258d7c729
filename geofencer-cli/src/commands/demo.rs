//! Demo command - full register/remove lifecycle against the simulated
//! backend.
//!
//! Registers the configured fence, holds it while the process runs (this is
//! where a real backend would evaluate transitions and fire the trigger),
//! then removes it on Ctrl+C and prints a session summary.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use clap::Args;

use geofencer::app::{AppConfig, GeofencerApp};
use geofencer::config::ConfigFile;

use super::common::print_result;
use crate::error::CliError;

/// Arguments for the demo command.
#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Hold the fence for this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    pub hold: Option<u64>,
}

/// Run the demo command.
pub fn run(args: DemoArgs) -> Result<(), CliError> {
    let config = ConfigFile::load().unwrap_or_default();
    let app_config = AppConfig::from_config_file(&config)?;
    let fence_id = app_config.fence.request_id().to_string();
    let app = GeofencerApp::start(app_config)?;

    println!("Geofencer Demo v{}", geofencer::VERSION);
    println!("=================");
    println!();
    println!("Fence:   {}", fence_id);
    println!(
        "Center:  {}, {}",
        app.config().fence.latitude(),
        app.config().fence.longitude()
    );
    println!("Radius:  {} m", app.config().fence.radius_meters());
    println!("Trigger: {}", app.config().fence.trigger());
    println!();

    println!("Registering fence...");
    let result = app.add_fence_blocking();
    print_result(&result);
    println!();

    if app.backend().holds_fence(&fence_id) {
        match args.hold {
            Some(secs) => {
                println!("Holding fence for {}s...", secs);
                std::thread::sleep(Duration::from_secs(secs));
            }
            None => {
                println!("Fence registered. Press Ctrl+C to remove it and exit.");

                let shutdown = Arc::new(AtomicBool::new(false));
                let shutdown_clone = shutdown.clone();
                ctrlc::set_handler(move || {
                    println!();
                    println!("Received shutdown signal, removing fence...");
                    shutdown_clone.store(true, Ordering::SeqCst);
                })
                .map_err(|e| {
                    CliError::Config(format!("Failed to set signal handler: {}", e))
                })?;

                while !shutdown.load(Ordering::SeqCst) {
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }

        println!("Removing fence...");
        let result = app.remove_fence_blocking(&fence_id);
        print_result(&result);
    }

    // Print final session summary
    let snapshot = app.telemetry_snapshot();
    println!();
    println!("Session Summary");
    println!("───────────────");
    println!("  Uptime:             {}", snapshot.uptime_human());
    println!(
        "  Requests:           {} accepted, {} dropped",
        snapshot.requests_accepted, snapshot.requests_rejected
    );
    println!(
        "  Sessions:           {} completed, {} failed, {} timed out",
        snapshot.sessions_completed, snapshot.sessions_failed, snapshot.sessions_timed_out
    );
    println!(
        "  Fences:             {} added, {} removed",
        snapshot.fences_added, snapshot.fences_removed
    );

    Ok(())
}
